//! `struct-multi`: four everyday record shapes at their own volumes

use super::{MemoryTest, PairSpec, RunSettings};
use crate::models::{
    ApiRequestOptimized, ApiRequestUnoptimized, ConfigOptimized, ConfigUnoptimized,
    DbEntityOptimized, DbEntityUnoptimized, GraphQlQueryOptimized, GraphQlQueryUnoptimized,
};

/// API request records; one per request, the highest volume
pub const API_REQUEST: &str = "API Request";
/// Configuration entries; few of them
pub const CONFIG: &str = "Config";
/// GraphQL query records
pub const GRAPHQL: &str = "GraphQL";
/// Database rows
pub const DATABASE_ENTITY: &str = "Database Entity";

/// Several record shapes measured side by side
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiStructTest;

impl MemoryTest for MultiStructTest {
    fn key(&self) -> &'static str {
        "struct-multi"
    }

    fn name(&self) -> &'static str {
        "Multiple Struct Types Test"
    }

    fn pairs(&self, settings: &RunSettings) -> Vec<PairSpec> {
        let base = settings.object_count;
        vec![
            PairSpec::of::<ApiRequestOptimized, ApiRequestUnoptimized>(
                API_REQUEST,
                settings.count_for(API_REQUEST, base),
            ),
            PairSpec::of::<ConfigOptimized, ConfigUnoptimized>(
                CONFIG,
                settings.count_for(CONFIG, base / 100),
            ),
            PairSpec::of::<GraphQlQueryOptimized, GraphQlQueryUnoptimized>(
                GRAPHQL,
                settings.count_for(GRAPHQL, base / 2),
            ),
            PairSpec::of::<DbEntityOptimized, DbEntityUnoptimized>(
                DATABASE_ENTITY,
                settings.count_for(DATABASE_ENTITY, base / 4),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_volumes() {
        let pairs = MultiStructTest.pairs(&RunSettings::default());
        let volumes: Vec<_> = pairs
            .iter()
            .map(|p| (p.label.as_str(), p.object_count))
            .collect();

        assert_eq!(
            volumes,
            vec![
                (API_REQUEST, 1_000_000),
                (CONFIG, 10_000),
                (GRAPHQL, 500_000),
                (DATABASE_ENTITY, 250_000),
            ]
        );
    }

    #[test]
    fn test_entity_override_replaces_default_volume() {
        let mut settings = RunSettings::default();
        settings.overrides.insert(GRAPHQL.to_string(), 42);

        let pairs = MultiStructTest.pairs(&settings);
        assert_eq!(pairs[2].object_count, 42);
        assert_eq!(pairs[0].object_count, 1_000_000);
    }
}
