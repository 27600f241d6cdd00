//! `struct-small`: one mixed-width record

use super::{record_single_pair_stats, run_pairs, MemoryTest, PairSpec, RunContext, RunSettings};
use crate::memory::TestOutcome;
use crate::models::{SmallOptimized, SmallUnoptimized};

/// Entity label of the only pair
pub const LABEL: &str = "Small Struct";

/// Mixed-width record in both field orders
#[derive(Debug, Clone, Copy, Default)]
pub struct SmallStructTest;

impl MemoryTest for SmallStructTest {
    fn key(&self) -> &'static str {
        "struct-small"
    }

    fn name(&self) -> &'static str {
        "Struct Field Order Test"
    }

    fn pairs(&self, settings: &RunSettings) -> Vec<PairSpec> {
        vec![PairSpec::of::<SmallOptimized, SmallUnoptimized>(
            LABEL,
            settings.count_for(LABEL, settings.object_count),
        )]
    }

    fn run(&self, settings: &RunSettings, ctx: &RunContext<'_>) -> TestOutcome {
        let mut outcome = run_pairs(self.key(), self.name(), self.pairs(settings), ctx);
        record_single_pair_stats(&mut outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pair_uses_object_count() {
        let settings = RunSettings {
            object_count: 1_234,
            ..Default::default()
        };
        let pairs = SmallStructTest.pairs(&settings);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].object_count, 1_234);
        assert_eq!(pairs[0].optimized.label(), "SmallOptimized");
        assert_eq!(pairs[0].baseline.label(), "SmallUnoptimized");
        assert!(pairs[0].layouts.is_some());
    }
}
