//! `struct-big`: one wide transaction record

use super::{record_single_pair_stats, run_pairs, MemoryTest, PairSpec, RunContext, RunSettings};
use crate::memory::TestOutcome;
use crate::models::{LargeOptimized, LargeUnoptimized};

/// Entity label of the only pair
pub const LABEL: &str = "Large Struct";

/// Wide record in both field orders, measured at the large-object count
#[derive(Debug, Clone, Copy, Default)]
pub struct LargeStructTest;

impl MemoryTest for LargeStructTest {
    fn key(&self) -> &'static str {
        "struct-big"
    }

    fn name(&self) -> &'static str {
        "Large Struct Field Order Test"
    }

    fn pairs(&self, settings: &RunSettings) -> Vec<PairSpec> {
        vec![PairSpec::of::<LargeOptimized, LargeUnoptimized>(
            LABEL,
            settings.count_for(LABEL, settings.large_object_count),
        )]
    }

    fn run(&self, settings: &RunSettings, ctx: &RunContext<'_>) -> TestOutcome {
        let mut outcome = run_pairs(self.key(), self.name(), self.pairs(settings), ctx);
        record_single_pair_stats(&mut outcome);
        outcome
    }
}
