use crate::routing::load_balancing::{BalanceContext, BalanceStrategy};

/// The built-in fallback strategy.
///
/// Advances the cursor by one and wraps at the pool size, so every call
/// makes progress as long as the pool has more than one node, and some node
/// is always chosen as long as the pool is non-empty.
#[derive(Debug, Default)]
pub struct RoundRobinStrategy;

impl RoundRobinStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl BalanceStrategy for RoundRobinStrategy {
    fn select(&self, ctx: &BalanceContext) -> Option<usize> {
        if ctx.nodes().is_empty() {
            return None;
        }
        Some((ctx.current() + 1) % ctx.nodes().len())
    }
}
