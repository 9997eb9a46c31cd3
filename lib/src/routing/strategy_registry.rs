use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::errors::{Error, Result};
use crate::routing::load_balancing::round_robin_strategy::RoundRobinStrategy;
use crate::routing::load_balancing::{BalanceContext, BalanceStrategy};

/// The named, ordered set of pluggable selection strategies.
///
/// Strategies are invoked in registration order, first come first tried;
/// a strategy that should take precedence must be registered first. The
/// built-in round robin decides whenever every registered strategy
/// declines.
pub(crate) struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn BalanceStrategy>>,
    /// Invocation order. Every name here has an entry in `strategies` and
    /// vice versa.
    order: Vec<String>,
    default: RoundRobinStrategy,
}

impl StrategyRegistry {
    pub(crate) fn new() -> Self {
        StrategyRegistry {
            strategies: HashMap::new(),
            order: Vec::new(),
            default: RoundRobinStrategy::new(),
        }
    }

    /// Adds a strategy under a unique name.
    ///
    /// A name that is already taken is rejected, never overwritten, so the
    /// balancing behavior cannot change out from under concurrent callers.
    pub(crate) fn register(
        &mut self,
        name: impl Into<String>,
        strategy: Arc<dyn BalanceStrategy>,
    ) -> Result<()> {
        let name = name.into();
        if self.strategies.contains_key(&name) {
            return Err(Error::DuplicateStrategy(name));
        }
        self.strategies.insert(name.clone(), strategy);
        self.order.push(name);
        Ok(())
    }

    /// Removes a strategy if present; removing an absent name is a no-op.
    /// The relative order of the remaining strategies is preserved.
    pub(crate) fn remove(&mut self, name: &str) {
        if self.strategies.remove(name).is_some() {
            self.order.retain(|registered| registered != name);
        }
    }

    /// Runs the selection protocol: the first strategy that commits to an
    /// in-range index wins, an out-of-range commitment counts as a decline,
    /// and the round-robin default decides when nothing else does.
    ///
    /// Returns `None` only for an empty context.
    pub(crate) fn choose(&self, ctx: &BalanceContext) -> Option<usize> {
        if ctx.nodes().is_empty() {
            return None;
        }
        for name in &self.order {
            let Some(strategy) = self.strategies.get(name) else {
                continue;
            };
            let Some(index) = strategy.select(ctx) else {
                continue;
            };
            if index < ctx.nodes().len() {
                return Some(index);
            }
            debug!("strategy `{name}` committed to out-of-range index {index}, treating as decline");
        }
        self.default.select(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::node_registry::NodeInfo;

    fn context(size: usize, current: usize) -> BalanceContext {
        let nodes = (0..size)
            .map(|i| NodeInfo {
                host: format!("node-{i}"),
            })
            .collect();
        BalanceContext::new(nodes, current)
    }

    fn committing(index: usize) -> Arc<dyn BalanceStrategy> {
        Arc::new(move |_: &BalanceContext| Some(index))
    }

    fn declining() -> Arc<dyn BalanceStrategy> {
        Arc::new(|_: &BalanceContext| None)
    }

    #[test]
    fn should_reject_duplicate_names_and_keep_the_original() {
        let mut registry = StrategyRegistry::new();
        registry.register("sticky", committing(0)).unwrap();
        let err = registry.register("sticky", committing(1)).unwrap_err();
        assert!(matches!(err, Error::DuplicateStrategy(name) if name == "sticky"));
        assert_eq!(registry.choose(&context(3, 0)), Some(0));
    }

    #[test]
    fn should_try_strategies_in_registration_order() {
        let mut registry = StrategyRegistry::new();
        registry.register("first", committing(0)).unwrap();
        registry.register("second", committing(1)).unwrap();
        assert_eq!(registry.choose(&context(3, 0)), Some(0));
    }

    #[test]
    fn should_skip_declining_strategies() {
        let mut registry = StrategyRegistry::new();
        registry.register("undecided", declining()).unwrap();
        registry.register("second", committing(2)).unwrap();
        assert_eq!(registry.choose(&context(3, 0)), Some(2));
    }

    #[test]
    fn should_treat_out_of_range_commit_as_decline() {
        let mut registry = StrategyRegistry::new();
        registry.register("broken", committing(99)).unwrap();
        // falls through to round robin
        assert_eq!(registry.choose(&context(3, 0)), Some(1));

        registry.register("second", committing(2)).unwrap();
        assert_eq!(registry.choose(&context(3, 0)), Some(2));
    }

    #[test]
    fn should_fall_back_to_round_robin() {
        let registry = StrategyRegistry::new();
        assert_eq!(registry.choose(&context(3, 1)), Some(2));
        assert_eq!(registry.choose(&context(3, 2)), Some(0));
    }

    #[test]
    fn should_ignore_removal_of_unknown_names() {
        let mut registry = StrategyRegistry::new();
        registry.register("sticky", committing(2)).unwrap();
        registry.remove("never-registered");
        assert_eq!(registry.choose(&context(3, 0)), Some(2));
    }

    #[test]
    fn should_preserve_order_across_removal() {
        let mut registry = StrategyRegistry::new();
        registry.register("a", declining()).unwrap();
        registry.register("b", committing(1)).unwrap();
        registry.register("c", committing(2)).unwrap();
        registry.remove("a");
        assert_eq!(registry.order, vec!["b", "c"]);
        assert_eq!(registry.choose(&context(3, 0)), Some(1));
    }

    #[test]
    fn should_restore_default_behavior_after_removal() {
        let mut registry = StrategyRegistry::new();
        registry.register("sticky", committing(0)).unwrap();
        assert_eq!(registry.choose(&context(3, 1)), Some(0));
        registry.remove("sticky");
        assert_eq!(registry.choose(&context(3, 1)), Some(2));
    }

    #[test]
    fn should_not_choose_from_an_empty_context() {
        let mut registry = StrategyRegistry::new();
        registry.register("sticky", committing(0)).unwrap();
        assert_eq!(registry.choose(&context(0, 0)), None);
    }
}
