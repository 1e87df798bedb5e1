use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::action::{ActionCategory, ActionId, CandidateAction};
use crate::env::ActionOracle;

/// Process-wide candidate list, built once on first use.
///
/// Holds every registered action except suppressed kinds and global
/// replicate-kind entries (those are reintroduced per target), plus the two
/// synthetic exclusion actions, unique by identity and in ascending display
/// order. Invalidated only by process restart: content enabled after the
/// first build is not picked up until then.
#[derive(Clone, Default)]
pub struct CandidateRegistry {
    candidates: Vec<Arc<dyn CandidateAction>>,
}

impl CandidateRegistry {
    /// Collects the candidate set from `oracle`.
    pub fn build(oracle: &dyn ActionOracle, suppressed: &HashSet<ActionId>) -> Self {
        let mut candidates = oracle.registered();
        candidates.retain(|action| {
            action.category() != ActionCategory::Replicate && !suppressed.contains(&action.id())
        });

        let (mark, unmark) = oracle.exclusion_actions();
        candidates.push(mark);
        candidates.push(unmark);

        let mut seen = HashSet::new();
        candidates.retain(|action| seen.insert(action.id()));

        // Same order as the host draws its action buttons.
        candidates.sort_by_key(|action| action.order());

        debug!(count = candidates.len(), "candidate registry built");
        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn CandidateAction>> {
        self.candidates.iter()
    }

    /// Fresh working copy for one cycle.
    pub fn snapshot(&self) -> Vec<Arc<dyn CandidateAction>> {
        self.candidates.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Acceptance;
    use crate::target::{Target, Terrain};

    struct StubAction {
        id: ActionId,
        label: &'static str,
        order: i32,
        category: ActionCategory,
    }

    impl StubAction {
        fn shared(id: u32, order: i32, category: ActionCategory) -> Arc<dyn CandidateAction> {
            Arc::new(Self {
                id: ActionId(id),
                label: "stub",
                order,
                category,
            })
        }
    }

    impl CandidateAction for StubAction {
        fn id(&self) -> ActionId {
            self.id
        }

        fn label(&self) -> &str {
            self.label
        }

        fn order(&self) -> i32 {
            self.order
        }

        fn category(&self) -> ActionCategory {
            self.category
        }

        fn can_apply(&self, _target: &Target) -> Acceptance {
            Acceptance::Accepted
        }
    }

    struct StubOracle {
        registered: Vec<Arc<dyn CandidateAction>>,
    }

    impl ActionOracle for StubOracle {
        fn registered(&self) -> Vec<Arc<dyn CandidateAction>> {
            self.registered.clone()
        }

        fn exclusion_actions(&self) -> (Arc<dyn CandidateAction>, Arc<dyn CandidateAction>) {
            (
                StubAction::shared(100, 90, ActionCategory::Mark),
                StubAction::shared(101, 91, ActionCategory::Unmark),
            )
        }

        fn replicate_for_structure(&self, _target: &Target) -> Option<Arc<dyn CandidateAction>> {
            None
        }

        fn replicate_for_terrain(&self, _terrain: &Terrain) -> Option<Arc<dyn CandidateAction>> {
            None
        }
    }

    fn ids(registry: &CandidateRegistry) -> Vec<u32> {
        registry.iter().map(|action| action.id().0).collect()
    }

    #[test]
    fn build_filters_sorts_and_appends_synthetics() {
        let oracle = StubOracle {
            registered: vec![
                StubAction::shared(2, 20, ActionCategory::Ordinary),
                StubAction::shared(1, 10, ActionCategory::Ordinary),
                // Global replicate entries are reintroduced per target instead.
                StubAction::shared(3, 5, ActionCategory::Replicate),
            ],
        };

        let registry = CandidateRegistry::build(&oracle, &HashSet::new());

        assert_eq!(ids(&registry), vec![1, 2, 100, 101]);
    }

    #[test]
    fn build_honors_suppressed_kinds() {
        let oracle = StubOracle {
            registered: vec![
                StubAction::shared(1, 10, ActionCategory::Ordinary),
                StubAction::shared(2, 20, ActionCategory::Ordinary),
            ],
        };
        let suppressed = HashSet::from([ActionId(2)]);

        let registry = CandidateRegistry::build(&oracle, &suppressed);

        assert_eq!(ids(&registry), vec![1, 100, 101]);
    }

    #[test]
    fn build_deduplicates_by_identity() {
        let oracle = StubOracle {
            registered: vec![
                StubAction::shared(1, 10, ActionCategory::Ordinary),
                StubAction::shared(1, 30, ActionCategory::Ordinary),
            ],
        };

        let registry = CandidateRegistry::build(&oracle, &HashSet::new());

        assert_eq!(ids(&registry), vec![1, 100, 101]);
    }
}
