use std::sync::Arc;

use tracing::debug;

use crate::action::{ActionCategory, CandidateAction};
use crate::ledger::{CostLedger, compare_by_cost};
use crate::registry::CandidateRegistry;
use crate::target::Target;

/// Live iteration state for the current target's cycle.
///
/// Created on restart, advanced on every press that continues the cycle, and
/// replaced wholesale by the next restart. Candidates proven inapplicable are
/// pruned from the working list for the rest of the cycle.
#[derive(Clone, Default)]
pub struct CycleState {
    working: Vec<Arc<dyn CandidateAction>>,
    cursor: usize,
    presses: u32,
}

impl CycleState {
    /// Presses consumed since the cycle started.
    pub fn presses(&self) -> u32 {
        self.presses
    }

    /// Candidates still in play this cycle.
    pub fn remaining(&self) -> usize {
        self.working.len()
    }

    /// Seeds a fresh cycle for a new target.
    ///
    /// The registry copy is re-sorted by historical cost; a target-specific
    /// `replicate` action, when present, is pinned to the front (it has no
    /// ledger entry, so the stable re-sort keeps it there); and when the
    /// target carries an exclusion marker the unmark action is moved to the
    /// absolute front, ahead even of the replicate pin.
    pub fn start(
        &mut self,
        registry: &CandidateRegistry,
        ledger: &CostLedger,
        replicate: Option<Arc<dyn CandidateAction>>,
        target_marked: bool,
    ) {
        self.presses = 0;
        self.cursor = 0;
        self.working = registry.snapshot();
        self.working
            .sort_by(|lhs, rhs| compare_by_cost(ledger, lhs.as_ref(), rhs.as_ref()));

        if let Some(replicate) = replicate {
            debug!(action = %replicate.id(), label = replicate.label(), "pinning replicate action");
            self.working.insert(0, replicate);
            self.working
                .sort_by(|lhs, rhs| compare_by_cost(ledger, lhs.as_ref(), rhs.as_ref()));
        }

        if target_marked {
            if let Some(index) = self
                .working
                .iter()
                .position(|action| action.category() == ActionCategory::Unmark)
            {
                let unmark = self.working.remove(index);
                self.working.insert(0, unmark);
            }
        }
    }

    /// Advances to the next candidate applicable to `target`.
    ///
    /// Rejected candidates are pruned and never retried this cycle. The
    /// pinned replicate action is offered once without consulting its own
    /// applicability check. Returns `None` when the scan exhausts the working
    /// list; the cursor then wraps so a later call rescans the remainder from
    /// the top.
    pub fn advance(&mut self, target: &Target) -> Option<Arc<dyn CandidateAction>> {
        // Pruning shifts the list left, so the scan position itself never
        // moves until a candidate is accepted.
        let index = self.cursor;
        while index < self.working.len() {
            let candidate = self.working[index].clone();
            let accepted = candidate.category() == ActionCategory::Replicate
                || candidate.can_apply(target).is_accepted();

            if accepted {
                self.cursor = index + 1;
                self.presses += 1;
                debug!(
                    action = %candidate.id(),
                    label = candidate.label(),
                    presses = self.presses,
                    "candidate accepted"
                );
                return Some(candidate);
            }

            debug!(
                action = %candidate.id(),
                label = candidate.label(),
                "candidate rejected, pruned for this cycle"
            );
            self.working.remove(index);
        }

        self.cursor = 0;
        debug!(target = %target.id, "working list exhausted");
        None
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::action::{Acceptance, ActionId};
    use crate::env::ActionOracle;
    use crate::target::{KindId, TargetFlags, TargetId, Terrain};

    struct StubAction {
        id: ActionId,
        order: i32,
        category: ActionCategory,
        /// Kinds this action accepts; `None` accepts every kind.
        accepts: Option<Vec<KindId>>,
        /// Required marker state; `None` accepts either.
        requires_marker: Option<bool>,
    }

    impl StubAction {
        fn shared(id: u32, order: i32, category: ActionCategory) -> Arc<dyn CandidateAction> {
            Arc::new(Self {
                id: ActionId(id),
                order,
                category,
                accepts: None,
                requires_marker: None,
            })
        }

        fn for_kinds(id: u32, order: i32, kinds: &[u32]) -> Arc<dyn CandidateAction> {
            Arc::new(Self {
                id: ActionId(id),
                order,
                category: ActionCategory::Ordinary,
                accepts: Some(kinds.iter().copied().map(KindId).collect()),
                requires_marker: None,
            })
        }

        fn marker_gated(
            id: u32,
            order: i32,
            category: ActionCategory,
            marked: bool,
        ) -> Arc<dyn CandidateAction> {
            Arc::new(Self {
                id: ActionId(id),
                order,
                category,
                accepts: None,
                requires_marker: Some(marked),
            })
        }
    }

    impl CandidateAction for StubAction {
        fn id(&self) -> ActionId {
            self.id
        }

        fn label(&self) -> &str {
            "stub"
        }

        fn order(&self) -> i32 {
            self.order
        }

        fn category(&self) -> ActionCategory {
            self.category
        }

        fn can_apply(&self, target: &Target) -> Acceptance {
            if let Some(required) = self.requires_marker {
                if target.is_marked() != required {
                    return Acceptance::rejected("marker state mismatch");
                }
            }
            match &self.accepts {
                None => Acceptance::Accepted,
                Some(kinds) if kinds.contains(&target.kind) => Acceptance::Accepted,
                Some(_) => Acceptance::rejected("wrong kind"),
            }
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
                StubAction::marker_gated(100, 90, ActionCategory::Mark, false),
                StubAction::marker_gated(101, 91, ActionCategory::Unmark, true),
            )
        }

        fn replicate_for_structure(&self, _target: &Target) -> Option<Arc<dyn CandidateAction>> {
            None
        }

        fn replicate_for_terrain(&self, _terrain: &Terrain) -> Option<Arc<dyn CandidateAction>> {
            None
        }
    }

    fn registry_of(actions: Vec<Arc<dyn CandidateAction>>) -> CandidateRegistry {
        let oracle = StubOracle {
            registered: actions,
        };
        CandidateRegistry::build(&oracle, &HashSet::new())
    }

    fn target(id: &str, kind: u32, flags: TargetFlags) -> Target {
        Target::new(TargetId::new(id), KindId(kind), 0, flags)
    }

    fn seeded_ledger(registry: &CandidateRegistry) -> CostLedger {
        let mut ledger = CostLedger::new();
        ledger.seed(registry.iter());
        ledger
    }

    #[test]
    fn advance_offers_each_candidate_at_most_once_per_cycle() {
        let registry = registry_of(vec![
            StubAction::shared(1, 10, ActionCategory::Ordinary),
            StubAction::shared(2, 20, ActionCategory::Ordinary),
        ]);
        let ledger = seeded_ledger(&registry);
        let target = target("wall7", 1, TargetFlags::empty());

        let mut cycle = CycleState::default();
        cycle.start(&registry, &ledger, None, false);

        let mut offered = Vec::new();
        while let Some(action) = cycle.advance(&target) {
            offered.push(action.id());
        }

        // Unmark applies only to marked targets, so it gets pruned; the rest
        // are each offered exactly once, in cost order (all tied here).
        assert_eq!(offered, vec![ActionId(1), ActionId(2), ActionId(100)]);
    }

    #[test]
    fn rejected_candidates_are_pruned_for_the_cycle() {
        // Only kind 2 applies; the action for kind 9 is pruned on first contact.
        let registry = registry_of(vec![
            StubAction::for_kinds(1, 10, &[9]),
            StubAction::for_kinds(2, 20, &[2]),
        ]);
        let ledger = seeded_ledger(&registry);
        let target = target("bed1", 2, TargetFlags::empty());

        let mut cycle = CycleState::default();
        cycle.start(&registry, &ledger, None, false);
        let before = cycle.remaining();

        let accepted = cycle.advance(&target).expect("kind 2 action applies");
        assert_eq!(accepted.id(), ActionId(2));
        // Unmark and the kind-9 action were both pruned ahead of the accept.
        assert_eq!(cycle.remaining(), before - 2);
        assert_eq!(cycle.presses(), 1);
    }

    #[test]
    fn exhaustion_wraps_cursor_to_top_of_remainder() {
        let registry = registry_of(vec![StubAction::shared(1, 10, ActionCategory::Ordinary)]);
        let ledger = seeded_ledger(&registry);
        let target = target("rock3", 1, TargetFlags::empty());

        let mut cycle = CycleState::default();
        cycle.start(&registry, &ledger, None, false);

        let mut first_pass = Vec::new();
        while let Some(action) = cycle.advance(&target) {
            first_pass.push(action.id());
        }
        assert_eq!(first_pass, vec![ActionId(1), ActionId(100)]);

        // No restart: the next scan starts over from the top of what remains.
        let again = cycle.advance(&target).expect("remainder rescanned");
        assert_eq!(again.id(), first_pass[0]);
    }

    #[test]
    fn replicate_pin_is_first_and_bypasses_applicability() {
        let registry = registry_of(vec![StubAction::for_kinds(1, 10, &[5])]);
        let ledger = seeded_ledger(&registry);
        // Rejects everything on its own check; it must still be offered first.
        let replicate: Arc<dyn CandidateAction> = Arc::new(StubAction {
            id: ActionId(50),
            order: 999,
            category: ActionCategory::Replicate,
            accepts: Some(Vec::new()),
            requires_marker: None,
        });
        let target = target("stove2", 5, TargetFlags::STRUCTURE);

        let mut cycle = CycleState::default();
        cycle.start(&registry, &ledger, Some(replicate), false);

        let first = cycle.advance(&target).expect("replicate offered");
        assert_eq!(first.id(), ActionId(50));
        assert_eq!(first.category(), ActionCategory::Replicate);
    }

    #[test]
    fn unmark_front_takes_priority_over_replicate_pin() {
        let registry = registry_of(vec![StubAction::shared(1, 10, ActionCategory::Ordinary)]);
        let ledger = seeded_ledger(&registry);
        let replicate = StubAction::shared(50, 999, ActionCategory::Replicate);
        let target = target("bed9", 1, TargetFlags::MARKED | TargetFlags::STRUCTURE);

        let mut cycle = CycleState::default();
        cycle.start(&registry, &ledger, Some(replicate), true);

        let first = cycle.advance(&target).expect("unmark offered first");
        assert_eq!(first.category(), ActionCategory::Unmark);

        let second = cycle.advance(&target).expect("replicate offered next");
        assert_eq!(second.category(), ActionCategory::Replicate);
    }

    #[test]
    fn cost_resort_promotes_expensive_actions() {
        let registry = registry_of(vec![
            StubAction::shared(1, 10, ActionCategory::Ordinary),
            StubAction::shared(2, 20, ActionCategory::Ordinary),
        ]);
        let mut ledger = seeded_ledger(&registry);
        // Action 2 historically took presses to reach.
        ledger.record_activation(ActionId(2), 3);

        let target = target("chair4", 1, TargetFlags::empty());
        let mut cycle = CycleState::default();
        cycle.start(&registry, &ledger, None, false);

        let first = cycle.advance(&target).expect("candidates available");
        assert_eq!(first.id(), ActionId(2));
    }
}
