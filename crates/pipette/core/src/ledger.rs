use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::action::{ActionCategory, ActionId, CandidateAction};

/// Historical press cost per action, accumulated for the process lifetime.
///
/// Actions that were expensive to reach are promoted toward the cycle front
/// on the next restart, shrinking the average number of presses over time.
/// Replicate actions are structurally pinned instead and never get entries;
/// their absence from the ledger is what [`compare_by_cost`] keys on.
#[derive(Clone, Debug, Default)]
pub struct CostLedger {
    costs: HashMap<ActionId, u32>,
}

impl CostLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives every registry member a zero-cost entry. Called once, right
    /// after the registry is built.
    pub fn seed<'a>(&mut self, actions: impl IntoIterator<Item = &'a Arc<dyn CandidateAction>>) {
        for action in actions {
            self.costs.entry(action.id()).or_insert(0);
        }
    }

    pub fn cost(&self, id: ActionId) -> Option<u32> {
        self.costs.get(&id).copied()
    }

    /// Adds the presses consumed to reach `id` in the current cycle.
    pub fn record_activation(&mut self, id: ActionId, presses: u32) {
        *self.costs.entry(id).or_insert(0) += presses;
    }
}

/// Total order used to re-sort the registry copy at cycle start.
///
/// Must be applied with a stable sort: tied candidates keep their prior
/// relative order, otherwise equally-costed actions would swap positions
/// between cycles and the ordering would never converge.
pub fn compare_by_cost(
    ledger: &CostLedger,
    lhs: &dyn CandidateAction,
    rhs: &dyn CandidateAction,
) -> Ordering {
    match (ledger.cost(lhs.id()), ledger.cost(rhs.id())) {
        // Both untracked: display order decides.
        (None, None) => lhs.order().cmp(&rhs.order()),
        // Untracked candidates (the pinned replicate action) stay ahead of
        // every tracked one.
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(lhs_cost), Some(rhs_cost)) => {
            // Unmark restores the target's normal action set, so it leads.
            if lhs.category() == ActionCategory::Unmark {
                return Ordering::Less;
            }
            if rhs.category() == ActionCategory::Unmark {
                return Ordering::Greater;
            }
            // More historical presses sorts earlier.
            rhs_cost
                .cmp(&lhs_cost)
                .then_with(|| lhs.order().cmp(&rhs.order()))
        }
    }
}
