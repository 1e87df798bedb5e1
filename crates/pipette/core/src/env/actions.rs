use std::sync::Arc;

use crate::action::CandidateAction;
use crate::target::{Target, Terrain};

/// Supplies the candidate action set and synthesizes per-target replicate
/// actions.
pub trait ActionOracle: Send + Sync {
    /// Every action the host exposes as registered for pointer cycling.
    fn registered(&self) -> Vec<Arc<dyn CandidateAction>>;

    /// The two synthetic exclusion-marker actions, `(mark, unmark)`.
    fn exclusion_actions(&self) -> (Arc<dyn CandidateAction>, Arc<dyn CandidateAction>);

    /// Synthesizes the replicate action reproducing `target`'s exact
    /// configuration (material, color override, style), when the host can
    /// build that kind.
    fn replicate_for_structure(&self, target: &Target) -> Option<Arc<dyn CandidateAction>>;

    /// Synthesizes a replicate action for a copyable terrain material.
    fn replicate_for_terrain(&self, terrain: &Terrain) -> Option<Arc<dyn CandidateAction>>;
}
