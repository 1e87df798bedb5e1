//! Tick orchestration for the cycling selector.
//!
//! [`CyclingSelector`] is the single entry point the host calls once per
//! input tick, before its own click handling. It owns every piece of
//! process-lifetime state (candidate registry, cost ledger, live cycle,
//! target tracker) and pulls everything else from the [`env`](crate::env)
//! oracles. Single-threaded by contract: one synchronous call path, no
//! operation spans ticks except through the cycle state itself.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::action::{ActionCategory, ActionId, CandidateAction};
use crate::cycle::CycleState;
use crate::env::{
    ActionOracle, ActiveSelection, PointerOracle, SelectionSink, SelectorEnv, SessionOracle,
};
use crate::ledger::CostLedger;
use crate::registry::CandidateRegistry;
use crate::target::{CellPos, Target};
use crate::tracker::TargetTracker;

/// What a call to [`CyclingSelector::process_tick`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Gate closed, nothing usable under the pointer, or the press belonged
    /// to the host.
    Inert,
    /// A candidate was selected for the target under the pointer.
    Selected(ActionId),
    /// The terrain fallback selected a material replicate action directly.
    TerrainCopy(ActionId),
    /// The cycle ran out of applicable candidates; the selection was cleared.
    Exhausted,
    /// A repeated press on an active floor-material replicate cleared it.
    ToggledOff,
}

/// The cycling selector engine.
pub struct CyclingSelector {
    suppressed: HashSet<ActionId>,
    registry: Option<CandidateRegistry>,
    ledger: CostLedger,
    cycle: CycleState,
    tracker: TargetTracker,
}

impl CyclingSelector {
    pub fn new() -> Self {
        Self {
            suppressed: HashSet::new(),
            registry: None,
            ledger: CostLedger::new(),
            cycle: CycleState::default(),
            tracker: TargetTracker::default(),
        }
    }

    /// Registers an action kind as superseded or incompatible. Suppressed
    /// kinds never enter the candidate registry.
    ///
    /// Collaborators call this during startup; it has no effect once the
    /// registry has been built.
    pub fn suppress(&mut self, id: ActionId) {
        self.suppressed.insert(id);
    }

    /// Processes one host input tick.
    ///
    /// Must be invoked exactly once per input-processing pass, before the
    /// host's own default click handling. A missing oracle or a closed gate
    /// (objects selected, modal panel open, world view active, hotkey not
    /// pressed) leaves all cycle state untouched, so the cycle resumes
    /// transparently once the gate reopens.
    pub fn process_tick(&mut self, env: SelectorEnv<'_>) -> TickOutcome {
        let (Some(session), Some(pointer), Some(actions), Some(sink)) =
            (env.session(), env.pointer(), env.actions(), env.sink())
        else {
            return TickOutcome::Inert;
        };

        if session.selected_count() != 0
            || session.modal_panel_open()
            || session.world_view_active()
            || !session.hotkey_pressed()
        {
            trace!("tick gated off");
            return TickOutcome::Inert;
        }

        let mut outcome = TickOutcome::Inert;
        if self.cycling_allowed(session.active_selection().as_ref()) {
            outcome = self.run_cycle(pointer, actions, sink);
            if let TickOutcome::TerrainCopy(_) = outcome {
                // Ends the tick before the toggle-off check below, so a fresh
                // terrain copy cannot cancel itself.
                return outcome;
            }
        }

        // A repeated press while a floor-material replicate stays active
        // clears it instead of advancing anything.
        if let Some(selection) = session.active_selection() {
            if selection
                .placement
                .is_some_and(|placement| placement.floor_like)
            {
                sink.deselect();
                return TickOutcome::ToggledOff;
            }
        }

        outcome
    }

    /// The hotkey doubles as the host's rotate key while a placement action
    /// is active: the press is ours only when nothing placement-like is
    /// selected, or the active placement places the kind we are cycling on
    /// (a replicate selection made by this engine).
    fn cycling_allowed(&self, active: Option<&ActiveSelection>) -> bool {
        match active.and_then(|selection| selection.placement) {
            None => true,
            Some(placement) => self.tracker.last_kind() == Some(placement.kind),
        }
    }

    fn run_cycle(
        &mut self,
        pointer: &dyn PointerOracle,
        actions: &dyn ActionOracle,
        sink: &dyn SelectionSink,
    ) -> TickOutcome {
        if self.registry.is_none() {
            let registry = CandidateRegistry::build(actions, &self.suppressed);
            self.ledger.seed(registry.iter());
            self.registry = Some(registry);
        }

        let Some(cell) = pointer.pointer_cell() else {
            return TickOutcome::Inert;
        };

        let Some(target) = front_most(pointer.objects_at(cell)) else {
            return self.copy_terrain(pointer, actions, sink, cell);
        };

        if self.tracker.needs_restart(&target) {
            debug!(target = %target.id, marked = target.is_marked(), "starting a new cycle");
            let replicate = if target.is_structure() {
                actions.replicate_for_structure(&target)
            } else {
                None
            };
            if let Some(registry) = &self.registry {
                self.cycle
                    .start(registry, &self.ledger, replicate, target.is_marked());
            }
        }

        // Recorded for every processed target, so the next press on the same
        // object continues this cycle even after an exhausted scan.
        self.tracker.record(&target);

        match self.cycle.advance(&target) {
            Some(action) => {
                let id = action.id();
                let category = action.category();
                sink.select(action);
                // The replicate action is structurally first, not cost-ranked.
                if category != ActionCategory::Replicate {
                    self.ledger.record_activation(id, self.cycle.presses());
                }
                TickOutcome::Selected(id)
            }
            None => {
                debug!(target = %target.id, "cycle exhausted, clearing selection");
                sink.deselect();
                TickOutcome::Exhausted
            }
        }
    }

    /// No eligible object under the pointer: a copyable floor material is
    /// picked up directly, outside the cycle machinery.
    fn copy_terrain(
        &self,
        pointer: &dyn PointerOracle,
        actions: &dyn ActionOracle,
        sink: &dyn SelectionSink,
        cell: CellPos,
    ) -> TickOutcome {
        let Some(terrain) = pointer.terrain_at(cell) else {
            return TickOutcome::Inert;
        };
        if !terrain.surface.is_copyable() {
            return TickOutcome::Inert;
        }
        let Some(replicate) = actions.replicate_for_terrain(&terrain) else {
            return TickOutcome::Inert;
        };

        let id = replicate.id();
        debug!(action = %id, surface = %terrain.surface, "copying terrain material");
        sink.select(replicate);
        TickOutcome::TerrainCopy(id)
    }
}

impl Default for CyclingSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks the front-most of the pointer oracle's eligible objects: highest
/// draw altitude wins, equal altitudes keep encounter order.
fn front_most(mut objects: Vec<Target>) -> Option<Target> {
    objects.sort_by(|lhs, rhs| rhs.altitude.cmp(&lhs.altitude));
    objects.into_iter().next()
}
