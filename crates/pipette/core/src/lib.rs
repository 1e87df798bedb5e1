//! Adaptive single-hotkey cycling through the context actions that apply to
//! the object under the pointer.
//!
//! `pipette-core` owns the selection logic: the candidate registry, the
//! self-learning press-cost ledger, the live cycle cursor, and the
//! continue-vs-restart tracking. Everything host-specific (pointer
//! resolution, ambient UI state, action side effects) stays behind the
//! oracle traits in [`env`], and all state mutation flows through
//! [`engine::CyclingSelector::process_tick`].
pub mod action;
pub mod cycle;
pub mod engine;
pub mod env;
pub mod ledger;
pub mod registry;
pub mod target;
pub mod tracker;

pub use action::{Acceptance, ActionCategory, ActionId, CandidateAction};
pub use cycle::CycleState;
pub use engine::{CyclingSelector, TickOutcome};
pub use env::{
    ActionOracle, ActiveSelection, Env, PlacementInfo, PointerOracle, SelectionSink, SelectorEnv,
    SessionOracle,
};
pub use ledger::{CostLedger, compare_by_cost};
pub use registry::CandidateRegistry;
pub use target::{CellPos, KindId, Target, TargetFlags, TargetId, Terrain, TerrainKind};
pub use tracker::TargetTracker;
