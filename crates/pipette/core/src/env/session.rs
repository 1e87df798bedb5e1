use crate::action::ActionId;
use crate::target::KindId;

/// Placement details of the active selection, reported when it is a
/// placement-style action (a build or replicate command).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementInfo {
    /// Kind the active selection would place.
    pub kind: KindId,
    /// True when the placed material is a floor or carpet.
    pub floor_like: bool,
}

/// The currently active selection, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveSelection {
    pub action: ActionId,
    pub placement: Option<PlacementInfo>,
}

impl ActiveSelection {
    pub fn new(action: ActionId, placement: Option<PlacementInfo>) -> Self {
        Self { action, placement }
    }
}

/// Ambient UI and input state the engine queries each tick.
pub trait SessionOracle: Send + Sync {
    /// Number of objects currently selected in the host UI.
    fn selected_count(&self) -> usize;

    /// Whether a modal tab or panel is open.
    fn modal_panel_open(&self) -> bool;

    /// Whether the world view (non-map mode) is active.
    fn world_view_active(&self) -> bool;

    /// Whether the cycling hotkey produced a pressed edge this tick.
    fn hotkey_pressed(&self) -> bool;

    /// The currently active selection. Queried again after the cycling body
    /// runs, so implementations must reflect selections made this tick.
    fn active_selection(&self) -> Option<ActiveSelection>;
}
