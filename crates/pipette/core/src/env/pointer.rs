use crate::target::{CellPos, Target, Terrain};

/// Resolves the pointer position to on-map content.
pub trait PointerOracle: Send + Sync {
    /// Map cell under the pointer, `None` when the pointer is off the map.
    fn pointer_cell(&self) -> Option<CellPos>;

    /// Objects at `cell`, pre-filtered to the ones eligible for pointer
    /// interaction (visible, not obscured). Encounter order matters: the
    /// engine's front-most tie-break keeps it for equal altitudes.
    fn objects_at(&self, cell: CellPos) -> Vec<Target>;

    /// Terrain at `cell`, if the cell is on the map.
    fn terrain_at(&self, cell: CellPos) -> Option<Terrain>;
}
