use std::fmt;

use bitflags::bitflags;

/// Opaque identity of an on-map object, unique for the object's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetId(String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of an object's defining kind, shared by every instance of that
/// kind. Placement-style actions report the kind they would place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KindId(pub u32);

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kind#{}", self.0)
    }
}

/// Discrete map cell in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

impl CellPos {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

bitflags! {
    /// Per-target state the cycling logic cares about.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TargetFlags: u8 {
        /// The target currently carries an exclusion marker set by another
        /// system; the valid action set changes while it is present.
        const MARKED = 1 << 0;
        /// Composite/buildable object, eligible for a per-target replicate
        /// action.
        const STRUCTURE = 1 << 1;
    }
}

/// Snapshot of one pointer-interactable object, as handed over by the
/// pointer oracle. Candidates arrive pre-filtered to "eligible for pointer
/// interaction"; the engine only picks the front-most among them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub id: TargetId,
    pub kind: KindId,
    /// Draw altitude; higher values render in front.
    pub altitude: i32,
    pub flags: TargetFlags,
}

impl Target {
    pub fn new(id: TargetId, kind: KindId, altitude: i32, flags: TargetFlags) -> Self {
        Self {
            id,
            kind,
            altitude,
            flags,
        }
    }

    pub fn is_marked(&self) -> bool {
        self.flags.contains(TargetFlags::MARKED)
    }

    pub fn is_structure(&self) -> bool {
        self.flags.contains(TargetFlags::STRUCTURE)
    }
}

/// Surface classification of a terrain cell.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TerrainKind {
    #[default]
    Rough,
    Floor,
    Carpet,
    Water,
}

impl TerrainKind {
    /// Only constructed floor materials can be picked up by the terrain
    /// fallback.
    pub fn is_copyable(self) -> bool {
        matches!(self, Self::Floor | Self::Carpet)
    }
}

/// Terrain cell snapshot used when no eligible object sits under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Terrain {
    pub kind: KindId,
    pub surface: TerrainKind,
}

impl Terrain {
    pub fn new(kind: KindId, surface: TerrainKind) -> Self {
        Self { kind, surface }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_expose_marker_and_structure_state() {
        let plain = Target::new(TargetId::new("rock0"), KindId(1), 0, TargetFlags::empty());
        assert!(!plain.is_marked());
        assert!(!plain.is_structure());

        let marked_structure = Target::new(
            TargetId::new("bed3"),
            KindId(2),
            5,
            TargetFlags::MARKED | TargetFlags::STRUCTURE,
        );
        assert!(marked_structure.is_marked());
        assert!(marked_structure.is_structure());
    }

    #[test]
    fn only_floorlike_terrain_is_copyable() {
        assert!(TerrainKind::Floor.is_copyable());
        assert!(TerrainKind::Carpet.is_copyable());
        assert!(!TerrainKind::Rough.is_copyable());
        assert!(!TerrainKind::Water.is_copyable());
    }
}
