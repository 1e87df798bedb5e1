use std::fmt;

use crate::target::Target;

/// Stable identity for a candidate action.
///
/// Identities are assigned by the host when it registers candidates; the
/// engine never compares candidates by pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionId(pub u32);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action#{}", self.0)
    }
}

/// Role a candidate plays inside a cycle.
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
pub enum ActionCategory {
    /// Regular context action, cost-ranked like any other.
    #[default]
    Ordinary,
    /// Per-target configuration copy. Pinned to the cycle front, offered
    /// unconditionally once per cycle, never cost-tracked.
    Replicate,
    /// Synthetic "mark excluded" action, always present in the registry.
    Mark,
    /// Synthetic "unmark excluded" action. Takes the absolute front of the
    /// cycle whenever the target currently carries an exclusion marker.
    Unmark,
}

/// Outcome of an applicability check.
///
/// Inapplicability is a value, never an error; the reason only surfaces in
/// logs and host tooltips.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Acceptance {
    Accepted,
    Rejected(String),
}

impl Acceptance {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl From<bool> for Acceptance {
    fn from(accepted: bool) -> Self {
        if accepted {
            Self::Accepted
        } else {
            Self::Rejected(String::new())
        }
    }
}

/// A context-sensitive action offered to the user.
///
/// Concrete kinds live on the host side of the oracle boundary; the engine
/// only needs identity, display ordering, the category marker, and the
/// applicability capability.
pub trait CandidateAction: Send + Sync {
    /// Registry-unique identity.
    fn id(&self) -> ActionId;

    /// Human-readable label, used for logging.
    fn label(&self) -> &str;

    /// Display order matching the host's on-screen button ordering.
    fn order(&self) -> i32;

    fn category(&self) -> ActionCategory {
        ActionCategory::Ordinary
    }

    /// Whether this action can apply to `target` right now.
    fn can_apply(&self, target: &Target) -> Acceptance;
}
