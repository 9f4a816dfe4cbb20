//! Per-rotation render decisions.

use std::fmt;
use std::str::FromStr;

use crate::config::Rotation;

/// What the pipeline does with one (map, rotation) pair.
///
/// The integer values are part of the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderBehavior {
    /// Leave the existing tiles untouched.
    Skip = 0,
    /// Re-render what changed since the last run.
    #[default]
    Auto = 1,
    /// Re-render everything.
    Force = 2,
}

impl RenderBehavior {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Skip),
            1 => Some(Self::Auto),
            2 => Some(Self::Force),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Auto => "auto",
            Self::Force => "force",
        }
    }
}

impl From<RenderBehavior> for i32 {
    fn from(behavior: RenderBehavior) -> Self {
        behavior.as_i32()
    }
}

impl fmt::Display for RenderBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RenderBehavior {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "auto" => Ok(Self::Auto),
            "force" => Ok(Self::Force),
            _ => Err(format!("Invalid render behavior: {}", s)),
        }
    }
}

/// Which rotation slots of a map an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationSelector {
    /// All four slots (the `-1` index).
    All,
    Single(Rotation),
}

impl RotationSelector {
    /// Decode an integer index: `-1` for all slots, `0..=3` for one.
    pub fn from_index(index: i32) -> Result<Self, SelectorError> {
        match index {
            -1 => Ok(Self::All),
            _ => usize::try_from(index)
                .ok()
                .and_then(Rotation::from_index)
                .map(Self::Single)
                .ok_or(SelectorError::InvalidIndex(index)),
        }
    }

    pub fn as_index(self) -> i32 {
        match self {
            Self::All => -1,
            Self::Single(rotation) => rotation.index() as i32,
        }
    }
}

impl From<Rotation> for RotationSelector {
    fn from(rotation: Rotation) -> Self {
        Self::Single(rotation)
    }
}

impl TryFrom<i32> for RotationSelector {
    type Error = SelectorError;

    fn try_from(index: i32) -> Result<Self, Self::Error> {
        Self::from_index(index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Invalid rotation index {0}: expected -1 or 0..=3")]
    InvalidIndex(i32),
}
