//! Map view orientations.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// One of the four 90° view orientations a map can be rendered in.
///
/// The discriminant is the stable integer encoding used by the renderer
/// and the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rotation {
    TopLeft = 0,
    TopRight = 1,
    BottomRight = 2,
    BottomLeft = 3,
}

/// Name vocabulary, indexed by rotation.
const ROTATION_NAMES: [&str; 4] = ["top-left", "top-right", "bottom-right", "bottom-left"];

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::TopLeft,
        Rotation::TopRight,
        Rotation::BottomRight,
        Rotation::BottomLeft,
    ];

    /// The slot index 0..=3.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        ROTATION_NAMES[self.index()]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ROTATION_NAMES
            .iter()
            .position(|n| *n == name)
            .and_then(Self::from_index)
    }

    pub fn names() -> &'static [&'static str] {
        &ROTATION_NAMES
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.trim()).ok_or_else(|| format!("Invalid rotation: {}", s))
    }
}

/// Split a rotations option into a set.
///
/// Tokens are separated by commas and/or whitespace. Returns the recognised
/// rotations (deduplicated, ascending) and the unrecognised tokens in input
/// order.
pub fn parse_rotations(raw: &str) -> (BTreeSet<Rotation>, Vec<String>) {
    let mut rotations = BTreeSet::new();
    let mut unknown = Vec::new();

    for token in raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        match Rotation::from_name(token) {
            Some(rotation) => {
                rotations.insert(rotation);
            }
            None => unknown.push(token.to_string()),
        }
    }

    (rotations, unknown)
}

/// Write a rotation set back in option form.
pub fn format_rotations(rotations: &BTreeSet<Rotation>) -> String {
    rotations
        .iter()
        .map(|r| r.name())
        .collect::<Vec<_>>()
        .join(" ")
}
