//! Core types for hyperforest
//!
//! This module defines the small value types shared by every other module:
//! state and arc identifiers, the structural property bitset, and source
//! spans used by sub-union.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

// ============================================================================
// Identifiers
// ============================================================================

/// Dense state identifier in `[0, size)`.
pub type StateId = u32;

/// Stable handle of an arc inside the graph that owns it.
///
/// Arc identity (de-duplication sets, "arcs to clone" lists) is always
/// expressed with these handles, never with addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArcId(pub u32);

impl ArcId {
    /// Position in the owning graph's arc arena
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ArcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Properties
// ============================================================================

/// Bitset of the structural indices a hypergraph currently maintains.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(u32);

impl Properties {
    /// No indices beyond the arc arena itself
    pub const NONE: Properties = Properties(0);
    /// Per-state list of arcs whose head is the state
    pub const STORE_IN_ARCS: Properties = Properties(1);
    /// Per-state list of arcs whose first tail is the state
    pub const STORE_FIRST_TAIL_OUT_ARCS: Properties = Properties(1 << 1);
    /// Per-state list of arcs having the state anywhere among their tails
    pub const STORE_OUT_ARCS: Properties = Properties(1 << 2);
    /// Every known flag
    pub const ALL: Properties = Properties(0b111);

    const NAMES: [(Properties, &'static str); 3] = [
        (Properties::STORE_IN_ARCS, "STORE_IN_ARCS"),
        (Properties::STORE_FIRST_TAIL_OUT_ARCS, "STORE_FIRST_TAIL_OUT_ARCS"),
        (Properties::STORE_OUT_ARCS, "STORE_OUT_ARCS"),
    ];

    /// True if every flag of `other` is set in `self`
    pub const fn contains(self, other: Properties) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any flag of `other` is set in `self`
    pub const fn intersects(self, other: Properties) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Flags of `self` that are not in `other`
    pub const fn difference(self, other: Properties) -> Self {
        Properties(self.0 & !other.0)
    }
}

impl BitOr for Properties {
    type Output = Properties;

    fn bitor(self, rhs: Properties) -> Properties {
        Properties(self.0 | rhs.0)
    }
}

impl BitOrAssign for Properties {
    fn bitor_assign(&mut self, rhs: Properties) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Properties {
    type Output = Properties;

    fn bitand(self, rhs: Properties) -> Properties {
        Properties(self.0 & rhs.0)
    }
}

impl Not for Properties {
    type Output = Properties;

    fn not(self) -> Properties {
        Properties(!self.0 & Self::ALL.0)
    }
}

impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Properties({self})")
    }
}

// ============================================================================
// Span
// ============================================================================

/// A (possibly partial) source interval `[left, right)` attached to a state.
///
/// Either bound may be unknown. A span with both bounds unknown is
/// [`Span::NULL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub left: Option<u32>,
    pub right: Option<u32>,
}

impl Span {
    pub const NULL: Span = Span {
        left: None,
        right: None,
    };

    /// Create a span with both bounds known
    pub fn new(left: u32, right: u32) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn is_null(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Widen to cover every known bound of `other`.
    pub fn grow_if_defined(&mut self, other: &Span) {
        if let Some(l) = other.left {
            self.left = Some(self.left.map_or(l, |cur| cur.min(l)));
        }
        if let Some(r) = other.right {
            self.right = Some(self.right.map_or(r, |cur| cur.max(r)));
        }
    }

    /// Non-strict containment in `parent`. Unknown bounds on either side
    /// impose no constraint, so everything is within [`Span::NULL`].
    pub fn within(&self, parent: &Span) -> bool {
        let left_ok = match (self.left, parent.left) {
            (Some(l), Some(pl)) => l >= pl,
            _ => true,
        };
        let right_ok = match (self.right, parent.right) {
            (Some(r), Some(pr)) => r <= pr,
            _ => true,
        };
        left_ok && right_ok
    }

    /// Parse a state label such as `"3-5"` or `"3-5.NP"`.
    ///
    /// Anything after the first `.` is a tag and ignored. Text that is not
    /// two integers separated by `-` yields [`Span::NULL`].
    pub fn parse(text: &str) -> Span {
        let text = text.split('.').next().unwrap_or("");
        let Some((l, r)) = text.split_once('-') else {
            return Span::NULL;
        };
        match (l.trim().parse::<u32>(), r.trim().parse::<u32>()) {
            (Ok(l), Ok(r)) => Span::new(l, r),
            _ => Span::NULL,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.left {
            Some(l) => write!(f, "{l}")?,
            None => f.write_str("?")?,
        }
        f.write_str("-")?;
        match self.right {
            Some(r) => write!(f, "{r}"),
            None => f.write_str("?"),
        }
    }
}
