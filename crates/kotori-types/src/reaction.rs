use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of reaction stamps.
///
/// Wire names are the lowercase variant names and match the field names of
/// the remote reaction documents; they never change once published.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Iine,
    Suki,
    Omedetou,
    Gannbare,
    Otukare,
    Kitai,
    Wakaru,
    Www,
    Ok,
}

impl ReactionKind {
    /// All kinds, in display order.
    pub const ALL: [ReactionKind; 9] = [
        ReactionKind::Iine,
        ReactionKind::Suki,
        ReactionKind::Omedetou,
        ReactionKind::Gannbare,
        ReactionKind::Otukare,
        ReactionKind::Kitai,
        ReactionKind::Wakaru,
        ReactionKind::Www,
        ReactionKind::Ok,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Iine => "iine",
            ReactionKind::Suki => "suki",
            ReactionKind::Omedetou => "omedetou",
            ReactionKind::Gannbare => "gannbare",
            ReactionKind::Otukare => "otukare",
            ReactionKind::Kitai => "kitai",
            ReactionKind::Wakaru => "wakaru",
            ReactionKind::Www => "www",
            ReactionKind::Ok => "ok",
        }
    }

    /// Human-readable stamp label.
    pub fn label(&self) -> &'static str {
        match self {
            ReactionKind::Iine => "いいね",
            ReactionKind::Suki => "すき",
            ReactionKind::Omedetou => "おめでと",
            ReactionKind::Gannbare => "がんば",
            ReactionKind::Otukare => "おつかれ",
            ReactionKind::Kitai => "期待",
            ReactionKind::Wakaru => "わかる",
            ReactionKind::Www => "www",
            ReactionKind::Ok => "OK!",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = UnknownReactionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReactionKind::ALL
            .iter()
            .find(|kind| kind.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownReactionKind(s.to_string()))
    }
}

/// Parse failure for [`ReactionKind`].
#[derive(Debug, thiserror::Error)]
#[error("unknown reaction kind: {0}")]
pub struct UnknownReactionKind(pub String);

/// Direction of a reaction toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReactionDelta {
    Increment,
    Decrement,
}

/// Per-post reaction counters, one non-negative count per kind.
///
/// This is a display/transfer value; the remote reaction store is the sole
/// source of truth for counts. Kinds with a zero count are omitted from the
/// serialized form, matching an absent field in the remote document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionCounts(BTreeMap<ReactionKind, u64>);

impl ReactionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ReactionKind) -> u64 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Apply a delta, clamping at a floor of zero.
    ///
    /// Decrementing a zero count is a no-op, never a negative value.
    pub fn apply(&mut self, kind: ReactionKind, delta: ReactionDelta) {
        let current = self.get(kind);
        let next = match delta {
            ReactionDelta::Increment => current.saturating_add(1),
            ReactionDelta::Decrement => current.saturating_sub(1),
        };
        if next == 0 {
            self.0.remove(&kind);
        } else {
            self.0.insert(kind, next);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ReactionKind, u64)> + '_ {
        self.0.iter().map(|(kind, count)| (*kind, *count))
    }

    /// Total across all kinds.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn wire_names_are_stable() {
        let json = serde_json::to_string(&ReactionKind::Omedetou).unwrap();
        assert_eq!(json, r#""omedetou""#);
        let kind: ReactionKind = serde_json::from_str(r#""www""#).unwrap();
        assert_eq!(kind, ReactionKind::Www);
    }

    #[test]
    fn from_str_roundtrip() {
        for kind in ReactionKind::ALL {
            assert_eq!(kind.as_str().parse::<ReactionKind>().unwrap(), kind);
        }
        assert!("nope".parse::<ReactionKind>().is_err());
    }

    #[test]
    fn increment_then_decrement_restores() {
        let mut counts = ReactionCounts::new();
        counts.apply(ReactionKind::Suki, ReactionDelta::Increment);
        assert_eq!(counts.get(ReactionKind::Suki), 1);
        counts.apply(ReactionKind::Suki, ReactionDelta::Decrement);
        assert_eq!(counts.get(ReactionKind::Suki), 0);
        assert!(counts.is_empty());
    }

    #[test]
    fn decrement_clamps_at_zero() {
        let mut counts = ReactionCounts::new();
        counts.apply(ReactionKind::Iine, ReactionDelta::Decrement);
        counts.apply(ReactionKind::Iine, ReactionDelta::Decrement);
        assert_eq!(counts.get(ReactionKind::Iine), 0);
    }

    #[test]
    fn zero_counts_are_omitted_from_json() {
        let mut counts = ReactionCounts::new();
        counts.apply(ReactionKind::Kitai, ReactionDelta::Increment);
        counts.apply(ReactionKind::Kitai, ReactionDelta::Decrement);
        counts.apply(ReactionKind::Ok, ReactionDelta::Increment);
        assert_eq!(serde_json::to_string(&counts).unwrap(), r#"{"ok":1}"#);
    }

    proptest! {
        // Any sequence of deltas keeps every counter at or above zero.
        #[test]
        fn counter_floor_holds(ops in proptest::collection::vec((0usize..9, proptest::bool::ANY), 0..64)) {
            let mut counts = ReactionCounts::new();
            for (idx, up) in ops {
                let kind = ReactionKind::ALL[idx];
                let delta = if up { ReactionDelta::Increment } else { ReactionDelta::Decrement };
                counts.apply(kind, delta);
            }
            for kind in ReactionKind::ALL {
                // u64 cannot go negative; the real assertion is that the
                // map never holds an explicit zero.
                if counts.get(kind) == 0 {
                    prop_assert!(!counts.iter().any(|(k, _)| k == kind));
                }
            }
        }
    }
}
