//! Line diff engine
//!
//! Aligns two normalized texts line by line and classifies each line as
//! unchanged, added or removed.

use similar::{Algorithm, ChangeTag, TextDiff};
use std::fmt;

/// Classification of one diff line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineKind {
    Unchanged,
    Added,
    Removed,
}

/// One classified output line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffLine {
    pub text: String,
    pub kind: LineKind,
}

impl DiffLine {
    pub fn new(text: impl Into<String>, kind: LineKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Line counts for a computed diff
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub unchanged: usize,
    pub added: usize,
    pub removed: usize,
}

impl DiffStats {
    pub fn from_lines(lines: &[DiffLine]) -> Self {
        lines.iter().fold(Self::default(), |mut stats, line| {
            match line.kind {
                LineKind::Unchanged => stats.unchanged += 1,
                LineKind::Added => stats.added += 1,
                LineKind::Removed => stats.removed += 1,
            }
            stats
        })
    }

    pub fn is_identical(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

impl fmt::Display for DiffStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identical() {
            write!(f, "identical")
        } else {
            write!(f, "{} added, {} removed", self.added, self.removed)
        }
    }
}

/// Split on `\n` only, keeping `\r` and a trailing empty line.
///
/// Joining the result with `\n` gives back the input exactly.
fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

/// Compute the line diff from `left` to `right`.
///
/// Lines only in `left` are removed, lines only in `right` are added. Inside
/// a replaced block removals come before additions.
pub fn compute_diff(left: &str, right: &str) -> Vec<DiffLine> {
    let old = split_lines(left);
    let new = split_lines(right);

    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_slices(old.as_slice(), new.as_slice());

    diff.iter_all_changes()
        .map(|change| {
            let kind = match change.tag() {
                ChangeTag::Equal => LineKind::Unchanged,
                ChangeTag::Insert => LineKind::Added,
                ChangeTag::Delete => LineKind::Removed,
            };
            DiffLine::new(change.value(), kind)
        })
        .collect()
}
