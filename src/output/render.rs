//! Diff renderer
//!
//! Wraps added and removed lines in palette markers.

use crate::diff::{DiffLine, LineKind};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Markers placed around changed lines
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub added_prefix: &'static str,
    pub added_suffix: &'static str,
    pub removed_prefix: &'static str,
    pub removed_suffix: &'static str,
}

impl Palette {
    /// Green additions, red removals
    pub const fn ansi() -> Self {
        Self {
            added_prefix: GREEN,
            added_suffix: RESET,
            removed_prefix: RED,
            removed_suffix: RESET,
        }
    }

    /// `+`/`-` prefixes without escape codes
    pub const fn plain() -> Self {
        Self {
            added_prefix: "+",
            added_suffix: "",
            removed_prefix: "-",
            removed_suffix: "",
        }
    }

    pub fn for_color(colorize: bool) -> Self {
        if colorize {
            Self::ansi()
        } else {
            Self::plain()
        }
    }

    /// Render a single line
    pub fn paint(&self, line: &DiffLine) -> String {
        match line.kind {
            LineKind::Unchanged => line.text.clone(),
            LineKind::Added => format!("{}{}{}", self.added_prefix, line.text, self.added_suffix),
            LineKind::Removed => format!(
                "{}{}{}",
                self.removed_prefix, line.text, self.removed_suffix
            ),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::ansi()
    }
}

/// Render all lines, newline separated
pub fn render(lines: &[DiffLine], palette: &Palette) -> String {
    lines
        .iter()
        .map(|line| palette.paint(line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_passes_through() {
        let line = DiffLine::new("    \"id\": 7", LineKind::Unchanged);
        assert_eq!(Palette::ansi().paint(&line), line.text);
        assert_eq!(Palette::plain().paint(&line), line.text);
    }

    #[test]
    fn test_ansi_colors() {
        let palette = Palette::ansi();
        let added = palette.paint(&DiffLine::new("new", LineKind::Added));
        let removed = palette.paint(&DiffLine::new("old", LineKind::Removed));

        assert_eq!(added, "\x1b[32mnew\x1b[0m");
        assert_eq!(removed, "\x1b[31mold\x1b[0m");
    }

    #[test]
    fn test_markers_distinct_and_non_empty() {
        for palette in [Palette::ansi(), Palette::plain()] {
            assert!(!palette.added_prefix.is_empty());
            assert!(!palette.removed_prefix.is_empty());
            assert_ne!(palette.added_prefix, palette.removed_prefix);

            let added = palette.paint(&DiffLine::new("x", LineKind::Added));
            let removed = palette.paint(&DiffLine::new("x", LineKind::Removed));
            assert!(added.contains('x'));
            assert!(removed.contains('x'));
            assert_ne!(added, removed);
        }
    }

    #[test]
    fn test_plain_has_no_escapes() {
        let lines = vec![
            DiffLine::new("{", LineKind::Unchanged),
            DiffLine::new("a", LineKind::Removed),
            DiffLine::new("b", LineKind::Added),
            DiffLine::new("}", LineKind::Unchanged),
        ];
        let out = render(&lines, &Palette::plain());
        assert_eq!(out, "{\n-a\n+b\n}");
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[], &Palette::ansi()), "");
    }
}
