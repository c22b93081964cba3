//! Parsed path data commands, before coordinates are resolved.

use calliper_core::geometry::Point;

use crate::span::Span;

/// One argument group of a path command.
///
/// Coordinates are stored as written: for a relative command they are
/// offsets from the current point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Segment {
    MoveTo(Point),
    LineTo(Point),
    Horizontal(f64),
    Vertical(f64),
    Cubic {
        control1: Point,
        control2: Point,
        end: Point,
    },
    SmoothCubic {
        control2: Point,
        end: Point,
    },
    Quadratic {
        control: Point,
        end: Point,
    },
    SmoothQuadratic(Point),
    Arc {
        radii: Point,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        end: Point,
    },
    Close,
}

/// A command letter together with all argument groups following it.
///
/// Extra coordinate pairs after a moveto are stored as [`Segment::LineTo`],
/// matching the implicit lineto rule.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PathCommand {
    letter: char,
    segments: Vec<Segment>,
    span: Span,
}

impl PathCommand {
    pub fn new(letter: char, segments: Vec<Segment>, span: Span) -> Self {
        Self {
            letter,
            segments,
            span,
        }
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn is_relative(&self) -> bool {
        self.letter.is_ascii_lowercase()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// Returns `true` for the twenty SVG path command letters.
pub(crate) fn is_command_letter(c: char) -> bool {
    matches!(
        c.to_ascii_lowercase(),
        'm' | 'l' | 'h' | 'v' | 'c' | 's' | 'q' | 't' | 'a' | 'z'
    )
}

/// Describes the arguments a command takes, for diagnostics.
pub(crate) fn argument_help(letter: char) -> &'static str {
    match letter.to_ascii_lowercase() {
        'm' => "`M` takes an x and a y coordinate",
        'l' => "`L` takes an x and a y coordinate",
        'h' => "`H` takes a single x coordinate",
        'v' => "`V` takes a single y coordinate",
        'c' => "`C` takes two control points and an end point (6 numbers)",
        's' => "`S` takes a control point and an end point (4 numbers)",
        'q' => "`Q` takes a control point and an end point (4 numbers)",
        't' => "`T` takes an end point (2 numbers)",
        'a' => "`A` takes rx ry rotation large-arc-flag sweep-flag x y",
        _ => "`Z` takes no arguments",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_letters() {
        for c in "MmLlHhVvCcSsQqTtAaZz".chars() {
            assert!(is_command_letter(c), "{c} should be a command letter");
        }
        for c in ['e', 'E', 'x', '1', ',', 'B'] {
            assert!(!is_command_letter(c), "{c} should not be a command letter");
        }
    }

    #[test]
    fn test_relative_by_case() {
        let relative = PathCommand::new('l', vec![], Span::default());
        let absolute = PathCommand::new('L', vec![], Span::default());
        assert!(relative.is_relative());
        assert!(!absolute.is_relative());
    }
}
