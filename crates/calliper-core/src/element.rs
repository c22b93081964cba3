//! Host element model.
//!
//! These types describe selected elements the way a host document hands
//! them over, before any classification. Geometry is in document px.
//!
//! # Overview
//!
//! - [`RawElement`] - One selected element: rectangle, path or anything else
//! - [`PathGeometry`] - Parsed path data as a list of [`Subpath`]s
//! - [`Anchor`] - A path anchor point with the kind of segment ending at it

use crate::{
    geometry::{Bounds, Point},
    identifier::SourceId,
};

/// Kind of segment that ends at an [`Anchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Start of a subpath; no segment leads here.
    Move,
    /// Straight line, including horizontal and vertical shorthands.
    Line,
    /// Cubic or quadratic bezier curve.
    Curve,
    /// Elliptical arc.
    Arc,
}

/// A path anchor: the end point of one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    point: Point,
    segment: SegmentKind,
}

impl Anchor {
    pub fn new(point: Point, segment: SegmentKind) -> Self {
        Self { point, segment }
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn segment(&self) -> SegmentKind {
        self.segment
    }
}

/// A run of anchors starting with a moveto.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subpath {
    anchors: Vec<Anchor>,
    closed: bool,
}

impl Subpath {
    pub fn new(anchors: Vec<Anchor>, closed: bool) -> Self {
        Self { anchors, closed }
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Whether the subpath ends with a closepath command.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Parsed geometry of a path element.
///
/// # Examples
///
/// ```
/// # use calliper_core::element::{Anchor, PathGeometry, SegmentKind, Subpath};
/// # use calliper_core::geometry::Point;
/// let geometry = PathGeometry::new(vec![Subpath::new(
///     vec![
///         Anchor::new(Point::new(0.0, 0.0), SegmentKind::Move),
///         Anchor::new(Point::new(10.0, 0.0), SegmentKind::Line),
///     ],
///     false,
/// )]);
///
/// assert_eq!(geometry.anchor_count(), 2);
/// assert!(!geometry.ends_closed());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathGeometry {
    subpaths: Vec<Subpath>,
}

impl PathGeometry {
    pub fn new(subpaths: Vec<Subpath>) -> Self {
        Self { subpaths }
    }

    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    /// Iterates over every anchor point of every subpath in order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.subpaths
            .iter()
            .flat_map(|subpath| subpath.anchors.iter().map(Anchor::point))
    }

    pub fn anchor_count(&self) -> usize {
        self.subpaths.iter().map(|s| s.anchors.len()).sum()
    }

    /// Whether the final subpath carries a closepath marker.
    pub fn ends_closed(&self) -> bool {
        self.subpaths.last().is_some_and(Subpath::is_closed)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor_count() == 0
    }
}

/// One selected element as provided by the host document.
#[derive(Debug, Clone, PartialEq)]
pub enum RawElement {
    Rect {
        id: SourceId,
        bounds: Bounds,
        stroke_width: f64,
    },
    Path {
        id: SourceId,
        geometry: PathGeometry,
        stroke_width: f64,
    },
    /// Any element type the engine cannot measure (text, images, groups...).
    Other { id: SourceId, kind: String },
}

impl RawElement {
    pub fn id(&self) -> SourceId {
        match self {
            Self::Rect { id, .. } | Self::Path { id, .. } | Self::Other { id, .. } => *id,
        }
    }

    /// Returns the host type name of the element.
    pub fn kind(&self) -> &str {
        match self {
            Self::Rect { .. } => "rect",
            Self::Path { .. } => "path",
            Self::Other { kind, .. } => kind,
        }
    }

    /// Returns the stroke width, zero for elements without one.
    pub fn stroke_width(&self) -> f64 {
        match self {
            Self::Rect { stroke_width, .. } | Self::Path { stroke_width, .. } => *stroke_width,
            Self::Other { .. } => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    fn subpath(points: &[(f64, f64)], closed: bool) -> Subpath {
        let anchors = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let kind = if i == 0 {
                    SegmentKind::Move
                } else {
                    SegmentKind::Line
                };
                Anchor::new(Point::new(x, y), kind)
            })
            .collect();
        Subpath::new(anchors, closed)
    }

    #[test]
    fn test_points_span_subpaths() {
        let geometry = PathGeometry::new(vec![
            subpath(&[(0.0, 0.0), (1.0, 0.0)], false),
            subpath(&[(5.0, 5.0), (6.0, 5.0)], true),
        ]);

        let points: Vec<Point> = geometry.points().collect();
        assert_eq!(points.len(), 4);
        assert_eq!(points[2], Point::new(5.0, 5.0));
        assert!(geometry.ends_closed());
    }

    #[test]
    fn test_closed_marker_only_counts_on_last_subpath() {
        let geometry = PathGeometry::new(vec![
            subpath(&[(0.0, 0.0), (1.0, 0.0)], true),
            subpath(&[(5.0, 5.0), (6.0, 5.0)], false),
        ]);
        assert!(!geometry.ends_closed());
    }

    #[test]
    fn test_empty_geometry() {
        let geometry = PathGeometry::default();
        assert!(geometry.is_empty());
        assert!(!geometry.ends_closed());
    }

    #[test]
    fn test_raw_element_accessors() {
        let rect = RawElement::Rect {
            id: SourceId::new("r1"),
            bounds: Bounds::new_from_top_left(Point::default(), Size::new(1.0, 1.0)),
            stroke_width: 2.0,
        };
        assert_eq!(rect.id(), "r1");
        assert_eq!(rect.kind(), "rect");
        assert_eq!(rect.stroke_width(), 2.0);

        let text = RawElement::Other {
            id: SourceId::new("t1"),
            kind: "text".to_string(),
        };
        assert_eq!(text.kind(), "text");
        assert_eq!(text.stroke_width(), 0.0);
    }
}
