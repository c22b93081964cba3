//! Shape classifier.
//!
//! Normalizes a host [`RawElement`] into a [`Shape`]: an ordered vertex
//! list tagged closed or open. Curved path segments contribute only their
//! end anchor, so a curve is measured by its chord.

use log::{debug, warn};

use calliper_core::{
    element::{PathGeometry, RawElement},
    geometry::Point,
    shape::{Outline, Shape},
};

use crate::error::SkipReason;

/// Classifies one selected element.
///
/// - Rectangles are closed shapes with their four corners.
/// - Paths are closed when the last subpath ends with `Z` or the first and
///   last anchors coincide; otherwise open.
/// - A closed outline that collapses to two distinct vertices is demoted
///   to an open two-point outline.
///
/// # Errors
///
/// Returns [`SkipReason::UnsupportedShape`] for anything but rectangles and
/// paths, and [`SkipReason::DegenerateGeometry`] when fewer than two distinct
/// vertices remain.
pub fn classify(element: &RawElement) -> Result<Shape, SkipReason> {
    let (vertices, closed) = match element {
        RawElement::Rect { bounds, .. } => (bounds.corners().to_vec(), true),
        RawElement::Path { geometry, .. } => path_vertices(geometry),
        RawElement::Other { kind, .. } => {
            warn!(source = element.id().to_string(), kind; "Unsupported element");
            return Err(SkipReason::UnsupportedShape { kind: kind.clone() });
        }
    };

    let outline = normalize(vertices, closed).map_err(|distinct| {
        warn!(source = element.id().to_string(), distinct; "Degenerate geometry");
        SkipReason::DegenerateGeometry { distinct }
    })?;

    debug!(
        source = element.id().to_string(),
        closed = outline.is_closed(),
        vertices = outline.vertices().len();
        "Classified element"
    );
    Ok(Shape::new(element.id(), outline).with_stroke_width(element.stroke_width()))
}

fn path_vertices(geometry: &PathGeometry) -> (Vec<Point>, bool) {
    let vertices: Vec<Point> = geometry.points().collect();
    let loops = match (vertices.first(), vertices.last()) {
        (Some(first), Some(last)) => vertices.len() > 1 && first.approx_eq(*last),
        _ => false,
    };
    (vertices, geometry.ends_closed() || loops)
}

/// Drops repeated vertices and builds the outline.
///
/// A closed outline with fewer than 3 distinct vertices is demoted to an
/// open one. On failure returns the number of vertices left after dropping
/// repeats.
fn normalize(mut vertices: Vec<Point>, closed: bool) -> Result<Outline, usize> {
    vertices.dedup_by(|next, prev| next.approx_eq(*prev));

    if closed && vertices.len() > 1 {
        let first = vertices[0];
        if vertices.last().is_some_and(|last| last.approx_eq(first)) {
            vertices.pop();
        }
    }

    if closed {
        if let Some(outline) = Outline::closed(vertices.clone()) {
            return Ok(outline);
        }
    }
    let distinct = vertices.len();
    Outline::open(vertices).ok_or(distinct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calliper_core::{
        element::{Anchor, SegmentKind, Subpath},
        geometry::{Bounds, Size},
        identifier::SourceId,
    };

    fn rect(width: f64, height: f64) -> RawElement {
        RawElement::Rect {
            id: SourceId::new("rect"),
            bounds: Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(width, height)),
            stroke_width: 1.0,
        }
    }

    fn path(points: &[(f64, f64)], closed: bool) -> RawElement {
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
        RawElement::Path {
            id: SourceId::new("path"),
            geometry: PathGeometry::new(vec![Subpath::new(anchors, closed)]),
            stroke_width: 0.0,
        }
    }

    #[test]
    fn test_rect_is_closed() {
        let shape = classify(&rect(100.0, 50.0)).unwrap();

        assert!(shape.is_closed());
        assert_eq!(shape.vertices().len(), 4);
        assert_eq!(shape.source(), "rect");
        assert_eq!(shape.stroke_width(), 1.0);
        assert_eq!(shape.bounds().max_x(), 110.0);
    }

    #[test]
    fn test_zero_width_rect_is_demoted() {
        let shape = classify(&rect(0.0, 50.0)).unwrap();

        assert!(!shape.is_closed());
        assert_eq!(
            shape.vertices(),
            &[Point::new(10.0, 20.0), Point::new(10.0, 70.0)]
        );
    }

    #[test]
    fn test_point_rect_is_degenerate() {
        assert_eq!(
            classify(&rect(0.0, 0.0)),
            Err(SkipReason::DegenerateGeometry { distinct: 1 })
        );
    }

    #[test]
    fn test_open_path() {
        let shape = classify(&path(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)], false)).unwrap();

        assert!(!shape.is_closed());
        assert_eq!(
            shape.outline().endpoints(),
            Some((Point::new(0.0, 0.0), Point::new(10.0, 10.0)))
        );
    }

    #[test]
    fn test_path_closed_by_marker() {
        let shape = classify(&path(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)], true)).unwrap();
        assert!(shape.is_closed());
        assert_eq!(shape.vertices().len(), 3);
    }

    #[test]
    fn test_path_closed_by_coincident_ends() {
        let points = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (1e-12, 0.0)];
        let shape = classify(&path(&points, false)).unwrap();

        assert!(shape.is_closed());
        // The repeated closing vertex is stored once
        assert_eq!(shape.vertices().len(), 3);
    }

    #[test]
    fn test_consecutive_duplicates_removed() {
        let points = [(0.0, 0.0), (0.0, 0.0), (5.0, 0.0), (5.0, 0.0), (5.0, 5.0)];
        let shape = classify(&path(&points, false)).unwrap();
        assert_eq!(shape.vertices().len(), 3);
    }

    #[test]
    fn test_single_point_path_is_degenerate() {
        assert_eq!(
            classify(&path(&[(3.0, 3.0), (3.0, 3.0)], false)),
            Err(SkipReason::DegenerateGeometry { distinct: 1 })
        );
        assert_eq!(
            classify(&RawElement::Path {
                id: SourceId::new("empty"),
                geometry: PathGeometry::default(),
                stroke_width: 0.0,
            }),
            Err(SkipReason::DegenerateGeometry { distinct: 0 })
        );
    }

    #[test]
    fn test_closed_two_point_path_is_open() {
        let shape = classify(&path(&[(0.0, 0.0), (8.0, 0.0), (0.0, 0.0)], false)).unwrap();
        assert!(!shape.is_closed());
        assert_eq!(shape.vertices().len(), 2);
    }

    #[test]
    fn test_closed_back_and_forth_path_is_open() {
        let points = [(0.0, 0.0), (8.0, 0.0), (0.0, 0.0), (8.0, 0.0)];
        let shape = classify(&path(&points, true)).unwrap();
        assert!(!shape.is_closed());
        assert_eq!(shape.bounds().width(), 8.0);
    }

    #[test]
    fn test_unsupported_element() {
        let element = RawElement::Other {
            id: SourceId::new("caption"),
            kind: "text".to_string(),
        };
        assert_eq!(
            classify(&element),
            Err(SkipReason::UnsupportedShape {
                kind: "text".to_string()
            })
        );
    }
}
