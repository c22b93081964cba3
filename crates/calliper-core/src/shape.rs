//! Normalized shape geometry.
//!
//! A [`Shape`] is what the classifier produces from a [`RawElement`]: a
//! vertex outline tagged as closed or open, together with the source id used
//! to find the element again.
//!
//! [`RawElement`]: crate::element::RawElement

use crate::{
    geometry::{Bounds, Point},
    identifier::SourceId,
};

/// The outline of a shape.
///
/// Constructors enforce the vertex invariants:
/// - a closed outline has at least 3 distinct vertices, each stored once
///   (the closing edge back to the first vertex is implied)
/// - an open outline has at least 2 distinct vertices; the first and last
///   are the path endpoints
///
/// Points closer than [`GEOMETRY_EPSILON`] count as the same vertex.
///
/// [`GEOMETRY_EPSILON`]: crate::geometry::GEOMETRY_EPSILON
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    vertices: Vec<Point>,
    closed: bool,
}

impl Outline {
    /// Creates a closed outline, or `None` with fewer than 3 distinct
    /// vertices.
    ///
    /// Repeated neighbours and a trailing copy of the first vertex are
    /// dropped.
    pub fn closed(mut vertices: Vec<Point>) -> Option<Self> {
        vertices.dedup_by(|next, prev| next.approx_eq(*prev));
        if vertices.len() > 1 && vertices[vertices.len() - 1].approx_eq(vertices[0]) {
            vertices.pop();
        }

        (distinct_count(&vertices) >= 3).then_some(Self {
            vertices,
            closed: true,
        })
    }

    /// Creates an open outline, or `None` with fewer than 2 distinct
    /// vertices.
    ///
    /// Repeated neighbours are dropped.
    pub fn open(mut vertices: Vec<Point>) -> Option<Self> {
        vertices.dedup_by(|next, prev| next.approx_eq(*prev));

        (distinct_count(&vertices) >= 2).then_some(Self {
            vertices,
            closed: false,
        })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the first and last vertex of an open outline.
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        if self.closed {
            return None;
        }
        Some((*self.vertices.first()?, *self.vertices.last()?))
    }
}

fn distinct_count(vertices: &[Point]) -> usize {
    vertices
        .iter()
        .enumerate()
        .filter(|(i, p)| !vertices[..*i].iter().any(|q| q.approx_eq(**p)))
        .count()
}

/// A classified shape ready for measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    source: SourceId,
    outline: Outline,
    stroke_width: f64,
}

impl Shape {
    pub fn new(source: SourceId, outline: Outline) -> Self {
        Self {
            source,
            outline,
            stroke_width: 0.0,
        }
    }

    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn vertices(&self) -> &[Point] {
        self.outline.vertices()
    }

    pub fn is_closed(&self) -> bool {
        self.outline.is_closed()
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    /// Axis-aligned bounding box of all vertices.
    pub fn bounds(&self) -> Bounds {
        // Outline constructors guarantee at least two vertices
        Bounds::from_points(self.vertices().iter().copied()).unwrap_or_default()
    }
}
