//! Resolution of parsed commands into absolute anchor points.

use log::trace;

use calliper_core::{
    element::{Anchor, PathGeometry, SegmentKind, Subpath},
    geometry::Point,
};

use crate::command::{PathCommand, Segment};

/// Tracks the current point and the subpath under construction.
#[derive(Debug, Default)]
struct GeometryBuilder {
    current: Point,
    subpath_start: Point,
    anchors: Vec<Anchor>,
    subpaths: Vec<Subpath>,
}

impl GeometryBuilder {
    fn target(&self, point: Point, relative: bool) -> Point {
        if relative {
            self.current.add_point(point)
        } else {
            point
        }
    }

    fn flush(&mut self, closed: bool) {
        if !self.anchors.is_empty() {
            let anchors = std::mem::take(&mut self.anchors);
            self.subpaths.push(Subpath::new(anchors, closed));
        }
    }

    fn move_to(&mut self, target: Point) {
        self.flush(false);
        self.anchors.push(Anchor::new(target, SegmentKind::Move));
        self.current = target;
        self.subpath_start = target;
    }

    fn draw_to(&mut self, target: Point, kind: SegmentKind) {
        // Drawing straight after a closepath starts a new subpath at the
        // closed subpath's start point
        if self.anchors.is_empty() {
            self.anchors
                .push(Anchor::new(self.subpath_start, SegmentKind::Move));
        }
        self.anchors.push(Anchor::new(target, kind));
        self.current = target;
    }

    fn close(&mut self) {
        self.flush(true);
        self.current = self.subpath_start;
    }

    fn apply(&mut self, segment: Segment, relative: bool) {
        match segment {
            Segment::MoveTo(p) => {
                let target = self.target(p, relative);
                self.move_to(target);
            }
            Segment::LineTo(p) => {
                let target = self.target(p, relative);
                self.draw_to(target, SegmentKind::Line);
            }
            Segment::Horizontal(x) => {
                let x = if relative { self.current.x() + x } else { x };
                self.draw_to(self.current.with_x(x), SegmentKind::Line);
            }
            Segment::Vertical(y) => {
                let y = if relative { self.current.y() + y } else { y };
                self.draw_to(self.current.with_y(y), SegmentKind::Line);
            }
            Segment::Cubic { end, .. }
            | Segment::SmoothCubic { end, .. }
            | Segment::Quadratic { end, .. }
            | Segment::SmoothQuadratic(end) => {
                let target = self.target(end, relative);
                self.draw_to(target, SegmentKind::Curve);
            }
            Segment::Arc { end, .. } => {
                let target = self.target(end, relative);
                self.draw_to(target, SegmentKind::Arc);
            }
            Segment::Close => self.close(),
        }
    }

    fn finish(mut self) -> PathGeometry {
        self.flush(false);
        PathGeometry::new(self.subpaths)
    }
}

/// Resolve commands into absolute anchors grouped by subpath.
///
/// Curves and arcs contribute only their end point; control points and
/// arc parameters do not affect the anchors.
pub(crate) fn resolve(commands: &[PathCommand]) -> PathGeometry {
    let mut builder = GeometryBuilder::default();
    for command in commands {
        for segment in command.segments() {
            builder.apply(*segment, command.is_relative());
        }
    }
    let geometry = builder.finish();
    trace!(geometry:?; "Resolved path data");
    geometry
}
