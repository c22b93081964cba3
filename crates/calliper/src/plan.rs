//! Layout planner.
//!
//! Places the geometry of each dimension: a leader line parallel to the
//! measured extent, displaced away from the shape, extension lines from the
//! shape to just past the leader, and terminator strokes at the leader ends.
//!
//! # Displacement
//!
//! | Orientation | Distance `d` | Leader |
//! |---|---|---|
//! | horizontal | `distance + offset.y` | `y = max_y + d` |
//! | vertical | `distance + offset.x` | `x = max_x + d` |
//! | perpendicular | `distance + abs(n.x)·offset.x + abs(n.y)·offset.y` | chord moved `d` along its normal `n` |
//!
//! All lengths are px.

use std::f64::consts::FRAC_PI_6;

use log::{trace, warn};

use calliper_core::{
    geometry::{GEOMETRY_EPSILON, Point},
    identifier::SourceId,
    shape::Shape,
};

use crate::{
    config::TerminatorStyle,
    error::Warning,
    measure::{MeasuredExtent, Measurement, MeasurementSet, Orientation},
};

/// Angle between an arrowhead stroke and the leader.
const ARROW_SPREAD: f64 = FRAC_PI_6;

/// Signed per-axis leader displacement, in px.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    x: f64,
    y: f64,
}

impl Offset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement added to vertical dimensions.
    pub fn x(self) -> f64 {
        self.x
    }

    /// Displacement added to horizontal dimensions.
    pub fn y(self) -> f64 {
        self.y
    }
}

/// Placement parameters of the planner, in px.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    distance: f64,
    offset: Offset,
    overshoot: f64,
    terminator: TerminatorStyle,
    terminator_size: f64,
    tight_threshold: f64,
}

impl Placement {
    /// Creates a placement with default extension and terminator geometry.
    ///
    /// # Arguments
    ///
    /// * `distance` - Annotation distance from the shape to the leader.
    /// * `offset` - Additional per-axis displacement.
    pub fn new(distance: f64, offset: Offset) -> Self {
        Self {
            distance,
            offset,
            overshoot: 4.0,
            terminator: TerminatorStyle::Tick,
            terminator_size: 6.0,
            tight_threshold: 1.0,
        }
    }

    pub fn with_overshoot(mut self, overshoot: f64) -> Self {
        self.overshoot = overshoot;
        self
    }

    pub fn with_terminator(mut self, terminator: TerminatorStyle, size: f64) -> Self {
        self.terminator = terminator;
        self.terminator_size = size;
        self
    }

    pub fn with_tight_threshold(mut self, threshold: f64) -> Self {
        self.tight_threshold = threshold;
        self
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(10.0, Offset::new(50.0, 50.0))
    }
}

/// A straight line placed by the planner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedLine {
    pub start: Point,
    pub end: Point,
}

impl PlannedLine {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn midpoint(self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Unit vector from `start` to `end`, `None` for a zero-length line.
    pub fn direction(self) -> Option<Point> {
        self.end.sub_point(self.start).normalize()
    }

    pub fn length(self) -> f64 {
        self.start.distance(self.end)
    }
}

/// The placed geometry of one measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDimension {
    measurement: Measurement,
    leader: PlannedLine,
    extensions: Vec<PlannedLine>,
    terminators: Vec<PlannedLine>,
    away: Point,
    distance: f64,
}

impl PlannedDimension {
    pub fn measurement(&self) -> &Measurement {
        &self.measurement
    }

    pub fn leader(&self) -> PlannedLine {
        self.leader
    }

    pub fn extensions(&self) -> &[PlannedLine] {
        &self.extensions
    }

    pub fn terminators(&self) -> &[PlannedLine] {
        &self.terminators
    }

    /// Unit vector pointing from the shape toward the leader.
    pub fn away(&self) -> Point {
        self.away
    }

    /// Signed distance between the shape reference and the leader.
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

/// The layout of every dimension of one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationPlan {
    source: SourceId,
    dimensions: Vec<PlannedDimension>,
    warnings: Vec<Warning>,
}

impl AnnotationPlan {
    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn dimensions(&self) -> &[PlannedDimension] {
        &self.dimensions
    }

    /// Tight-layout warnings raised while planning.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}

/// Plans the dimensions of `shape` for the given measurements.
///
/// Measurements of zero length are suppressed: they get no leader,
/// extension lines or terminators. A leader closer to the shape than the
/// tight threshold is still planned and reported as
/// [`Warning::TightLayout`].
pub fn plan(shape: &Shape, measurements: &MeasurementSet, placement: &Placement) -> AnnotationPlan {
    let mut dimensions = Vec::new();
    let mut warnings = Vec::new();

    for measurement in measurements.measurements() {
        if measurement.is_degenerate() {
            trace!(orientation = measurement.orientation().name(); "Suppressed zero-length dimension");
            continue;
        }

        let Some(frame) = frame_for(shape, measurement, placement) else {
            continue;
        };

        if frame.distance.abs() < placement.tight_threshold {
            warn!(
                source = shape.source().to_string(),
                orientation = measurement.orientation().name(),
                distance = frame.distance;
                "Tight layout"
            );
            warnings.push(Warning::TightLayout {
                orientation: measurement.orientation(),
                distance: frame.distance,
            });
        }

        let dimension = frame.into_dimension(measurement.clone(), placement);
        trace!(
            orientation = measurement.orientation().name(),
            leader:? = dimension.leader,
            away:? = dimension.away;
            "Planned dimension"
        );
        dimensions.push(dimension);
    }

    AnnotationPlan {
        source: shape.source(),
        dimensions,
        warnings,
    }
}

/// Where a dimension attaches to the shape and where its leader goes.
struct Frame {
    feet: [Point; 2],
    leader: PlannedLine,
    away: Point,
    distance: f64,
}

impl Frame {
    fn into_dimension(self, measurement: Measurement, placement: &Placement) -> PlannedDimension {
        let reach = self.away.scale(placement.overshoot);
        let extensions = vec![
            PlannedLine::new(self.feet[0], self.leader.start.add_point(reach)),
            PlannedLine::new(self.feet[1], self.leader.end.add_point(reach)),
        ];
        let terminators = terminators(self.leader, placement);

        PlannedDimension {
            measurement,
            leader: self.leader,
            extensions,
            terminators,
            away: self.away,
            distance: self.distance,
        }
    }
}

fn frame_for(shape: &Shape, measurement: &Measurement, placement: &Placement) -> Option<Frame> {
    let bounds = shape.bounds();
    let vertices = shape.vertices();
    let offset = placement.offset;

    match (*measurement.extent(), measurement.orientation()) {
        (MeasuredExtent::Axis { min, max }, Orientation::Horizontal) => {
            let distance = placement.distance + offset.y;
            let side = side_of(distance);
            let y = bounds.max_y() + distance;
            let foot_y = |x| nearest_across(vertices, Point::x, Point::y, x, side, bounds.max_y());
            Some(Frame {
                feet: [
                    Point::new(min, foot_y(bounds.min_x())),
                    Point::new(max, foot_y(bounds.max_x())),
                ],
                leader: PlannedLine::new(Point::new(min, y), Point::new(max, y)),
                away: Point::new(0.0, side),
                distance,
            })
        }
        (MeasuredExtent::Axis { min, max }, _) => {
            let distance = placement.distance + offset.x;
            let side = side_of(distance);
            let x = bounds.max_x() + distance;
            let foot_x = |y| nearest_across(vertices, Point::y, Point::x, y, side, bounds.max_x());
            Some(Frame {
                feet: [
                    Point::new(foot_x(bounds.min_y()), min),
                    Point::new(foot_x(bounds.max_y()), max),
                ],
                leader: PlannedLine::new(Point::new(x, min), Point::new(x, max)),
                away: Point::new(side, 0.0),
                distance,
            })
        }
        (MeasuredExtent::Chord { start, end }, _) => {
            let normal = end.sub_point(start).normalize()?.perpendicular();
            let distance = placement.distance
                + normal.x().abs() * offset.x
                + normal.y().abs() * offset.y;
            let shift = normal.scale(distance);
            Some(Frame {
                feet: [start, end],
                leader: PlannedLine::new(start.add_point(shift), end.add_point(shift)),
                away: normal.scale(side_of(distance)),
                distance,
            })
        }
    }
}

fn side_of(distance: f64) -> f64 {
    if distance < 0.0 { -1.0 } else { 1.0 }
}

/// Among the vertices lying at `at` on one axis, returns the coordinate on
/// the other axis closest to the leader side.
fn nearest_across(
    vertices: &[Point],
    along: fn(Point) -> f64,
    across: fn(Point) -> f64,
    at: f64,
    side: f64,
    fallback: f64,
) -> f64 {
    let candidates = vertices
        .iter()
        .copied()
        .filter(|&p| (along(p) - at).abs() < GEOMETRY_EPSILON)
        .map(across);

    let nearest = if side > 0.0 {
        candidates.reduce(f64::max)
    } else {
        candidates.reduce(f64::min)
    };
    nearest.unwrap_or(fallback)
}

fn terminators(leader: PlannedLine, placement: &Placement) -> Vec<PlannedLine> {
    let Some(direction) = leader.direction() else {
        return Vec::new();
    };
    let size = placement.terminator_size;

    match placement.terminator {
        TerminatorStyle::None => Vec::new(),
        TerminatorStyle::Tick => {
            let Some(slash) = direction.add_point(direction.perpendicular()).normalize() else {
                return Vec::new();
            };
            let half = slash.scale(size / 2.0);
            [leader.start, leader.end]
                .into_iter()
                .map(|p| PlannedLine::new(p.sub_point(half), p.add_point(half)))
                .collect()
        }
        TerminatorStyle::Arrow => {
            // Tips sit on the leader ends, strokes open back toward the middle
            let inward = [(leader.start, direction), (leader.end, direction.scale(-1.0))];
            inward
                .into_iter()
                .flat_map(|(tip, back)| {
                    [ARROW_SPREAD, -ARROW_SPREAD].map(|angle| {
                        PlannedLine::new(tip, tip.add_point(back.rotate(angle).scale(size)))
                    })
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;
    use crate::measure::{MeasureSettings, Precision, measure};
    use calliper_core::shape::Outline;

    fn shape(points: &[(f64, f64)], closed: bool) -> Shape {
        let vertices: Vec<Point> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        let outline = if closed {
            Outline::closed(vertices)
        } else {
            Outline::open(vertices)
        };
        Shape::new(SourceId::new("shape"), outline.unwrap())
    }

    fn plan_with(shape: &Shape, settings: &MeasureSettings, placement: &Placement) -> AnnotationPlan {
        plan(shape, &measure(shape, settings), placement)
    }

    fn px() -> MeasureSettings {
        MeasureSettings::new(Precision::default())
    }

    fn rectangle() -> Shape {
        shape(&[(0.0, 0.0), (100.0, 0.0), (100.0, 50.0), (0.0, 50.0)], true)
    }

    #[test]
    fn test_rectangle_leaders() {
        let placement = Placement::new(30.0, Offset::new(50.0, 50.0));
        let plan = plan_with(&rectangle(), &px(), &placement);

        assert_eq!(plan.dimensions().len(), 2);

        let horizontal = &plan.dimensions()[0];
        assert_eq!(
            horizontal.leader(),
            PlannedLine::new(Point::new(0.0, 130.0), Point::new(100.0, 130.0))
        );
        assert_eq!(horizontal.away(), Point::new(0.0, 1.0));

        let vertical = &plan.dimensions()[1];
        assert_eq!(
            vertical.leader(),
            PlannedLine::new(Point::new(180.0, 0.0), Point::new(180.0, 50.0))
        );
        assert_eq!(vertical.away(), Point::new(1.0, 0.0));
        assert!(plan.warnings().is_empty());
    }

    #[test]
    fn test_extension_lines_overshoot() {
        let placement = Placement::new(10.0, Offset::new(0.0, 0.0)).with_overshoot(4.0);
        let plan = plan_with(&rectangle(), &px(), &placement);

        let extensions = plan.dimensions()[0].extensions();
        assert_eq!(
            extensions[0],
            PlannedLine::new(Point::new(0.0, 50.0), Point::new(0.0, 64.0))
        );
        assert_eq!(
            extensions[1],
            PlannedLine::new(Point::new(100.0, 50.0), Point::new(100.0, 64.0))
        );
    }

    #[test]
    fn test_extension_starts_at_nearest_vertex() {
        // Triangle with its left extreme at the top
        let triangle = shape(&[(0.0, 0.0), (40.0, 30.0), (20.0, 60.0)], true);
        let placement = Placement::new(10.0, Offset::new(0.0, 0.0));
        let plan = plan_with(&triangle, &px(), &placement);

        let horizontal = &plan.dimensions()[0];
        assert_eq!(horizontal.extensions()[0].start, Point::new(0.0, 0.0));
        assert_eq!(horizontal.extensions()[1].start, Point::new(40.0, 30.0));
        assert_eq!(horizontal.leader().start.y(), 70.0);
    }

    #[test]
    fn test_negative_displacement_flips_side() {
        let placement = Placement::new(10.0, Offset::new(-100.0, 0.0));
        let plan = plan_with(&rectangle(), &px(), &placement);

        let vertical = &plan.dimensions()[1];
        assert_eq!(vertical.distance(), -90.0);
        assert_eq!(vertical.leader().start.x(), 10.0);
        assert_eq!(vertical.away(), Point::new(-1.0, 0.0));
        assert_eq!(vertical.extensions()[0].end.x(), 6.0);
    }

    #[test]
    fn test_zero_extent_suppressed() {
        let line = shape(&[(0.0, 0.0), (0.0, 40.0)], false);
        let plan = plan_with(&line, &px(), &Placement::default());

        assert_eq!(plan.dimensions().len(), 1);
        assert_eq!(
            plan.dimensions()[0].measurement().orientation(),
            Orientation::Vertical
        );
        assert!(plan.dimensions()[0].leader().length() > 0.0);
    }

    #[test]
    fn test_tight_layout_flagged() {
        let placement = Placement::new(1.0, Offset::new(-0.5, 0.0));
        let plan = plan_with(&rectangle(), &px(), &placement);

        assert_eq!(plan.dimensions().len(), 2);
        assert_eq!(
            plan.warnings(),
            &[Warning::TightLayout {
                orientation: Orientation::Vertical,
                distance: 0.5
            }]
        );
    }

    #[test]
    fn test_perpendicular_chord() {
        let path = shape(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)], false);
        let settings = px().with_perpendicular(true);
        let placement = Placement::new(10.0, Offset::new(0.0, 0.0));
        let plan = plan_with(&path, &settings, &placement);

        let dimension = &plan.dimensions()[0];
        let away = dimension.away();
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!(approx_eq!(f64, away.x(), s, epsilon = 1e-12));
        assert!(approx_eq!(f64, away.y(), -s, epsilon = 1e-12));

        // Leader is the chord moved 10 px along the normal
        let leader = dimension.leader();
        assert!(approx_eq!(f64, leader.length(), 200f64.sqrt(), epsilon = 1e-9));
        assert!(approx_eq!(f64, leader.start.x(), 10.0 * s, epsilon = 1e-9));
        assert!(approx_eq!(f64, leader.start.y(), -10.0 * s, epsilon = 1e-9));

        // Extension lines run along the normal from each endpoint
        for extension in dimension.extensions() {
            let direction = extension.direction().unwrap();
            assert!(approx_eq!(f64, direction.dot(away), 1.0, epsilon = 1e-9));
            assert!(approx_eq!(f64, extension.length(), 14.0, epsilon = 1e-9));
        }
    }

    #[test]
    fn test_perpendicular_offsets_project_on_normal() {
        let horizontal_segment = shape(&[(0.0, 0.0), (10.0, 0.0)], false);
        let settings = px().with_perpendicular(true);
        let placement = Placement::new(10.0, Offset::new(7.0, 20.0));
        let plan = plan_with(&horizontal_segment, &settings, &placement);

        // Normal is vertical, so only the y offset applies
        assert_eq!(plan.dimensions()[0].distance(), 30.0);
    }

    #[test]
    fn test_tick_terminators() {
        let placement = Placement::new(10.0, Offset::new(0.0, 0.0))
            .with_terminator(TerminatorStyle::Tick, 6.0);
        let plan = plan_with(&rectangle(), &px(), &placement);

        let ticks = plan.dimensions()[0].terminators();
        assert_eq!(ticks.len(), 2);
        for (tick, end) in ticks.iter().zip([0.0, 100.0]) {
            assert!(approx_eq!(f64, tick.length(), 6.0, epsilon = 1e-9));
            assert!(tick.midpoint().approx_eq(Point::new(end, 60.0)));
            let direction = tick.direction().unwrap();
            assert!(approx_eq!(
                f64,
                direction.x().abs(),
                direction.y().abs(),
                epsilon = 1e-9
            ));
        }
    }

    #[test]
    fn test_arrow_terminators_open_inward() {
        let placement = Placement::new(10.0, Offset::new(0.0, 0.0))
            .with_terminator(TerminatorStyle::Arrow, 6.0);
        let plan = plan_with(&rectangle(), &px(), &placement);

        let arrows = plan.dimensions()[0].terminators();
        assert_eq!(arrows.len(), 4);
        // Start arrow tips at the left end, barbs to its right
        assert!(arrows[..2].iter().all(|a| a.start == Point::new(0.0, 60.0)));
        assert!(arrows[..2].iter().all(|a| a.end.x() > 0.0));
        assert!(arrows[2..].iter().all(|a| a.start == Point::new(100.0, 60.0)));
        assert!(arrows[2..].iter().all(|a| a.end.x() < 100.0));
    }

    #[test]
    fn test_no_terminators() {
        let placement = Placement::default().with_terminator(TerminatorStyle::None, 6.0);
        let plan = plan_with(&rectangle(), &px(), &placement);
        assert!(plan.dimensions().iter().all(|d| d.terminators().is_empty()));
    }
}
