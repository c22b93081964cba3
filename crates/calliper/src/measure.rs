//! Measurement calculator.
//!
//! Turns a classified [`Shape`] into one or two scalar [`Measurement`]s:
//! the bounding-box width and height, or, for open paths in perpendicular
//! mode, the length of the chord between the path's endpoints.
//!
//! # Rounding
//!
//! Values are rounded half-to-even at the configured number of decimal
//! digits. Scaled values of magnitude 2^50 or more keep at most two
//! fractional bits and are returned unchanged, which keeps rounding
//! idempotent.

use std::fmt;

use log::{debug, trace, warn};

use calliper_core::{
    geometry::{Bounds, GEOMETRY_EPSILON, Point},
    identifier::SourceId,
    shape::Shape,
};

use crate::{config::OpenPathAxes, error::Warning};

/// Scaled magnitude from which values are left as they are.
const EXACT_SCALED_LIMIT: f64 = 1_125_899_906_842_624.0; // 2^50

/// Number of decimal digits kept after rounding, always within 1..=24.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Precision(u8);

impl Precision {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 24;

    /// Returns `None` outside `1..=24`.
    pub fn new(digits: u32) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&digits) {
            u8::try_from(digits).ok().map(Self)
        } else {
            None
        }
    }

    pub fn digits(self) -> u32 {
        u32::from(self.0)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self(2)
    }
}

/// Rounds `value` to `precision` decimal digits, ties to even.
///
/// # Examples
///
/// ```
/// use calliper::measure::{Precision, round_half_even};
///
/// let two = Precision::new(2).unwrap();
/// assert_eq!(round_half_even(14.142135, two), 14.14);
/// assert_eq!(round_half_even(0.125, two), 0.12);
/// assert_eq!(round_half_even(0.375, two), 0.38);
/// ```
pub fn round_half_even(value: f64, precision: Precision) -> f64 {
    let factor = 10f64.powi(precision.0 as i32);
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.abs() >= EXACT_SCALED_LIMIT {
        return value;
    }
    scaled.round_ties_even() / factor
}

/// Unit a measurement value is expressed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Unit {
    #[default]
    Px,
    /// The host document's unit, by name.
    Document(String),
}

impl Unit {
    pub fn name(&self) -> &str {
        match self {
            Self::Px => "px",
            Self::Document(name) => name,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction along which a measurement is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
    /// Along the chord between an open path's endpoints.
    Perpendicular,
}

impl Orientation {
    pub fn name(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Perpendicular => "perpendicular",
        }
    }
}

/// The geometry a measurement was derived from, in px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasuredExtent {
    /// An interval on the measured axis.
    Axis { min: f64, max: f64 },
    /// A straight chord between two points.
    Chord { start: Point, end: Point },
}

impl MeasuredExtent {
    pub fn length(&self) -> f64 {
        match self {
            Self::Axis { min, max } => max - min,
            Self::Chord { start, end } => start.distance(*end),
        }
    }
}

/// One measured, converted and rounded value.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    value: f64,
    raw_px: f64,
    unit: Unit,
    precision: Precision,
    orientation: Orientation,
    extent: MeasuredExtent,
}

impl Measurement {
    /// The rounded value in [`Measurement::unit`].
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The unrounded length in px.
    pub fn raw_px(&self) -> f64 {
        self.raw_px
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn extent(&self) -> &MeasuredExtent {
        &self.extent
    }

    /// Whether the measured geometry has no length at all.
    pub fn is_degenerate(&self) -> bool {
        self.raw_px < GEOMETRY_EPSILON
    }

    /// Formats the value as label text.
    ///
    /// The value is printed in its shortest round-trip form, so trailing
    /// zeros disappear: `100.00` reads `100`.
    ///
    /// # Arguments
    ///
    /// * `show_unit` - Append the unit name directly after the number.
    pub fn label_text(&self, show_unit: bool) -> String {
        // Avoid printing "-0" for values that rounded to negative zero
        let value = if self.value == 0.0 { 0.0 } else { self.value };
        if show_unit {
            format!("{value}{}", self.unit)
        } else {
            value.to_string()
        }
    }
}

/// Settings of the measurement calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureSettings {
    perpendicular: bool,
    unit: Unit,
    scale: f64,
    precision: Precision,
    include_stroke: bool,
    open_path_axes: OpenPathAxes,
}

impl MeasureSettings {
    /// Creates px settings at the given precision.
    pub fn new(precision: Precision) -> Self {
        Self {
            perpendicular: false,
            unit: Unit::Px,
            scale: 1.0,
            precision,
            include_stroke: false,
            open_path_axes: OpenPathAxes::default(),
        }
    }

    pub fn with_perpendicular(mut self, perpendicular: bool) -> Self {
        self.perpendicular = perpendicular;
        self
    }

    /// Reports values in document units.
    ///
    /// # Arguments
    ///
    /// * `name` - The document unit name.
    /// * `scale` - Document units per px.
    pub fn with_document_units(mut self, name: impl Into<String>, scale: f64) -> Self {
        self.unit = Unit::Document(name.into());
        self.scale = scale;
        self
    }

    pub fn with_include_stroke(mut self, include_stroke: bool) -> Self {
        self.include_stroke = include_stroke;
        self
    }

    pub fn with_open_path_axes(mut self, axes: OpenPathAxes) -> Self {
        self.open_path_axes = axes;
        self
    }

    pub fn perpendicular(&self) -> bool {
        self.perpendicular
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Converts a px length into the reporting unit. Purely linear.
    pub fn convert(&self, px: f64) -> f64 {
        match self.unit {
            Unit::Px => px,
            Unit::Document(_) => px * self.scale,
        }
    }
}

/// All measurements of one shape, with the warnings raised computing them.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSet {
    source: SourceId,
    measurements: Vec<Measurement>,
    warnings: Vec<Warning>,
}

impl MeasurementSet {
    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Returns the measurement with the given orientation, if taken.
    pub fn get(&self, orientation: Orientation) -> Option<&Measurement> {
        self.measurements
            .iter()
            .find(|m| m.orientation == orientation)
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }
}

/// Measures a shape.
///
/// Closed shapes, and open shapes outside perpendicular mode, yield their
/// bounding-box width and height. Open shapes in perpendicular mode yield
/// a single chord length between first and last vertex.
///
/// Zero-length extents still produce a measurement, valued `0`, together
/// with a [`Warning::ZeroMeasurement`].
pub fn measure(shape: &Shape, settings: &MeasureSettings) -> MeasurementSet {
    let mut measurer = Measurer::new(shape.source(), settings);

    match shape.outline().endpoints() {
        Some((start, end)) if settings.perpendicular => {
            measurer.push(
                Orientation::Perpendicular,
                MeasuredExtent::Chord { start, end },
                0.0,
            );
        }
        _ => {
            let bounds = shape.bounds();
            let stroke = if settings.include_stroke {
                shape.stroke_width()
            } else {
                0.0
            };

            let (horizontal, vertical) = match settings.open_path_axes {
                OpenPathAxes::Dominant if !shape.is_closed() => {
                    let wide = bounds.width() >= bounds.height();
                    (wide, !wide)
                }
                _ => (true, true),
            };

            if horizontal {
                measurer.push(Orientation::Horizontal, horizontal_extent(bounds), stroke);
            }
            if vertical {
                measurer.push(Orientation::Vertical, vertical_extent(bounds), stroke);
            }
        }
    }

    let set = measurer.finish();
    debug!(
        source = set.source.to_string(),
        measurements = set.measurements.len(),
        warnings = set.warnings.len();
        "Measured shape"
    );
    set
}

fn horizontal_extent(bounds: Bounds) -> MeasuredExtent {
    MeasuredExtent::Axis {
        min: bounds.min_x(),
        max: bounds.max_x(),
    }
}

fn vertical_extent(bounds: Bounds) -> MeasuredExtent {
    MeasuredExtent::Axis {
        min: bounds.min_y(),
        max: bounds.max_y(),
    }
}

/// Accumulates measurements and warnings for one shape.
struct Measurer<'a> {
    settings: &'a MeasureSettings,
    set: MeasurementSet,
}

impl<'a> Measurer<'a> {
    fn new(source: SourceId, settings: &'a MeasureSettings) -> Self {
        Self {
            settings,
            set: MeasurementSet {
                source,
                measurements: Vec::new(),
                warnings: Vec::new(),
            },
        }
    }

    /// Adds a measurement of `extent`, widened by `stroke` px unless the
    /// extent is degenerate.
    fn push(&mut self, orientation: Orientation, extent: MeasuredExtent, stroke: f64) {
        let length = extent.length();

        let (extent, raw_px) = match extent {
            MeasuredExtent::Axis { min, max } if length >= GEOMETRY_EPSILON && stroke > 0.0 => {
                let half = stroke / 2.0;
                let widened = MeasuredExtent::Axis {
                    min: min - half,
                    max: max + half,
                };
                (widened, length + stroke)
            }
            _ => (extent, length),
        };

        let value = if raw_px < GEOMETRY_EPSILON {
            0.0
        } else {
            round_half_even(self.settings.convert(raw_px), self.settings.precision)
        };

        if value == 0.0 {
            warn!(
                source = self.set.source.to_string(),
                orientation = orientation.name();
                "Zero measurement"
            );
            self.set
                .warnings
                .push(Warning::ZeroMeasurement { orientation });
        }

        trace!(orientation = orientation.name(), raw_px, value; "Measurement");
        self.set.measurements.push(Measurement {
            value,
            raw_px,
            unit: self.settings.unit.clone(),
            precision: self.settings.precision,
            orientation,
            extent,
        });
    }

    fn finish(self) -> MeasurementSet {
        self.set
    }
}
