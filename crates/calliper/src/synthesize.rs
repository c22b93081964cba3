//! Annotation synthesizer.
//!
//! Turns an [`AnnotationPlan`] into concrete strokes and labels. This is a
//! pure function of the plan and the style; nothing here touches a document.

use log::debug;

use calliper_core::{
    color::Color,
    draw::{
        AnnotationLine, Baseline, Label, LineRole, RenderedAnnotation, StrokeCap,
        StrokeDefinition, StrokeStyle,
    },
    geometry::Point,
};

use crate::plan::{AnnotationPlan, PlannedDimension};

/// Gap between a leader line and its label anchor, in px.
pub const LABEL_CLEARANCE: f64 = 3.0;

/// Visual style of generated annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisStyle {
    color: Color,
    font_size: f64,
    font_family: String,
    show_unit: bool,
    leader_width: f64,
    extension_width: f64,
    extension_style: StrokeStyle,
    line_cap: StrokeCap,
}

impl SynthesisStyle {
    /// Creates a style with default line widths and font family.
    ///
    /// # Arguments
    ///
    /// * `color` - Color of every line and label.
    /// * `font_size` - Label font size in px.
    pub fn new(color: Color, font_size: f64) -> Self {
        Self {
            color,
            font_size,
            font_family: "sans-serif".to_string(),
            show_unit: true,
            leader_width: 1.0,
            extension_width: 0.5,
            extension_style: StrokeStyle::Solid,
            line_cap: StrokeCap::Butt,
        }
    }

    pub fn with_font_family(mut self, font_family: impl Into<String>) -> Self {
        self.font_family = font_family.into();
        self
    }

    pub fn with_show_unit(mut self, show_unit: bool) -> Self {
        self.show_unit = show_unit;
        self
    }

    pub fn with_leader_width(mut self, width: f64) -> Self {
        self.leader_width = width;
        self
    }

    pub fn with_extension(mut self, width: f64, style: StrokeStyle) -> Self {
        self.extension_width = width;
        self.extension_style = style;
        self
    }

    /// Sets the cap of every generated line.
    pub fn with_line_cap(mut self, cap: StrokeCap) -> Self {
        self.line_cap = cap;
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn show_unit(&self) -> bool {
        self.show_unit
    }

    fn leader_stroke(&self) -> StrokeDefinition {
        StrokeDefinition::solid(self.color, self.leader_width as f32).with_cap(self.line_cap)
    }

    fn extension_stroke(&self) -> StrokeDefinition {
        StrokeDefinition::new(self.color, self.extension_width as f32)
            .with_style(self.extension_style.clone())
            .with_cap(self.line_cap)
    }
}

/// Builds the lines and labels for every planned dimension.
pub fn synthesize(plan: &AnnotationPlan, style: &SynthesisStyle) -> RenderedAnnotation {
    let leader_stroke = style.leader_stroke();
    let extension_stroke = style.extension_stroke();

    let mut lines = Vec::new();
    let mut labels = Vec::new();

    for dimension in plan.dimensions() {
        for extension in dimension.extensions() {
            lines.push(AnnotationLine::new(
                extension.start,
                extension.end,
                extension_stroke.clone(),
                LineRole::Extension,
            ));
        }

        let leader = dimension.leader();
        lines.push(AnnotationLine::new(
            leader.start,
            leader.end,
            leader_stroke.clone(),
            LineRole::Leader,
        ));

        for terminator in dimension.terminators() {
            lines.push(AnnotationLine::new(
                terminator.start,
                terminator.end,
                leader_stroke.clone(),
                LineRole::Terminator,
            ));
        }

        labels.push(label_for(dimension, style));
    }

    debug!(
        source = plan.source().to_string(),
        lines = lines.len(),
        labels = labels.len();
        "Synthesized annotation"
    );
    RenderedAnnotation::new(plan.source(), lines, labels)
}

fn label_for(dimension: &PlannedDimension, style: &SynthesisStyle) -> Label {
    let leader = dimension.leader();
    let away = dimension.away();
    let anchor = leader.midpoint().add_point(away.scale(LABEL_CLEARANCE));

    let rotation = leader
        .direction()
        .map(|d| reading_angle(d.y().atan2(d.x()).to_degrees()))
        .unwrap_or(0.0);

    Label::new(
        dimension.measurement().label_text(style.show_unit),
        anchor,
        style.font_size,
        style.color,
    )
    .with_font_family(style.font_family.as_str())
    .with_rotation(rotation)
    .with_baseline(baseline_for(rotation, away))
}

/// Folds an angle in degrees into `[-90, 90)` so text never reads upside down.
fn reading_angle(mut degrees: f64) -> f64 {
    while degrees >= 90.0 {
        degrees -= 180.0;
    }
    while degrees < -90.0 {
        degrees += 180.0;
    }
    degrees
}

/// Picks the baseline that puts the glyphs on the far side of the anchor
/// from the leader.
fn baseline_for(rotation: f64, away: Point) -> Baseline {
    let (sin, cos) = rotation.to_radians().sin_cos();
    // Direction glyphs hang toward, in the label's rotated frame
    let below = Point::new(-sin, cos);
    if away.dot(below) > 0.0 {
        Baseline::Hanging
    } else {
        Baseline::Alphabetic
    }
}
