//! Annotation lines, labels and the per-element annotation aggregate.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::{Bounds, Point, Size},
    identifier::SourceId,
};

/// Average advance of one glyph relative to the font size.
///
/// Labels are not shaped, so their extent is estimated from this ratio.
const GLYPH_ADVANCE_EM: f64 = 0.6;

/// What an [`AnnotationLine`] represents in a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRole {
    /// The line parallel to the measured extent.
    Leader,
    /// A connector from the shape's edge to the leader.
    Extension,
    /// A tick or arrowhead stroke at a leader end.
    Terminator,
}

impl LineRole {
    /// Returns the layer lines of this role render to.
    pub fn layer(self) -> RenderLayer {
        match self {
            Self::Leader => RenderLayer::Leader,
            Self::Extension => RenderLayer::Extension,
            Self::Terminator => RenderLayer::Terminator,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Leader => "leader",
            Self::Extension => "extension",
            Self::Terminator => "terminator",
        }
    }
}

/// A straight stroked line segment of an annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationLine {
    start: Point,
    end: Point,
    stroke: StrokeDefinition,
    role: LineRole,
}

impl AnnotationLine {
    pub fn new(start: Point, end: Point, stroke: StrokeDefinition, role: LineRole) -> Self {
        Self {
            start,
            end,
            stroke,
            role,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn role(&self) -> LineRole {
        self.role
    }

    /// Returns the Euclidean length of the line.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

impl Drawable for AnnotationLine {
    fn render_to_layers(&self) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let line = svg_element::Line::new()
            .set("x1", self.start.x())
            .set("y1", self.start.y())
            .set("x2", self.end.x())
            .set("y2", self.end.y())
            .set("class", self.role.name());
        let line = apply_stroke!(line, &self.stroke);

        output.add_to_layer(self.role.layer(), Box::new(line));
        output
    }

    fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points([self.start, self.end])
    }
}

/// Which side of its anchor a label's glyphs occupy, in the label's own
/// (rotated) frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Baseline {
    /// Glyphs hang below the anchor.
    Hanging,
    /// Glyphs sit on the anchor.
    Alphabetic,
}

impl Baseline {
    /// Returns the SVG `dominant-baseline` value.
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Hanging => "hanging",
            Self::Alphabetic => "alphabetic",
        }
    }
}

/// A measurement label.
///
/// The label is centered horizontally on `anchor` and rotated about it by
/// `rotation` degrees (clockwise on screen).
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    anchor: Point,
    font_size: f64,
    font_family: String,
    color: Color,
    rotation: f64,
    baseline: Baseline,
}

impl Label {
    /// Creates an unrotated label with an alphabetic baseline.
    pub fn new(text: impl Into<String>, anchor: Point, font_size: f64, color: Color) -> Self {
        Self {
            text: text.into(),
            anchor,
            font_size,
            font_family: "sans-serif".to_string(),
            color,
            rotation: 0.0,
            baseline: Baseline::Alphabetic,
        }
    }

    pub fn with_font_family(mut self, font_family: impl Into<String>) -> Self {
        self.font_family = font_family.into();
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn baseline(&self) -> Baseline {
        self.baseline
    }
}

impl Drawable for Label {
    fn render_to_layers(&self) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let mut text = svg_element::Text::new(self.text.as_str())
            .set("x", self.anchor.x())
            .set("y", self.anchor.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", self.baseline.to_svg_value())
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("fill", &self.color)
            .set("fill-opacity", self.color.alpha());

        if self.rotation != 0.0 {
            text = text.set(
                "transform",
                format!(
                    "rotate({} {} {})",
                    self.rotation,
                    self.anchor.x(),
                    self.anchor.y()
                ),
            );
        }

        output.add_to_layer(RenderLayer::Text, Box::new(text));
        output
    }

    fn bounds(&self) -> Option<Bounds> {
        let chars = self.text.chars().count() as f64;
        let width = chars * self.font_size * GLYPH_ADVANCE_EM;
        // Square box around the anchor so any rotation stays covered
        let reach = 2.0 * width.max(self.font_size);
        Some(self.anchor.to_bounds(Size::new(reach, reach)))
    }
}

/// All lines and labels generated for one source element.
///
/// Owns no reference back to the source shape beyond its [`SourceId`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedAnnotation {
    source: SourceId,
    lines: Vec<AnnotationLine>,
    labels: Vec<Label>,
}

impl RenderedAnnotation {
    pub fn new(source: SourceId, lines: Vec<AnnotationLine>, labels: Vec<Label>) -> Self {
        Self {
            source,
            lines,
            labels,
        }
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn lines(&self) -> &[AnnotationLine] {
        &self.lines
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Returns the lines with the given role.
    pub fn lines_with_role(&self, role: LineRole) -> impl Iterator<Item = &AnnotationLine> {
        self.lines.iter().filter(move |line| line.role() == role)
    }

    /// Returns `true` when nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.labels.is_empty()
    }
}

impl Drawable for RenderedAnnotation {
    fn render_to_layers(&self) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        for line in &self.lines {
            output.merge(line.render_to_layers());
        }
        for label in &self.labels {
            output.merge(label.render_to_layers());
        }
        output
    }

    fn bounds(&self) -> Option<Bounds> {
        let line_bounds = self.lines.iter().filter_map(Drawable::bounds);
        let label_bounds = self.labels.iter().filter_map(Drawable::bounds);
        line_bounds
            .chain(label_bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}
