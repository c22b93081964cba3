//! Example: Annotating a host document built in code
//!
//! Any drawing model can be annotated by implementing [`HostDocument`]. This
//! one keeps its elements in a vector and prints what the engine hands back.

use calliper::{
    Annotator,
    config::AppConfig,
    draw::{LineRole, RenderedAnnotation},
    element::{Anchor, PathGeometry, RawElement, SegmentKind, Subpath},
    geometry::{Bounds, Point, Size},
    host::{DocumentUnits, HostDocument},
    identifier::SourceId,
};

struct Sketch {
    units: DocumentUnits,
    elements: Vec<RawElement>,
    annotations: Vec<RenderedAnnotation>,
    hidden: Vec<SourceId>,
}

impl HostDocument for Sketch {
    fn units(&self) -> &DocumentUnits {
        &self.units
    }

    fn selection(&self) -> &[RawElement] {
        &self.elements
    }

    fn insert_annotation(&mut self, annotation: RenderedAnnotation) {
        self.annotations.push(annotation);
    }

    fn hide(&mut self, source: SourceId) {
        self.hidden.push(source);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let frame = RawElement::Rect {
        id: SourceId::new("frame"),
        bounds: Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(378.0, 189.0)),
        stroke_width: 1.0,
    };
    let brace = RawElement::Path {
        id: SourceId::new("brace"),
        geometry: PathGeometry::new(vec![Subpath::new(
            vec![
                Anchor::new(Point::new(400.0, 0.0), SegmentKind::Move),
                Anchor::new(Point::new(500.0, 0.0), SegmentKind::Line),
                Anchor::new(Point::new(500.0, 100.0), SegmentKind::Line),
            ],
            false,
        )]),
        stroke_width: 1.0,
    };

    let mut sketch = Sketch {
        units: DocumentUnits::new("mm", 0.264583)?,
        elements: vec![frame, brace],
        annotations: Vec::new(),
        hidden: Vec::new(),
    };

    let mut config = AppConfig::default();
    config.options.perpendicular = true;
    config.options.hide = false;

    let report = Annotator::new(config).annotate(&mut sketch)?;
    println!("Annotated {} of {} elements", report.annotated().count(), report.len());

    for annotation in &sketch.annotations {
        let leaders = annotation.lines_with_role(LineRole::Leader).count();
        let labels: Vec<&str> = annotation.labels().iter().map(|l| l.text()).collect();
        println!("  {}: {leaders} leader(s), labels {labels:?}", annotation.source());
    }
    let hidden: Vec<String> = sketch.hidden.iter().map(ToString::to_string).collect();
    println!("Hidden: {hidden:?}");

    Ok(())
}
