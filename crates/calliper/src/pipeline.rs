//! Batch driver.
//!
//! Runs the classify → measure → plan → synthesize → visibility pipeline
//! once per selected element. Elements share nothing, so with
//! `layout.parallel` enabled they fan out over the rayon thread pool; the
//! report always lists outcomes in selection order.

use log::{debug, info};
use rayon::prelude::*;

use calliper_core::{draw::RenderedAnnotation, element::RawElement, identifier::SourceId};

use crate::{
    classify::classify,
    error::{SkipReason, Warning},
    host::HostDocument,
    measure::measure,
    plan::plan,
    settings::EngineSettings,
    synthesize::synthesize,
    visibility::{VisibilityInstruction, visibility_for},
};

/// A successfully annotated element.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotated {
    annotation: RenderedAnnotation,
    warnings: Vec<Warning>,
    visibility: Option<VisibilityInstruction>,
}

impl Annotated {
    pub fn annotation(&self) -> &RenderedAnnotation {
        &self.annotation
    }

    /// Advisory warnings raised while measuring and planning.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn visibility(&self) -> Option<VisibilityInstruction> {
        self.visibility
    }
}

/// What happened to one selected element.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectOutcome {
    source: SourceId,
    result: Result<Annotated, SkipReason>,
}

impl ObjectOutcome {
    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn result(&self) -> Result<&Annotated, &SkipReason> {
        self.result.as_ref()
    }

    pub fn is_annotated(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a whole selection, in selection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    outcomes: Vec<ObjectOutcome>,
}

impl BatchReport {
    pub fn outcomes(&self) -> &[ObjectOutcome] {
        &self.outcomes
    }

    /// Iterates over successfully annotated elements.
    pub fn annotated(&self) -> impl Iterator<Item = (SourceId, &Annotated)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|a| (o.source, a)))
    }

    /// Iterates over skipped elements with the reason they were skipped.
    pub fn skipped(&self) -> impl Iterator<Item = (SourceId, &SkipReason)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|r| (o.source, r)))
    }

    /// Total number of advisory warnings across all annotated elements.
    pub fn warning_count(&self) -> usize {
        self.annotated().map(|(_, a)| a.warnings.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Hands every annotation to `host`, then applies the visibility
    /// instructions.
    ///
    /// Skipped elements are left untouched.
    pub fn apply_to<H: HostDocument>(&self, host: &mut H) {
        for (_, annotated) in self.annotated() {
            host.insert_annotation(annotated.annotation.clone());
        }
        for instruction in self.annotated().filter_map(|(_, a)| a.visibility) {
            host.hide(instruction.source());
        }
    }
}

/// Runs the full pipeline for one element.
pub fn annotate_one(element: &RawElement, settings: &EngineSettings) -> ObjectOutcome {
    let source = element.id();
    let result = classify(element).map(|shape| {
        let measurements = measure(&shape, settings.measure());
        let layout = plan(&shape, &measurements, settings.placement());
        let annotation = synthesize(&layout, settings.style());

        let warnings = measurements
            .warnings()
            .iter()
            .chain(layout.warnings())
            .cloned()
            .collect();

        Annotated {
            annotation,
            warnings,
            visibility: visibility_for(source, settings.hide()),
        }
    });

    ObjectOutcome { source, result }
}

/// Annotates every element of a selection.
///
/// One element failing classification never affects the others.
pub fn annotate_all(elements: &[RawElement], settings: &EngineSettings) -> BatchReport {
    info!(elements = elements.len(), parallel = settings.parallel(); "Annotating selection");

    let outcomes: Vec<ObjectOutcome> = if settings.parallel() {
        elements
            .par_iter()
            .map(|element| annotate_one(element, settings))
            .collect()
    } else {
        elements
            .iter()
            .map(|element| annotate_one(element, settings))
            .collect()
    };

    let report = BatchReport { outcomes };
    for (source, reason) in report.skipped() {
        debug!(source = source.to_string(), reason = reason.to_string(); "Skipped element");
    }
    info!(
        annotated = report.annotated().count(),
        skipped = report.skipped().count(),
        warnings = report.warning_count();
        "Selection annotated"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        host::DocumentUnits,
        measure::{MeasureSettings, Precision},
        plan::{Offset, Placement},
        synthesize::SynthesisStyle,
    };
    use calliper_core::{
        color::Color,
        draw::LineRole,
        element::{Anchor, PathGeometry, SegmentKind, Subpath},
        geometry::{Bounds, Point, Size},
    };

    #[derive(Default)]
    struct RecordingHost {
        units: DocumentUnits,
        selection: Vec<RawElement>,
        inserted: Vec<SourceId>,
        hidden: Vec<SourceId>,
    }

    impl HostDocument for RecordingHost {
        fn units(&self) -> &DocumentUnits {
            &self.units
        }

        fn selection(&self) -> &[RawElement] {
            &self.selection
        }

        fn insert_annotation(&mut self, annotation: RenderedAnnotation) {
            self.inserted.push(annotation.source());
        }

        fn hide(&mut self, source: SourceId) {
            self.hidden.push(source);
        }
    }

    fn rect(id: &str, x: f64, width: f64) -> RawElement {
        RawElement::Rect {
            id: SourceId::new(id),
            bounds: Bounds::new_from_top_left(Point::new(x, 0.0), Size::new(width, 20.0)),
            stroke_width: 0.0,
        }
    }

    fn segment(id: &str, from: (f64, f64), to: (f64, f64)) -> RawElement {
        RawElement::Path {
            id: SourceId::new(id),
            geometry: PathGeometry::new(vec![Subpath::new(
                vec![
                    Anchor::new(Point::new(from.0, from.1), SegmentKind::Move),
                    Anchor::new(Point::new(to.0, to.1), SegmentKind::Line),
                ],
                false,
            )]),
            stroke_width: 0.0,
        }
    }

    fn text(id: &str) -> RawElement {
        RawElement::Other {
            id: SourceId::new(id),
            kind: "text".to_string(),
        }
    }

    fn settings(hide: bool) -> EngineSettings {
        EngineSettings::new(
            MeasureSettings::new(Precision::default()),
            Placement::new(10.0, Offset::new(0.0, 0.0)),
            SynthesisStyle::new(Color::default(), 10.0),
        )
        .with_hide(hide)
    }

    #[test]
    fn test_skipped_elements_do_not_abort_batch() {
        let elements = vec![rect("a", 0.0, 10.0), text("caption"), rect("b", 50.0, 30.0)];
        let report = annotate_all(&elements, &settings(true));

        assert_eq!(report.len(), 3);
        assert_eq!(report.annotated().count(), 2);

        let skipped: Vec<_> = report.skipped().collect();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, "caption");
    }

    #[test]
    fn test_skipped_elements_never_hidden() {
        let elements = vec![
            rect("keep", 0.0, 10.0),
            text("label"),
            segment("dot", (1.0, 1.0), (1.0, 1.0)),
        ];
        let mut host = RecordingHost {
            selection: elements,
            ..RecordingHost::default()
        };

        let report = annotate_all(host.selection(), &settings(true));
        report.apply_to(&mut host);

        assert_eq!(host.inserted, vec![SourceId::new("keep")]);
        assert_eq!(host.hidden, vec![SourceId::new("keep")]);
        assert!(
            report
                .outcomes()
                .iter()
                .filter(|o| !o.is_annotated())
                .all(|o| o.result().is_err())
        );
    }

    #[test]
    fn test_hide_disabled() {
        let mut host = RecordingHost {
            selection: vec![rect("shown", 0.0, 10.0)],
            ..RecordingHost::default()
        };

        let report = annotate_all(host.selection(), &settings(false));
        report.apply_to(&mut host);

        assert_eq!(host.inserted.len(), 1);
        assert!(host.hidden.is_empty());
    }

    #[test]
    fn test_warnings_collected() {
        // A vertical segment has zero width
        let elements = vec![segment("post", (0.0, 0.0), (0.0, 40.0))];
        let report = annotate_all(&elements, &settings(false));

        assert_eq!(report.warning_count(), 1);
        let (_, annotated) = report.annotated().next().unwrap();
        assert!(matches!(
            annotated.warnings()[0],
            Warning::ZeroMeasurement { .. }
        ));
        // Only the vertical dimension is drawn
        assert_eq!(
            annotated
                .annotation()
                .lines_with_role(LineRole::Leader)
                .count(),
            1
        );
    }

    #[test]
    fn test_parallel_preserves_selection_order() {
        let elements: Vec<RawElement> = (0..64)
            .map(|i| {
                if i % 5 == 0 {
                    text(&format!("skip-{i}"))
                } else {
                    rect(&format!("rect-{i}"), f64::from(i) * 20.0, 10.0 + f64::from(i))
                }
            })
            .collect();

        let sequential = annotate_all(&elements, &settings(true));
        let parallel = annotate_all(&elements, &settings(true).with_parallel(true));

        assert_eq!(sequential, parallel);
        let order: Vec<SourceId> = parallel.outcomes().iter().map(|o| o.source()).collect();
        let expected: Vec<SourceId> = elements.iter().map(RawElement::id).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_resolved_settings_drive_pipeline() {
        let mut config = AppConfig::default();
        config.options.use_document_units = false;
        config.options.show_unit = false;
        let settings = EngineSettings::resolve(&config, &DocumentUnits::px()).unwrap();

        let report = annotate_all(&[rect("plate", 0.0, 100.0)], &settings);
        let (_, annotated) = report.annotated().next().unwrap();
        let texts: Vec<&str> = annotated
            .annotation()
            .labels()
            .iter()
            .map(|l| l.text())
            .collect();
        assert_eq!(texts, vec!["100", "20"]);
    }
}
