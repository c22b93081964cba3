//! Engine settings resolved from configuration.
//!
//! [`AppConfig`] holds what the user wrote; [`EngineSettings`] holds what the
//! pipeline stages consume: px lengths, a checked precision and parsed
//! colors and stroke styles. Resolution happens once per run, before any
//! element is processed.

use log::debug;

use crate::{
    config::AppConfig,
    error::ConfigError,
    host::DocumentUnits,
    measure::{MeasureSettings, Precision},
    plan::{Offset, Placement},
    synthesize::SynthesisStyle,
};

/// Settings for one annotation run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    measure: MeasureSettings,
    placement: Placement,
    style: SynthesisStyle,
    hide: bool,
    parallel: bool,
}

impl EngineSettings {
    /// Creates settings from already resolved stage settings.
    ///
    /// Source elements are not hidden and elements are processed
    /// sequentially unless enabled with the builder methods.
    pub fn new(measure: MeasureSettings, placement: Placement, style: SynthesisStyle) -> Self {
        Self {
            measure,
            placement,
            style,
            hide: false,
            parallel: false,
        }
    }

    pub fn with_hide(mut self, hide: bool) -> Self {
        self.hide = hide;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Resolves a configuration against a document's units.
    ///
    /// With `use_document_units` set, the annotation distance, offsets and
    /// font size are read as document units and divided by the scale to get
    /// px, and measurements are reported in the document unit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration fails validation.
    pub fn resolve(config: &AppConfig, units: &DocumentUnits) -> Result<Self, ConfigError> {
        config.validate()?;

        let options = &config.options;
        let precision =
            Precision::new(options.precision).ok_or_else(|| ConfigError::OutOfRange {
                name: "precision",
                value: f64::from(options.precision),
                min: f64::from(Precision::MIN),
                max: f64::from(Precision::MAX),
            })?;

        let length = |value: f64| {
            if options.use_document_units {
                units.to_px(value)
            } else {
                value
            }
        };

        let mut measure = MeasureSettings::new(precision)
            .with_perpendicular(options.perpendicular)
            .with_include_stroke(config.measure.include_stroke)
            .with_open_path_axes(config.measure.open_path_axes);
        if options.use_document_units {
            measure = measure.with_document_units(units.name(), units.scale());
        }

        let layout = &config.layout;
        let placement = Placement::new(
            length(options.annotation_distance),
            Offset::new(length(options.x_offset), length(options.y_offset)),
        )
        .with_overshoot(layout.extension_overshoot)
        .with_terminator(config.style.terminator(), layout.terminator_size)
        .with_tight_threshold(layout.tight_threshold);

        let style = SynthesisStyle::new(
            options.line_color.to_color()?,
            length(f64::from(options.font_size)),
        )
        .with_font_family(config.style.font_family())
        .with_show_unit(options.show_unit)
        .with_leader_width(config.style.leader_width())
        .with_extension(
            config.style.extension_width(),
            config.style.extension_style()?,
        )
        .with_line_cap(config.style.line_cap()?);

        debug!(
            unit = measure.unit().name(),
            precision = precision.digits(),
            distance = placement.distance(),
            hide = options.hide,
            parallel = layout.parallel;
            "Resolved engine settings"
        );

        Ok(Self::new(measure, placement, style)
            .with_hide(options.hide)
            .with_parallel(layout.parallel))
    }

    pub fn measure(&self) -> &MeasureSettings {
        &self.measure
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn style(&self) -> &SynthesisStyle {
        &self.style
    }

    pub fn hide(&self) -> bool {
        self.hide
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }
}
