//! Calliper - CAD-style dimension annotations for 2D vector shapes.
//!
//! Given a selection of rectangles and paths, Calliper measures each one,
//! lays out extension lines, a leader and a rounded label per dimension,
//! and hands the result back to the host document. Source elements can be
//! hidden afterwards. A TOML [`scene::Scene`] serves as a built-in host and
//! can be exported to SVG.
//!
//! # Pipeline
//!
//! ```text
//! RawElement → classify → Shape → measure → MeasurementSet
//!            → plan → AnnotationPlan → synthesize → RenderedAnnotation
//!            → visibility → HostDocument
//! ```

pub mod classify;
pub mod config;
pub mod export;
pub mod host;
pub mod measure;
pub mod pipeline;
pub mod plan;
pub mod scene;
pub mod settings;
pub mod synthesize;
pub mod visibility;

mod error;

pub use calliper_core::{color, draw, element, geometry, identifier, shape};

pub use error::{CalliperError, ConfigError, SkipReason, Warning};

use std::path::Path;

use log::{debug, info, trace};

use config::AppConfig;
use host::HostDocument;
use pipeline::BatchReport;
use scene::Scene;
use settings::EngineSettings;

/// Entry point for annotating documents and rendering the result.
///
/// # Examples
///
/// ```rust
/// use calliper::{Annotator, config::AppConfig};
///
/// let source = r#"
/// [[element]]
/// id = "plate"
/// kind = "rect"
/// x = 0.0
/// y = 0.0
/// width = 100.0
/// height = 50.0
/// "#;
///
/// let annotator = Annotator::new(AppConfig::default());
/// let mut scene = annotator.parse(source).expect("valid scene");
///
/// let report = annotator.annotate(&mut scene).expect("valid config");
/// assert_eq!(report.annotated().count(), 1);
///
/// let svg = annotator.render_svg(&scene).expect("renderable scene");
/// assert!(svg.contains("plate-dimension"));
/// ```
#[derive(Debug, Default)]
pub struct Annotator {
    config: AppConfig,
}

impl Annotator {
    /// Creates an annotator with the given configuration.
    ///
    /// The configuration is validated on first use, not here.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parses scene TOML into a [`Scene`].
    ///
    /// # Errors
    ///
    /// Returns [`CalliperError::Parse`] with every path data diagnostic for
    /// malformed `d` attributes, and [`CalliperError::Scene`] or
    /// [`CalliperError::Config`] for structural problems.
    pub fn parse(&self, source: &str) -> Result<Scene, CalliperError> {
        info!("Parsing scene");
        let scene: Scene = source.parse()?;
        debug!(elements = scene.selection().len(); "Scene parsed successfully");
        trace!(scene:?; "Parsed scene");
        Ok(scene)
    }

    /// Annotates the host's selection and applies the result to the host.
    ///
    /// Every annotation is inserted before any source element is hidden.
    /// Elements that cannot be annotated are listed in the returned report
    /// and left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CalliperError::Config`] when the configuration is invalid.
    /// The host is not modified in that case.
    pub fn annotate<H: HostDocument>(&self, host: &mut H) -> Result<BatchReport, CalliperError> {
        let settings = EngineSettings::resolve(&self.config, host.units())?;
        let report = pipeline::annotate_all(host.selection(), &settings);
        report.apply_to(host);
        Ok(report)
    }

    /// Renders a scene to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`CalliperError::Export`] for an invalid background color or
    /// non-finite geometry.
    pub fn render_svg(&self, scene: &Scene) -> Result<String, CalliperError> {
        let svg = export::svg::render(scene, &self.config.style)?;
        info!("SVG rendered successfully");
        Ok(svg)
    }

    /// Renders a scene and writes the SVG to `path`.
    ///
    /// # Errors
    ///
    /// As [`Annotator::render_svg`], plus I/O failures while writing.
    pub fn write_svg(&self, scene: &Scene, path: impl AsRef<Path>) -> Result<(), CalliperError> {
        export::svg::save(path, scene, &self.config.style)?;
        Ok(())
    }
}
