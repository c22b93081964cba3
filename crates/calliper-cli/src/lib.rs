//! CLI logic for the Calliper dimension tool.
//!
//! Loads a scene, annotates its selection with the configured options and
//! writes the annotated drawing as SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OptionOverrides};

use log::{info, warn};

use calliper::{Annotator, CalliperError, scene::Scene};

/// Run the Calliper CLI application
///
/// # Errors
///
/// Returns `CalliperError` for:
/// - File I/O errors
/// - Configuration loading or validation errors
/// - Scene and path data errors
/// - Export errors
///
/// Elements that cannot be annotated are not errors; they are logged and
/// the run continues.
pub fn run(args: &Args) -> Result<(), CalliperError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing scene"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    args.overrides.apply(&mut app_config.options);

    let mut scene = Scene::load(&args.input)?;

    let annotator = Annotator::new(app_config);
    let report = annotator.annotate(&mut scene)?;

    for (source, reason) in report.skipped() {
        warn!(source = source.to_string(), severity = reason.severity().to_string(); "{reason}");
    }
    for (source, annotated) in report.annotated() {
        for warning in annotated.warnings() {
            warn!(source = source.to_string(), severity = warning.severity().to_string(); "{warning}");
        }
    }

    annotator.write_svg(&scene, &args.output)?;

    info!(
        output_file = args.output,
        annotated = report.annotated().count(),
        skipped = report.skipped().count();
        "SVG exported successfully"
    );

    Ok(())
}
