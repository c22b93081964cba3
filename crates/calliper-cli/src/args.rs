//! Command-line argument definitions for the Calliper CLI.
//!
//! [`Args`] selects the scene, the output path, the configuration file and
//! the log level. [`OptionOverrides`] mirrors the `[options]` section of the
//! configuration; any override given on the command line wins over the file.

use clap::Parser;

use calliper::config::{LineColor, OptionsConfig};

/// Command-line arguments for the Calliper dimension tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input scene file
    #[arg(help = "Path to the input scene (TOML)")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(flatten)]
    pub overrides: OptionOverrides,
}

/// Per-run overrides of the dimensioning options.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct OptionOverrides {
    /// Measure open paths along their endpoint chord
    #[arg(long)]
    pub perp: Option<bool>,

    /// Hide source elements after annotating them
    #[arg(long)]
    pub hide: Option<bool>,

    /// Use document units instead of px
    #[arg(long)]
    pub use_uu: Option<bool>,

    /// Label font size
    #[arg(long)]
    pub font_size: Option<u32>,

    /// Append the unit name to labels
    #[arg(long)]
    pub annot_unit: Option<bool>,

    /// Distance between shape and leader line
    #[arg(long)]
    pub dist_annot: Option<f64>,

    /// Decimal digits shown in labels
    #[arg(long)]
    pub precision: Option<u32>,

    /// Extra displacement of vertical dimensions
    #[arg(long, allow_negative_numbers = true)]
    pub x_offset: Option<f64>,

    /// Extra displacement of horizontal dimensions
    #[arg(long, allow_negative_numbers = true)]
    pub y_offset: Option<f64>,

    /// Line color, CSS (`red`, `#ff0000`) or packed RGBA (`0xff0000ff`)
    #[arg(long)]
    pub line_color: Option<LineColor>,
}

impl OptionOverrides {
    /// Writes every given override into `options`.
    pub fn apply(&self, options: &mut OptionsConfig) {
        if let Some(perp) = self.perp {
            options.perpendicular = perp;
        }
        if let Some(hide) = self.hide {
            options.hide = hide;
        }
        if let Some(use_uu) = self.use_uu {
            options.use_document_units = use_uu;
        }
        if let Some(font_size) = self.font_size {
            options.font_size = font_size;
        }
        if let Some(annot_unit) = self.annot_unit {
            options.show_unit = annot_unit;
        }
        if let Some(distance) = self.dist_annot {
            options.annotation_distance = distance;
        }
        if let Some(precision) = self.precision {
            options.precision = precision;
        }
        if let Some(x_offset) = self.x_offset {
            options.x_offset = x_offset;
        }
        if let Some(y_offset) = self.y_offset {
            options.y_offset = y_offset;
        }
        if let Some(line_color) = &self.line_color {
            options.line_color = line_color.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let args = Args::try_parse_from([
            "calliper",
            "scene.toml",
            "--perp",
            "true",
            "--annot-unit",
            "false",
            "--x-offset",
            "-12.5",
            "--line-color",
            "0x112233ff",
        ])
        .unwrap();

        assert_eq!(args.input, "scene.toml");
        assert_eq!(args.output, "out.svg");

        let mut options = OptionsConfig::default();
        args.overrides.apply(&mut options);
        assert!(options.perpendicular);
        assert!(!options.show_unit);
        assert_eq!(options.x_offset, -12.5);
        assert_eq!(options.line_color, LineColor::Packed(0x112233ff));
        // Untouched options keep their values
        assert_eq!(options.precision, 2);
        assert!(options.hide);
    }

    #[test]
    fn test_invalid_line_color_rejected() {
        let result = Args::try_parse_from(["calliper", "scene.toml", "--line-color", "notacolor"]);
        assert!(result.is_err());
    }
}
