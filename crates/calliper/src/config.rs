//! Annotation configuration loaded from TOML.
//!
//! # Overview
//!
//! - [`AppConfig`] - The full configuration bundle
//! - [`OptionsConfig`] - The user-facing dimensioning options (`[options]`)
//! - [`MeasureConfig`] - Measurement refinements (`[measure]`)
//! - [`LayoutConfig`] - Geometric constants of the planner (`[layout]`)
//! - [`StyleConfig`] - Fonts, terminators and line styles (`[style]`)
//!
//! Option keys accept both their descriptive names and the short names
//! used by drawing-tool extensions, so `distannot = 30` and
//! `annotation_distance = 30` are equivalent.
//!
//! # Example
//!
//! ```
//! use calliper::config::AppConfig;
//!
//! let config: AppConfig = toml::from_str(
//!     r##"
//!     [options]
//!     useUU = false
//!     distannot = 30
//!     linecolor = "#0050ff"
//!
//!     [style]
//!     terminator = "arrow"
//!     "##,
//! )
//! .unwrap();
//!
//! assert!(!config.options.use_document_units);
//! assert_eq!(config.options.annotation_distance, 30.0);
//! config.validate().unwrap();
//! ```

use std::str::FromStr;

use serde::Deserialize;

use calliper_core::{
    color::Color,
    draw::{StrokeCap, StrokeStyle},
};

use crate::error::ConfigError;

/// Application configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Dimensioning options section
    #[serde(default)]
    pub options: OptionsConfig,

    /// Measurement section
    #[serde(default)]
    pub measure: MeasureConfig,

    /// Layout section
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Style section
    #[serde(default)]
    pub style: StyleConfig,
}

impl AppConfig {
    /// Checks every value against its permitted range.
    ///
    /// # Errors
    ///
    /// Returns the first offending value as [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.options.validate()?;
        self.layout.validate()?;
        self.style.validate()
    }
}

/// The dimensioning options.
///
/// Lengths (`font_size`, `annotation_distance`, `x_offset`, `y_offset`) are
/// in document units when `use_document_units` is set and in px otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    /// Measure open paths by their endpoint chord.
    #[serde(alias = "perp")]
    pub perpendicular: bool,

    /// Hide each source element once it has been annotated.
    pub hide: bool,

    /// Measure and place in document units instead of px.
    #[serde(alias = "useUU")]
    pub use_document_units: bool,

    /// Label font size, 1..=1000.
    #[serde(alias = "fontsize")]
    pub font_size: u32,

    /// Append the unit name to label text.
    #[serde(alias = "annotunit")]
    pub show_unit: bool,

    /// Distance from the shape to the leader line, 1..=1000.
    #[serde(alias = "distannot")]
    pub annotation_distance: f64,

    /// Decimal digits kept after rounding, 1..=24.
    pub precision: u32,

    /// Extra displacement of vertical dimensions, -10000..=10000.
    #[serde(alias = "xoffset")]
    pub x_offset: f64,

    /// Extra displacement of horizontal dimensions, -10000..=10000.
    #[serde(alias = "yoffset")]
    pub y_offset: f64,

    /// Color of all annotation lines and labels.
    #[serde(alias = "linecolor")]
    pub line_color: LineColor,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            perpendicular: false,
            hide: true,
            use_document_units: true,
            font_size: 10,
            show_unit: true,
            annotation_distance: 10.0,
            precision: 2,
            x_offset: 50.0,
            y_offset: 50.0,
            line_color: LineColor::default(),
        }
    }
}

impl OptionsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_range("font_size", f64::from(self.font_size), 1.0, 1000.0)?;
        check_range("annotation_distance", self.annotation_distance, 1.0, 1000.0)?;
        check_range("precision", f64::from(self.precision), 1.0, 24.0)?;
        check_range("x_offset", self.x_offset, -10000.0, 10000.0)?;
        check_range("y_offset", self.y_offset, -10000.0, 10000.0)?;
        self.line_color.to_color().map(|_| ())
    }
}

/// A line color given either as a CSS color string or as a packed
/// `0xRRGGBBAA` integer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LineColor {
    Packed(u32),
    Css(String),
}

impl Default for LineColor {
    fn default() -> Self {
        Self::Packed(0xFFA500FF)
    }
}

impl LineColor {
    /// Resolves the configured value to a [`Color`].
    pub fn to_color(&self) -> Result<Color, ConfigError> {
        match self {
            Self::Packed(packed) => Ok(Color::from_rgba32(*packed)),
            Self::Css(css) => Color::new(css).map_err(|reason| ConfigError::InvalidColor {
                name: "line_color",
                reason,
            }),
        }
    }
}

impl FromStr for LineColor {
    type Err = ConfigError;

    /// Parses `0x`-prefixed hexadecimal as a packed color and anything else
    /// as CSS.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let color = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16)
                .map(Self::Packed)
                .map_err(|err| ConfigError::InvalidColor {
                    name: "line_color",
                    reason: format!("invalid packed color `{s}`: {err}"),
                })?,
            None => Self::Css(s.to_string()),
        };
        color.to_color()?;
        Ok(color)
    }
}

/// Which axes of an open path are measured in bounding-box mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenPathAxes {
    /// Width and height.
    #[default]
    Both,
    /// Only the larger extent; width wins ties.
    Dominant,
}

/// Measurement section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Add the element's stroke width to bounding-box extents.
    pub include_stroke: bool,

    pub open_path_axes: OpenPathAxes,
}

/// Layout section, all lengths in px.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// How far extension lines run past the leader.
    pub extension_overshoot: f64,

    /// Length of tick and arrowhead strokes.
    pub terminator_size: f64,

    /// Leader distances below this mark the dimension as tight.
    pub tight_threshold: f64,

    /// Annotate elements on the rayon thread pool.
    pub parallel: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            extension_overshoot: 4.0,
            terminator_size: 6.0,
            tight_threshold: 1.0,
            parallel: false,
        }
    }
}

impl LayoutConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_range("extension_overshoot", self.extension_overshoot, 0.0, 1000.0)?;
        check_range("terminator_size", self.terminator_size, 0.0, 1000.0)?;
        check_range("tight_threshold", self.tight_threshold, 0.0, 1000.0)
    }
}

/// Mark drawn at both ends of a leader line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminatorStyle {
    /// A short slash at 45 degrees to the leader.
    #[default]
    Tick,
    /// An open arrowhead pointing outward.
    Arrow,
    None,
}

/// Style section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    font_family: String,
    terminator: TerminatorStyle,
    leader_width: f64,
    extension_width: f64,
    extension_style: String,
    line_cap: String,
    background_color: Option<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            terminator: TerminatorStyle::default(),
            leader_width: 1.0,
            extension_width: 0.5,
            extension_style: "solid".to_string(),
            line_cap: "butt".to_string(),
            background_color: None,
        }
    }
}

impl StyleConfig {
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn terminator(&self) -> TerminatorStyle {
        self.terminator
    }

    /// Stroke width of leader lines and terminators, in px.
    pub fn leader_width(&self) -> f64 {
        self.leader_width
    }

    /// Stroke width of extension lines, in px.
    pub fn extension_width(&self) -> f64 {
        self.extension_width
    }

    /// Get the dash style of extension lines.
    pub fn extension_style(&self) -> Result<StrokeStyle, ConfigError> {
        self.extension_style
            .parse()
            .map_err(|reason| ConfigError::InvalidStrokeStyle {
                name: "extension_style",
                reason,
            })
    }

    /// Get the cap of every annotation line.
    pub fn line_cap(&self) -> Result<StrokeCap, ConfigError> {
        self.line_cap
            .parse()
            .map_err(|reason| ConfigError::InvalidStrokeStyle {
                name: "line_cap",
                reason,
            })
    }

    /// Get the background color from configuration
    /// Returns None if no background color is configured
    pub fn background_color(&self) -> Result<Option<Color>, ConfigError> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|reason| ConfigError::InvalidColor {
                name: "background_color",
                reason,
            })
    }

    pub fn with_terminator(mut self, terminator: TerminatorStyle) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_range("leader_width", self.leader_width, 0.0, 100.0)?;
        check_range("extension_width", self.extension_width, 0.0, 100.0)?;
        self.extension_style()?;
        self.line_cap()?;
        self.background_color()?;
        Ok(())
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        let options = &config.options;

        assert!(!options.perpendicular);
        assert!(options.hide);
        assert!(options.use_document_units);
        assert_eq!(options.font_size, 10);
        assert!(options.show_unit);
        assert_eq!(options.annotation_distance, 10.0);
        assert_eq!(options.precision, 2);
        assert_eq!(options.x_offset, 50.0);
        assert_eq!(options.y_offset, 50.0);
        assert_eq!(
            options.line_color.to_color().unwrap(),
            Color::from_rgba32(0xFFA500FF)
        );
        assert_eq!(config.style.terminator(), TerminatorStyle::Tick);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_option_names() {
        let config: AppConfig = toml::from_str(
            r#"
            [options]
            perp = true
            useUU = false
            fontsize = 14
            annotunit = false
            distannot = 30.5
            xoffset = -20.0
            yoffset = 0.0
            linecolor = 0x0000FFFF
            "#,
        )
        .unwrap();

        let options = &config.options;
        assert!(options.perpendicular);
        assert!(!options.use_document_units);
        assert_eq!(options.font_size, 14);
        assert!(!options.show_unit);
        assert_eq!(options.annotation_distance, 30.5);
        assert_eq!(options.x_offset, -20.0);
        assert_eq!(options.line_color, LineColor::Packed(0x0000FFFF));
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [layout]
            parallel = true

            [style]
            extension_style = "dashed"
            line_cap = "round"
            "#,
        )
        .unwrap();

        assert!(config.layout.parallel);
        assert_eq!(config.layout.extension_overshoot, 4.0);
        assert_eq!(config.style.extension_style(), Ok(StrokeStyle::Dashed));
        assert_eq!(config.style.line_cap(), Ok(StrokeCap::Round));
        assert_eq!(config.style.leader_width(), 1.0);
        assert_eq!(config.options, OptionsConfig::default());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut config = AppConfig::default();
        config.options.precision = 25;
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                name: "precision",
                value: 25.0,
                min: 1.0,
                max: 24.0
            })
        );

        let mut config = AppConfig::default();
        config.options.annotation_distance = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                name: "annotation_distance",
                ..
            })
        ));

        let mut config = AppConfig::default();
        config.options.y_offset = -10000.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.options.font_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_colors_and_styles() {
        let mut config = AppConfig::default();
        config.options.line_color = LineColor::Css("not-a-color".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidColor { name: "line_color", .. })
        ));

        let config = AppConfig {
            style: StyleConfig::default().with_background_color("nope"),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidColor {
                name: "background_color",
                ..
            })
        ));

        let config: AppConfig = toml::from_str("[style]\nextension_style = \"wavy\"").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStrokeStyle { .. })
        ));

        let config: AppConfig = toml::from_str("[style]\nline_cap = \"pointy\"").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStrokeStyle {
                name: "line_cap",
                ..
            })
        ));
    }

    #[test]
    fn test_line_color_from_str() {
        assert_eq!(
            "0xFF0000FF".parse::<LineColor>(),
            Ok(LineColor::Packed(0xFF0000FF))
        );
        assert_eq!(
            "teal".parse::<LineColor>(),
            Ok(LineColor::Css("teal".to_string()))
        );
        assert!("0xZZ".parse::<LineColor>().is_err());
        assert!("not-a-color".parse::<LineColor>().is_err());
    }
}
