//! Configuration file loading for the CLI
//!
//! Search order:
//! 1. Explicit path if provided
//! 2. Local project directory (`calliper/config.toml`)
//! 3. Platform-specific config directory
//! 4. Default config if none found

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use calliper::{CalliperError, config::AppConfig};

/// Problems with the configuration file itself.
///
/// Out-of-range values are reported later, as [`CalliperError::Config`],
/// once command-line overrides have been applied.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigFileError> for CalliperError {
    fn from(err: ConfigFileError) -> Self {
        CalliperError::Io(io::Error::other(err.to_string()))
    }
}

/// Find and load configuration.
///
/// # Errors
///
/// Returns an error if an explicit path does not exist or if the
/// configuration file found cannot be read or parsed.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, CalliperError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("calliper/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("rs", "calliper", "calliper") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, CalliperError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigFileError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<AppConfig, CalliperError> {
    let config: AppConfig =
        toml::from_str(content).map_err(|e| ConfigFileError::Parse(e.to_string()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calliper::config::{LineColor, TerminatorStyle};

    #[test]
    fn test_parse_short_option_names() {
        let config = parse_config(
            r#"
[options]
perp = true
useUU = false
fontsize = 14
annotunit = false
distannot = 25.0
xoffset = -5.0
linecolor = 0x000000ff

[style]
terminator = "arrow"
"#,
        )
        .unwrap();

        let options = &config.options;
        assert!(options.perpendicular);
        assert!(!options.use_document_units);
        assert_eq!(options.font_size, 14);
        assert!(!options.show_unit);
        assert_eq!(options.annotation_distance, 25.0);
        assert_eq!(options.x_offset, -5.0);
        assert_eq!(options.y_offset, 50.0);
        assert_eq!(options.line_color, LineColor::Packed(0x000000ff));
        assert_eq!(config.style.terminator(), TerminatorStyle::Arrow);
    }

    #[test]
    fn test_invalid_toml() {
        let result = parse_config("[options\nperp = true");
        assert!(matches!(result, Err(CalliperError::Io(_))));
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = load_config(Some("does/not/exist.toml"));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Missing configuration file"));
    }
}
