//! The boundary between the annotation engine and the document it reads
//! from and writes to.
//!
//! The engine itself never mutates a document. It reads the selection and
//! unit information through [`HostDocument`] and hands back owned
//! annotations; inserting them and hiding source elements is the host's job.

use calliper_core::{draw::RenderedAnnotation, element::RawElement, identifier::SourceId};

use crate::error::ConfigError;

/// The unit system of a host document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentUnits {
    name: String,
    scale: f64,
}

impl DocumentUnits {
    /// Creates a unit system.
    ///
    /// # Arguments
    ///
    /// * `name` - Unit name appended to labels, e.g. `mm`.
    /// * `scale` - Document units per px.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidScale`] unless `scale` is positive and finite.
    pub fn new(name: impl Into<String>, scale: f64) -> Result<Self, ConfigError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::InvalidScale(scale));
        }
        Ok(Self {
            name: name.into(),
            scale,
        })
    }

    /// Plain px units with a scale of one.
    pub fn px() -> Self {
        Self {
            name: "px".to_string(),
            scale: 1.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Document units per px.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Converts a length given in document units to px.
    pub fn to_px(&self, length: f64) -> f64 {
        length / self.scale
    }
}

impl Default for DocumentUnits {
    fn default() -> Self {
        Self::px()
    }
}

/// A document that can be annotated.
pub trait HostDocument {
    /// The document's unit system.
    fn units(&self) -> &DocumentUnits;

    /// Elements selected for annotation, in selection order.
    fn selection(&self) -> &[RawElement];

    /// Takes ownership of a generated annotation.
    fn insert_annotation(&mut self, annotation: RenderedAnnotation);

    /// Marks a source element hidden.
    fn hide(&mut self, source: SourceId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_must_be_positive() {
        assert_eq!(
            DocumentUnits::new("mm", 0.0),
            Err(ConfigError::InvalidScale(0.0))
        );
        assert!(DocumentUnits::new("mm", -1.0).is_err());
        assert!(DocumentUnits::new("mm", f64::NAN).is_err());
    }

    #[test]
    fn test_to_px() {
        let units = DocumentUnits::new("mm", 0.25).unwrap();
        assert_eq!(units.to_px(10.0), 40.0);
        assert_eq!(DocumentUnits::px().to_px(10.0), 10.0);
    }
}
