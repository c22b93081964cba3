//! Scene files: a minimal host document stored as TOML.
//!
//! A scene lists the selected elements of a drawing together with the
//! document's unit system. It is the one place where document state is
//! mutated: annotations are inserted and source elements hidden through
//! its [`HostDocument`] implementation.
//!
//! # Format
//!
//! ```toml
//! [document]
//! unit = "mm"
//! scale = 0.264583   # document units per px
//!
//! [[element]]
//! id = "plate"
//! kind = "rect"
//! x = 10.0
//! y = 10.0
//! width = 100.0
//! height = 50.0
//!
//! [[element]]
//! id = "edge"
//! kind = "path"
//! d = "M 0 0 L 10 0 L 10 10"
//! ```
//!
//! Elements without an `id` are named after their position. Kinds other
//! than `rect` and `path` load fine and are skipped during annotation.

use std::{collections::HashSet, fs, ops::Range, path::Path, str::FromStr};

use log::{debug, info};
use serde::Deserialize;
use toml::Spanned;

use calliper_core::{
    draw::RenderedAnnotation,
    element::RawElement,
    geometry::{Bounds, Point, Size},
    identifier::{ANONYMOUS_PREFIX, SourceId},
};
use calliper_parser::{ParseError, parse_path_data};

use crate::{
    error::CalliperError,
    host::{DocumentUnits, HostDocument},
};

#[derive(Debug, Deserialize)]
struct SceneFile {
    #[serde(default)]
    document: DocumentSection,
    #[serde(default)]
    element: Vec<ElementEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DocumentSection {
    unit: String,
    scale: f64,
}

impl Default for DocumentSection {
    fn default() -> Self {
        Self {
            unit: "px".to_string(),
            scale: 1.0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ElementEntry {
    id: Option<String>,
    kind: String,
    x: Option<f64>,
    y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    d: Option<Spanned<String>>,
    #[serde(default)]
    stroke_width: f64,
}

/// A drawing with a selection to annotate.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    units: DocumentUnits,
    selection: Vec<RawElement>,
    path_data: Vec<Option<String>>,
    annotations: Vec<RenderedAnnotation>,
    hidden: HashSet<SourceId>,
}

impl Scene {
    /// Creates a scene from elements built in code.
    ///
    /// # Errors
    ///
    /// Returns [`CalliperError::Scene`] if two elements share an id.
    pub fn new(units: DocumentUnits, selection: Vec<RawElement>) -> Result<Self, CalliperError> {
        check_unique_ids(&selection)?;
        let path_data = vec![None; selection.len()];
        Ok(Self {
            units,
            selection,
            path_data,
            ..Self::default()
        })
    }

    /// Reads and parses a scene file.
    ///
    /// # Errors
    ///
    /// Returns [`CalliperError::Io`] if the file cannot be read, otherwise
    /// the errors of [`Scene::from_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CalliperError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading scene");
        let source = fs::read_to_string(path)?;
        source.parse()
    }

    /// Annotations inserted so far, in insertion order.
    pub fn annotations(&self) -> &[RenderedAnnotation] {
        &self.annotations
    }

    pub fn is_hidden(&self, source: SourceId) -> bool {
        self.hidden.contains(&source)
    }

    /// The original path data of the element at `index`, for path elements
    /// loaded from a scene file.
    pub fn path_data(&self, index: usize) -> Option<&str> {
        self.path_data.get(index)?.as_deref()
    }
}

impl FromStr for Scene {
    type Err = CalliperError;

    /// Parses scene TOML.
    ///
    /// Path data is parsed for every element before reporting, so a file
    /// with several malformed `d` attributes yields all their diagnostics in
    /// one [`CalliperError::Parse`], with spans relative to `source`.
    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let file: SceneFile =
            toml::from_str(source).map_err(|err| CalliperError::Scene(err.to_string()))?;

        let units = DocumentUnits::new(file.document.unit, file.document.scale)?;

        let mut selection = Vec::with_capacity(file.element.len());
        let mut path_data = Vec::with_capacity(file.element.len());
        let mut diagnostics = Vec::new();

        for (index, entry) in file.element.into_iter().enumerate() {
            let id = match &entry.id {
                Some(id) if id.starts_with(ANONYMOUS_PREFIX) => {
                    return Err(CalliperError::Scene(format!(
                        "element id `{id}` uses the reserved prefix `{ANONYMOUS_PREFIX}`"
                    )));
                }
                Some(id) => SourceId::new(id),
                None => SourceId::from_index(index),
            };

            match entry.kind.as_str() {
                "rect" => {
                    selection.push(rect_element(id, &entry)?);
                    path_data.push(None);
                }
                "path" => {
                    let Some(d) = entry.d else {
                        return Err(CalliperError::Scene(format!(
                            "path `{id}` has no `d` attribute"
                        )));
                    };
                    let offset = content_offset(source, d.span(), d.get_ref());
                    let geometry = match parse_path_data(d.get_ref()) {
                        Ok(geometry) => geometry,
                        Err(err) => {
                            diagnostics.extend(err.shifted(offset).diagnostics().iter().cloned());
                            Default::default()
                        }
                    };
                    selection.push(RawElement::Path {
                        id,
                        geometry,
                        stroke_width: entry.stroke_width,
                    });
                    path_data.push(Some(d.into_inner()));
                }
                other => {
                    selection.push(RawElement::Other {
                        id,
                        kind: other.to_string(),
                    });
                    path_data.push(None);
                }
            }
        }

        check_unique_ids(&selection)?;

        if !diagnostics.is_empty() {
            return Err(CalliperError::new_parse_error(
                ParseError::new(diagnostics),
                source,
            ));
        }

        debug!(
            unit = units.name(),
            scale = units.scale(),
            elements = selection.len();
            "Scene parsed"
        );
        Ok(Self {
            units,
            selection,
            path_data,
            ..Self::default()
        })
    }
}

impl HostDocument for Scene {
    fn units(&self) -> &DocumentUnits {
        &self.units
    }

    fn selection(&self) -> &[RawElement] {
        &self.selection
    }

    fn insert_annotation(&mut self, annotation: RenderedAnnotation) {
        self.annotations.push(annotation);
    }

    fn hide(&mut self, source: SourceId) {
        self.hidden.insert(source);
    }
}

/// Hiding is keyed by id, so a shared id would hide every element carrying it.
fn check_unique_ids(selection: &[RawElement]) -> Result<(), CalliperError> {
    let mut seen = HashSet::with_capacity(selection.len());
    for element in selection {
        if !seen.insert(element.id()) {
            return Err(CalliperError::Scene(format!(
                "element id `{}` is used more than once",
                element.id()
            )));
        }
    }
    Ok(())
}

fn rect_element(id: SourceId, entry: &ElementEntry) -> Result<RawElement, CalliperError> {
    let (Some(x), Some(y), Some(width), Some(height)) =
        (entry.x, entry.y, entry.width, entry.height)
    else {
        return Err(CalliperError::Scene(format!(
            "rect `{id}` needs `x`, `y`, `width` and `height`"
        )));
    };
    if width < 0.0 || height < 0.0 {
        return Err(CalliperError::Scene(format!(
            "rect `{id}` has a negative size"
        )));
    }

    Ok(RawElement::Rect {
        id,
        bounds: Bounds::new_from_top_left(Point::new(x, y), Size::new(width, height)),
        stroke_width: entry.stroke_width,
    })
}

/// Byte offset of a string value's content within the TOML source.
///
/// `span` covers the whole value including its quotes. Values whose raw
/// text differs from their content (escapes) map to the opening quote.
fn content_offset(source: &str, span: Range<usize>, value: &str) -> usize {
    let Some(raw) = source.get(span.clone()) else {
        return span.start;
    };
    ["\"\"\"", "'''", "\"", "'"]
        .into_iter()
        .find(|quote| {
            raw.strip_prefix(quote)
                .is_some_and(|rest| rest.starts_with(value))
        })
        .map_or(span.start, |quote| span.start + quote.len())
}
