//! SVG rendering of annotated scenes.
//!
//! The document holds one `sources` group with the selected elements, hidden
//! ones kept with `display="none"`, followed by one `dimension` group per
//! annotation. Dimension groups are layered bottom to top: extension lines,
//! leaders, terminators, text. The view box covers all content plus a fixed
//! padding.

use std::path::Path;

use log::{debug, info};
use svg::{Document, node::element as svg_element};

use calliper_core::{
    draw::{Drawable, SvgNode},
    element::{PathGeometry, RawElement},
    geometry::{Bounds, Insets},
};

use super::ExportError;
use crate::{config::StyleConfig, host::HostDocument, scene::Scene};

/// Space around the content, in px.
const PADDING: f64 = 20.0;

const SOURCE_STROKE: &str = "black";

/// Renders a scene to an SVG string.
///
/// # Errors
///
/// Returns [`ExportError::Render`] for an invalid background color or
/// content with non-finite coordinates.
pub fn render(scene: &Scene, style: &StyleConfig) -> Result<String, ExportError> {
    let document = build_document(scene, style)?;
    Ok(document.to_string())
}

/// Renders a scene and writes it to `path`.
///
/// # Errors
///
/// As [`render`], plus [`ExportError::Io`] when writing fails.
pub fn save(path: impl AsRef<Path>, scene: &Scene, style: &StyleConfig) -> Result<(), ExportError> {
    let path = path.as_ref();
    let document = build_document(scene, style)?;
    svg::save(path, &document)?;
    info!(path = path.display().to_string(); "SVG written");
    Ok(())
}

fn build_document(scene: &Scene, style: &StyleConfig) -> Result<Document, ExportError> {
    let background = style
        .background_color()
        .map_err(|err| ExportError::Render(err.to_string()))?;

    let bounds = content_bounds(scene)
        .unwrap_or_default()
        .add_padding(Insets::uniform(PADDING));
    let corners = [bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y()];
    if !corners.iter().all(|v| v.is_finite()) {
        return Err(ExportError::Render(
            "content has non-finite coordinates".to_string(),
        ));
    }

    let mut document = Document::new()
        .set(
            "viewBox",
            format!(
                "{} {} {} {}",
                bounds.min_x(),
                bounds.min_y(),
                bounds.width(),
                bounds.height()
            ),
        )
        .set("width", bounds.width())
        .set("height", bounds.height());

    if let Some(color) = background {
        let rect = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("fill", &color)
            .set("fill-opacity", color.alpha());
        document = document.add(rect);
    }

    let mut sources = svg_element::Group::new().set("class", "sources");
    for (index, element) in scene.selection().iter().enumerate() {
        if let Some(node) = source_node(scene, index, element) {
            sources = sources.add(node);
        }
    }
    document = document.add(sources);

    for annotation in scene.annotations() {
        let source = annotation.source();
        let mut group = svg_element::Group::new()
            .set("class", "dimension")
            .set("id", source.derive("dimension").to_string())
            .set("data-source", source.to_string());
        for node in annotation.render_to_layers().render() {
            group = group.add(node);
        }
        document = document.add(group);
    }

    debug!(
        sources = scene.selection().len(),
        dimensions = scene.annotations().len();
        "SVG document built"
    );
    Ok(document)
}

/// Bounds of every source element and annotation, `None` for an empty scene.
fn content_bounds(scene: &Scene) -> Option<Bounds> {
    let sources = scene.selection().iter().filter_map(|element| match element {
        RawElement::Rect { bounds, .. } => Some(*bounds),
        RawElement::Path { geometry, .. } => Bounds::from_points(geometry.points()),
        RawElement::Other { .. } => None,
    });
    let annotations = scene.annotations().iter().filter_map(Drawable::bounds);

    sources
        .chain(annotations)
        .reduce(|acc, bounds| acc.merge(&bounds))
}

/// Renders one source element, `None` for elements with no geometry.
fn source_node(scene: &Scene, index: usize, element: &RawElement) -> Option<SvgNode> {
    let shape: SvgNode = match element {
        RawElement::Rect { bounds, .. } => Box::new(
            svg_element::Rectangle::new()
                .set("x", bounds.min_x())
                .set("y", bounds.min_y())
                .set("width", bounds.width())
                .set("height", bounds.height()),
        ),
        RawElement::Path { geometry, .. } => {
            let data = scene
                .path_data(index)
                .map_or_else(|| polyline_data(geometry), str::to_string);
            Box::new(svg_element::Path::new().set("d", data))
        }
        RawElement::Other { .. } => return None,
    };

    let stroke_width = match element.stroke_width() {
        width if width > 0.0 => width,
        _ => 1.0,
    };
    let mut group = svg_element::Group::new()
        .set("data-source", element.id().to_string())
        .set("fill", "none")
        .set("stroke", SOURCE_STROKE)
        .set("stroke-width", stroke_width);
    if scene.is_hidden(element.id()) {
        group = group.set("display", "none");
    }
    Some(Box::new(group.add(shape)))
}

/// Straight-line path data through every anchor.
fn polyline_data(geometry: &PathGeometry) -> String {
    let mut parts = Vec::new();
    for subpath in geometry.subpaths() {
        for (i, anchor) in subpath.anchors().iter().enumerate() {
            let command = if i == 0 { 'M' } else { 'L' };
            let point = anchor.point();
            parts.push(format!("{command} {} {}", point.x(), point.y()));
        }
        if subpath.is_closed() {
            parts.push("Z".to_string());
        }
    }
    parts.join(" ")
}
