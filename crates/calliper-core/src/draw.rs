//! Drawable primitives for dimension annotations.
//!
//! Everything the engine hands back to a host document is built from the
//! types in this module: stroked [`AnnotationLine`]s, text [`Label`]s and the
//! [`RenderedAnnotation`] aggregating them for one source element.
//!
//! # Layer-Based Rendering
//!
//! Drawables render to one or more [`RenderLayer`]s, which are ordered during
//! final SVG generation so labels always sit on top of the lines they
//! describe.
mod annotation;
mod layer;
mod stroke;

pub use annotation::{AnnotationLine, Baseline, Label, LineRole, RenderedAnnotation};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use stroke::{StrokeCap, StrokeDefinition, StrokeStyle};

use crate::geometry::Bounds;

/// Trait for annotation parts that can be rendered to SVG layers.
///
/// Annotation geometry is absolute (document px), so unlike a layout-driven
/// drawable no position is passed in.
pub trait Drawable: std::fmt::Debug {
    /// Renders this drawable into layered SVG nodes.
    fn render_to_layers(&self) -> LayeredOutput;

    /// Returns the area covered by this drawable, or `None` when it draws nothing.
    fn bounds(&self) -> Option<Bounds>;
}
