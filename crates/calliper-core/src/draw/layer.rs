//! Layer-based rendering for SVG output.
//!
//! # Overview
//!
//! - [`RenderLayer`]: the rendering layers of one dimension group, bottom to top
//! - [`LayeredOutput`]: collects SVG nodes by layer
//!
//! # Example
//!
//! ```
//! # use calliper_core::draw::{LayeredOutput, RenderLayer};
//! # use svg::node::element::{Line, Text};
//! let mut output = LayeredOutput::new();
//!
//! output.add_to_layer(RenderLayer::Text, Box::new(Text::new("100")));
//! output.add_to_layer(RenderLayer::Extension, Box::new(Line::new()));
//!
//! // Extension lines render before text
//! let groups = output.render();
//! assert_eq!(groups.len(), 2);
//! ```

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers of a dimension annotation.
///
/// The `Ord` derive uses declaration order: the first variant renders first (bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Extension lines connecting the shape to the leader
    Extension,
    /// Leader lines carrying the measured extent
    Leader,
    /// Ticks and arrowheads at leader ends
    Terminator,
    /// Measurement labels
    Text,
}

impl RenderLayer {
    /// Returns the name written to the `data-layer` attribute.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::Leader => "leader",
            Self::Terminator => "terminator",
            Self::Text => "text",
        }
    }
}

/// SVG nodes grouped by rendering layer.
///
/// When rendered, nodes are emitted in layer order (bottom to top); nodes
/// sharing a layer keep their insertion order.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    /// Creates a new empty `LayeredOutput`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single node to the specified layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Merges all layers from another `LayeredOutput` into this one.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    /// Returns `true` if there are no nodes in any layer.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the distinct layers holding at least one node, in render order.
    pub fn layers(&self) -> Vec<RenderLayer> {
        let mut layers: Vec<RenderLayer> = self.items.iter().map(|(layer, _)| *layer).collect();
        layers.sort();
        layers.dedup();
        layers
    }

    /// Renders all layers to SVG groups, consuming the output.
    ///
    /// Each non-empty layer becomes a `<g data-layer="...">` element.
    pub fn render(mut self) -> Vec<SvgNode> {
        if self.is_empty() {
            return Vec::new();
        }

        // Stable sort keeps insertion order within a layer
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current_layer = self.items[0].0;
        let mut current_group = svg_element::Group::new().set("data-layer", current_layer.name());

        for (layer, node) in self.items {
            if layer != current_layer {
                result.push(Box::new(current_group) as SvgNode);

                current_layer = layer;
                current_group = svg_element::Group::new().set("data-layer", layer.name());
            }

            current_group = current_group.add(node);
        }

        result.push(Box::new(current_group) as SvgNode);

        result
    }
}
