//! Topic measurement with a per-node result cache.

use std::collections::HashMap;

use mindmap_core::{ImagePayload, Node, NodeId};
use mindmap_text::{FontDescriptor, MarkupParser, StyleMetrics, TextMeasurer, TextWrapper, WrappedLine};
use tracing::trace;

use crate::options::MeasureOptions;

/// Measured width and height of a topic.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeSize {
    pub width: f64,
    pub height: f64,
}

impl NodeSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f64 {
        self.height / 2.0
    }
}

/// Everything a cached size depends on. Positions are not part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SizeKey {
    text: String,
    font: FontDescriptor,
    max_width: u64,
    image_hash: Option<String>,
}

impl SizeKey {
    fn new(node: &Node, font: &FontDescriptor, max_width: f64) -> Self {
        Self {
            text: node.text.clone(),
            font: font.clone(),
            max_width: max_width.to_bits(),
            image_hash: node.image.as_ref().map(ImagePayload::content_hash),
        }
    }
}

/// Computes topic sizes from wrapped text and images.
///
/// Results are cached per node and reused until the node's text, the font,
/// the wrapping width or the image content changes.
pub struct SizeCalculator<M: TextMeasurer> {
    measurer: M,
    options: MeasureOptions,
    cache: HashMap<NodeId, (SizeKey, NodeSize)>,
}

impl<M: TextMeasurer> SizeCalculator<M> {
    pub fn new(measurer: M) -> Self {
        Self::with_options(measurer, MeasureOptions::default())
    }

    pub fn with_options(measurer: M, options: MeasureOptions) -> Self {
        Self {
            measurer,
            options,
            cache: HashMap::new(),
        }
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    pub fn options(&self) -> &MeasureOptions {
        &self.options
    }

    /// Replace the options. Every cached size is dropped.
    pub fn set_options(&mut self, options: MeasureOptions) {
        self.options = options;
        self.cache.clear();
    }

    /// Size of `node` wrapped at the configured maximum width.
    pub fn measure(&mut self, node: &Node, font: &FontDescriptor) -> NodeSize {
        let max_width = self.options.max_width;
        self.measure_with_width(node, font, max_width)
    }

    /// Size of `node` wrapped at `max_width`, served from the cache when
    /// nothing it depends on has changed.
    pub fn measure_with_width(&mut self, node: &Node, font: &FontDescriptor, max_width: f64) -> NodeSize {
        let key = SizeKey::new(node, font, max_width);
        if let Some((cached_key, size)) = self.cache.get(&node.id) {
            if *cached_key == key {
                trace!(node = %node.id, "size cache hit");
                return *size;
            }
        }

        trace!(node = %node.id, "size cache miss");
        let size = self.measure_text(&node.text, node.image.as_ref(), font, max_width);
        self.cache.insert(node.id, (key, size));
        size
    }

    /// Uncached measurement of arbitrary text and an optional image.
    pub fn measure_text(
        &self,
        text: &str,
        image: Option<&ImagePayload>,
        font: &FontDescriptor,
        max_width: f64,
    ) -> NodeSize {
        let opts = &self.options;
        let lines = self.wrap(text, font, max_width);
        let mut metrics = StyleMetrics::new(&self.measurer, font);

        let mut text_width: f64 = 0.0;
        let mut text_height = 0.0;
        for line in &lines {
            if line.is_empty() {
                text_height += font.size + opts.empty_line_extra;
                continue;
            }
            let mut line_width = 0.0;
            let mut line_height: f64 = 0.0;
            for run in line.runs() {
                let extent = metrics.extent(&run.text, run.bold, run.italic);
                line_width += extent.width;
                line_height = line_height.max(extent.line_height);
            }
            text_width = text_width.max(line_width);
            text_height += line_height;
        }

        let mut width = text_width + opts.horizontal_padding;
        let mut height = text_height + opts.vertical_padding;
        if let Some(image) = image {
            let (w, h) = image.display_size(opts.image_max_width, opts.image_max_height);
            width = width.max(w as f64 + opts.horizontal_padding);
            height += h as f64 + opts.image_spacing;
        }

        NodeSize::new(width.max(opts.min_width), height.max(opts.min_height))
    }

    /// Wrapped lines of `text`, as used for measurement.
    pub fn wrap(&self, text: &str, font: &FontDescriptor, max_width: f64) -> Vec<WrappedLine> {
        TextWrapper::new(&self.measurer)
            .with_parser(MarkupParser::new(self.options.default_text_color))
            .wrap(text, font, max_width)
    }

    /// The last size computed for `id`, if any.
    pub fn cached(&self, id: NodeId) -> Option<NodeSize> {
        self.cache.get(&id).map(|(_, size)| *size)
    }

    /// Forget the cached size of one node.
    pub fn invalidate(&mut self, id: NodeId) {
        self.cache.remove(&id);
    }

    /// Keep only cache entries whose node satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.cache.retain(|id, _| keep(*id));
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}
