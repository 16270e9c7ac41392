//! Layout computation for mind maps.
//!
//! This crate measures every visible topic and assigns it a center point.
//!
//! # Architecture
//!
//! 1. **Measurement**: [`SizeCalculator`] wraps a topic's styled text and adds
//!    its image, caching the result per node until text, font or image change
//! 2. **Subtree heights**: post-order accumulation of the vertical room each
//!    topic and its expanded descendants need
//! 3. **Placement**: root children are split into a right and a left column
//!    by angle; deeper topics hang off their parent's outer edge
//!
//! Results land in a [`LayoutGeometry`] side-table keyed by node id.
//!
//! # Example
//!
//! ```
//! use mindmap_core::MindMap;
//! use mindmap_layout::LayoutEngine;
//! use mindmap_text::{FontDescriptor, MonospaceMeasurer};
//!
//! let mut map = MindMap::new("Root");
//! let child = map.add_child(map.root(), "Child").unwrap();
//!
//! let mut engine = LayoutEngine::new(MonospaceMeasurer::new(8.0, 16.0));
//! engine.apply_layout(&mut map, &FontDescriptor::default(), 0.0, 0.0);
//!
//! let placed = engine.geometry().get(child).unwrap();
//! assert!(placed.x > 0.0);
//! ```

mod angles;
mod engine;
mod geometry;
mod options;
mod size;

pub use angles::{column_order, compute_root_child_angles};
pub use engine::LayoutEngine;
pub use geometry::{Bounds, LayoutGeometry, NodeGeometry};
pub use options::{LayoutOptions, MeasureOptions};
pub use size::{NodeSize, SizeCalculator};
