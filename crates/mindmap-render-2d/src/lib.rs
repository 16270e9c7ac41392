//! Connector geometry and draw commands for laid-out mind maps.
//!
//! Nothing here talks to a windowing toolkit. [`build_scene`] turns a map and
//! its [`LayoutEngine`](mindmap_layout::LayoutEngine) results into
//! [`RenderCommand`]s; hosts draw text and images themselves and can feed the
//! rest through the lyon-based [`Tessellator`].
//!
//! # Example
//!
//! ```
//! use glam::DVec2;
//! use mindmap_render_2d::{rect_edge_point, tapered_bezier};
//!
//! let exit = rect_edge_point(DVec2::ZERO, DVec2::new(10.0, 5.0), DVec2::new(1.0, 1.0));
//! assert_eq!(exit, DVec2::new(5.0, 5.0));
//!
//! let curve = tapered_bezier(exit, DVec2::new(120.0, 40.0), 8.0, 2.0, 30);
//! assert_eq!(curve.points.len(), 31);
//! ```

mod connectors;
mod curves;
mod decorations;
mod geometry;
mod options;
pub mod scene;
mod shapes;

pub use connectors::{connection_points, move_shadow, reference_curve, Connector, MoveShadow, ReferenceCurve};
pub use curves::{cubic_bezier_points, tapered_bezier, tapered_controls, TaperedCurve};
pub use decorations::{branch_color, collapse_icon, highlight, root_frame, underline, CollapseGlyph, CollapseIcon};
pub use geometry::rect_edge_point;
pub use options::RenderOptions;
pub use scene::{build_scene, RenderCommand, Scene, TextRun};
pub use shapes::{Mesh, Tessellator, Vertex};
