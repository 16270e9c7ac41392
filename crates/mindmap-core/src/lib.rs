//! Core types, tree model, and errors for the mind-map layout engine.
//!
//! This crate provides the foundational types used across the other crates:
//! - The arena-backed [`MindMap`] tree with its non-tree references
//! - Value types (ids, colors, side assignment, image payloads)
//! - Error types

pub mod errors;
pub mod image;
pub mod tree;
pub mod types;

pub use errors::*;
pub use image::*;
pub use tree::*;
pub use types::*;
