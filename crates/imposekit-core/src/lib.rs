//! # ImposeKit Core
//!
//! Core types and utilities shared by the ImposeKit crates.
//! Provides the geometric primitives the layout editor is built on
//! (millimeter-space points, rectangles, quarter-turn rotations),
//! unit conversion helpers, and the common error types.

pub mod error;
pub mod geometry;
pub mod units;

pub use error::{Error, LayoutError, Result, ServiceError};
pub use geometry::{render_box, Point, Rect, Rotation};
pub use units::{format_mm, mm_to_pt, mm_to_px, pt_to_mm, px_to_mm, MM_PER_INCH, PT_PER_INCH};
