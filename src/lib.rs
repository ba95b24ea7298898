//! # ImposeKit
//!
//! An imposition layout editor core for print production: place, snap,
//! group, space, and step & repeat job slots on a press sheet, with full
//! undo/redo and a normalizing JSON file format.
//!
//! ## Architecture
//!
//! ImposeKit is organized as a workspace with multiple crates:
//!
//! 1. **imposekit-core** - Geometry, units, and error types
//! 2. **imposekit-editor** - Layout model, engines, editor state, file I/O
//! 3. **imposekit** - Main binary that ties the crates together

pub use imposekit_core::{
    render_box, Error, LayoutError, Point, Rect, Result, Rotation, ServiceError,
};

pub use imposekit_editor::{
    apply_alignment, apply_snap, apply_spacing, clamp_set_correction, clamp_to_sheet, Alignment,
    Design, EditorCommand,
    EditorState, Face, Layout, LayoutFile, Margins, ResizeHandle, Selection, Sheet, SheetViewport,
    Slot, SlotEdit, SlotId, SnapSettings, SpacingMode, SpacingSettings, StepRepeatParams, Work,
    FILE_FORMAT_VERSION, HISTORY_CAPACITY, MIN_SLOT_SIZE_MM,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
