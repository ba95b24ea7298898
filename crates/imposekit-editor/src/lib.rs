//! # ImposeKit Editor
//!
//! The interactive core of the imposition layout editor: a scene graph of
//! sheets, faces, slots, works, and designs, plus the engines that operate
//! on it.
//!
//! ## Core Components
//!
//! ### Model
//! - **Layout**: Sheet, faces, slots, works, designs, and settings
//! - **Selection**: Ordered id set with a primary slot
//! - **Viewport**: Pixel/mm transform with fit-to-sheet and zoom
//!
//! ### Engines
//! - **Snap**: Ordered-rule snapping against grid, margins, and slot edges
//! - **Grouping**: Row/column clustering over rendered boxes
//! - **Spacing**: Uniform-gap re-flow and edge/center alignment
//! - **Step & Repeat**: Grid expansion of a master slot
//!
//! ### Control
//! - **EditorState**: Command dispatch, drag/resize gestures, undo/redo
//! - **History**: Linear whole-model snapshots, capped at 50
//! - **Serialization**: JSON layout files with normalization on load
//! - **Services**: Traits for persistence, engines, rendering, and upload
//!
//! ## Usage
//!
//! ```rust,ignore
//! use imposekit_editor::{EditorState, EditorCommand, Layout};
//!
//! let mut editor = EditorState::new(Layout::default());
//! editor.dispatch(EditorCommand::AddSlot {
//!     x_mm: 10.0, y_mm: 10.0, w_mm: 85.0, h_mm: 55.0,
//! })?;
//! ```

pub mod commands;
pub mod editor_state;
pub mod grouping;
pub mod history;
pub mod model;
pub mod selection;
pub mod serialization;
pub mod services;
pub mod snap;
pub mod spacing;
pub mod step_repeat;
pub mod viewport;

pub use commands::{EditorCommand, SlotEdit};
pub use editor_state::{EditorState, ResizeHandle, MIN_SLOT_SIZE_MM};
pub use grouping::{group_by_column, group_by_row, Cluster};
pub use history::{History, Snapshot, HISTORY_CAPACITY};
pub use model::{
    Design, Face, Layout, Margins, Sheet, Slot, SlotId, SnapSettings, SpacingSettings, Work,
};
pub use selection::Selection;
pub use serialization::{DesignData, LayoutFile, SlotData, WorkData, FILE_FORMAT_VERSION};
pub use services::{
    AssetUrl, EngineRequest, LayoutEngine, PersistenceEndpoint, RenderService, UploadEndpoint,
    UploadFile,
};
pub use snap::{apply_snap, clamp_set_correction, clamp_to_sheet, SnapRule, SNAP_RULE_ORDER};
pub use spacing::{apply_alignment, apply_spacing, Alignment, SpacingMode};
pub use step_repeat::{
    generate as step_repeat_generate, DesignAssign, GroupMode, PlacementMode, RotationMode,
    StepRepeatParams,
};
pub use viewport::SheetViewport;
