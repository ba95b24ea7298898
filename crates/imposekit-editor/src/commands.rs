//! Editor commands: the discrete, undoable operations on a layout.
//!
//! Commands are plain data; `EditorState::dispatch` validates and applies
//! them, recording one history snapshot per command. Continuous gestures
//! (drag, resize) do not go through here - they have begin/update/end
//! methods on `EditorState` and commit a single snapshot on end.

use imposekit_core::geometry::Rotation;

use crate::model::{Design, Face, Margins, SnapSettings, SpacingSettings, Work};
use crate::spacing::{Alignment, SpacingMode};
use crate::step_repeat::StepRepeatParams;

/// A partial slot update; `None` fields are left unchanged. The nested
/// options distinguish "leave alone" from "clear the reference".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotEdit {
    pub x_mm: Option<f64>,
    pub y_mm: Option<f64>,
    pub w_mm: Option<f64>,
    pub h_mm: Option<f64>,
    pub rotation: Option<Rotation>,
    pub bleed_mm: Option<f64>,
    pub crop_marks: Option<bool>,
    pub locked: Option<bool>,
    pub work_id: Option<Option<String>>,
    pub design_ref: Option<Option<String>>,
}

/// Every discrete, undoable edit.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// Adds a bare slot on the active face.
    AddSlot {
        x_mm: f64,
        y_mm: f64,
        w_mm: f64,
        h_mm: f64,
    },
    /// Adds a slot sized from a work's final size, referencing it.
    AddSlotForWork {
        work_id: String,
        x_mm: f64,
        y_mm: f64,
    },
    DeleteSelection,
    DuplicateSelection {
        dx_mm: f64,
        dy_mm: f64,
    },
    SetActiveFace(Face),
    /// Copies the active face's slots onto another face, replacing it.
    DuplicateFace {
        to: Face,
    },
    GroupSelection,
    UngroupSelection,
    ApplySpacing(SpacingMode),
    Align(Alignment),
    StepRepeat {
        params: StepRepeatParams,
    },
    EditSlot {
        id: crate::model::SlotId,
        edit: SlotEdit,
    },
    SetSheetSize {
        width_mm: f64,
        height_mm: f64,
    },
    SetMargins(Margins),
    SetSnapSettings(SnapSettings),
    SetSpacingSettings(SpacingSettings),
    UpsertWork(Work),
    RemoveWork {
        id: String,
    },
    UpsertDesign(Design),
    RemoveDesign {
        design_ref: String,
    },
}

impl EditorCommand {
    /// Short label for logging and UI.
    pub fn name(&self) -> &'static str {
        match self {
            EditorCommand::AddSlot { .. } => "Add Slot",
            EditorCommand::AddSlotForWork { .. } => "Add Slot For Work",
            EditorCommand::DeleteSelection => "Delete Selection",
            EditorCommand::DuplicateSelection { .. } => "Duplicate Selection",
            EditorCommand::SetActiveFace(_) => "Set Active Face",
            EditorCommand::DuplicateFace { .. } => "Duplicate Face",
            EditorCommand::GroupSelection => "Group Selection",
            EditorCommand::UngroupSelection => "Ungroup Selection",
            EditorCommand::ApplySpacing(_) => "Apply Spacing",
            EditorCommand::Align(_) => "Align",
            EditorCommand::StepRepeat { .. } => "Step & Repeat",
            EditorCommand::EditSlot { .. } => "Edit Slot",
            EditorCommand::SetSheetSize { .. } => "Set Sheet Size",
            EditorCommand::SetMargins(_) => "Set Margins",
            EditorCommand::SetSnapSettings(_) => "Set Snap Settings",
            EditorCommand::SetSpacingSettings(_) => "Set Spacing Settings",
            EditorCommand::UpsertWork(_) => "Upsert Work",
            EditorCommand::RemoveWork { .. } => "Remove Work",
            EditorCommand::UpsertDesign(_) => "Upsert Design",
            EditorCommand::RemoveDesign { .. } => "Remove Design",
        }
    }
}
