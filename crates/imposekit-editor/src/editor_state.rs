//! Editor state manager: the single entry point UI code drives.
//!
//! Discrete edits go through [`EditorState::dispatch`], which validates,
//! mutates the layout, and records exactly one history snapshot.
//! Continuous pointer gestures (drag, resize) use begin/update/end methods
//! and commit one snapshot on end, so a 200-frame drag is one undo step.

use imposekit_core::error::LayoutError;
use imposekit_core::geometry::{Point, Rect};
use tracing::debug;
use uuid::Uuid;

use crate::commands::{EditorCommand, SlotEdit};
use crate::history::History;
use crate::model::{Layout, Slot, SlotId};
use crate::selection::Selection;
use crate::snap::{apply_snap, clamp_set_correction};
use crate::spacing::{apply_alignment, apply_spacing, SpacingMode};
use crate::step_repeat;
use crate::viewport::SheetViewport;

/// Slots cannot be resized below this on either axis.
pub const MIN_SLOT_SIZE_MM: f64 = 5.0;

/// Which resize handle the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
    Left,
    Right,
    Bottom,
    Top,
}

#[derive(Debug, Clone)]
struct DragGesture {
    /// The slot whose position feeds the snap engine; every other slot in
    /// the set moves by the same snapped delta.
    reference: SlotId,
    origin: Point,
    starts: Vec<(SlotId, f64, f64)>,
}

#[derive(Debug, Clone)]
struct ResizeGesture {
    id: SlotId,
    handle: ResizeHandle,
    start: Rect,
}

#[derive(Debug, Clone)]
enum Gesture {
    Drag(DragGesture),
    Resize(ResizeGesture),
}

/// The complete editor: model, selection, history, viewport, and any
/// in-flight gesture.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub layout: Layout,
    pub selection: Selection,
    history: History,
    pub viewport: SheetViewport,
    gesture: Option<Gesture>,
    needs_redraw: bool,
}

impl EditorState {
    pub fn new(layout: Layout) -> Self {
        let selection = Selection::default();
        let history = History::new(&layout, &selection);
        let viewport = SheetViewport::new(1200.0, 800.0, &layout.sheet);
        Self {
            layout,
            selection,
            history,
            viewport,
            gesture: None,
            needs_redraw: true,
        }
    }

    /// Swaps in a whole new layout (loaded file, engine response). The
    /// previous state stays one undo step away.
    pub fn replace_layout(&mut self, layout: Layout) {
        self.layout = layout;
        self.selection.clear();
        self.viewport.fit_to_sheet(&self.layout.sheet);
        self.commit();
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn clear_redraw(&mut self) {
        self.needs_redraw = false;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.layout = snapshot.layout;
                self.selection = snapshot.selection;
                self.gesture = None;
                self.needs_redraw = true;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.layout = snapshot.layout;
                self.selection = snapshot.selection;
                self.gesture = None;
                self.needs_redraw = true;
                true
            }
            None => false,
        }
    }

    /// Click-select on the active face.
    pub fn select(&mut self, id: SlotId, multi: bool) {
        if self.layout.slot(id).is_some() {
            self.selection.select(id, multi);
            self.needs_redraw = true;
        }
    }

    /// Selects the topmost slot whose rendered box contains the point, or
    /// clears the selection on a miss.
    pub fn select_at(&mut self, mm: Point, multi: bool) {
        let face = self.layout.active_face();
        let hit = self
            .layout
            .slots_on_face(face)
            .filter(|s| s.render_box().contains(mm, 0.0))
            .last()
            .map(|s| s.id);
        match hit {
            Some(id) => self.selection.select(id, multi),
            None if !multi => self.selection.clear(),
            None => {}
        }
        self.needs_redraw = true;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.needs_redraw = true;
    }

    /// Validates and applies a discrete command, recording one snapshot.
    pub fn dispatch(&mut self, command: EditorCommand) -> Result<(), LayoutError> {
        debug!(command = command.name(), "dispatch");
        match command {
            EditorCommand::AddSlot { x_mm, y_mm, w_mm, h_mm } => {
                if w_mm <= 0.0 || h_mm <= 0.0 {
                    return Err(LayoutError::validation("Slot size must be positive"));
                }
                let face = self.layout.active_face();
                let mut slot = Slot::new(face, x_mm, y_mm, w_mm, h_mm);
                slot.bleed_mm = self.layout.sheet.default_bleed_mm;
                let id = self.layout.add_slot(slot);
                self.selection.select_only(id);
            }
            EditorCommand::AddSlotForWork { work_id, x_mm, y_mm } => {
                let work = self
                    .layout
                    .work(&work_id)
                    .ok_or_else(|| {
                        LayoutError::validation(format!("Unknown work '{}'", work_id))
                    })?
                    .clone();
                let (w, h) = work.final_size_mm;
                if w <= 0.0 || h <= 0.0 {
                    return Err(LayoutError::validation("Work has no usable final size"));
                }
                let face = self.layout.active_face();
                let mut slot = Slot::new(face, x_mm, y_mm, w, h);
                slot.work_id = Some(work.id.clone());
                slot.bleed_mm = if work.has_bleed {
                    work.default_bleed_mm
                } else {
                    0.0
                };
                let id = self.layout.add_slot(slot);
                self.selection.select_only(id);
            }
            EditorCommand::DeleteSelection => {
                if self.selection.is_empty() {
                    return Err(LayoutError::NothingSelected);
                }
                for id in self.selection.ids().to_vec() {
                    self.layout.remove_slot(id);
                }
                self.selection.clear();
            }
            EditorCommand::DuplicateSelection { dx_mm, dy_mm } => {
                if self.selection.is_empty() {
                    return Err(LayoutError::NothingSelected);
                }
                let mut copies = Vec::new();
                for id in self.selection.ids().to_vec() {
                    if let Some(copy) = self.layout.duplicate_slot(id, dx_mm, dy_mm) {
                        copies.push(copy);
                    }
                }
                self.selection.clear();
                self.selection.extend(copies);
            }
            EditorCommand::SetActiveFace(face) => {
                // Face switches are navigation, not edits: selection clears
                // and nothing lands in history.
                self.layout.set_active_face(face);
                self.selection.clear();
                self.gesture = None;
                self.needs_redraw = true;
                return Ok(());
            }
            EditorCommand::DuplicateFace { to } => {
                let from = self.layout.active_face();
                if from == to {
                    return Err(LayoutError::validation(
                        "Cannot duplicate a face onto itself",
                    ));
                }
                self.layout.duplicate_face(from, to);
                self.selection.retain(|id| self.layout.slot(id).is_some());
            }
            EditorCommand::GroupSelection => {
                if self.selection.len() < 2 {
                    return Err(LayoutError::validation(
                        "Grouping needs at least 2 selected slots",
                    ));
                }
                let group = Uuid::new_v4().to_string();
                for id in self.selection.ids().to_vec() {
                    if let Some(slot) = self.layout.slot_mut(id) {
                        slot.group_id = Some(group.clone());
                    }
                }
            }
            EditorCommand::UngroupSelection => {
                if self.selection.is_empty() {
                    return Err(LayoutError::NothingSelected);
                }
                for id in self.selection.ids().to_vec() {
                    if let Some(slot) = self.layout.slot_mut(id) {
                        slot.group_id = None;
                    }
                }
            }
            EditorCommand::ApplySpacing(mode) => {
                apply_spacing(&mut self.layout, mode)?;
            }
            EditorCommand::Align(alignment) => {
                apply_alignment(&mut self.layout, self.selection.ids(), alignment)?;
            }
            EditorCommand::StepRepeat { params } => {
                let master = self
                    .selection
                    .primary()
                    .ok_or(LayoutError::NothingSelected)?;
                let ids = step_repeat::generate(&mut self.layout, master, &params)?;
                self.selection.clear();
                self.selection.extend(ids);
            }
            EditorCommand::EditSlot { id, edit } => {
                self.apply_slot_edit(id, edit)?;
            }
            EditorCommand::SetSheetSize { width_mm, height_mm } => {
                if width_mm <= 0.0 || height_mm <= 0.0 {
                    return Err(LayoutError::validation("Sheet size must be positive"));
                }
                self.layout.sheet.width_mm = width_mm;
                self.layout.sheet.height_mm = height_mm;
                self.viewport.fit_to_sheet(&self.layout.sheet);
            }
            EditorCommand::SetMargins(margins) => {
                self.layout.sheet.margins = margins;
            }
            EditorCommand::SetSnapSettings(settings) => {
                if settings.tolerance_mm < 0.0 || settings.grid_mm <= 0.0 {
                    return Err(LayoutError::validation(
                        "Snap tolerance must be non-negative and grid size positive",
                    ));
                }
                self.layout.snap_settings = settings;
            }
            EditorCommand::SetSpacingSettings(settings) => {
                if settings.spacing_x_mm < 0.0 || settings.spacing_y_mm < 0.0 {
                    return Err(LayoutError::validation("Spacing must be non-negative"));
                }
                self.layout.spacing_settings = settings;
            }
            EditorCommand::UpsertWork(work) => {
                if work.id.is_empty() {
                    return Err(LayoutError::validation("Work id must not be empty"));
                }
                self.layout.upsert_work(work);
            }
            EditorCommand::RemoveWork { id } => {
                self.layout.remove_work(&id)?;
            }
            EditorCommand::UpsertDesign(design) => {
                if design.design_ref.is_empty() {
                    return Err(LayoutError::validation("Design ref must not be empty"));
                }
                self.layout.upsert_design(design);
            }
            EditorCommand::RemoveDesign { design_ref } => {
                if self.layout.remove_design(&design_ref).is_none() {
                    return Err(LayoutError::validation(format!(
                        "Unknown design '{}'",
                        design_ref
                    )));
                }
            }
        }
        self.commit();
        Ok(())
    }

    fn apply_slot_edit(&mut self, id: SlotId, edit: SlotEdit) -> Result<(), LayoutError> {
        // Validate everything up front so a rejected edit changes nothing.
        if self.layout.slot(id).is_none() {
            return Err(LayoutError::SlotNotFound { id });
        }
        if edit.w_mm.is_some_and(|w| w < MIN_SLOT_SIZE_MM)
            || edit.h_mm.is_some_and(|h| h < MIN_SLOT_SIZE_MM)
        {
            return Err(LayoutError::validation(format!(
                "Slot size below {} mm",
                MIN_SLOT_SIZE_MM
            )));
        }
        if let Some(Some(ref wid)) = edit.work_id {
            if self.layout.work(wid).is_none() {
                return Err(LayoutError::validation(format!("Unknown work '{}'", wid)));
            }
        }
        if let Some(Some(ref dref)) = edit.design_ref {
            if self.layout.design(dref).is_none() {
                return Err(LayoutError::validation(format!("Unknown design '{}'", dref)));
            }
        }

        let slot = self
            .layout
            .slot_mut(id)
            .ok_or(LayoutError::SlotNotFound { id })?;
        if let Some(x) = edit.x_mm {
            slot.x_mm = x;
        }
        if let Some(y) = edit.y_mm {
            slot.y_mm = y;
        }
        if let Some(w) = edit.w_mm {
            slot.w_mm = w;
        }
        if let Some(h) = edit.h_mm {
            slot.h_mm = h;
        }
        if let Some(r) = edit.rotation {
            slot.rotation = r;
        }
        if let Some(b) = edit.bleed_mm {
            slot.bleed_mm = b;
        }
        if let Some(c) = edit.crop_marks {
            slot.crop_marks = c;
        }
        if let Some(l) = edit.locked {
            slot.locked = l;
        }
        if let Some(work_id) = edit.work_id {
            slot.work_id = work_id;
        }
        if let Some(design_ref) = edit.design_ref {
            slot.design_ref = design_ref;
        }
        Ok(())
    }

    /// Starts a drag. The drag set is the selection plus every same-face
    /// group mate, minus locked slots. Refused when the primary slot is
    /// locked or a gesture is already running.
    pub fn begin_drag(&mut self, pointer: Point) -> Result<(), LayoutError> {
        if self.gesture.is_some() {
            return Err(LayoutError::validation("A gesture is already in progress"));
        }
        let reference = self
            .selection
            .primary()
            .ok_or(LayoutError::NothingSelected)?;
        let primary = self
            .layout
            .slot(reference)
            .ok_or(LayoutError::SlotNotFound { id: reference })?;
        if primary.locked {
            return Err(LayoutError::LockedSlot { id: reference });
        }

        let mut ids: Vec<SlotId> = self.selection.ids().to_vec();
        for id in self.selection.ids().to_vec() {
            if let Some(slot) = self.layout.slot(id) {
                if let Some(group) = slot.group_id.as_deref() {
                    for member in self.layout.group_members(group, slot.face) {
                        if !ids.contains(&member) {
                            ids.push(member);
                        }
                    }
                }
            }
        }
        let starts: Vec<(SlotId, f64, f64)> = ids
            .iter()
            .filter_map(|&id| self.layout.slot(id))
            .filter(|s| !s.locked)
            .map(|s| (s.id, s.x_mm, s.y_mm))
            .collect();

        self.gesture = Some(Gesture::Drag(DragGesture {
            reference,
            origin: pointer,
            starts,
        }));
        Ok(())
    }

    /// Moves the drag set to follow the pointer. The reference slot is
    /// snapped once and the snapped delta is applied to every slot, so the
    /// set stays rigid. No history is recorded here.
    pub fn update_drag(&mut self, pointer: Point) {
        let Some(Gesture::Drag(gesture)) = self.gesture.clone() else {
            return;
        };
        let Some(&(_, ref_x, ref_y)) = gesture
            .starts
            .iter()
            .find(|(id, _, _)| *id == gesture.reference)
        else {
            return;
        };
        let dx = pointer.x - gesture.origin.x;
        let dy = pointer.y - gesture.origin.y;
        let proposed = Point::new(ref_x + dx, ref_y + dy);
        let snapped = apply_snap(&self.layout, gesture.reference, proposed);
        let (sdx, sdy) = (snapped.x - ref_x, snapped.y - ref_y);

        for &(id, x0, y0) in &gesture.starts {
            if let Some(slot) = self.layout.slot_mut(id) {
                slot.x_mm = x0 + sdx;
                slot.y_mm = y0 + sdy;
            }
        }
        if self.layout.spacing_settings.live {
            // Preview re-flow; ignored when fewer than 2 slots are around.
            let _ = apply_spacing(&mut self.layout, SpacingMode::All);
        }
        self.needs_redraw = true;
    }

    /// Ends the drag: shifts the whole set back onto the sheet by one
    /// common correction (relative offsets never change), commits a live
    /// re-flow if enabled, and records one snapshot.
    pub fn end_drag(&mut self) {
        let Some(Gesture::Drag(gesture)) = self.gesture.take() else {
            return;
        };
        let boxes: Vec<Rect> = gesture
            .starts
            .iter()
            .filter_map(|&(id, _, _)| self.layout.slot(id))
            .map(|s| s.render_box())
            .collect();
        let (dx, dy) = clamp_set_correction(&self.layout.sheet, &boxes);
        if dx != 0.0 || dy != 0.0 {
            for &(id, _, _) in &gesture.starts {
                if let Some(slot) = self.layout.slot_mut(id) {
                    slot.x_mm += dx;
                    slot.y_mm += dy;
                }
            }
        }
        if self.layout.spacing_settings.live {
            let _ = apply_spacing(&mut self.layout, SpacingMode::All);
        }
        self.commit();
    }

    /// Starts a resize on one slot via a handle. Locked slots refuse.
    pub fn begin_resize(&mut self, id: SlotId, handle: ResizeHandle) -> Result<(), LayoutError> {
        if self.gesture.is_some() {
            return Err(LayoutError::validation("A gesture is already in progress"));
        }
        let slot = self
            .layout
            .slot(id)
            .ok_or(LayoutError::SlotNotFound { id })?;
        if slot.locked {
            return Err(LayoutError::LockedSlot { id });
        }
        self.gesture = Some(Gesture::Resize(ResizeGesture {
            id,
            handle,
            start: slot.logical_box(),
        }));
        Ok(())
    }

    /// Applies a pointer delta (mm) to the grabbed handle. Only the
    /// dimensions the handle implies change; the opposite edge stays put
    /// and sizes floor at [`MIN_SLOT_SIZE_MM`].
    pub fn update_resize(&mut self, dx: f64, dy: f64) {
        let Some(Gesture::Resize(gesture)) = self.gesture.clone() else {
            return;
        };
        let s = gesture.start;
        use ResizeHandle::*;
        let moves_left = matches!(gesture.handle, BottomLeft | TopLeft | Left);
        let moves_right = matches!(gesture.handle, BottomRight | TopRight | Right);
        let moves_bottom = matches!(gesture.handle, BottomLeft | BottomRight | Bottom);
        let moves_top = matches!(gesture.handle, TopLeft | TopRight | Top);

        let (mut x, mut w) = (s.x, s.w);
        if moves_left {
            let new_w = (s.w - dx).max(MIN_SLOT_SIZE_MM);
            x = s.right() - new_w;
            w = new_w;
        } else if moves_right {
            w = (s.w + dx).max(MIN_SLOT_SIZE_MM);
        }
        let (mut y, mut h) = (s.y, s.h);
        if moves_bottom {
            let new_h = (s.h - dy).max(MIN_SLOT_SIZE_MM);
            y = s.top() - new_h;
            h = new_h;
        } else if moves_top {
            h = (s.h + dy).max(MIN_SLOT_SIZE_MM);
        }

        if let Some(slot) = self.layout.slot_mut(gesture.id) {
            slot.x_mm = x;
            slot.y_mm = y;
            slot.w_mm = w;
            slot.h_mm = h;
        }
        self.needs_redraw = true;
    }

    /// Ends the resize and records one snapshot.
    pub fn end_resize(&mut self) {
        if let Some(Gesture::Resize(_)) = self.gesture.take() {
            self.commit();
        }
    }

    /// Records the current state in history and marks the view dirty.
    pub(crate) fn commit(&mut self) {
        self.history.push(&self.layout, &self.selection);
        self.needs_redraw = true;
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Layout::default())
    }
}
