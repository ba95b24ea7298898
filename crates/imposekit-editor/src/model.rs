//! The layout scene graph: sheet, faces, slots, works, designs, settings.
//!
//! `Layout` is the single mutable model the editor operates on. Commands
//! mutate it through `EditorState`; the engines (snap, grouping, spacing,
//! step & repeat) read and adjust it; the history manager snapshots it
//! wholesale. All geometry is in millimeters, origin at the sheet's
//! bottom-left.

use std::fmt;
use std::str::FromStr;

use imposekit_core::error::LayoutError;
use imposekit_core::geometry::{render_box, Point, Rect, Rotation};

/// Session-stable slot identifier.
pub type SlotId = u64;

/// One printable side of the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Face {
    #[default]
    Front,
    Back,
}

impl Face {
    /// The wire tag for this face.
    pub fn as_str(&self) -> &'static str {
        match self {
            Face::Front => "front",
            Face::Back => "back",
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Face {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "front" | "recto" => Ok(Face::Front),
            "back" | "verso" => Ok(Face::Back),
            _ => Err(format!("Unknown face: {}", s)),
        }
    }
}

/// Sheet margins in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    pub fn uniform(m: f64) -> Self {
        Self {
            left: m,
            right: m,
            top: m,
            bottom: m,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(10.0)
    }
}

/// The physical print sheet: overall size, margins, and the bleed value
/// new slots inherit when their work/design does not specify one.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margins: Margins,
    pub default_bleed_mm: f64,
}

impl Sheet {
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
            margins: Margins::default(),
            default_bleed_mm: 2.0,
        }
    }
}

impl Default for Sheet {
    fn default() -> Self {
        // SRA3 portrait is the shop's most common substrate.
        Self::new(320.0, 450.0)
    }
}

/// A placed instance of a job on the sheet.
///
/// The logical box (`x_mm, y_mm, w_mm, h_mm`) is the unrotated footprint;
/// it never changes when the slot is rotated. The rendered box is derived
/// per [`render_box`] and shares the logical box's center.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub id: SlotId,
    pub x_mm: f64,
    pub y_mm: f64,
    pub w_mm: f64,
    pub h_mm: f64,
    pub rotation: Rotation,
    pub bleed_mm: f64,
    pub crop_marks: bool,
    pub locked: bool,
    pub face: Face,
    pub work_id: Option<String>,
    pub design_ref: Option<String>,
    pub group_id: Option<String>,
}

impl Slot {
    /// Creates a slot with defaults; the id is assigned on insertion.
    pub fn new(face: Face, x_mm: f64, y_mm: f64, w_mm: f64, h_mm: f64) -> Self {
        Self {
            id: 0,
            x_mm,
            y_mm,
            w_mm,
            h_mm,
            rotation: Rotation::R0,
            bleed_mm: 0.0,
            crop_marks: false,
            locked: false,
            face,
            work_id: None,
            design_ref: None,
            group_id: None,
        }
    }

    /// The unrotated logical box.
    pub fn logical_box(&self) -> Rect {
        Rect::new(self.x_mm, self.y_mm, self.w_mm, self.h_mm)
    }

    /// The rotation-aware rendered box (what the operator sees and what
    /// snapping/grouping reason about).
    pub fn render_box(&self) -> Rect {
        render_box(&self.logical_box(), self.rotation)
    }

    /// Rendered (visible) width and height.
    pub fn visible_size(&self) -> (f64, f64) {
        let r = self.render_box();
        (r.w, r.h)
    }

    /// Center of the slot; invariant under rotation.
    pub fn center(&self) -> Point {
        self.logical_box().center()
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x_mm += dx;
        self.y_mm += dy;
    }
}

/// A logical job definition, independent of placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Work {
    pub id: String,
    pub name: String,
    pub final_size_mm: (f64, f64),
    pub desired_copies: u32,
    pub default_bleed_mm: f64,
    pub has_bleed: bool,
}

/// An uploaded artwork reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    pub design_ref: String,
    pub filename: String,
    pub width_mm: f64,
    pub height_mm: f64,
    pub bleed_mm: f64,
    pub allow_rotation: bool,
    pub forms_per_plate: u32,
    pub work_id: Option<String>,
}

/// Snapping configuration; tolerance and grid size are settings,
/// not constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapSettings {
    pub snap_slots: bool,
    pub snap_margins: bool,
    pub snap_grid: bool,
    pub tolerance_mm: f64,
    pub grid_mm: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            snap_slots: true,
            snap_margins: true,
            snap_grid: false,
            tolerance_mm: 1.0,
            grid_mm: 5.0,
        }
    }
}

/// Uniform-gap configuration for the spacing engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingSettings {
    pub spacing_x_mm: f64,
    pub spacing_y_mm: f64,
    /// Re-flow continuously during drag (preview only), not just on commit.
    pub live: bool,
}

impl Default for SpacingSettings {
    fn default() -> Self {
        Self {
            spacing_x_mm: 4.0,
            spacing_y_mm: 4.0,
            live: false,
        }
    }
}

/// The complete layout model.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub sheet: Sheet,
    faces: Vec<Face>,
    active_face: Face,
    slots: Vec<Slot>,
    next_slot_id: SlotId,
    pub works: Vec<Work>,
    pub designs: Vec<Design>,
    pub snap_settings: SnapSettings,
    pub spacing_settings: SpacingSettings,
    pub imposition_engine: String,
    pub allowed_engines: Vec<String>,
}

impl Layout {
    /// Creates an empty layout on the given sheet.
    pub fn new(sheet: Sheet) -> Self {
        Self {
            sheet,
            faces: vec![Face::Front],
            active_face: Face::Front,
            slots: Vec::new(),
            next_slot_id: 1,
            works: Vec::new(),
            designs: Vec::new(),
            snap_settings: SnapSettings::default(),
            spacing_settings: SpacingSettings::default(),
            imposition_engine: "default".to_string(),
            allowed_engines: vec!["default".to_string()],
        }
    }

    /// Generates a new unique slot id.
    pub fn generate_id(&mut self) -> SlotId {
        let id = self.next_slot_id;
        self.next_slot_id += 1;
        id
    }

    /// The ordered face set. Faces are created implicitly the first time a
    /// slot references them.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// The face currently being edited.
    pub fn active_face(&self) -> Face {
        self.active_face
    }

    /// Switches the active face, registering it if needed.
    pub fn set_active_face(&mut self, face: Face) {
        self.ensure_face(face);
        self.active_face = face;
    }

    /// Registers a face if it is not yet part of the layout.
    pub fn ensure_face(&mut self, face: Face) {
        if !self.faces.contains(&face) {
            self.faces.push(face);
        }
    }

    /// All slots, in insertion order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Mutable iteration over all slots.
    pub fn slots_mut(&mut self) -> impl Iterator<Item = &mut Slot> {
        self.slots.iter_mut()
    }

    /// Gets a slot by id.
    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Gets a mutable slot by id.
    pub fn slot_mut(&mut self, id: SlotId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.id == id)
    }

    /// Slots visible on the given face, in insertion order.
    pub fn slots_on_face(&self, face: Face) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(move |s| s.face == face)
    }

    /// Adds a slot, assigning it a fresh id and registering its face.
    /// Returns the new id.
    pub fn add_slot(&mut self, mut slot: Slot) -> SlotId {
        let id = self.generate_id();
        slot.id = id;
        self.ensure_face(slot.face);
        self.slots.push(slot);
        id
    }

    /// Inserts a slot keeping its existing id (restore path). Bumps the id
    /// counter past it so later generated ids stay unique.
    pub fn insert_slot(&mut self, slot: Slot) {
        if slot.id >= self.next_slot_id {
            self.next_slot_id = slot.id + 1;
        }
        self.ensure_face(slot.face);
        self.slots.push(slot);
    }

    /// Removes a slot by id, returning it.
    pub fn remove_slot(&mut self, id: SlotId) -> Option<Slot> {
        let idx = self.slots.iter().position(|s| s.id == id)?;
        Some(self.slots.remove(idx))
    }

    /// Duplicates a slot with an offset; the copy is never grouped with the
    /// original. Returns the new id.
    pub fn duplicate_slot(&mut self, id: SlotId, dx: f64, dy: f64) -> Option<SlotId> {
        let mut copy = self.slot(id)?.clone();
        copy.translate(dx, dy);
        copy.group_id = None;
        Some(self.add_slot(copy))
    }

    /// Replaces the contents of `to` with copies of every slot on `from`,
    /// each with a fresh id. Returns the new ids.
    pub fn duplicate_face(&mut self, from: Face, to: Face) -> Vec<SlotId> {
        let templates: Vec<Slot> = self.slots_on_face(from).cloned().collect();
        self.slots.retain(|s| s.face != to);
        let mut ids = Vec::with_capacity(templates.len());
        for mut slot in templates {
            slot.face = to;
            ids.push(self.add_slot(slot));
        }
        ids
    }

    /// Ids of every slot sharing a group on a face.
    pub fn group_members(&self, group_id: &str, face: Face) -> Vec<SlotId> {
        self.slots
            .iter()
            .filter(|s| s.face == face && s.group_id.as_deref() == Some(group_id))
            .map(|s| s.id)
            .collect()
    }

    /// Gets a work by id.
    pub fn work(&self, id: &str) -> Option<&Work> {
        self.works.iter().find(|w| w.id == id)
    }

    /// Adds or replaces a work.
    pub fn upsert_work(&mut self, work: Work) {
        if let Some(existing) = self.works.iter_mut().find(|w| w.id == work.id) {
            *existing = work;
        } else {
            self.works.push(work);
        }
    }

    /// Removes a work. Rejected while any slot or design still references it
    /// (referential integrity is enforced here, before mutation).
    pub fn remove_work(&mut self, id: &str) -> Result<Work, LayoutError> {
        let referenced = self.slots.iter().any(|s| s.work_id.as_deref() == Some(id))
            || self.designs.iter().any(|d| d.work_id.as_deref() == Some(id));
        if referenced {
            return Err(LayoutError::WorkInUse { id: id.to_string() });
        }
        let idx = self
            .works
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| LayoutError::validation(format!("Unknown work '{}'", id)))?;
        Ok(self.works.remove(idx))
    }

    /// Gets a design by ref.
    pub fn design(&self, design_ref: &str) -> Option<&Design> {
        self.designs.iter().find(|d| d.design_ref == design_ref)
    }

    /// Adds or replaces a design (upload responses replace by ref).
    pub fn upsert_design(&mut self, design: Design) {
        if let Some(existing) = self
            .designs
            .iter_mut()
            .find(|d| d.design_ref == design.design_ref)
        {
            *existing = design;
        } else {
            self.designs.push(design);
        }
    }

    /// Removes a design and clears dangling slot references to it.
    pub fn remove_design(&mut self, design_ref: &str) -> Option<Design> {
        let idx = self
            .designs
            .iter()
            .position(|d| d.design_ref == design_ref)?;
        let design = self.designs.remove(idx);
        for slot in self.slots.iter_mut() {
            if slot.design_ref.as_deref() == Some(design_ref) {
                slot.design_ref = None;
            }
        }
        Some(design)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(Sheet::default())
    }
}
