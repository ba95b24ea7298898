//! Serialization and deserialization for layout files.
//!
//! Implements save/load for imposition layouts as JSON. Every field is
//! defaulted so sparse payloads from older tools or hand edits still load;
//! `into_layout` then normalizes the result (degenerate sheet sizes, bad
//! rotations, zero-sized slots, dangling references) instead of rejecting
//! the file.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

use imposekit_core::geometry::Rotation;

use crate::model::{
    Design, Face, Layout, Margins, Sheet, Slot, SnapSettings, SpacingSettings, Work,
};

/// Layout file format version.
pub const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete layout file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutFile {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub metadata: LayoutMetadata,
    /// Sheet `[width, height]` in mm.
    #[serde(default = "default_sheet_mm")]
    pub sheet_mm: [f64; 2],
    /// Margins `[left, right, top, bottom]` in mm.
    #[serde(default = "default_margins_mm")]
    pub margins_mm: [f64; 4],
    #[serde(default = "default_bleed_mm")]
    pub bleed_default_mm: f64,
    #[serde(default)]
    pub faces: Vec<String>,
    #[serde(default)]
    pub active_face: String,
    #[serde(default)]
    pub slots: Vec<SlotData>,
    #[serde(default)]
    pub works: Vec<WorkData>,
    #[serde(default)]
    pub designs: Vec<DesignData>,
    #[serde(default, rename = "snapSettings")]
    pub snap_settings: SnapSettingsData,
    #[serde(default, rename = "spacingSettings")]
    pub spacing_settings: SpacingSettingsData,
    #[serde(default)]
    pub imposition_engine: String,
    #[serde(default)]
    pub allowed_engines: Vec<String>,
}

/// Layout metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutMetadata {
    #[serde(default)]
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for LayoutMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            name: "Untitled".to_string(),
            created: now,
            modified: now,
        }
    }
}

/// Serialized slot data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotData {
    #[serde(default)]
    pub id: u64,
    pub x_mm: f64,
    pub y_mm: f64,
    pub w_mm: f64,
    pub h_mm: f64,
    #[serde(default)]
    pub rotation_deg: i32,
    #[serde(default)]
    pub bleed_mm: f64,
    #[serde(default)]
    pub crop_marks: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_face")]
    pub face: String,
    #[serde(default)]
    pub work_id: Option<String>,
    #[serde(default)]
    pub design_ref: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Serialized work data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkData {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Final trimmed size `[width, height]` in mm.
    #[serde(default)]
    pub final_size_mm: [f64; 2],
    #[serde(default = "default_one")]
    pub desired_copies: u32,
    #[serde(default)]
    pub default_bleed_mm: f64,
    #[serde(default)]
    pub has_bleed: bool,
}

/// Serialized design (uploaded artwork) data. Upload endpoints also return
/// this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignData {
    #[serde(rename = "ref")]
    pub design_ref: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub width_mm: f64,
    #[serde(default)]
    pub height_mm: f64,
    /// Falls back to the sheet's default bleed when absent.
    #[serde(default)]
    pub bleed_mm: Option<f64>,
    #[serde(default = "default_true")]
    pub allow_rotation: bool,
    #[serde(default = "default_one")]
    pub forms_per_plate: u32,
    #[serde(default)]
    pub work_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapSettingsData {
    #[serde(default = "default_true", rename = "snapSlots")]
    pub snap_slots: bool,
    #[serde(default = "default_true", rename = "snapMargins")]
    pub snap_margins: bool,
    #[serde(default, rename = "snapGrid")]
    pub snap_grid: bool,
    #[serde(default = "default_tolerance_mm")]
    pub tolerance_mm: f64,
    #[serde(default = "default_grid_mm")]
    pub grid_mm: f64,
}

impl Default for SnapSettingsData {
    fn default() -> Self {
        let s = SnapSettings::default();
        Self {
            snap_slots: s.snap_slots,
            snap_margins: s.snap_margins,
            snap_grid: s.snap_grid,
            tolerance_mm: s.tolerance_mm,
            grid_mm: s.grid_mm,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpacingSettingsData {
    #[serde(default = "default_spacing_mm", rename = "spacingX_mm")]
    pub spacing_x_mm: f64,
    #[serde(default = "default_spacing_mm", rename = "spacingY_mm")]
    pub spacing_y_mm: f64,
    #[serde(default)]
    pub live: bool,
}

impl Default for SpacingSettingsData {
    fn default() -> Self {
        let s = SpacingSettings::default();
        Self {
            spacing_x_mm: s.spacing_x_mm,
            spacing_y_mm: s.spacing_y_mm,
            live: s.live,
        }
    }
}

fn default_version() -> String {
    FILE_FORMAT_VERSION.to_string()
}
fn default_sheet_mm() -> [f64; 2] {
    let s = Sheet::default();
    [s.width_mm, s.height_mm]
}
fn default_margins_mm() -> [f64; 4] {
    let m = Margins::default();
    [m.left, m.right, m.top, m.bottom]
}
fn default_bleed_mm() -> f64 {
    Sheet::default().default_bleed_mm
}
fn default_face() -> String {
    Face::Front.as_str().to_string()
}
fn default_one() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_tolerance_mm() -> f64 {
    SnapSettings::default().tolerance_mm
}
fn default_grid_mm() -> f64 {
    SnapSettings::default().grid_mm
}
fn default_spacing_mm() -> f64 {
    SpacingSettings::default().spacing_x_mm
}

impl LayoutFile {
    /// Captures a layout into its wire form.
    pub fn from_layout(layout: &Layout, name: impl Into<String>) -> Self {
        let m = layout.sheet.margins;
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: LayoutMetadata {
                name: name.into(),
                ..LayoutMetadata::default()
            },
            sheet_mm: [layout.sheet.width_mm, layout.sheet.height_mm],
            margins_mm: [m.left, m.right, m.top, m.bottom],
            bleed_default_mm: layout.sheet.default_bleed_mm,
            faces: layout.faces().iter().map(|f| f.as_str().to_string()).collect(),
            active_face: layout.active_face().as_str().to_string(),
            slots: layout.slots().iter().map(slot_to_data).collect(),
            works: layout.works.iter().map(work_to_data).collect(),
            designs: layout.designs.iter().map(design_to_data).collect(),
            snap_settings: SnapSettingsData {
                snap_slots: layout.snap_settings.snap_slots,
                snap_margins: layout.snap_settings.snap_margins,
                snap_grid: layout.snap_settings.snap_grid,
                tolerance_mm: layout.snap_settings.tolerance_mm,
                grid_mm: layout.snap_settings.grid_mm,
            },
            spacing_settings: SpacingSettingsData {
                spacing_x_mm: layout.spacing_settings.spacing_x_mm,
                spacing_y_mm: layout.spacing_settings.spacing_y_mm,
                live: layout.spacing_settings.live,
            },
            imposition_engine: layout.imposition_engine.clone(),
            allowed_engines: layout.allowed_engines.clone(),
        }
    }

    /// Builds a layout from the wire form, normalizing malformed data
    /// rather than rejecting it.
    pub fn into_layout(self) -> Layout {
        let [mut width, mut height] = self.sheet_mm;
        if width <= 0.0 || height <= 0.0 {
            let d = Sheet::default();
            warn!(width, height, "non-positive sheet size, using defaults");
            width = d.width_mm;
            height = d.height_mm;
        }
        let [l, r, t, b] = self.margins_mm;
        let sheet = Sheet {
            width_mm: width,
            height_mm: height,
            margins: Margins {
                left: l.max(0.0),
                right: r.max(0.0),
                top: t.max(0.0),
                bottom: b.max(0.0),
            },
            default_bleed_mm: self.bleed_default_mm.max(0.0),
        };
        let mut layout = Layout::new(sheet);

        for face in &self.faces {
            if let Ok(face) = Face::from_str(face) {
                layout.ensure_face(face);
            } else {
                warn!(face = %face, "unknown face tag, ignored");
            }
        }

        for data in self.slots {
            if data.w_mm <= 0.0 || data.h_mm <= 0.0 {
                warn!(id = data.id, "dropping zero-sized slot");
                continue;
            }
            let face = Face::from_str(&data.face).unwrap_or_else(|_| {
                warn!(face = %data.face, "unknown slot face, using front");
                Face::Front
            });
            let rotation = Rotation::from_degrees(data.rotation_deg).unwrap_or_else(|| {
                warn!(deg = data.rotation_deg, "non-quarter rotation, using 0");
                Rotation::R0
            });
            let mut slot = Slot::new(face, data.x_mm, data.y_mm, data.w_mm, data.h_mm);
            slot.rotation = rotation;
            slot.bleed_mm = data.bleed_mm.max(0.0);
            slot.crop_marks = data.crop_marks;
            slot.locked = data.locked;
            slot.work_id = data.work_id;
            slot.design_ref = data.design_ref;
            slot.group_id = data.group_id;
            if data.id != 0 && layout.slot(data.id).is_none() {
                slot.id = data.id;
                layout.insert_slot(slot);
            } else {
                // Missing or colliding id: hand out a fresh one.
                layout.add_slot(slot);
            }
        }

        for data in self.works {
            if data.id.is_empty() {
                warn!("dropping work without an id");
                continue;
            }
            layout.upsert_work(Work {
                id: data.id,
                name: data.name,
                final_size_mm: (data.final_size_mm[0], data.final_size_mm[1]),
                desired_copies: data.desired_copies.max(1),
                default_bleed_mm: data.default_bleed_mm.max(0.0),
                has_bleed: data.has_bleed,
            });
        }

        for data in self.designs {
            if data.design_ref.is_empty() {
                warn!("dropping design without a ref");
                continue;
            }
            // Duplicate refs collapse to the last occurrence.
            layout.upsert_design(Design {
                design_ref: data.design_ref,
                filename: data.filename,
                width_mm: data.width_mm,
                height_mm: data.height_mm,
                bleed_mm: data.bleed_mm.unwrap_or(layout.sheet.default_bleed_mm),
                allow_rotation: data.allow_rotation,
                forms_per_plate: data.forms_per_plate.max(1),
                work_id: data.work_id,
            });
        }

        let active = Face::from_str(&self.active_face).ok();
        match active {
            Some(face) if layout.faces().contains(&face) => layout.set_active_face(face),
            Some(face) => {
                warn!(%face, "active face not in face set, using front");
            }
            None if !self.active_face.is_empty() => {
                warn!(face = %self.active_face, "unknown active face, using front");
            }
            None => {}
        }

        layout.snap_settings = SnapSettings {
            snap_slots: self.snap_settings.snap_slots,
            snap_margins: self.snap_settings.snap_margins,
            snap_grid: self.snap_settings.snap_grid,
            tolerance_mm: self.snap_settings.tolerance_mm.max(0.0),
            grid_mm: if self.snap_settings.grid_mm > 0.0 {
                self.snap_settings.grid_mm
            } else {
                SnapSettings::default().grid_mm
            },
        };
        layout.spacing_settings = SpacingSettings {
            spacing_x_mm: self.spacing_settings.spacing_x_mm.max(0.0),
            spacing_y_mm: self.spacing_settings.spacing_y_mm.max(0.0),
            live: self.spacing_settings.live,
        };

        layout.allowed_engines = if self.allowed_engines.is_empty() {
            vec!["default".to_string()]
        } else {
            self.allowed_engines
        };
        layout.imposition_engine =
            if layout.allowed_engines.contains(&self.imposition_engine) {
                self.imposition_engine
            } else {
                layout.allowed_engines[0].clone()
            };

        layout
    }

    /// Saves the layout file as pretty JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize layout")?;
        std::fs::write(path.as_ref(), json).context("Failed to write layout file")?;
        Ok(())
    }

    /// Loads a layout file, refreshing the modified timestamp.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read layout file")?;
        let mut file: LayoutFile =
            serde_json::from_str(&content).context("Failed to parse layout file")?;
        file.metadata.modified = Utc::now();
        Ok(file)
    }
}

fn slot_to_data(slot: &Slot) -> SlotData {
    SlotData {
        id: slot.id,
        x_mm: slot.x_mm,
        y_mm: slot.y_mm,
        w_mm: slot.w_mm,
        h_mm: slot.h_mm,
        rotation_deg: slot.rotation.degrees() as i32,
        bleed_mm: slot.bleed_mm,
        crop_marks: slot.crop_marks,
        locked: slot.locked,
        face: slot.face.as_str().to_string(),
        work_id: slot.work_id.clone(),
        design_ref: slot.design_ref.clone(),
        group_id: slot.group_id.clone(),
    }
}

fn work_to_data(work: &Work) -> WorkData {
    WorkData {
        id: work.id.clone(),
        name: work.name.clone(),
        final_size_mm: [work.final_size_mm.0, work.final_size_mm.1],
        desired_copies: work.desired_copies,
        default_bleed_mm: work.default_bleed_mm,
        has_bleed: work.has_bleed,
    }
}

fn design_to_data(design: &Design) -> DesignData {
    DesignData {
        design_ref: design.design_ref.clone(),
        filename: design.filename.clone(),
        width_mm: design.width_mm,
        height_mm: design.height_mm,
        bleed_mm: Some(design.bleed_mm),
        allow_rotation: design.allow_rotation,
        forms_per_plate: design.forms_per_plate,
        work_id: design.work_id.clone(),
    }
}
