//! Step & repeat: expands one master slot into a rows x cols grid.
//!
//! The master becomes tile (0,0) and keeps its id; every other tile is a
//! fresh clone. Validation happens up front and a rejected run leaves the
//! layout untouched.

use imposekit_core::error::LayoutError;
use imposekit_core::geometry::Rotation;
use uuid::Uuid;

use crate::model::{Layout, SlotId};

/// Where the grid's origin lands on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementMode {
    /// Grid grows from the master's current position.
    #[default]
    Natural,
    /// Grid is centered on the sheet, both axes.
    Center,
    AlignLeft,
    AlignRight,
    AlignTop,
    AlignBottom,
}

/// Rotation applied to the generated tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationMode {
    /// Tiles inherit the master's rotation.
    #[default]
    Keep,
    /// Every tile gets this rotation, master included.
    Fixed(Rotation),
}

/// What artwork reference the clones carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DesignAssign {
    /// Clones point at the master's design.
    #[default]
    Same,
    /// Clones start empty; the master keeps its own.
    None,
}

/// Whether the grid becomes one movable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMode {
    #[default]
    Grouped,
    Independent,
}

/// Parameters for a step & repeat run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRepeatParams {
    pub rows: u32,
    pub cols: u32,
    /// Horizontal gap between columns, mm.
    pub gap_h_mm: f64,
    /// Vertical gap between rows, mm.
    pub gap_v_mm: f64,
    pub mode: PlacementMode,
    /// Align against the sheet margins instead of the raw sheet edge.
    pub auto_margin: bool,
    pub rotation: RotationMode,
    pub nudge_x_mm: f64,
    pub nudge_y_mm: f64,
    pub design_assign: DesignAssign,
    pub group_mode: GroupMode,
    /// Copy the master's bleed and crop-mark flags onto clones; otherwise
    /// clones fall back to the sheet default bleed with crop marks off.
    pub copy_bleed_and_crop: bool,
}

impl Default for StepRepeatParams {
    fn default() -> Self {
        Self {
            rows: 1,
            cols: 1,
            gap_h_mm: 0.0,
            gap_v_mm: 0.0,
            mode: PlacementMode::Natural,
            auto_margin: true,
            rotation: RotationMode::Keep,
            nudge_x_mm: 0.0,
            nudge_y_mm: 0.0,
            design_assign: DesignAssign::Same,
            group_mode: GroupMode::Grouped,
            copy_bleed_and_crop: true,
        }
    }
}

impl StepRepeatParams {
    pub fn is_valid(&self) -> bool {
        self.rows >= 1 && self.cols >= 1 && self.gap_h_mm >= 0.0 && self.gap_v_mm >= 0.0
    }

    pub fn total_tiles(&self) -> u32 {
        self.rows * self.cols
    }
}

/// Expands `master_id` into a grid per `params`. Returns the ids of every
/// tile, master first.
pub fn generate(
    layout: &mut Layout,
    master_id: SlotId,
    params: &StepRepeatParams,
) -> Result<Vec<SlotId>, LayoutError> {
    if !params.is_valid() {
        return Err(LayoutError::validation(
            "Step & repeat needs at least 1 row and 1 column and non-negative gaps",
        ));
    }
    let master = layout
        .slot(master_id)
        .ok_or(LayoutError::SlotNotFound { id: master_id })?
        .clone();

    let tile_w = master.w_mm;
    let tile_h = master.h_mm;
    let cols = params.cols as f64;
    let rows = params.rows as f64;
    let total_w = cols * tile_w + (cols - 1.0) * params.gap_h_mm;
    let total_h = rows * tile_h + (rows - 1.0) * params.gap_v_mm;

    let sheet = &layout.sheet;
    let m = sheet.margins;
    let (mut x0, mut y0) = (master.x_mm, master.y_mm);
    match params.mode {
        PlacementMode::Natural => {}
        PlacementMode::Center => {
            x0 = (sheet.width_mm - total_w) / 2.0;
            y0 = (sheet.height_mm - total_h) / 2.0;
        }
        PlacementMode::AlignLeft => {
            x0 = if params.auto_margin { m.left } else { 0.0 };
        }
        PlacementMode::AlignRight => {
            x0 = sheet.width_mm - total_w - if params.auto_margin { m.right } else { 0.0 };
        }
        PlacementMode::AlignTop => {
            y0 = sheet.height_mm - total_h - if params.auto_margin { m.top } else { 0.0 };
        }
        PlacementMode::AlignBottom => {
            y0 = if params.auto_margin { m.bottom } else { 0.0 };
        }
    }
    x0 += params.nudge_x_mm;
    y0 += params.nudge_y_mm;

    let rotation = match params.rotation {
        RotationMode::Keep => master.rotation,
        RotationMode::Fixed(r) => r,
    };
    let group_id = match params.group_mode {
        GroupMode::Grouped => Some(Uuid::new_v4().to_string()),
        GroupMode::Independent => None,
    };

    let mut ids = Vec::with_capacity(params.total_tiles() as usize);
    for row in 0..params.rows {
        for col in 0..params.cols {
            let x = x0 + col as f64 * (tile_w + params.gap_h_mm);
            let y = y0 + row as f64 * (tile_h + params.gap_v_mm);
            if row == 0 && col == 0 {
                // Tile (0,0) is the master itself, moved into place.
                if let Some(slot) = layout.slot_mut(master_id) {
                    slot.x_mm = x;
                    slot.y_mm = y;
                    slot.rotation = rotation;
                    slot.group_id = group_id.clone();
                }
                ids.push(master_id);
                continue;
            }
            let mut tile = master.clone();
            tile.x_mm = x;
            tile.y_mm = y;
            tile.rotation = rotation;
            tile.group_id = group_id.clone();
            tile.locked = false;
            tile.design_ref = match params.design_assign {
                DesignAssign::Same => master.design_ref.clone(),
                DesignAssign::None => None,
            };
            if !params.copy_bleed_and_crop {
                tile.bleed_mm = layout.sheet.default_bleed_mm;
                tile.crop_marks = false;
            }
            ids.push(layout.add_slot(tile));
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Face, Slot};

    fn master(layout: &mut Layout) -> SlotId {
        let mut slot = Slot::new(Face::Front, 10.0, 10.0, 40.0, 30.0);
        slot.design_ref = Some("d1".into());
        slot.bleed_mm = 3.0;
        slot.crop_marks = true;
        layout.add_slot(slot)
    }

    #[test]
    fn grid_reuses_master_as_first_tile() {
        let mut layout = Layout::default();
        let id = master(&mut layout);
        let params = StepRepeatParams {
            rows: 2,
            cols: 3,
            gap_h_mm: 5.0,
            gap_v_mm: 5.0,
            ..StepRepeatParams::default()
        };

        let ids = generate(&mut layout, id, &params).unwrap();
        assert_eq!(ids.len(), 6);
        assert_eq!(ids[0], id);
        assert_eq!(ids.iter().filter(|&&i| i == id).count(), 1);
        assert_eq!(layout.slots().len(), 6);

        // Natural placement: grid grows from the master's position.
        assert_eq!(layout.slot(ids[0]).unwrap().x_mm, 10.0);
        assert_eq!(layout.slot(ids[1]).unwrap().x_mm, 55.0);
        assert_eq!(layout.slot(ids[3]).unwrap().y_mm, 45.0);
    }

    #[test]
    fn center_placement_centers_the_whole_grid() {
        let mut layout = Layout::default();
        let id = master(&mut layout);
        let params = StepRepeatParams {
            rows: 1,
            cols: 2,
            gap_h_mm: 10.0,
            mode: PlacementMode::Center,
            ..StepRepeatParams::default()
        };

        let ids = generate(&mut layout, id, &params).unwrap();
        // Sheet 320 wide, grid 40+10+40 = 90 wide -> origin at 115.
        assert_eq!(layout.slot(ids[0]).unwrap().x_mm, 115.0);
        assert_eq!(layout.slot(ids[1]).unwrap().x_mm, 165.0);
        // Grid 30 tall on a 450 sheet -> y at 210.
        assert_eq!(layout.slot(ids[0]).unwrap().y_mm, 210.0);
    }

    #[test]
    fn align_left_respects_auto_margin() {
        let mut layout = Layout::default();
        let id = master(&mut layout);
        let params = StepRepeatParams {
            cols: 2,
            mode: PlacementMode::AlignLeft,
            auto_margin: true,
            ..StepRepeatParams::default()
        };

        let ids = generate(&mut layout, id, &params).unwrap();
        assert_eq!(layout.slot(ids[0]).unwrap().x_mm, 10.0);
        // The cross axis stays where the master was.
        assert_eq!(layout.slot(ids[0]).unwrap().y_mm, 10.0);
    }

    #[test]
    fn design_none_leaves_clones_empty_but_master_keeps_its_own() {
        let mut layout = Layout::default();
        let id = master(&mut layout);
        let params = StepRepeatParams {
            cols: 2,
            design_assign: DesignAssign::None,
            ..StepRepeatParams::default()
        };

        let ids = generate(&mut layout, id, &params).unwrap();
        assert_eq!(layout.slot(ids[0]).unwrap().design_ref.as_deref(), Some("d1"));
        assert_eq!(layout.slot(ids[1]).unwrap().design_ref, None);
    }

    #[test]
    fn grouped_tiles_share_a_fresh_group() {
        let mut layout = Layout::default();
        let id = master(&mut layout);
        let params = StepRepeatParams {
            rows: 2,
            cols: 2,
            ..StepRepeatParams::default()
        };

        let ids = generate(&mut layout, id, &params).unwrap();
        let group = layout.slot(ids[0]).unwrap().group_id.clone();
        assert!(group.is_some());
        assert!(ids
            .iter()
            .all(|&i| layout.slot(i).unwrap().group_id == group));
    }

    #[test]
    fn bleed_and_crop_reset_when_not_copied() {
        let mut layout = Layout::default();
        let id = master(&mut layout);
        let params = StepRepeatParams {
            cols: 2,
            copy_bleed_and_crop: false,
            ..StepRepeatParams::default()
        };

        let ids = generate(&mut layout, id, &params).unwrap();
        let clone = layout.slot(ids[1]).unwrap();
        assert_eq!(clone.bleed_mm, layout.sheet.default_bleed_mm);
        assert!(!clone.crop_marks);
        // The master is untouched in this respect.
        assert_eq!(layout.slot(id).unwrap().bleed_mm, 3.0);
    }

    #[test]
    fn invalid_params_leave_layout_untouched() {
        let mut layout = Layout::default();
        let id = master(&mut layout);
        let before = layout.clone();
        let params = StepRepeatParams {
            rows: 0,
            cols: 3,
            ..StepRepeatParams::default()
        };

        assert!(generate(&mut layout, id, &params).is_err());
        assert_eq!(layout, before);
    }

    #[test]
    fn unknown_master_is_rejected() {
        let mut layout = Layout::default();
        assert!(matches!(
            generate(&mut layout, 99, &StepRepeatParams::default()),
            Err(LayoutError::SlotNotFound { id: 99 })
        ));
    }
}
