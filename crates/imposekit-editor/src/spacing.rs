//! Spacing and alignment: re-flows rows/columns to a uniform gap and
//! aligns selections along an edge or center line.
//!
//! Both operations are group-aware: moving a grouped slot translates every
//! other slot sharing that `group_id` on the same face by the identical
//! delta, and each group is displaced at most once per pass (tracked via a
//! per-pass "already moved" set) so multiple members appearing in the
//! iteration never compound the move.

use std::collections::HashSet;

use imposekit_core::error::LayoutError;

use crate::grouping::{group_by_column, group_by_row};
use crate::model::{Layout, SlotId};

/// Which axis (or both) a spacing run re-flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacingMode {
    Rows,
    Columns,
    /// Rows first, then columns against the row-adjusted geometry.
    All,
}

/// Alignment targets for a multi-slot selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    CenterHorizontal,
    CenterVertical,
}

/// Translates a slot by (dx, dy), dragging its whole group along. A group
/// already present in `moved` is left untouched.
fn translate_with_group(
    layout: &mut Layout,
    id: SlotId,
    dx: f64,
    dy: f64,
    moved: &mut HashSet<String>,
) {
    let Some(slot) = layout.slot(id) else { return };
    let face = slot.face;
    match slot.group_id.clone() {
        Some(group) => {
            if moved.contains(&group) {
                return;
            }
            for member in layout.group_members(&group, face) {
                if let Some(s) = layout.slot_mut(member) {
                    s.translate(dx, dy);
                }
            }
            moved.insert(group);
        }
        None => {
            if let Some(s) = layout.slot_mut(id) {
                s.translate(dx, dy);
            }
        }
    }
}

/// Re-flows the slots on the active face to the configured uniform gap.
///
/// Rejected (no mutation) when fewer than 2 slots are visible on the
/// active face.
pub fn apply_spacing(layout: &mut Layout, mode: SpacingMode) -> Result<(), LayoutError> {
    let face = layout.active_face();
    if layout.slots_on_face(face).count() < 2 {
        return Err(LayoutError::validation(
            "Applying gaps needs at least 2 slots on the active face",
        ));
    }
    match mode {
        SpacingMode::Rows => space_rows(layout),
        SpacingMode::Columns => space_columns(layout),
        SpacingMode::All => {
            // Column spacing must see the row-adjusted positions, so the
            // second pass re-clusters against current geometry.
            space_rows(layout);
            space_columns(layout);
        }
    }
    Ok(())
}

fn space_rows(layout: &mut Layout) {
    let face = layout.active_face();
    let gap = layout.spacing_settings.spacing_x_mm;
    let rows: Vec<Vec<SlotId>> = {
        let slots: Vec<_> = layout.slots_on_face(face).collect();
        group_by_row(&slots).into_iter().map(|c| c.members).collect()
    };

    let mut moved = HashSet::new();
    for members in rows {
        let Some((&first, rest)) = members.split_first() else {
            continue;
        };
        // First slot of the row stays fixed.
        let mut prev_right = match layout.slot(first) {
            Some(s) => s.render_box().right(),
            None => continue,
        };
        for &id in rest {
            let Some(slot) = layout.slot(id) else { continue };
            let b = slot.render_box();
            if let Some(group) = slot.group_id.as_deref() {
                if moved.contains(group) {
                    prev_right = b.right();
                    continue;
                }
            }
            let dx = prev_right + gap - b.x;
            translate_with_group(layout, id, dx, 0.0, &mut moved);
            if let Some(s) = layout.slot(id) {
                prev_right = s.render_box().right();
            }
        }
    }
}

fn space_columns(layout: &mut Layout) {
    let face = layout.active_face();
    let gap = layout.spacing_settings.spacing_y_mm;
    let columns: Vec<Vec<SlotId>> = {
        let slots: Vec<_> = layout.slots_on_face(face).collect();
        group_by_column(&slots)
            .into_iter()
            .map(|c| c.members)
            .collect()
    };

    let mut moved = HashSet::new();
    for members in columns {
        let Some((&first, rest)) = members.split_first() else {
            continue;
        };
        let mut prev_top = match layout.slot(first) {
            Some(s) => s.render_box().top(),
            None => continue,
        };
        for &id in rest {
            let Some(slot) = layout.slot(id) else { continue };
            let b = slot.render_box();
            if let Some(group) = slot.group_id.as_deref() {
                if moved.contains(group) {
                    prev_top = b.top();
                    continue;
                }
            }
            let dy = prev_top + gap - b.y;
            translate_with_group(layout, id, 0.0, dy, &mut moved);
            if let Some(s) = layout.slot(id) {
                prev_top = s.render_box().top();
            }
        }
    }
}

/// Aligns the given slots along an edge or center line, group-aware.
///
/// Rejected (no mutation) when fewer than 2 slots are given.
pub fn apply_alignment(
    layout: &mut Layout,
    ids: &[SlotId],
    alignment: Alignment,
) -> Result<(), LayoutError> {
    if ids.len() < 2 {
        return Err(LayoutError::validation(
            "Alignment needs at least 2 selected slots",
        ));
    }

    let boxes: Vec<_> = ids
        .iter()
        .filter_map(|&id| layout.slot(id).map(|s| (id, s.render_box())))
        .collect();
    if boxes.len() < 2 {
        return Err(LayoutError::validation(
            "Alignment needs at least 2 selected slots",
        ));
    }

    let target = match alignment {
        Alignment::Left => boxes.iter().map(|(_, b)| b.x).fold(f64::INFINITY, f64::min),
        Alignment::Right => boxes
            .iter()
            .map(|(_, b)| b.right())
            .fold(f64::NEG_INFINITY, f64::max),
        Alignment::Bottom => boxes.iter().map(|(_, b)| b.y).fold(f64::INFINITY, f64::min),
        Alignment::Top => boxes
            .iter()
            .map(|(_, b)| b.top())
            .fold(f64::NEG_INFINITY, f64::max),
        Alignment::CenterHorizontal => {
            let min = boxes.iter().map(|(_, b)| b.x).fold(f64::INFINITY, f64::min);
            let max = boxes
                .iter()
                .map(|(_, b)| b.right())
                .fold(f64::NEG_INFINITY, f64::max);
            (min + max) / 2.0
        }
        Alignment::CenterVertical => {
            let min = boxes.iter().map(|(_, b)| b.y).fold(f64::INFINITY, f64::min);
            let max = boxes
                .iter()
                .map(|(_, b)| b.top())
                .fold(f64::NEG_INFINITY, f64::max);
            (min + max) / 2.0
        }
    };

    let mut moved = HashSet::new();
    for (id, b) in boxes {
        let (dx, dy) = match alignment {
            Alignment::Left => (target - b.x, 0.0),
            Alignment::Right => (target - b.right(), 0.0),
            Alignment::Bottom => (0.0, target - b.y),
            Alignment::Top => (0.0, target - b.top()),
            Alignment::CenterHorizontal => (target - b.center().x, 0.0),
            Alignment::CenterVertical => (0.0, target - b.center().y),
        };
        if dx.abs() > f64::EPSILON || dy.abs() > f64::EPSILON {
            translate_with_group(layout, id, dx, dy, &mut moved);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Face, Layout, Slot};

    fn front_slot(layout: &mut Layout, x: f64, y: f64, w: f64, h: f64) -> SlotId {
        layout.add_slot(Slot::new(Face::Front, x, y, w, h))
    }

    #[test]
    fn rows_pack_to_uniform_gap() {
        let mut layout = Layout::default();
        let a = front_slot(&mut layout, 0.0, 0.0, 40.0, 30.0);
        let b = front_slot(&mut layout, 100.0, 1.0, 40.0, 30.0);
        layout.spacing_settings.spacing_x_mm = 5.0;

        apply_spacing(&mut layout, SpacingMode::Rows).unwrap();
        assert_eq!(layout.slot(a).unwrap().x_mm, 0.0);
        assert_eq!(layout.slot(b).unwrap().x_mm, 45.0);
        // Row membership is unchanged; Y is untouched.
        assert_eq!(layout.slot(b).unwrap().y_mm, 1.0);
    }

    #[test]
    fn spacing_rejects_single_slot() {
        let mut layout = Layout::default();
        front_slot(&mut layout, 0.0, 0.0, 40.0, 30.0);
        assert!(apply_spacing(&mut layout, SpacingMode::Rows).is_err());
    }

    #[test]
    fn all_runs_columns_against_row_adjusted_geometry() {
        let mut layout = Layout::default();
        layout.spacing_settings.spacing_x_mm = 5.0;
        layout.spacing_settings.spacing_y_mm = 5.0;
        let a = front_slot(&mut layout, 0.0, 0.0, 40.0, 30.0);
        let b = front_slot(&mut layout, 90.0, 0.0, 40.0, 30.0);
        let c = front_slot(&mut layout, 0.0, 80.0, 40.0, 30.0);
        let d = front_slot(&mut layout, 90.0, 80.0, 40.0, 30.0);

        apply_spacing(&mut layout, SpacingMode::All).unwrap();
        assert_eq!(layout.slot(b).unwrap().x_mm, 45.0);
        assert_eq!(layout.slot(d).unwrap().x_mm, 45.0);
        assert_eq!(layout.slot(c).unwrap().y_mm, 35.0);
        assert_eq!(layout.slot(d).unwrap().y_mm, 35.0);
        assert_eq!(layout.slot(a).unwrap().x_mm, 0.0);
    }

    #[test]
    fn grouped_slots_are_displaced_once_per_pass() {
        let mut layout = Layout::default();
        layout.spacing_settings.spacing_x_mm = 5.0;
        let a = front_slot(&mut layout, 0.0, 0.0, 40.0, 30.0);
        let b = front_slot(&mut layout, 100.0, 0.0, 40.0, 30.0);
        let c = front_slot(&mut layout, 150.0, 0.0, 40.0, 30.0);
        layout.slot_mut(b).unwrap().group_id = Some("g1".into());
        layout.slot_mut(c).unwrap().group_id = Some("g1".into());
        let gap_bc = layout.slot(c).unwrap().x_mm - layout.slot(b).unwrap().x_mm;

        apply_spacing(&mut layout, SpacingMode::Rows).unwrap();
        // b moved to the uniform gap, dragging c with the same delta; c was
        // then skipped rather than re-spaced.
        assert_eq!(layout.slot(a).unwrap().x_mm, 0.0);
        assert_eq!(layout.slot(b).unwrap().x_mm, 45.0);
        assert_eq!(
            layout.slot(c).unwrap().x_mm - layout.slot(b).unwrap().x_mm,
            gap_bc
        );
    }

    #[test]
    fn align_left_moves_to_common_edge() {
        let mut layout = Layout::default();
        let a = front_slot(&mut layout, 10.0, 0.0, 40.0, 30.0);
        let b = front_slot(&mut layout, 60.0, 50.0, 40.0, 30.0);

        apply_alignment(&mut layout, &[a, b], Alignment::Left).unwrap();
        assert_eq!(layout.slot(a).unwrap().x_mm, 10.0);
        assert_eq!(layout.slot(b).unwrap().x_mm, 10.0);
    }

    #[test]
    fn alignment_rejects_single_slot() {
        let mut layout = Layout::default();
        let a = front_slot(&mut layout, 10.0, 0.0, 40.0, 30.0);
        assert!(apply_alignment(&mut layout, &[a], Alignment::Left).is_err());
    }
}
