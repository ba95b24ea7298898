//! Snap engine: corrects a slot's proposed position against grid, margin,
//! and neighbor-slot rules.
//!
//! Rules are applied in a fixed, explicit order ([`SNAP_RULE_ORDER`]); a
//! later rule's result replaces an earlier rule's result on the same axis,
//! so the tie-break is documented and testable rather than incidental to
//! loop order. Each rule only fires within `tolerance_mm` and each axis
//! snaps independently.
//!
//! Snapping reasons about the *rendered* (rotation-aware) box, since that
//! is what the operator sees; the returned coordinates are converted back
//! to the logical-box origin.

use imposekit_core::geometry::{Point, Rect};

use crate::model::{Layout, Sheet, Slot, SlotId};

/// The snap rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapRule {
    /// Snap each axis to the nearest multiple of `grid_mm`.
    Grid,
    /// Snap the near/far edge to the sheet edge or margin line.
    Margins,
    /// Snap to either edge of every other slot on the same face.
    Slots,
}

/// Fixed evaluation order; later rules win on the same axis.
pub const SNAP_RULE_ORDER: [SnapRule; 3] = [SnapRule::Grid, SnapRule::Margins, SnapRule::Slots];

/// Offset from a slot's logical-box origin to its rendered-box origin.
fn render_offset(slot: &Slot) -> (f64, f64) {
    if slot.rotation.is_sideways() {
        (
            (slot.w_mm - slot.h_mm) / 2.0,
            (slot.h_mm - slot.w_mm) / 2.0,
        )
    } else {
        (0.0, 0.0)
    }
}

/// Nearest grid multiple, if within tolerance.
fn snap_to_grid(v: f64, grid_mm: f64, tolerance_mm: f64) -> Option<f64> {
    if grid_mm <= 0.0 {
        return None;
    }
    let nearest = (v / grid_mm).round() * grid_mm;
    if (nearest - v).abs() <= tolerance_mm {
        Some(nearest)
    } else {
        None
    }
}

/// Nearest candidate within tolerance.
fn nearest_within(v: f64, candidates: &[f64], tolerance_mm: f64) -> Option<f64> {
    let mut best: Option<f64> = None;
    for &c in candidates {
        let d = (c - v).abs();
        if d <= tolerance_mm && best.is_none_or(|b| d < (b - v).abs()) {
            best = Some(c);
        }
    }
    best
}

/// Computes the snapped position for a slot's proposed logical-box origin.
///
/// Locked slots are excluded from interaction entirely; for robustness the
/// engine returns the proposal unchanged if one gets here anyway.
pub fn apply_snap(layout: &Layout, slot_id: SlotId, proposed: Point) -> Point {
    let settings = layout.snap_settings;
    let Some(slot) = layout.slot(slot_id) else {
        return proposed;
    };
    if slot.locked {
        return proposed;
    }

    let (vw, vh) = slot.visible_size();
    let (ox, oy) = render_offset(slot);
    let rx = proposed.x + ox;
    let ry = proposed.y + oy;
    let tol = settings.tolerance_mm;

    let mut snapped_x: Option<f64> = None;
    let mut snapped_y: Option<f64> = None;

    for rule in SNAP_RULE_ORDER {
        match rule {
            SnapRule::Grid => {
                if !settings.snap_grid {
                    continue;
                }
                if let Some(v) = snap_to_grid(rx, settings.grid_mm, tol) {
                    snapped_x = Some(v);
                }
                if let Some(v) = snap_to_grid(ry, settings.grid_mm, tol) {
                    snapped_y = Some(v);
                }
            }
            SnapRule::Margins => {
                if !settings.snap_margins {
                    continue;
                }
                let sheet = &layout.sheet;
                let m = sheet.margins;
                let x_targets = [
                    0.0,
                    m.left,
                    sheet.width_mm - vw - m.right,
                    sheet.width_mm - vw,
                ];
                let y_targets = [
                    0.0,
                    m.bottom,
                    sheet.height_mm - vh - m.top,
                    sheet.height_mm - vh,
                ];
                if let Some(v) = nearest_within(rx, &x_targets, tol) {
                    snapped_x = Some(v);
                }
                if let Some(v) = nearest_within(ry, &y_targets, tol) {
                    snapped_y = Some(v);
                }
            }
            SnapRule::Slots => {
                if !settings.snap_slots {
                    continue;
                }
                let mut x_targets = Vec::new();
                let mut y_targets = Vec::new();
                for other in layout.slots_on_face(slot.face).filter(|s| s.id != slot_id) {
                    let b = other.render_box();
                    // Both edges of the neighbor, per axis.
                    x_targets.extend_from_slice(&[b.x, b.right()]);
                    y_targets.extend_from_slice(&[b.y, b.top()]);
                }
                if let Some(v) = nearest_within(rx, &x_targets, tol) {
                    snapped_x = Some(v);
                }
                if let Some(v) = nearest_within(ry, &y_targets, tol) {
                    snapped_y = Some(v);
                }
            }
        }
    }

    Point::new(
        snapped_x.unwrap_or(rx) - ox,
        snapped_y.unwrap_or(ry) - oy,
    )
}

/// Clamps a proposed logical-box origin so the rendered box lies fully on
/// the sheet (`0 ≤ x` and `x + visibleW ≤ sheet.width_mm`, same for Y).
/// This is the invariant drag completion must restore.
pub fn clamp_to_sheet(sheet: &Sheet, slot: &Slot, proposed: Point) -> Point {
    let (vw, vh) = slot.visible_size();
    let (ox, oy) = render_offset(slot);
    let b = Rect::new(proposed.x + ox, proposed.y + oy, vw, vh);
    let (dx, dy) = clamp_set_correction(sheet, &[b]);
    Point::new(proposed.x + dx, proposed.y + dy)
}

/// The common delta that shifts a set of rendered boxes back onto the
/// sheet. A multi-slot drag moves rigidly, so one correction applied to
/// every member restores the on-sheet invariant without changing relative
/// offsets. A set that fit the sheet when the drag started always fits
/// after a rigid move.
pub fn clamp_set_correction(sheet: &Sheet, boxes: &[Rect]) -> (f64, f64) {
    let Some((first, rest)) = boxes.split_first() else {
        return (0.0, 0.0);
    };
    let mut union = *first;
    for b in rest {
        let right = union.right().max(b.right());
        let top = union.top().max(b.top());
        union.x = union.x.min(b.x);
        union.y = union.y.min(b.y);
        union.w = right - union.x;
        union.h = top - union.y;
    }
    let x = union.x.clamp(0.0, (sheet.width_mm - union.w).max(0.0));
    let y = union.y.clamp(0.0, (sheet.height_mm - union.h).max(0.0));
    (x - union.x, y - union.y)
}
