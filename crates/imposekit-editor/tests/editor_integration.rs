//! Integration tests for the editor: commands, gestures, selection.

use imposekit_core::geometry::Point;
use imposekit_core::error::LayoutError;
use imposekit_editor::{
    EditorCommand, EditorState, Face, Layout, ResizeHandle, Slot, SlotEdit, Work,
    MIN_SLOT_SIZE_MM,
};

fn editor_with_slots(positions: &[(f64, f64)]) -> (EditorState, Vec<u64>) {
    let mut layout = Layout::default();
    let ids = positions
        .iter()
        .map(|&(x, y)| layout.add_slot(Slot::new(Face::Front, x, y, 40.0, 30.0)))
        .collect();
    (EditorState::new(layout), ids)
}

#[test]
fn test_add_and_delete_slot() {
    let mut editor = EditorState::default();
    editor
        .dispatch(EditorCommand::AddSlot {
            x_mm: 10.0,
            y_mm: 10.0,
            w_mm: 85.0,
            h_mm: 55.0,
        })
        .unwrap();
    assert_eq!(editor.layout.slots().len(), 1);
    // The new slot is selected and inherits the sheet default bleed.
    assert_eq!(editor.selection.len(), 1);
    assert_eq!(
        editor.layout.slots()[0].bleed_mm,
        editor.layout.sheet.default_bleed_mm
    );

    editor.dispatch(EditorCommand::DeleteSelection).unwrap();
    assert!(editor.layout.slots().is_empty());
    assert!(editor.selection.is_empty());
}

#[test]
fn test_delete_with_nothing_selected_is_rejected() {
    let mut editor = EditorState::default();
    assert!(matches!(
        editor.dispatch(EditorCommand::DeleteSelection),
        Err(LayoutError::NothingSelected)
    ));
}

#[test]
fn test_add_slot_for_work_sizes_from_work() {
    let mut editor = EditorState::default();
    editor
        .dispatch(EditorCommand::UpsertWork(Work {
            id: "w1".to_string(),
            name: "Cards".to_string(),
            final_size_mm: (85.0, 55.0),
            desired_copies: 500,
            default_bleed_mm: 3.0,
            has_bleed: true,
        }))
        .unwrap();
    editor
        .dispatch(EditorCommand::AddSlotForWork {
            work_id: "w1".to_string(),
            x_mm: 20.0,
            y_mm: 20.0,
        })
        .unwrap();

    let slot = &editor.layout.slots()[0];
    assert_eq!((slot.w_mm, slot.h_mm), (85.0, 55.0));
    assert_eq!(slot.work_id.as_deref(), Some("w1"));
    assert_eq!(slot.bleed_mm, 3.0);

    // The work is now referenced and refuses deletion.
    assert!(matches!(
        editor.dispatch(EditorCommand::RemoveWork {
            id: "w1".to_string()
        }),
        Err(LayoutError::WorkInUse { .. })
    ));
}

#[test]
fn test_grouped_drag_moves_both_and_snaps_once() {
    let (mut editor, ids) = editor_with_slots(&[(0.0, 0.0), (60.0, 0.0)]);
    editor.select(ids[0], false);
    editor.select(ids[1], true);
    editor.dispatch(EditorCommand::GroupSelection).unwrap();
    let group = editor.layout.slot(ids[0]).unwrap().group_id.clone();
    assert!(group.is_some());
    assert_eq!(editor.layout.slot(ids[1]).unwrap().group_id, group);

    // Snapping off so the applied delta is exactly the pointer delta.
    let mut settings = editor.layout.snap_settings;
    settings.snap_slots = false;
    settings.snap_margins = false;
    editor
        .dispatch(EditorCommand::SetSnapSettings(settings))
        .unwrap();

    editor.select(ids[0], false);
    editor.begin_drag(Point::new(5.0, 5.0)).unwrap();
    editor.update_drag(Point::new(15.0, 0.0));
    editor.end_drag();

    // Both group members moved by the identical (10, -5) delta.
    let a = editor.layout.slot(ids[0]).unwrap();
    let b = editor.layout.slot(ids[1]).unwrap();
    assert_eq!((a.x_mm, a.y_mm), (10.0, 0.0)); // y clamped at sheet bottom
    assert_eq!((b.x_mm, b.y_mm), (70.0, 0.0));
}

#[test]
fn test_drag_into_edge_keeps_relative_offsets() {
    // 40 mm slots at x=0 and x=270 on a 320 mm sheet; dragging +20 runs
    // the right slot off the sheet.
    let (mut editor, ids) = editor_with_slots(&[(0.0, 10.0), (270.0, 10.0)]);
    let mut settings = editor.layout.snap_settings;
    settings.snap_slots = false;
    settings.snap_margins = false;
    editor
        .dispatch(EditorCommand::SetSnapSettings(settings))
        .unwrap();

    editor.select(ids[0], false);
    editor.select(ids[1], true);
    editor.begin_drag(Point::new(0.0, 0.0)).unwrap();
    editor.update_drag(Point::new(20.0, 0.0));
    editor.end_drag();

    // One common correction pulls the whole set back: both slots shifted
    // by +10, so the 270 mm offset between them is intact.
    let a = editor.layout.slot(ids[0]).unwrap();
    let b = editor.layout.slot(ids[1]).unwrap();
    assert_eq!(a.x_mm, 10.0);
    assert_eq!(b.x_mm, 280.0);
    assert_eq!(b.x_mm - a.x_mm, 270.0);
    assert!(b.render_box().right() <= editor.layout.sheet.width_mm);
}

#[test]
fn test_drag_is_one_undo_step() {
    let (mut editor, ids) = editor_with_slots(&[(0.0, 0.0)]);
    editor.select(ids[0], false);
    editor.begin_drag(Point::new(0.0, 0.0)).unwrap();
    for i in 1..=20 {
        editor.update_drag(Point::new(i as f64, 0.0));
    }
    editor.end_drag();

    assert!(editor.can_undo());
    editor.undo();
    assert_eq!(editor.layout.slot(ids[0]).unwrap().x_mm, 0.0);
    assert!(!editor.can_undo());
}

#[test]
fn test_locked_slot_refuses_drag() {
    let (mut editor, ids) = editor_with_slots(&[(0.0, 0.0)]);
    editor.select(ids[0], false);
    editor
        .dispatch(EditorCommand::EditSlot {
            id: ids[0],
            edit: SlotEdit {
                locked: Some(true),
                ..SlotEdit::default()
            },
        })
        .unwrap();

    assert!(matches!(
        editor.begin_drag(Point::new(0.0, 0.0)),
        Err(LayoutError::LockedSlot { .. })
    ));
}

#[test]
fn test_locked_group_mate_stays_put() {
    let (mut editor, ids) = editor_with_slots(&[(0.0, 0.0), (60.0, 0.0)]);
    editor.select(ids[0], false);
    editor.select(ids[1], true);
    editor.dispatch(EditorCommand::GroupSelection).unwrap();
    editor
        .dispatch(EditorCommand::EditSlot {
            id: ids[1],
            edit: SlotEdit {
                locked: Some(true),
                ..SlotEdit::default()
            },
        })
        .unwrap();

    let mut settings = editor.layout.snap_settings;
    settings.snap_slots = false;
    settings.snap_margins = false;
    editor
        .dispatch(EditorCommand::SetSnapSettings(settings))
        .unwrap();

    editor.select(ids[0], false);
    editor.begin_drag(Point::new(0.0, 0.0)).unwrap();
    editor.update_drag(Point::new(10.0, 10.0));
    editor.end_drag();

    assert_eq!(editor.layout.slot(ids[0]).unwrap().x_mm, 10.0);
    // The locked mate was excluded from the drag set.
    assert_eq!(editor.layout.slot(ids[1]).unwrap().x_mm, 60.0);
}

#[test]
fn test_resize_floors_at_minimum_size() {
    let (mut editor, ids) = editor_with_slots(&[(50.0, 50.0)]);
    editor.begin_resize(ids[0], ResizeHandle::Right).unwrap();
    editor.update_resize(-100.0, 0.0);
    editor.end_resize();

    let slot = editor.layout.slot(ids[0]).unwrap();
    assert_eq!(slot.w_mm, MIN_SLOT_SIZE_MM);
    // The untouched axis is exactly as it was.
    assert_eq!(slot.h_mm, 30.0);
    assert_eq!(slot.y_mm, 50.0);
}

#[test]
fn test_resize_left_handle_keeps_right_edge() {
    let (mut editor, ids) = editor_with_slots(&[(50.0, 50.0)]);
    editor.begin_resize(ids[0], ResizeHandle::Left).unwrap();
    editor.update_resize(10.0, 0.0);
    editor.end_resize();

    let slot = editor.layout.slot(ids[0]).unwrap();
    assert_eq!(slot.x_mm, 60.0);
    assert_eq!(slot.w_mm, 30.0);
    assert_eq!(slot.logical_box().right(), 90.0);
}

#[test]
fn test_face_switch_clears_selection_without_history() {
    let (mut editor, ids) = editor_with_slots(&[(0.0, 0.0)]);
    editor.select(ids[0], false);
    assert_eq!(editor.selection.len(), 1);

    editor
        .dispatch(EditorCommand::SetActiveFace(Face::Back))
        .unwrap();
    assert!(editor.selection.is_empty());
    assert_eq!(editor.layout.active_face(), Face::Back);
    // Navigation is not an edit.
    assert!(!editor.can_undo());
}

#[test]
fn test_duplicate_selection_offsets_copies() {
    let (mut editor, ids) = editor_with_slots(&[(10.0, 10.0)]);
    editor.select(ids[0], false);
    editor
        .dispatch(EditorCommand::DuplicateSelection {
            dx_mm: 5.0,
            dy_mm: 5.0,
        })
        .unwrap();

    assert_eq!(editor.layout.slots().len(), 2);
    // The copy is selected, offset, and ungrouped.
    let copy_id = editor.selection.ids()[0];
    assert_ne!(copy_id, ids[0]);
    let copy = editor.layout.slot(copy_id).unwrap();
    assert_eq!((copy.x_mm, copy.y_mm), (15.0, 15.0));
    assert_eq!(copy.group_id, None);
}

#[test]
fn test_duplicate_face_replaces_back() {
    let (mut editor, _) = editor_with_slots(&[(0.0, 0.0), (60.0, 0.0)]);
    editor
        .dispatch(EditorCommand::DuplicateFace { to: Face::Back })
        .unwrap();
    assert_eq!(editor.layout.slots_on_face(Face::Back).count(), 2);

    // Running it again does not accumulate.
    editor
        .dispatch(EditorCommand::DuplicateFace { to: Face::Back })
        .unwrap();
    assert_eq!(editor.layout.slots_on_face(Face::Back).count(), 2);
}

#[test]
fn test_slot_edit_validation_leaves_model_untouched() {
    let (mut editor, ids) = editor_with_slots(&[(0.0, 0.0)]);
    let before = editor.layout.clone();
    let result = editor.dispatch(EditorCommand::EditSlot {
        id: ids[0],
        edit: SlotEdit {
            x_mm: Some(99.0),
            w_mm: Some(1.0), // below the minimum
            ..SlotEdit::default()
        },
    });
    assert!(result.is_err());
    assert_eq!(editor.layout, before);
}

#[test]
fn test_select_at_hits_topmost_and_clears_on_miss() {
    let (mut editor, ids) = editor_with_slots(&[(0.0, 0.0), (20.0, 0.0)]);
    // Overlap region belongs to the later (topmost) slot.
    editor.select_at(Point::new(25.0, 10.0), false);
    assert_eq!(editor.selection.primary(), Some(ids[1]));

    editor.select_at(Point::new(300.0, 400.0), false);
    assert!(editor.selection.is_empty());
}
