//! Integration tests for layout file save/load and normalization.

use imposekit_core::geometry::Rotation;
use imposekit_editor::{Design, Face, Layout, LayoutFile, Slot, Work, FILE_FORMAT_VERSION};

fn sample_layout() -> Layout {
    let mut layout = Layout::default();
    let mut slot = Slot::new(Face::Front, 10.0, 20.0, 85.0, 55.0);
    slot.rotation = Rotation::R90;
    slot.work_id = Some("w1".to_string());
    slot.design_ref = Some("d1".to_string());
    slot.crop_marks = true;
    layout.add_slot(slot);
    layout.add_slot(Slot::new(Face::Back, 10.0, 20.0, 85.0, 55.0));
    layout.upsert_work(Work {
        id: "w1".to_string(),
        name: "Business cards".to_string(),
        final_size_mm: (85.0, 55.0),
        desired_copies: 500,
        default_bleed_mm: 2.0,
        has_bleed: true,
    });
    layout.upsert_design(Design {
        design_ref: "d1".to_string(),
        filename: "cards.pdf".to_string(),
        width_mm: 89.0,
        height_mm: 59.0,
        bleed_mm: 2.0,
        allow_rotation: true,
        forms_per_plate: 1,
        work_id: Some("w1".to_string()),
    });
    layout.set_active_face(Face::Back);
    layout
}

#[test]
fn test_file_round_trip_through_disk() {
    let layout = sample_layout();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.layout.json");

    let file = LayoutFile::from_layout(&layout, "Job 42");
    file.save_to_file(&path).unwrap();

    let loaded = LayoutFile::load_from_file(&path).unwrap();
    assert_eq!(loaded.version, FILE_FORMAT_VERSION);
    assert_eq!(loaded.metadata.name, "Job 42");
    assert_eq!(loaded.into_layout(), layout);
}

#[test]
fn test_load_missing_file_fails_with_context() {
    let err = LayoutFile::load_from_file("/nonexistent/job.layout.json").unwrap_err();
    assert!(err.to_string().contains("read"));
}

#[test]
fn test_empty_object_loads_as_default_layout() {
    let file: LayoutFile = serde_json::from_str("{}").unwrap();
    let layout = file.into_layout();
    assert_eq!(layout.sheet.width_mm, 320.0);
    assert_eq!(layout.sheet.height_mm, 450.0);
    assert_eq!(layout.faces(), &[Face::Front]);
    assert!(layout.slots().is_empty());
    assert_eq!(layout.imposition_engine, "default");
}

#[test]
fn test_engine_response_style_payload_normalizes() {
    // Engines reply with minimal slot records; ids, faces, and rotations
    // are filled or repaired on ingest.
    let json = r#"{
        "sheet_mm": [450, 320],
        "slots": [
            {"x_mm": 0, "y_mm": 0, "w_mm": 90, "h_mm": 60},
            {"x_mm": 95, "y_mm": 0, "w_mm": 90, "h_mm": 60, "rotation_deg": 270},
            {"x_mm": -5, "y_mm": 0, "w_mm": 0, "h_mm": 60}
        ],
        "works": [{"id": "w1", "desired_copies": 0}]
    }"#;
    let layout = serde_json::from_str::<LayoutFile>(json)
        .unwrap()
        .into_layout();

    assert_eq!(layout.sheet.width_mm, 450.0);
    // The zero-width slot was dropped.
    assert_eq!(layout.slots().len(), 2);
    assert!(layout.slots().iter().all(|s| s.id != 0));
    assert_eq!(layout.slots()[1].rotation, Rotation::R270);
    // Copy counts floor at 1.
    assert_eq!(layout.work("w1").unwrap().desired_copies, 1);
}

#[test]
fn test_negative_margins_clamp_to_zero() {
    let json = r#"{"margins_mm": [-5, 10, 10, -1]}"#;
    let layout = serde_json::from_str::<LayoutFile>(json)
        .unwrap()
        .into_layout();
    assert_eq!(layout.sheet.margins.left, 0.0);
    assert_eq!(layout.sheet.margins.right, 10.0);
    assert_eq!(layout.sheet.margins.bottom, 0.0);
}

#[test]
fn test_wire_field_names_are_stable() {
    let file = LayoutFile::from_layout(&sample_layout(), "names");
    let value = serde_json::to_value(&file).unwrap();

    assert!(value.get("snapSettings").is_some());
    assert!(value.get("spacingSettings").is_some());
    assert!(value["snapSettings"].get("snapSlots").is_some());
    assert!(value["spacingSettings"].get("spacingX_mm").is_some());
    assert_eq!(value["designs"][0]["ref"], "d1");
    assert_eq!(value["slots"][0]["rotation_deg"], 90);
    // Work sizes travel as a [width, height] pair.
    assert_eq!(
        value["works"][0]["final_size_mm"],
        serde_json::json!([85.0, 55.0])
    );
    assert!(value["works"][0].get("desired_copies").is_some());
}

#[test]
fn test_work_size_array_round_trips() {
    let json = r#"{"works": [{"id": "w1", "final_size_mm": [85, 55]}]}"#;
    let layout = serde_json::from_str::<LayoutFile>(json)
        .unwrap()
        .into_layout();
    assert_eq!(layout.work("w1").unwrap().final_size_mm, (85.0, 55.0));
}
