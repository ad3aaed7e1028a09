use decor_core::{
    AnchorInfo, CoreError, DayKey, Decoration, LayoutId, LayoutRecord, Point, Rect, Resolution,
    ViewId,
};
use decor_engine::EngineError;
use decor_harness::{CallKind, drag, host_overlay, kv_overlay};
use decor_storage::DecorationStorage;

fn sticker(x: f64, y: f64, z: i64) -> Decoration {
    Decoration::new(format!("sticker-{z}.png"), Rect::new(x, y, 64.0, 48.0), z)
}

// ============================================================================
// Save / apply
// ============================================================================

#[test]
fn apply_restores_saved_collection() -> Result<(), Box<dyn std::error::Error>> {
    let mut overlay = kv_overlay();
    let mut anchored = sticker(120.5, 80.25, 1);
    anchored.rotation_degrees = 33.3;
    anchored.anchor = Some(AnchorInfo {
        date: DayKey::new("2026-03-14"),
        day_offset_x: 12.5,
        day_offset_y: -4.0,
    });
    overlay.add_decoration(anchored.clone())?;
    overlay.add_decoration(sticker(300.0, 300.0, 2))?;
    overlay.pump_persistence();
    let saved = overlay.decorations().to_vec();

    let layout = overlay.save_layout("Spring", None)?;
    assert_eq!(layout.target_resolution, Resolution::new(1000, 800));

    // Diverge: move one, add one
    drag(&mut overlay, anchored.id, Point::new(130.0, 90.0), Point::new(600.0, 500.0), 3)?;
    overlay.add_decoration(sticker(10.0, 10.0, 3))?;
    overlay.pump_persistence();
    assert_eq!(overlay.decorations().len(), 3);

    let outcome = overlay.apply_layout(layout.id)?;
    assert_eq!(outcome.applied, 2);
    assert_eq!(outcome.resize_to, None);
    assert_eq!(overlay.decorations(), saved.as_slice());

    overlay.pump_persistence();
    let stored = overlay.storage().inner().list_decorations(ViewId::Calendar)?;
    let mut stored: Vec<Decoration> = stored
        .into_iter()
        .map(Decoration::try_from)
        .collect::<Result<_, _>>()?;
    stored.sort_by_key(|d| d.z_index);
    assert_eq!(stored, saved);
    assert!(overlay.notifications().notices().is_empty());

    Ok(())
}

#[test]
fn apply_replaces_only_active_view() -> Result<(), Box<dyn std::error::Error>> {
    let mut overlay = kv_overlay();
    overlay.add_decoration(sticker(0.0, 0.0, 0))?;
    let layout = overlay.save_layout("One", None)?;

    overlay.activate_view(ViewId::Timeline);
    overlay.pump_persistence();
    overlay.add_decoration(sticker(50.0, 50.0, 0))?;
    overlay.add_decoration(sticker(90.0, 90.0, 1))?;
    overlay.pump_persistence();

    overlay.apply_layout(layout.id)?;
    overlay.pump_persistence();

    let timeline = overlay.storage().inner().list_decorations(ViewId::Timeline)?;
    assert_eq!(timeline.len(), 1);
    assert_eq!((timeline[0].position_x, timeline[0].position_y), (0.0, 0.0));
    assert_eq!(overlay.storage().inner().list_decorations(ViewId::Calendar)?.len(), 1);

    Ok(())
}

#[test]
fn different_resolution_asks_host_to_resize() -> Result<(), Box<dyn std::error::Error>> {
    let mut overlay = kv_overlay();
    overlay.add_decoration(sticker(0.0, 0.0, 0))?;
    let layout = overlay.save_layout("Laptop", Some(Resolution::new(1280, 720)))?;

    let outcome = overlay.apply_layout(layout.id)?;
    assert_eq!(outcome.resize_to, Some(Resolution::new(1280, 720)));

    Ok(())
}

#[test]
fn layouts_list_newest_first_and_delete() -> Result<(), Box<dyn std::error::Error>> {
    let mut overlay = kv_overlay();
    let mut first = overlay.save_layout("First", None)?;
    let second = overlay.save_layout("Second", None)?;
    if first.saved_at == second.saved_at {
        // Same millisecond; force an order through the backend directly
        first.saved_at -= 1;
        overlay.storage_mut().inner_mut().delete_layout(first.id)?;
        overlay.storage_mut().inner_mut().create_layout(&first.to_record()?)?;
    }

    let names: Vec<_> = overlay.list_layouts()?.into_iter().map(|l| l.name).collect();
    assert_eq!(names, vec!["Second", "First"]);

    overlay.delete_layout(second.id)?;
    let names: Vec<_> = overlay.list_layouts()?.into_iter().map(|l| l.name).collect();
    assert_eq!(names, vec!["First"]);
    assert!(matches!(
        overlay.apply_layout(second.id),
        Err(EngineError::LayoutNotFound(_))
    ));

    Ok(())
}

// ============================================================================
// Damaged layouts
// ============================================================================

#[test]
fn malformed_layout_is_refused() -> Result<(), Box<dyn std::error::Error>> {
    let mut overlay = kv_overlay();
    let keep = sticker(40.0, 40.0, 0);
    overlay.add_decoration(keep.clone())?;
    overlay.pump_persistence();

    let broken = LayoutRecord {
        id: LayoutId::new(),
        name: "Broken".into(),
        resolution_width: 1000,
        resolution_height: 800,
        serialized_decorations: "[{\"id\": 42".into(),
        saved_at: 1,
    };
    overlay.storage_mut().inner_mut().create_layout(&broken)?;
    overlay.storage().clear_calls();

    let result = overlay.apply_layout(broken.id);
    assert!(matches!(
        result,
        Err(EngineError::Core(CoreError::MalformedLayout { .. }))
    ));
    assert_eq!(overlay.decorations(), &[keep]);
    assert!(overlay.pending_persistence().is_empty());
    assert_eq!(overlay.notifications().errors().count(), 1);

    overlay.pump_persistence();
    assert_eq!(overlay.storage().count(CallKind::DeleteDecoration), 0);
    assert_eq!(overlay.storage().count(CallKind::CreateDecoration), 0);

    Ok(())
}

#[test]
fn layout_with_invalid_geometry_is_refused() -> Result<(), Box<dyn std::error::Error>> {
    let mut overlay = kv_overlay();
    let mut bad = sticker(0.0, 0.0, 0);
    bad.width = -5.0;
    let record = LayoutRecord {
        id: LayoutId::new(),
        name: "Negative".into(),
        resolution_width: 1000,
        resolution_height: 800,
        serialized_decorations: serde_json::to_string(&vec![bad])?,
        saved_at: 1,
    };
    overlay.storage_mut().inner_mut().create_layout(&record)?;

    assert!(overlay.apply_layout(record.id).is_err());
    assert!(overlay.decorations().is_empty());

    Ok(())
}

#[test]
fn layout_repeating_an_id_is_refused() -> Result<(), Box<dyn std::error::Error>> {
    let mut overlay = kv_overlay();
    let keep = sticker(40.0, 40.0, 0);
    overlay.add_decoration(keep.clone())?;
    overlay.pump_persistence();

    let first = sticker(0.0, 0.0, 1);
    let mut copy = sticker(200.0, 200.0, 2);
    copy.id = first.id;
    let record = LayoutRecord {
        id: LayoutId::new(),
        name: "Twice".into(),
        resolution_width: 1000,
        resolution_height: 800,
        serialized_decorations: serde_json::to_string(&vec![first, copy])?,
        saved_at: 1,
    };
    overlay.storage_mut().inner_mut().create_layout(&record)?;

    assert!(matches!(
        overlay.apply_layout(record.id),
        Err(EngineError::Core(CoreError::MalformedLayout { .. }))
    ));
    assert_eq!(overlay.decorations(), &[keep.clone()]);
    overlay.pump_persistence();
    let stored = overlay.storage().inner().list_decorations(ViewId::Calendar)?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, keep.id);

    Ok(())
}

#[test]
fn failed_save_reports_notice() -> Result<(), Box<dyn std::error::Error>> {
    let mut overlay = kv_overlay();
    overlay.storage().fail_next(CallKind::CreateLayout, 1);

    assert!(matches!(
        overlay.save_layout("Nope", None),
        Err(EngineError::Storage(_))
    ));
    assert_eq!(overlay.notifications().errors().count(), 1);
    assert!(overlay.list_layouts()?.is_empty());

    Ok(())
}

// ============================================================================
// Host database
// ============================================================================

#[test]
fn layouts_round_trip_through_host() -> Result<(), Box<dyn std::error::Error>> {
    let mut overlay = host_overlay()?;
    let mut rotated = sticker(5.5, 6.5, 0);
    rotated.rotation_degrees = 271.125;
    overlay.add_decoration(rotated)?;
    overlay.add_decoration(sticker(700.0, 100.0, 4))?;
    overlay.pump_persistence();
    let saved = overlay.decorations().to_vec();

    let layout = overlay.save_layout("Host", None)?;
    overlay.request_delete(saved[1].id)?;
    overlay.confirm_delete()?;
    overlay.pump_persistence();
    assert_eq!(overlay.decorations().len(), 1);

    overlay.apply_layout(layout.id)?;
    overlay.pump_persistence();
    assert_eq!(overlay.decorations(), saved.as_slice());

    overlay.request_reload(ViewId::Calendar);
    overlay.pump_persistence();
    let mut reloaded = overlay.decorations().to_vec();
    reloaded.sort_by_key(|d| d.z_index);
    assert_eq!(reloaded, saved);
    assert!(overlay.notifications().notices().is_empty());

    Ok(())
}
