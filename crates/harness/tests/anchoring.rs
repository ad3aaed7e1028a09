use decor_core::{AnchorInfo, DayKey, Decoration, Point, Rect, Size, ViewId};
use decor_engine::DayCell;
use decor_harness::{drag, kv_overlay};
use decor_storage::DecorationStorage;

/// Two-week strip of 100x100 day cells starting at `origin`.
fn fortnight(origin: Point) -> Vec<DayCell> {
    (0..14)
        .map(|i| {
            let (col, row) = (i % 7, i / 7);
            let (x, y) = (origin.x + col as f64 * 100.0, origin.y + row as f64 * 100.0);
            DayCell::new(format!("2026-10-{:02}", 5 + i), Rect::new(x, y, 100.0, 100.0))
        })
        .collect()
}

#[test]
fn dropped_image_anchors_to_nearest_day() -> Result<(), Box<dyn std::error::Error>> {
    let mut overlay = kv_overlay();
    // Container center (500, 400) sits inside the cell at (450, 350)
    overlay.set_day_cells(fortnight(Point::new(50.0, 250.0)));

    let id = overlay.add_from_image("leaf.png", Size::new(160.0, 160.0), true)?;
    let d = &overlay.decorations()[0];
    assert_eq!(d.id, id);
    assert_eq!(d.rect(), Rect::new(460.0, 360.0, 80.0, 80.0));
    let anchor = d.anchor.as_ref().ok_or("not anchored")?;
    assert_eq!(anchor.date, DayKey::new("2026-10-16"));
    assert_eq!((anchor.day_offset_x, anchor.day_offset_y), (10.0, 10.0));

    Ok(())
}

#[test]
fn anchored_decorations_follow_their_day() -> Result<(), Box<dyn std::error::Error>> {
    let mut overlay = kv_overlay();
    overlay.set_day_cells(fortnight(Point::new(0.0, 0.0)));

    let mut pinned = Decoration::new("pin.png", Rect::new(215.0, 130.0, 40.0, 40.0), 0);
    pinned.anchor = Some(AnchorInfo {
        date: DayKey::new("2026-10-14"),
        day_offset_x: 15.0,
        day_offset_y: 30.0,
    });
    let free = Decoration::new("free.png", Rect::new(600.0, 20.0, 40.0, 40.0), 1);
    overlay.add_decoration(pinned.clone())?;
    overlay.add_decoration(free.clone())?;
    overlay.pump_persistence();

    // Scroll: the grid moves up and left
    overlay.set_day_cells(fortnight(Point::new(-40.0, -70.0)));
    let pinned_now = overlay.store().find(ViewId::Calendar, pinned.id).ok_or("missing")?;
    assert_eq!(pinned_now.position(), Point::new(160.0 + 15.0, 30.0 + 30.0));
    assert_eq!(pinned_now.anchor, pinned.anchor);
    let free_now = overlay.store().find(ViewId::Calendar, free.id).ok_or("missing")?;
    assert_eq!(free_now.position(), Point::new(600.0, 20.0));

    // Viewport resize with larger cells
    let wide = vec![DayCell::new("2026-10-14", Rect::new(900.0, 500.0, 180.0, 180.0))];
    overlay.resize_viewport(Rect::new(0.0, 0.0, 1400.0, 900.0), wide);
    let pinned_now = overlay.store().find(ViewId::Calendar, pinned.id).ok_or("missing")?;
    assert_eq!(pinned_now.position(), Point::new(915.0, 530.0));

    // Day scrolled out of view: position stays where it was
    overlay.set_day_cells(Vec::new());
    let pinned_now = overlay.store().find(ViewId::Calendar, pinned.id).ok_or("missing")?;
    assert_eq!(pinned_now.position(), Point::new(915.0, 530.0));

    // Re-projection is derived state and is never written back
    overlay.pump_persistence();
    let stored = overlay.storage().inner().list_decorations(ViewId::Calendar)?;
    let stored_pin = stored.iter().find(|r| r.id == pinned.id).ok_or("missing")?;
    assert_eq!((stored_pin.position_x, stored_pin.position_y), (215.0, 130.0));

    Ok(())
}

#[test]
fn reload_projects_onto_visible_days() -> Result<(), Box<dyn std::error::Error>> {
    let mut overlay = kv_overlay();
    let mut pinned = Decoration::new("pin.png", Rect::new(0.0, 0.0, 40.0, 40.0), 0);
    pinned.anchor = Some(AnchorInfo {
        date: DayKey::new("2026-10-05"),
        day_offset_x: 5.0,
        day_offset_y: 6.0,
    });
    overlay
        .storage_mut()
        .inner_mut()
        .create_decoration(ViewId::Calendar, &(&pinned).into())?;

    overlay.set_day_cells(fortnight(Point::new(300.0, 200.0)));
    overlay.request_reload(ViewId::Calendar);
    overlay.pump_persistence();

    assert_eq!(overlay.decorations()[0].position(), Point::new(305.0, 206.0));
    Ok(())
}

#[test]
fn dragging_near_a_day_re_anchors() -> Result<(), Box<dyn std::error::Error>> {
    let mut overlay = kv_overlay();
    overlay.set_day_cells(fortnight(Point::new(0.0, 0.0)));
    let d = Decoration::new("cat.png", Rect::new(650.0, 500.0, 40.0, 40.0), 0);
    overlay.add_decoration(d.clone())?;

    // Center lands at (130, 140), inside 2026-10-13
    drag(&mut overlay, d.id, Point::new(650.0, 500.0), Point::new(110.0, 120.0), 3)?;
    let moved = &overlay.decorations()[0];
    let anchor = moved.anchor.as_ref().ok_or("not anchored")?;
    assert_eq!(anchor.date, DayKey::new("2026-10-13"));
    assert_eq!((anchor.day_offset_x, anchor.day_offset_y), (10.0, 20.0));

    // Far from every day: the anchor is kept as it was
    drag(&mut overlay, d.id, Point::new(110.0, 120.0), Point::new(800.0, 600.0), 2)?;
    let moved = &overlay.decorations()[0];
    assert_eq!(moved.position(), Point::new(800.0, 600.0));
    assert_eq!(
        moved.anchor.as_ref().map(|a| a.date.clone()),
        Some(DayKey::new("2026-10-13"))
    );

    overlay.pump_persistence();
    let stored = overlay.storage().inner().list_decorations(ViewId::Calendar)?;
    assert_eq!(stored[0].date.as_deref(), Some("2026-10-13"));

    Ok(())
}
