use paper_split::*;

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-2, "expected {b}, got {a}");
}

fn session() -> SplitSession {
    let mut session = SplitSession::new(ImageDimensions::new(1000.0, 5000.0), PageSize::A4);
    session.handle_layout(400.0, 800.0);
    session
}

#[test]
fn test_session_before_layout() {
    let mut session = SplitSession::new(ImageDimensions::new(1000.0, 5000.0), PageSize::A4);

    assert_eq!(session.metrics().display, ImageDimensions::ZERO);
    assert!(matches!(session.add_split(), Err(SplitError::LayoutPending)));
}

#[test]
fn test_session_add_split_uses_scroll() {
    let mut session = session();
    session.handle_scroll(600.0);

    // scale 0.4: (600 + 400) / 0.4
    let position = session.add_split().unwrap();
    assert_close(position, 2500.0);
    assert_close(session.display_positions()[0], 1000.0);
}

#[test]
fn test_session_add_split_zoomed_out() {
    let mut session = session();
    session.handle_scroll(600.0);
    session.set_zoom(false);

    // Whole image in 800px: scale 0.16, middle of the viewport is mid-image
    let metrics = session.metrics();
    assert_close(metrics.scale_factor, 0.16);

    let position = session.add_split().unwrap();
    assert_close(position, 2500.0);
}

#[test]
fn test_session_drag_with_top_inset() {
    let mut session = session();
    session.set_top_inset(40.0).unwrap();
    session.add_split().unwrap();
    session.add_split().unwrap();

    session.handle_scroll(200.0);
    // (240 - 40 + 200) / 0.4
    let position = session.update_split(0, 240.0).unwrap();
    assert_close(position, 1000.0);

    session.update_split(1, 40.0).unwrap();
    assert!(session.positions()[0] > session.positions()[1]);

    session.handle_drag_end();
    assert!(session.positions()[0] <= session.positions()[1]);
}

#[test]
fn test_session_zoom_round_trip_keeps_edit_position() {
    let mut session = session();
    session.handle_scroll(1200.0);

    let out = session.toggle_zoom().unwrap();
    assert_eq!(out.offset, 0.0);

    let back = session.handle_pinch(2.0).unwrap();
    assert_eq!(back.offset, 1200.0);

    let position = session.add_split().unwrap();
    assert_close(position, 4000.0);
}

#[test]
fn test_session_auto_split() {
    let mut session = session();
    assert_eq!(session.auto_split(), 3);
    assert_eq!(session.positions().len(), 3);

    session.remove_split(0).unwrap();
    assert_eq!(session.positions().len(), 2);

    session.remove_all_splits();
    assert!(session.positions().is_empty());
}

#[test]
fn test_session_manual_skips_auto_split() {
    let mut session = SplitSession::new(ImageDimensions::new(1000.0, 5000.0), PageSize::Manual);
    session.handle_layout(400.0, 800.0);

    assert_eq!(session.auto_split(), 0);
    assert!(session.positions().is_empty());
}

#[test]
fn test_session_snapshot_sorted() {
    let mut session = session();
    session.add_split().unwrap();
    session.handle_scroll(1000.0);
    session.add_split().unwrap();
    session.update_split(0, 800.0).unwrap();

    let snapshot = session.snapshot();
    assert!(snapshot.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_session_rejects_bad_top_inset() {
    let mut session = session();
    session.set_top_inset(40.0).unwrap();

    for bad in [-1.0, f32::NAN, f32::INFINITY] {
        assert!(matches!(
            session.set_top_inset(bad),
            Err(SplitError::Config(_))
        ));
    }
    assert_eq!(session.top_inset(), 40.0);

    session.add_split().unwrap();
    let position = session.update_split(0, 240.0).unwrap();
    assert_close(position, 500.0); // (240 - 40) / 0.4
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_session_applies_loaded_top_inset() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), r#"{ "top_inset": 80.0 }"#).unwrap();
    let options = SplitOptions::load(temp_file.path()).await.unwrap();

    let actual = ImageDimensions::new(1000.0, 5000.0);
    let mut configured = SplitSession::from_options(actual, &options);
    let mut plain = SplitSession::new(actual, options.page_size);

    for session in [&mut configured, &mut plain] {
        session.handle_layout(400.0, 800.0);
        session.add_split().unwrap();
    }

    // (280 - 80) / 0.4 against 280 / 0.4
    assert_close(configured.update_split(0, 280.0).unwrap(), 500.0);
    assert_close(plain.update_split(0, 280.0).unwrap(), 700.0);
}

#[test]
fn test_session_flat_custom_page_auto_split() {
    let options = SplitOptions {
        page_size: PageSize::Custom {
            width_mm: 1000.0,
            height_mm: 1e-6,
        },
        ..Default::default()
    };
    assert!(options.validate().is_ok());

    let actual = ImageDimensions::new(1000.0, 5000.0);
    let mut session = SplitSession::from_options(actual, &options);
    assert_eq!(session.auto_split(), 500);

    // Every split sits on the top edge, so the image stays whole
    let segments = plan_segments(actual, &session.snapshot());
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].height, 5000);
}
