use image::{DynamicImage, GenericImageView, RgbImage};
use paper_split::MemoryCodec;
use paper_split_runtime::*;
use std::sync::Arc;
use tokio::sync::mpsc;

type Update = SessionUpdate<DynamicImage>;

/// Run a worker over `commands` and collect everything it sent back
async fn run_session(
    page_size: PageSize,
    commands: Vec<SessionCommand>,
    max_in_flight: usize,
) -> (SplitSession, Vec<Update>) {
    let image = DynamicImage::ImageRgb8(RgbImage::new(100, 500));
    let actual = ImageDimensions::new(100.0, 500.0);
    let session = SplitSession::new(actual, page_size);

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();

    for cmd in commands {
        command_tx.send(cmd).unwrap();
    }
    drop(command_tx);

    let worker = SessionWorker::new(session, MemoryCodec, Arc::new(image))
        .with_max_in_flight_crops(max_in_flight);
    let session = worker.run(command_rx, update_tx).await;

    let mut updates = Vec::new();
    while let Ok(update) = update_rx.try_recv() {
        updates.push(update);
    }
    (session, updates)
}

fn segment_heights(updates: &[Update]) -> Option<Vec<u32>> {
    updates.iter().find_map(|u| match u {
        SessionUpdate::Segmented { outputs } => {
            Some(outputs.iter().map(|o| o.dimensions().1).collect())
        }
        _ => None,
    })
}

#[tokio::test]
async fn test_layout_reports_metrics() {
    let (_, updates) = run_session(
        PageSize::A4,
        vec![SessionCommand::Layout {
            width: 200.0,
            height: 400.0,
        }],
        1,
    )
    .await;

    match &updates[0] {
        SessionUpdate::Metrics(metrics) => {
            assert_eq!(metrics.display, ImageDimensions::new(200.0, 1000.0));
            assert_eq!(metrics.scale_factor, 2.0);
        }
        other => panic!("Expected metrics, got {other:?}"),
    }
}

#[tokio::test]
async fn test_queued_scrolls_coalesce_before_next_command() {
    let (session, _) = run_session(
        PageSize::Manual,
        vec![
            SessionCommand::Layout {
                width: 200.0,
                height: 400.0,
            },
            SessionCommand::Scroll { offset: 100.0 },
            SessionCommand::Scroll { offset: 300.0 },
            SessionCommand::Scroll { offset: 400.0 },
            SessionCommand::AddSplit,
        ],
        1,
    )
    .await;

    // scale 2: (400 + 200) / 2
    assert_eq!(session.positions(), &[300.0]);
    assert_eq!(session.zoom().current_offset(), 400.0);
}

#[tokio::test]
async fn test_zoom_sends_scroll_command() {
    let (_, updates) = run_session(
        PageSize::A4,
        vec![
            SessionCommand::Layout {
                width: 200.0,
                height: 400.0,
            },
            SessionCommand::Scroll { offset: 250.0 },
            SessionCommand::ToggleZoom,
            SessionCommand::Pinch { scale: 1.8 },
        ],
        1,
    )
    .await;

    let scrolls: Vec<f32> = updates
        .iter()
        .filter_map(|u| match u {
            SessionUpdate::ScrollTo(cmd) => Some(cmd.offset),
            _ => None,
        })
        .collect();
    assert_eq!(scrolls, vec![0.0, 250.0]);
}

#[tokio::test]
async fn test_edit_errors_are_reported() {
    let (_, updates) = run_session(
        PageSize::A4,
        vec![
            SessionCommand::AddSplit,
            SessionCommand::RemoveSplit { index: 2 },
        ],
        1,
    )
    .await;

    let errors: Vec<&String> = updates
        .iter()
        .filter_map(|u| match u {
            SessionUpdate::Error { message } => Some(message),
            _ => None,
        })
        .collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("layout"));
    assert!(errors[1].contains("out of range"));
}

#[tokio::test]
async fn test_confirm_splits_snapshot() {
    let (_, updates) = run_session(
        PageSize::Custom {
            width_mm: 100.0,
            height_mm: 200.0,
        },
        vec![
            SessionCommand::Layout {
                width: 200.0,
                height: 400.0,
            },
            SessionCommand::AutoSplit,
            SessionCommand::Confirm,
            SessionCommand::RemoveAllSplits,
        ],
        1,
    )
    .await;

    assert_eq!(segment_heights(&updates), Some(vec![200, 200, 100]));
}

#[tokio::test]
async fn test_confirm_with_concurrent_crops() {
    let (_, updates) = run_session(
        PageSize::Custom {
            width_mm: 100.0,
            height_mm: 200.0,
        },
        vec![SessionCommand::AutoSplit, SessionCommand::Confirm],
        3,
    )
    .await;

    assert_eq!(segment_heights(&updates), Some(vec![200, 200, 100]));
}

#[tokio::test]
async fn test_manual_page_never_auto_splits() {
    let (session, updates) = run_session(
        PageSize::Manual,
        vec![SessionCommand::AutoSplit, SessionCommand::Confirm],
        1,
    )
    .await;

    assert!(session.positions().is_empty());
    assert_eq!(segment_heights(&updates), Some(vec![500]));
}

#[tokio::test]
async fn test_invalid_top_inset_is_rejected() {
    let (session, updates) = run_session(
        PageSize::A4,
        vec![
            SessionCommand::Layout {
                width: 200.0,
                height: 400.0,
            },
            SessionCommand::TopInset { top_inset: 20.0 },
            SessionCommand::TopInset {
                top_inset: f32::NAN,
            },
            SessionCommand::TopInset { top_inset: -5.0 },
            SessionCommand::AddSplit,
            SessionCommand::UpdateSplit {
                index: 0,
                pointer_y: 120.0,
            },
        ],
        1,
    )
    .await;

    let errors = updates
        .iter()
        .filter(|u| matches!(u, SessionUpdate::Error { .. }))
        .count();
    assert_eq!(errors, 2);

    // scale 2: (120 - 20) / 2
    assert_eq!(session.top_inset(), 20.0);
    assert_eq!(session.positions(), &[50.0]);
}

#[tokio::test]
async fn test_worker_from_options() {
    let options = SplitOptions {
        page_size: PageSize::Manual,
        top_inset: 30.0,
        max_in_flight_crops: 2,
        ..Default::default()
    };
    let image = DynamicImage::ImageRgb8(RgbImage::new(100, 500));
    let actual = ImageDimensions::new(100.0, 500.0);

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, _update_rx) = mpsc::unbounded_channel::<Update>();
    command_tx
        .send(SessionCommand::Layout {
            width: 200.0,
            height: 400.0,
        })
        .unwrap();
    command_tx.send(SessionCommand::AddSplit).unwrap();
    command_tx
        .send(SessionCommand::UpdateSplit {
            index: 0,
            pointer_y: 230.0,
        })
        .unwrap();
    drop(command_tx);

    let worker = SessionWorker::from_options(actual, &options, MemoryCodec, Arc::new(image));
    let session = worker.run(command_rx, update_tx).await;

    assert_eq!(session.page_size(), PageSize::Manual);
    // (230 - 30) / 2
    assert_eq!(session.positions(), &[100.0]);
}
