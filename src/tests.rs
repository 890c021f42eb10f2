//! Board scenarios across coordinator, merger and view.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::mpsc;

use crate::testing::{Call, CountingDetailView, RecordingPersistence, StatusGate};
use crate::traits::PassthroughEnricher;
use crate::{
    ApplicantStatus, Board, BoardConfig, BoardEvent, DragOutcome, DropTarget, Item, ItemRecord,
    MergeOutcome, PositionUpdate, ReconcilePhase, StatusUpdate,
};

fn item(id: &str, status: ApplicantStatus, position: f64) -> Item {
    Item::new(id, status, position)
}

async fn board_with(items: Vec<Item>, persistence: Arc<RecordingPersistence>) -> Board {
    let board = Board::with_persistence(BoardConfig::default(), persistence);
    board.load(items).await;
    board
}

#[tokio::test]
async fn drag_into_empty_column_commits_status_then_position() {
    let persistence = Arc::new(RecordingPersistence::new());
    let board = board_with(
        vec![
            item("1", ApplicantStatus::Submitted, 1.0),
            item("2", ApplicantStatus::Submitted, 2.0),
        ],
        persistence.clone(),
    )
    .await;
    let verified = DropTarget::column(ApplicantStatus::Verified);

    assert!(board.drag_start("1").await);
    board.drag_over("1", &verified).await;
    let outcome = board.drag_end("1", Some(verified)).await;

    assert_eq!(
        outcome,
        DragOutcome::Committed {
            status: ApplicantStatus::Verified,
            position: Some(1.0)
        }
    );
    assert_eq!(
        persistence.calls(),
        vec![
            Call::Status(StatusUpdate {
                id: "1".to_string(),
                new_status: ApplicantStatus::Verified,
                previous_status: ApplicantStatus::Submitted,
                updated_by: None,
            }),
            Call::Position(PositionUpdate {
                id: "1".to_string(),
                position: 1.0
            }),
        ]
    );
    assert_eq!(
        board.item("1").await,
        Some(item("1", ApplicantStatus::Verified, 1.0))
    );
    assert_eq!(
        board.item("2").await,
        Some(item("2", ApplicantStatus::Submitted, 2.0))
    );
    assert_eq!(board.phase("1").await, ReconcilePhase::Idle);
}

#[tokio::test]
async fn cross_column_drop_on_card_lands_before_it() {
    let persistence = Arc::new(RecordingPersistence::new());
    let board = board_with(
        vec![
            item("1", ApplicantStatus::Submitted, 1.0),
            item("a", ApplicantStatus::Passed, 1.0),
            item("b", ApplicantStatus::Passed, 2.0),
        ],
        persistence,
    )
    .await;

    board.drag_start("1").await;
    assert_eq!(
        board.drag_over("1", &DropTarget::card("b")).await,
        Some(ApplicantStatus::Passed)
    );
    board.drag_end("1", Some(DropTarget::card("b"))).await;

    let ids: Vec<String> = board
        .column(ApplicantStatus::Passed)
        .await
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec!["a", "1", "b"]);
    assert_eq!(board.item("1").await.unwrap().position, 1.5);
}

#[tokio::test]
async fn update_during_commit_does_not_touch_position() {
    let gate = StatusGate::default();
    let persistence = Arc::new(RecordingPersistence::new().gated(gate.clone()));
    let board = Arc::new(
        board_with(
            vec![
                item("1", ApplicantStatus::Submitted, 7.0),
                item("v", ApplicantStatus::Verified, 3.0),
            ],
            persistence.clone(),
        )
        .await,
    );

    board.drag_start("1").await;
    board
        .drag_over("1", &DropTarget::column(ApplicantStatus::Verified))
        .await;

    let dragging = board.clone();
    let commit = tokio::spawn(async move {
        dragging
            .drag_end("1", Some(DropTarget::column(ApplicantStatus::Verified)))
            .await
    });

    gate.entered.notified().await;
    assert_eq!(board.phase("1").await, ReconcilePhase::Committing);

    let mut record = ItemRecord::new("1", ApplicantStatus::Verified);
    record.payload.insert("note".to_string(), json!("called back"));
    let merged = board
        .apply_event(BoardEvent::Updated {
            record,
            previous: None,
        })
        .await;
    assert_eq!(merged, MergeOutcome::Updated { in_flight: true });

    let mid_flight = board.item("1").await.unwrap();
    assert_eq!(mid_flight.position, 7.0);
    assert_eq!(mid_flight.payload["note"], "called back");

    gate.release.notify_one();
    let outcome = commit.await.unwrap();
    assert_eq!(
        outcome,
        DragOutcome::Committed {
            status: ApplicantStatus::Verified,
            position: Some(4.0)
        }
    );
    let settled = board.item("1").await.unwrap();
    assert_eq!(settled.position, 4.0);
    assert_eq!(settled.payload["note"], "called back");
}

#[tokio::test]
async fn delete_during_commit_skips_position_write() {
    let gate = StatusGate::default();
    let persistence = Arc::new(RecordingPersistence::new().gated(gate.clone()));
    let board = Arc::new(
        board_with(
            vec![item("1", ApplicantStatus::Submitted, 1.0)],
            persistence.clone(),
        )
        .await,
    );
    let rejected = DropTarget::column(ApplicantStatus::Rejected);

    board.drag_start("1").await;
    board.drag_over("1", &rejected).await;

    let dragging = board.clone();
    let commit = tokio::spawn(async move { dragging.drag_end("1", Some(rejected)).await });

    gate.entered.notified().await;
    board
        .apply_event(BoardEvent::from_json(r#"{"type":"deleted","record":{"id":"1"}}"#).unwrap())
        .await;
    gate.release.notify_one();

    assert_eq!(
        commit.await.unwrap(),
        DragOutcome::Committed {
            status: ApplicantStatus::Rejected,
            position: None
        }
    );
    assert!(persistence.position_calls().is_empty());
    assert_eq!(board.item("1").await, None);
}

#[tokio::test]
async fn deleting_open_card_closes_detail_view() {
    let detail = Arc::new(CountingDetailView::default());
    let board = Board::new(
        BoardConfig::default(),
        Arc::new(RecordingPersistence::new()),
        Arc::new(PassthroughEnricher),
        detail.clone(),
    );
    board
        .load(vec![item("1", ApplicantStatus::Verified, 1.0)])
        .await;

    assert!(board.open_detail("1").await);
    assert!(!board.open_detail("nope").await);

    let outcome = board
        .apply_event(BoardEvent::from_json(r#"{"type":"deleted","record":{"id":"1"}}"#).unwrap())
        .await;
    assert_eq!(outcome, MergeOutcome::Removed { closed_detail: true });
    assert_eq!(detail.closed(), vec!["1".to_string()]);
    assert_eq!(board.open_detail_id().await, None);
}

#[tokio::test]
async fn event_loop_feeds_snapshot() {
    let persistence = Arc::new(
        RecordingPersistence::new().with_items(vec![item("1", ApplicantStatus::Submitted, 1.0)]),
    );
    let board = Board::with_persistence(BoardConfig::default(), persistence);
    assert_eq!(board.load_from_persistence().await.unwrap(), 1);

    let (tx, rx) = mpsc::channel(4);
    let handle = board.spawn_event_loop(rx);
    tx.send(
        BoardEvent::from_json(r#"{"type":"created","record":{"id":"2","status":"submitted","name":"Lin"}}"#)
            .unwrap(),
    )
    .await
    .unwrap();
    tx.send(
        BoardEvent::from_json(r#"{"type":"updated","record":{"id":"1","status":"passed"}}"#)
            .unwrap(),
    )
    .await
    .unwrap();
    drop(tx);
    assert_eq!(handle.await.unwrap(), 2);

    let snapshot = board.snapshot().await;
    let submitted = &snapshot.columns[0];
    let passed = &snapshot.columns[2];
    assert_eq!(submitted.status, ApplicantStatus::Submitted);
    assert_eq!(submitted.items.len(), 1);
    assert_eq!(submitted.items[0].id, "2");
    assert_eq!(submitted.items[0].position, 2.0);
    assert_eq!(passed.items[0].id, "1");
}

#[tokio::test]
async fn rollback_restores_column_and_skips_position() {
    let persistence = Arc::new(RecordingPersistence::new().fail_status());
    let board = board_with(
        vec![
            item("1", ApplicantStatus::Submitted, 1.0),
            item("2", ApplicantStatus::Submitted, 2.0),
        ],
        persistence.clone(),
    )
    .await;

    board.drag_start("1").await;
    board.drag_over("1", &DropTarget::card("ghost")).await;
    board
        .drag_over("1", &DropTarget::column(ApplicantStatus::Passed))
        .await;
    let outcome = board
        .drag_end("1", Some(DropTarget::column(ApplicantStatus::Passed)))
        .await;

    assert!(matches!(outcome, DragOutcome::RolledBack { .. }));
    let ids: Vec<String> = board
        .column(ApplicantStatus::Submitted)
        .await
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(persistence.status_calls().len(), 1);
    assert!(persistence.position_calls().is_empty());
}

#[tokio::test]
async fn second_gesture_during_commit_is_refused() {
    let gate = StatusGate::default();
    let persistence = Arc::new(RecordingPersistence::new().gated(gate.clone()));
    let board = Arc::new(
        board_with(
            vec![item("1", ApplicantStatus::Submitted, 1.0)],
            persistence.clone(),
        )
        .await,
    );
    let verified = DropTarget::column(ApplicantStatus::Verified);
    let passed = DropTarget::column(ApplicantStatus::Passed);

    board.drag_start("1").await;
    board.drag_over("1", &verified).await;
    let dragging = board.clone();
    let commit = tokio::spawn(async move { dragging.drag_end("1", Some(verified)).await });
    gate.entered.notified().await;

    assert!(!board.drag_start("1").await);
    assert_eq!(board.drag_over("1", &passed).await, None);
    assert_eq!(board.drag_end("1", Some(passed)).await, DragOutcome::Ignored);
    assert_eq!(board.phase("1").await, ReconcilePhase::Committing);
    assert_eq!(persistence.status_calls().len(), 1);

    gate.release.notify_one();
    assert_eq!(
        commit.await.unwrap(),
        DragOutcome::Committed {
            status: ApplicantStatus::Verified,
            position: Some(1.0)
        }
    );
    assert_eq!(board.phase("1").await, ReconcilePhase::Idle);
    assert_eq!(
        board.item("1").await.unwrap().status,
        ApplicantStatus::Verified
    );

    // the card accepts gestures again once the write settled
    assert!(board.drag_start("1").await);
}
