//! End-to-end classification tests over the in-memory store.

use crate::test_utils::*;
use chrono::Utc;
use sigmill::lifecycle::{IgnoreReason, Outcome};
use sigmill::models::{Direction, SignalStatus};
use sigmill::parser::ValidationError;

#[tokio::test]
async fn accepted_message_creates_a_process_record() {
    let engine = TestEngine::new();
    let t0 = Utc::now();

    let outcome = engine.processor.process(&message(100, 1, BUY_TEXT, t0)).await.unwrap();
    let Outcome::Accepted { id } = outcome else {
        panic!("expected Accepted, got {:?}", outcome);
    };

    let record = engine.store.get(id).expect("record should exist");
    assert_eq!(record.channel_id, 100);
    assert_eq!(record.message_id, 1);
    assert_eq!(record.symbol, "XAUUSD");
    assert_eq!(record.direction, Direction::Buy);
    assert_eq!(record.entry_min, 2000.0);
    assert_eq!(record.entry_max, 2005.0);
    // Adjusted by the default 0.50.
    assert_eq!(record.stop_loss, 1989.50);
    assert_eq!(record.take_profit_1, 2010.50);
    assert_eq!(record.take_profit_2, Some(2020.50));
    assert_eq!(record.take_profit_3, None);
    assert_eq!(record.status, SignalStatus::Process);
    assert_eq!(record.raw_message, BUY_TEXT);
    assert_eq!(record.created_at, t0);
    assert_eq!(record.updated_at, t0);
}

#[tokio::test]
async fn rebroadcast_inside_the_window_is_ignored() {
    let engine = TestEngine::new();
    let t0 = Utc::now();

    engine.processor.process(&message(100, 1, BUY_TEXT, t0)).await.unwrap();
    let outcome = engine
        .processor
        .process(&message(200, 7, BUY_TEXT_REWORDED, t0 + seconds(2)))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Ignored(IgnoreReason::DuplicateWindow));
    assert_eq!(engine.store.all().len(), 1);
}

#[tokio::test]
async fn same_content_after_the_window_creates_a_second_record() {
    let engine = TestEngine::new();
    let t0 = Utc::now();

    engine.processor.process(&message(100, 1, BUY_TEXT, t0)).await.unwrap();
    let outcome = engine
        .processor
        .process(&message(200, 7, BUY_TEXT, t0 + seconds(6)))
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::Accepted { .. }));
    assert_eq!(engine.store.all().len(), 2);
}

#[tokio::test]
async fn window_boundary_is_exclusive() {
    let engine = TestEngine::new();
    let t0 = Utc::now();

    engine.processor.process(&message(100, 1, BUY_TEXT, t0)).await.unwrap();
    // Exactly the window apart is no longer a duplicate.
    let outcome = engine
        .processor
        .process(&message(200, 7, BUY_TEXT, t0 + seconds(5)))
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::Accepted { .. }));
}

#[tokio::test]
async fn edit_with_changed_prices_revises_in_place() {
    let engine = TestEngine::new();
    let t0 = Utc::now();

    let outcome = engine.processor.process(&message(100, 1, BUY_TEXT, t0)).await.unwrap();
    let Outcome::Accepted { id } = outcome else {
        panic!("expected Accepted, got {:?}", outcome);
    };

    let outcome = engine
        .processor
        .process(&edit(100, 1, BUY_TEXT_REVISED, t0 + seconds(30)))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Revised { id });

    assert_eq!(engine.store.all().len(), 1);
    let record = engine.store.get(id).unwrap();
    assert_eq!(record.status, SignalStatus::Modify);
    assert_eq!(record.stop_loss, 1991.50);
    assert_eq!(record.take_profit_1, 2012.50);
    assert_eq!(record.take_profit_2, Some(2022.50));
    assert_eq!(record.raw_message, BUY_TEXT_REVISED);
    assert_eq!(record.created_at, t0);
    assert_eq!(record.updated_at, t0 + seconds(30));
}

#[tokio::test]
async fn cosmetic_edit_is_ignored() {
    let engine = TestEngine::new();
    let t0 = Utc::now();

    let outcome = engine.processor.process(&message(100, 1, BUY_TEXT, t0)).await.unwrap();
    let Outcome::Accepted { id } = outcome else {
        panic!("expected Accepted, got {:?}", outcome);
    };
    let before = engine.store.get(id).unwrap();

    // Same trade, different wording: the fingerprint is unchanged.
    let outcome = engine
        .processor
        .process(&edit(100, 1, BUY_TEXT_REWORDED, t0 + seconds(30)))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Ignored(IgnoreReason::UnchangedEdit));
    assert_eq!(engine.store.get(id).unwrap(), before);
}

#[tokio::test]
async fn edit_of_a_message_that_never_parsed_is_ignored() {
    let engine = TestEngine::new();
    let outcome = engine
        .processor
        .process(&edit(100, 99, BUY_TEXT, Utc::now()))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Ignored(IgnoreReason::NeverParsed));
    assert!(engine.store.all().is_empty());
}

#[tokio::test]
async fn redelivery_with_the_same_ids_is_ignored() {
    let engine = TestEngine::new();
    let t0 = Utc::now();

    engine.processor.process(&message(100, 1, BUY_TEXT, t0)).await.unwrap();
    // Past the duplicate window, so only the (channel, message) pair
    // identifies this as a redelivery.
    let outcome = engine
        .processor
        .process(&message(100, 1, BUY_TEXT, t0 + seconds(6)))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Ignored(IgnoreReason::AlreadyExists));
    assert_eq!(engine.store.all().len(), 1);
}

#[tokio::test]
async fn invalid_new_signal_is_rejected_without_a_write() {
    let engine = TestEngine::new();
    let text = "XAUUSD BUY\nEntry: 2000 - 2005\nSL: 2003\nTP: 2010\n";

    let outcome = engine
        .processor
        .process(&message(100, 1, text, Utc::now()))
        .await
        .unwrap();

    // SL lands at 2002.50 after adjustment, above the entry floor.
    assert_eq!(
        outcome,
        Outcome::Rejected(ValidationError::BuyStopAboveEntry {
            stop_loss: 2002.50,
            entry_min: 2000.0,
        })
    );
    assert!(engine.store.all().is_empty());
}

#[tokio::test]
async fn invalid_edit_leaves_the_record_untouched() {
    let engine = TestEngine::new();
    let t0 = Utc::now();

    let outcome = engine.processor.process(&message(100, 1, BUY_TEXT, t0)).await.unwrap();
    let Outcome::Accepted { id } = outcome else {
        panic!("expected Accepted, got {:?}", outcome);
    };
    let before = engine.store.get(id).unwrap();

    let bad_edit = "XAUUSD BUY\nEntry: 2000 - 2005\nSL: 2003\nTP: 2010\n";
    let outcome = engine
        .processor
        .process(&edit(100, 1, bad_edit, t0 + seconds(30)))
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::Rejected(_)));
    assert_eq!(engine.store.get(id).unwrap(), before);
}

#[tokio::test]
async fn store_reports_duplicate_key_for_a_reused_message_id() {
    use sigmill::db::{MemorySignalStore, SignalStore, StoreError};
    use sigmill::models::NewSignalRecord;

    let store = MemorySignalStore::new();
    let t0 = Utc::now();
    let record = NewSignalRecord {
        channel_id: 100,
        message_id: 1,
        symbol: "XAUUSD".to_string(),
        direction: Direction::Buy,
        entry_min: 2000.0,
        entry_max: 2005.0,
        stop_loss: 1989.50,
        take_profit_1: 2010.50,
        take_profit_2: None,
        take_profit_3: None,
        status: SignalStatus::Process,
        raw_message: BUY_TEXT.to_string(),
        content_hash: "0".repeat(64),
        created_at: t0,
        updated_at: t0,
    };

    store.create(record.clone()).await.unwrap();
    assert!(matches!(
        store.create(record).await,
        Err(StoreError::DuplicateKey)
    ));
}

#[tokio::test]
async fn chatter_is_not_a_signal() {
    let engine = TestEngine::new();
    let outcome = engine
        .processor
        .process(&message(100, 1, "Gold looking strong today!", Utc::now()))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::NotASignal);
    assert!(engine.store.all().is_empty());
}

#[tokio::test]
async fn tighter_distance_limit_rejects_wider_stops() {
    let engine = TestEngine::with_config(sigmill::config::EngineConfig {
        max_sl_distance: 5.0,
        ..Default::default()
    });

    // Distance 2000 - 1989.50 = 10.50 exceeds the 5.0 limit.
    let outcome = engine
        .processor
        .process(&message(100, 1, BUY_TEXT, Utc::now()))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Rejected(ValidationError::BuyStopTooFar {
            distance: 10.50,
            max: 5.0,
        })
    );
}
