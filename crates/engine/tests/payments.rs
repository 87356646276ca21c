use std::sync::Arc;

use chrono::Utc;
use sea_orm::{Database, DatabaseConnection};

use engine::{
    CardType, CrmSyncReport, Engine, EngineError, MoneyCents, PaymentOutcome, TapDirection,
    TapListFilter, TapOutcome,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

// In-memory sqlite hands every pooled connection its own database, so tests
// that fan out tasks need a file-backed one.
async fn engine_with_file_db() -> (Engine, DatabaseConnection, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db, path)
}

async fn card_with_balance(engine: &Engine, balance: MoneyCents) -> String {
    let customer = engine
        .new_customer("Ada Rider", "ada@example.com", "555-0100", "email")
        .await
        .unwrap();
    engine
        .issue_card(
            None,
            CardType::ClosedLoop,
            &customer.id,
            Utc::now(),
            balance,
            None,
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn reload_reports_previous_and_new_balance() {
    let (engine, _db) = engine_with_db().await;
    let card_id = card_with_balance(&engine, MoneyCents::new(150)).await;

    let receipt = engine.reload(&card_id, MoneyCents::new(2000)).await.unwrap();
    assert_eq!(receipt.previous_balance, MoneyCents::new(150));
    assert_eq!(receipt.new_balance, MoneyCents::new(2150));
    assert_eq!(receipt.amount, MoneyCents::new(2000));
    assert_eq!(
        engine.card_balance(&card_id).await.unwrap(),
        MoneyCents::new(2150)
    );
}

#[tokio::test]
async fn direct_credit_and_debit_round_trip() {
    let (engine, _db) = engine_with_db().await;
    let card_id = card_with_balance(&engine, MoneyCents::ZERO).await;

    assert_eq!(
        engine
            .credit_card(&card_id, MoneyCents::new(800))
            .await
            .unwrap(),
        MoneyCents::new(800)
    );
    assert_eq!(
        engine
            .debit_card(&card_id, MoneyCents::new(300))
            .await
            .unwrap(),
        MoneyCents::new(500)
    );

    let err = engine
        .debit_card(&card_id, MoneyCents::new(501))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));
    assert_eq!(
        engine.card_balance(&card_id).await.unwrap(),
        MoneyCents::new(500)
    );
}

#[tokio::test]
async fn reload_rejects_non_positive_amounts() {
    let (engine, _db) = engine_with_db().await;
    let card_id = card_with_balance(&engine, MoneyCents::new(1000)).await;

    for amount in [MoneyCents::new(-500), MoneyCents::ZERO] {
        let err = engine.reload(&card_id, amount).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
    // The failed attempts changed nothing.
    assert_eq!(
        engine.card_balance(&card_id).await.unwrap(),
        MoneyCents::new(1000)
    );
}

#[tokio::test]
async fn reload_unknown_card_fails() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .reload("CD404", MoneyCents::new(500))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::CardNotFound("CD404".to_string()));
}

#[tokio::test]
async fn payment_debits_when_funds_suffice() {
    let (engine, _db) = engine_with_db().await;
    let card_id = card_with_balance(&engine, MoneyCents::new(1000)).await;

    let outcome = engine
        .simulate_payment(&card_id, MoneyCents::new(750), "apple_pay")
        .await
        .unwrap();
    assert_eq!(
        outcome,
        PaymentOutcome::Approved {
            card_id: card_id.clone(),
            new_balance: MoneyCents::new(250),
            method: "apple_pay".to_string(),
        }
    );
}

#[tokio::test]
async fn payment_declines_without_touching_balance() {
    let (engine, _db) = engine_with_db().await;
    let card_id = card_with_balance(&engine, MoneyCents::new(100)).await;

    let outcome = engine
        .simulate_payment(&card_id, MoneyCents::new(750), "card")
        .await
        .unwrap();
    assert_eq!(
        outcome,
        PaymentOutcome::Declined {
            card_id: card_id.clone(),
            current_balance: MoneyCents::new(100),
            required: MoneyCents::new(750),
        }
    );
    assert_eq!(
        engine.card_balance(&card_id).await.unwrap(),
        MoneyCents::new(100)
    );
}

#[tokio::test]
async fn taps_charge_the_flat_fare_until_funds_run_out() {
    let (engine, _db) = engine_with_db().await;
    let card_id = card_with_balance(&engine, MoneyCents::new(500)).await;

    let first = engine
        .tap(&card_id, "Central", "GATE-01", "metro", TapDirection::Entry)
        .await
        .unwrap();
    assert_eq!(first.tap.outcome, TapOutcome::Success);
    assert_eq!(first.remaining_balance, MoneyCents::new(250));

    let second = engine
        .tap(&card_id, "Harbour", "GATE-07", "metro", TapDirection::Exit)
        .await
        .unwrap();
    assert_eq!(second.tap.outcome, TapOutcome::Success);
    assert_eq!(second.remaining_balance, MoneyCents::ZERO);

    // Third tap finds nothing left; it is recorded all the same.
    let third = engine
        .tap(&card_id, "Central", "GATE-02", "metro", TapDirection::Entry)
        .await
        .unwrap();
    assert_eq!(third.tap.outcome, TapOutcome::InsufficientBalance);
    assert_eq!(third.remaining_balance, MoneyCents::ZERO);

    let taps = engine.tap_history(TapListFilter::default()).await.unwrap();
    assert_eq!(taps.len(), 3);
    assert_eq!(first.tap.id, "TH000001");
    assert_eq!(third.tap.id, "TH000003");
}

#[tokio::test]
async fn tap_one_minor_unit_short_is_declined_without_charge() {
    let (engine, _db) = engine_with_db().await;
    let card_id = card_with_balance(&engine, MoneyCents::new(249)).await;

    let receipt = engine
        .tap(&card_id, "Central", "GATE-01", "metro", TapDirection::Entry)
        .await
        .unwrap();
    assert_eq!(receipt.tap.outcome, TapOutcome::InsufficientBalance);
    assert_eq!(receipt.remaining_balance, MoneyCents::new(249));
    assert_eq!(
        engine.card_balance(&card_id).await.unwrap(),
        MoneyCents::new(249)
    );
}

#[tokio::test]
async fn tap_on_unknown_card_records_nothing() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .tap("CD404", "Central", "GATE-01", "metro", TapDirection::Entry)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::CardNotFound("CD404".to_string()));
    let taps = engine.tap_history(TapListFilter::default()).await.unwrap();
    assert!(taps.is_empty());
}

#[tokio::test]
async fn crm_reload_credits_the_card() {
    let (engine, _db) = engine_with_db().await;
    let card_id = card_with_balance(&engine, MoneyCents::ZERO).await;

    let report = engine
        .sync_crm(&card_id, "reload", Some(MoneyCents::new(1500)), None)
        .await
        .unwrap();
    match report {
        CrmSyncReport::Reloaded { card, amount } => {
            assert_eq!(amount, MoneyCents::new(1500));
            assert_eq!(card.balance, MoneyCents::new(1500));
        }
        other => panic!("expected Reloaded, got {other:?}"),
    }
}

#[tokio::test]
async fn crm_reload_rejects_negative_amount() {
    let (engine, _db) = engine_with_db().await;
    let card_id = card_with_balance(&engine, MoneyCents::new(1000)).await;

    let err = engine
        .sync_crm(&card_id, "reload", Some(MoneyCents::new(-500)), None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert_eq!(
        engine.card_balance(&card_id).await.unwrap(),
        MoneyCents::new(1000)
    );
}

#[tokio::test]
async fn crm_add_product_sets_label_and_credits() {
    let (engine, _db) = engine_with_db().await;
    let card_id = card_with_balance(&engine, MoneyCents::ZERO).await;

    let report = engine
        .sync_crm(
            &card_id,
            "add_product",
            Some(MoneyCents::new(3000)),
            Some("monthly_pass"),
        )
        .await
        .unwrap();
    match report {
        CrmSyncReport::ProductAdded { card, product } => {
            assert_eq!(product, "monthly_pass");
            assert_eq!(card.product.as_deref(), Some("monthly_pass"));
            assert_eq!(card.balance, MoneyCents::new(3000));
        }
        other => panic!("expected ProductAdded, got {other:?}"),
    }
}

#[tokio::test]
async fn crm_unknown_action_acknowledges_without_mutating() {
    let (engine, _db) = engine_with_db().await;
    let card_id = card_with_balance(&engine, MoneyCents::new(1000)).await;

    let report = engine
        .sync_crm(&card_id, "defragment", Some(MoneyCents::new(9999)), None)
        .await
        .unwrap();
    match report {
        CrmSyncReport::Synced { card } => {
            assert_eq!(card.balance, MoneyCents::new(1000));
            assert_eq!(card.product, None);
        }
        other => panic!("expected Synced, got {other:?}"),
    }
}

#[tokio::test]
async fn crm_reload_without_amount_degrades_to_sync() {
    let (engine, _db) = engine_with_db().await;
    let card_id = card_with_balance(&engine, MoneyCents::new(1000)).await;

    let report = engine.sync_crm(&card_id, "reload", None, None).await.unwrap();
    assert!(matches!(report, CrmSyncReport::Synced { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_reloads_lose_no_updates() {
    let (engine, db, path) = engine_with_file_db().await;
    let card_id = card_with_balance(&engine, MoneyCents::ZERO).await;
    let engine = Arc::new(engine);

    let mut handles = Vec::new();
    for _ in 0..10 {
        let engine = Arc::clone(&engine);
        let card_id = card_id.clone();
        handles.push(tokio::spawn(async move {
            engine.reload(&card_id, MoneyCents::new(100)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(
        engine.card_balance(&card_id).await.unwrap(),
        MoneyCents::new(1000)
    );
    drop(engine);
    db.close().await.unwrap();
    let _ = std::fs::remove_file(path);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_payments_never_overdraw() {
    let (engine, db, path) = engine_with_file_db().await;
    // Funds for exactly two of the five attempted charges.
    let card_id = card_with_balance(&engine, MoneyCents::new(500)).await;
    let engine = Arc::new(engine);

    let mut handles = Vec::new();
    for _ in 0..5 {
        let engine = Arc::clone(&engine);
        let card_id = card_id.clone();
        handles.push(tokio::spawn(async move {
            engine
                .simulate_payment(&card_id, MoneyCents::new(250), "card")
                .await
        }));
    }
    let mut approved = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            PaymentOutcome::Approved { .. } => approved += 1,
            PaymentOutcome::Declined { .. } => {}
        }
    }

    assert_eq!(approved, 2);
    assert_eq!(engine.card_balance(&card_id).await.unwrap(), MoneyCents::ZERO);
    drop(engine);
    db.close().await.unwrap();
    let _ = std::fs::remove_file(path);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_issuance_of_same_id_yields_one_card() {
    let (engine, db, path) = engine_with_file_db().await;
    let customer = engine
        .new_customer("Ada Rider", "ada@example.com", "555-0100", "email")
        .await
        .unwrap();
    let engine = Arc::new(engine);

    let mut handles = Vec::new();
    for n in 0i64..2 {
        let engine = Arc::clone(&engine);
        let customer_id = customer.id.clone();
        handles.push(tokio::spawn(async move {
            engine
                .issue_card(
                    Some("CD500"),
                    CardType::ClosedLoop,
                    &customer_id,
                    Utc::now(),
                    MoneyCents::new(100 * n),
                    None,
                )
                .await
        }));
    }
    let results: Vec<_> = futures_results(handles).await;
    let ok = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(ok, 1);
    for result in &results {
        if let Err(err) = result {
            assert_eq!(*err, EngineError::DuplicateCard("CD500".to_string()));
        }
    }
    assert_eq!(engine.cards(None, 0, 100).await.unwrap().len(), 1);
    drop(engine);
    db.close().await.unwrap();
    let _ = std::fs::remove_file(path);
}

async fn futures_results<T>(
    handles: Vec<tokio::task::JoinHandle<T>>,
) -> Vec<T> {
    let mut out = Vec::with_capacity(handles.len());
    for handle in handles {
        out.push(handle.await.unwrap());
    }
    out
}

#[tokio::test]
async fn summary_counts_everything_once() {
    let (engine, _db) = engine_with_db().await;
    let card_id = card_with_balance(&engine, MoneyCents::new(1000)).await;
    engine.reload(&card_id, MoneyCents::new(500)).await.unwrap();
    engine
        .tap(&card_id, "Central", "GATE-01", "metro", TapDirection::Entry)
        .await
        .unwrap();

    let report = engine.summary().await.unwrap();
    assert_eq!(report.total_cards, 1);
    assert_eq!(report.total_customers, 1);
    assert_eq!(report.total_trips, 0);
    assert_eq!(report.total_cases, 0);
    assert_eq!(report.total_tap_entries, 1);
    // 10.00 opening + 5.00 reload - 2.50 fare
    assert_eq!(report.total_balance, MoneyCents::new(1250));
}

#[tokio::test]
async fn card_transactions_gathers_trips_and_taps() {
    let (engine, _db) = engine_with_db().await;
    let card_id = card_with_balance(&engine, MoneyCents::new(1000)).await;
    let now = Utc::now();
    engine
        .new_trip(
            None,
            &card_id,
            now,
            now + chrono::Duration::minutes(20),
            "Central",
            "Harbour",
            MoneyCents::new(250),
            "R1",
            "Metro Co",
            "metro",
            false,
        )
        .await
        .unwrap();
    engine
        .tap(&card_id, "Central", "GATE-01", "metro", TapDirection::Entry)
        .await
        .unwrap();

    let activity = engine.card_transactions(&card_id).await.unwrap();
    assert_eq!(activity.card_id, card_id);
    assert_eq!(activity.card_balance, MoneyCents::new(750));
    assert_eq!(activity.trips.len(), 1);
    assert_eq!(activity.tap_history.len(), 1);
}
