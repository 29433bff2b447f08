use engine::{
    AmountInput, CreateMovementCmd, EngineError, MovementFilter, MovementKind, PageRequest, Role,
    UpdateMovementCmd, empty_explanation, filters::EmptyReason,
};
use uuid::Uuid;

mod common;

use common::engine_with_admin;

#[tokio::test]
async fn pages_slice_the_filtered_set_newest_first() {
    let fx = engine_with_admin().await;
    for day in 1..=12 {
        fx.record(
            &fx.admin,
            &format!("Sale {day}"),
            "10",
            &format!("2025-03-{day:02}"),
            MovementKind::Income,
        )
        .await;
    }

    let filter = MovementFilter::default();
    let first = fx
        .engine
        .list_movements(&fx.admin, &filter, PageRequest::new(0, 5).unwrap())
        .await
        .unwrap();
    assert_eq!(first.total_count, 12);
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.items[0].concept, "Sale 12");

    let last = fx
        .engine
        .list_movements(&fx.admin, &filter, PageRequest::new(2, 5).unwrap())
        .await
        .unwrap();
    assert_eq!(last.items.len(), 2);
    assert_eq!(last.items[1].concept, "Sale 1");
    assert!(!last.is_past_end());

    let past = fx
        .engine
        .list_movements(&fx.admin, &filter, PageRequest::new(3, 5).unwrap())
        .await
        .unwrap();
    assert!(past.items.is_empty());
    assert!(past.is_past_end());
    assert_eq!(past.total_count, 12);
}

#[tokio::test]
async fn date_to_is_inclusive_of_the_whole_day() {
    let fx = engine_with_admin().await;
    fx.record(&fx.admin, "late", "5", "2025-01-31T23:59:59Z", MovementKind::Income)
        .await;
    fx.record(&fx.admin, "next", "5", "2025-02-01T00:00:00Z", MovementKind::Income)
        .await;

    let filter = MovementFilter {
        date_from: Some("2025-01-31".to_string()),
        date_to: Some("2025-01-31".to_string()),
        ..Default::default()
    };
    let page = fx
        .engine
        .list_movements(&fx.admin, &filter, PageRequest::new(0, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].concept, "late");
}

#[tokio::test]
async fn date_from_includes_its_first_instant() {
    let fx = engine_with_admin().await;
    fx.record(&fx.admin, "before", "5", "2025-01-31T23:59:59Z", MovementKind::Income)
        .await;
    fx.record(&fx.admin, "first", "5", "2025-02-01T00:00:00Z", MovementKind::Income)
        .await;

    let filter = MovementFilter {
        date_from: Some("2025-02-01".to_string()),
        ..Default::default()
    };
    let page = fx
        .engine
        .list_movements(&fx.admin, &filter, PageRequest::new(0, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].concept, "first");
}

#[tokio::test]
async fn same_instant_movements_list_in_insertion_order() {
    let fx = engine_with_admin().await;
    fx.record(&fx.admin, "older", "1", "2025-04-01T09:00:00Z", MovementKind::Income)
        .await;
    for concept in ["tie a", "tie b", "tie c"] {
        fx.record(&fx.admin, concept, "1", "2025-04-02T09:00:00Z", MovementKind::Income)
            .await;
    }

    let page = fx
        .engine
        .list_movements(&fx.admin, &MovementFilter::default(), PageRequest::new(0, 10).unwrap())
        .await
        .unwrap();
    let concepts: Vec<&str> = page.items.iter().map(|m| m.concept.as_str()).collect();
    assert_eq!(concepts, ["tie a", "tie b", "tie c", "older"]);
}

#[tokio::test]
async fn concept_search_folds_accented_capitals() {
    let fx = engine_with_admin().await;
    fx.record(&fx.admin, "NÓMINA enero", "900", "2025-01-30", MovementKind::Income)
        .await;
    fx.record(&fx.admin, "Rent", "300", "2025-01-31", MovementKind::Expense)
        .await;

    for needle in ["NÓMINA", "nómina", "Nómina", "enero"] {
        let filter = MovementFilter {
            concept: Some(needle.to_string()),
            ..Default::default()
        };
        let page = fx
            .engine
            .list_movements(&fx.admin, &filter, PageRequest::new(0, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(page.total_count, 1, "{needle} should match");
        assert_eq!(page.items[0].concept, "NÓMINA enero");
    }

    let movement = fx
        .record(&fx.admin, "café", "4", "2025-02-01", MovementKind::Expense)
        .await;
    fx.engine
        .update_movement(
            &fx.admin,
            UpdateMovementCmd::new(movement.id).concept("CAFÉ con leche"),
        )
        .await
        .unwrap();
    let filter = MovementFilter {
        concept: Some("café con".to_string()),
        ..Default::default()
    };
    let page = fx
        .engine
        .list_movements(&fx.admin, &filter, PageRequest::new(0, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].concept, "CAFÉ con leche");
}

#[tokio::test]
async fn concept_search_is_case_insensitive_and_literal() {
    let fx = engine_with_admin().await;
    fx.record(&fx.admin, "Office RENT", "100", "2025-01-02", MovementKind::Expense)
        .await;
    fx.record(&fx.admin, "50% discount", "10", "2025-01-03", MovementKind::Income)
        .await;
    fx.record(&fx.admin, "Groceries", "20", "2025-01-04", MovementKind::Expense)
        .await;

    let list = |concept: &str| MovementFilter {
        concept: Some(concept.to_string()),
        ..Default::default()
    };
    let page = fx
        .engine
        .list_movements(&fx.admin, &list("rent"), PageRequest::new(0, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);

    let page = fx
        .engine
        .list_movements(&fx.admin, &list("%"), PageRequest::new(0, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].concept, "50% discount");

    let filter = MovementFilter {
        concept: Some("rent".to_string()),
        kind: Some(MovementKind::Income),
        ..Default::default()
    };
    let page = fx
        .engine
        .list_movements(&fx.admin, &filter, PageRequest::new(0, 10).unwrap())
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(
        empty_explanation(&filter),
        EmptyReason::Concept("rent".to_string())
    );
}

#[tokio::test]
async fn owner_filter_and_owner_name() {
    let fx = engine_with_admin().await;
    let other = fx.user("bea@cash.test", Role::Admin).await;
    fx.record(&fx.admin, "mine", "1", "2025-01-01", MovementKind::Income)
        .await;
    fx.record(&other, "theirs", "1", "2025-01-02", MovementKind::Income)
        .await;

    let filter = MovementFilter {
        owner_user_id: Some(other.user_id),
        ..Default::default()
    };
    let page = fx
        .engine
        .list_movements(&fx.admin, &filter, PageRequest::new(0, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].owner_name, "bea@cash.test");
}

#[tokio::test]
async fn create_applies_defaults() {
    let fx = engine_with_admin().await;
    let movement = fx
        .engine
        .create_movement(
            &fx.admin,
            CreateMovementCmd::new(AmountInput::Number(1500.0)).concept("   "),
        )
        .await
        .unwrap();
    assert_eq!(movement.concept, "No concept");
    assert_eq!(movement.kind, MovementKind::Income);
    assert_eq!(movement.amount.cents(), 150_000);
    assert_eq!(movement.owner_user_id, fx.admin.user_id);
    assert_eq!(movement.owner_name, "Admin");
}

#[tokio::test]
async fn invalid_input_is_rejected_before_writing() {
    let fx = engine_with_admin().await;
    let err = fx
        .engine
        .create_movement(&fx.admin, CreateMovementCmd::new(AmountInput::Number(0.0)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = fx
        .engine
        .create_movement(
            &fx.admin,
            CreateMovementCmd::new(AmountInput::Number(10.0)).occurred_at("2025-02-30"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDate(_)));

    let page = fx
        .engine
        .list_movements(
            &fx.admin,
            &MovementFilter::default(),
            PageRequest::new(0, 10).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let fx = engine_with_admin().await;
    let movement = fx
        .record(&fx.admin, "Rent", "800", "2025-01-05", MovementKind::Expense)
        .await;

    let updated = fx
        .engine
        .update_movement(
            &fx.admin,
            UpdateMovementCmd::new(movement.id).amount(AmountInput::Text("850.50".to_string())),
        )
        .await
        .unwrap();
    assert_eq!(updated.amount.cents(), 85_050);
    assert_eq!(updated.concept, "Rent");
    assert_eq!(updated.kind, MovementKind::Expense);
    assert_eq!(updated.occurred_at, movement.occurred_at);

    let err = fx
        .engine
        .update_movement(
            &fx.admin,
            UpdateMovementCmd::new(movement.id)
                .concept("Changed")
                .amount(AmountInput::Number(-1.0)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = fx
        .engine
        .update_movement(&fx.admin, UpdateMovementCmd::new(Uuid::now_v7()).concept("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn delete_removes_the_movement() {
    let fx = engine_with_admin().await;
    let movement = fx
        .record(&fx.admin, "Rent", "800", "2025-01-05", MovementKind::Expense)
        .await;

    let id = fx
        .engine
        .delete_movement(&fx.admin, movement.id)
        .await
        .unwrap();
    assert_eq!(id, movement.id);

    let err = fx
        .engine
        .delete_movement(&fx.admin, movement.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn plain_users_can_only_read() {
    let fx = engine_with_admin().await;
    let reader = fx.user("reader@cash.test", Role::User).await;
    let movement = fx
        .record(&fx.admin, "Rent", "800", "2025-01-05", MovementKind::Expense)
        .await;

    let page = fx
        .engine
        .list_movements(
            &reader,
            &MovementFilter::default(),
            PageRequest::new(0, 10).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);

    let err = fx
        .engine
        .create_movement(&reader, CreateMovementCmd::new(AmountInput::Number(1.0)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    let err = fx
        .engine
        .delete_movement(&reader, movement.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}
