use chrono::{Datelike, Utc};
use engine::{EngineError, Money, MovementFilter, MovementKind, PageRequest, Report, Role, WindowSelector};

mod common;

use common::engine_with_admin;

#[tokio::test]
async fn daily_report_buckets_by_day_of_month() {
    let fx = engine_with_admin().await;
    fx.record(&fx.admin, "a", "100", "2025-02-01T00:00:00Z", MovementKind::Income)
        .await;
    fx.record(&fx.admin, "b", "40", "2025-02-28T23:59:59Z", MovementKind::Expense)
        .await;
    fx.record(&fx.admin, "c", "7", "2025-03-01T00:00:00Z", MovementKind::Income)
        .await;

    let report = fx
        .engine
        .get_report(&fx.admin, &WindowSelector::month("2025-02"), None, None)
        .await
        .unwrap();
    let Report::Daily { buckets, .. } = &report else {
        panic!("expected a daily report, got {report:?}");
    };
    assert_eq!(buckets.labels.len(), 31);
    assert_eq!(buckets.income[0], Money::new(10_000));
    assert_eq!(buckets.expense[27], Money::new(4_000));
    assert_eq!(buckets.income[28..], [Money::ZERO; 3]);
    assert_eq!(report.totals().income, Money::new(10_000));
}

#[tokio::test]
async fn monthly_report_filters_by_kind() {
    let fx = engine_with_admin().await;
    fx.record(&fx.admin, "jan", "10", "2024-01-15", MovementKind::Income)
        .await;
    fx.record(&fx.admin, "dec", "20", "2024-12-31", MovementKind::Expense)
        .await;
    fx.record(&fx.admin, "next", "30", "2025-01-01", MovementKind::Expense)
        .await;

    let report = fx
        .engine
        .get_report(
            &fx.admin,
            &WindowSelector::year("2024"),
            Some(MovementKind::Expense),
            None,
        )
        .await
        .unwrap();
    let buckets = report.buckets();
    assert_eq!(buckets.labels.len(), 12);
    assert_eq!(buckets.income.iter().sum::<Money>(), Money::ZERO);
    assert_eq!(buckets.expense[11], Money::new(2_000));
    assert_eq!(report.totals().expense, Money::new(2_000));
}

#[tokio::test]
async fn kind_filter_leaves_the_other_array_zero() {
    let fx = engine_with_admin().await;
    let year = Utc::now().year();
    fx.record(&fx.admin, "in", "10", "2025-02-03", MovementKind::Income)
        .await;
    fx.record(&fx.admin, "out", "4", "2025-02-03", MovementKind::Expense)
        .await;
    fx.record(&fx.admin, "in now", "6", &format!("{year}-01-02"), MovementKind::Income)
        .await;
    fx.record(&fx.admin, "out now", "2", &format!("{year}-01-02"), MovementKind::Expense)
        .await;

    let daily = fx
        .engine
        .get_report(
            &fx.admin,
            &WindowSelector::month("2025-02"),
            Some(MovementKind::Income),
            None,
        )
        .await
        .unwrap();
    let buckets = daily.buckets();
    assert_eq!(buckets.income[2], Money::new(1_000));
    assert!(buckets.expense.iter().all(|m| m.is_zero()));
    assert_eq!(daily.totals().expense, Money::ZERO);

    let rolling = fx
        .engine
        .get_report(
            &fx.admin,
            &WindowSelector::rolling(),
            Some(MovementKind::Expense),
            None,
        )
        .await
        .unwrap();
    let buckets = rolling.buckets();
    assert_eq!(buckets.expense[5], Money::new(200));
    assert!(buckets.income.iter().all(|m| m.is_zero()));
    assert_eq!(rolling.totals().income, Money::ZERO);
}

#[tokio::test]
async fn rolling_report_covers_six_years() {
    let fx = engine_with_admin().await;
    let year = Utc::now().year();
    fx.record(
        &fx.admin,
        "now",
        "1",
        &format!("{year}-01-01"),
        MovementKind::Income,
    )
    .await;
    fx.record(
        &fx.admin,
        "too old",
        "1",
        &format!("{}-12-31", year - 6),
        MovementKind::Income,
    )
    .await;

    let report = fx
        .engine
        .get_report(&fx.admin, &WindowSelector::rolling(), None, None)
        .await
        .unwrap();
    let buckets = report.buckets();
    assert_eq!(buckets.labels.first(), Some(&(year - 5).to_string()));
    assert_eq!(buckets.labels.last(), Some(&year.to_string()));
    assert_eq!(buckets.income[5], Money::new(100));
    assert_eq!(report.totals().income, Money::new(100));
}

#[tokio::test]
async fn report_defaults_to_the_callers_movements() {
    let fx = engine_with_admin().await;
    let other = fx.user("bea@cash.test", Role::Admin).await;
    fx.record(&fx.admin, "mine", "10", "2025-02-01", MovementKind::Income)
        .await;
    fx.record(&other, "theirs", "99", "2025-02-01", MovementKind::Income)
        .await;

    let own = fx
        .engine
        .get_report(&fx.admin, &WindowSelector::month("2025-02"), None, None)
        .await
        .unwrap();
    assert_eq!(own.totals().income, Money::new(1_000));

    let theirs = fx
        .engine
        .get_report(
            &fx.admin,
            &WindowSelector::month("2025-02"),
            None,
            Some(other.user_id),
        )
        .await
        .unwrap();
    assert_eq!(theirs.totals().income, Money::new(9_900));
}

#[tokio::test]
async fn selectors_are_mutually_exclusive() {
    let fx = engine_with_admin().await;
    let both = WindowSelector {
        month: Some("2025-02".to_string()),
        year: Some("2025".to_string()),
        rolling: false,
    };
    for selector in [WindowSelector::default(), both] {
        let err = fx
            .engine
            .get_report(&fx.admin, &selector, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRangeSpecification(_)));
    }

    let err = fx
        .engine
        .get_report(&fx.admin, &WindowSelector::month("2025-13"), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDate(_)));
}

#[tokio::test]
async fn balance_is_income_minus_expense_over_everyone() {
    let fx = engine_with_admin().await;
    let other = fx.user("bea@cash.test", Role::Admin).await;
    fx.record(&fx.admin, "a", "1000", "2025-01-01", MovementKind::Income)
        .await;
    fx.record(&other, "b", "250.25", "2023-06-01", MovementKind::Expense)
        .await;
    fx.record(&other, "c", "0.25", "2025-06-01", MovementKind::Income)
        .await;

    let balance = fx.engine.get_balance(&fx.admin).await.unwrap();
    assert_eq!(balance.balance, Money::new(75_000));
}

#[tokio::test]
async fn balance_of_an_empty_book_is_zero() {
    let fx = engine_with_admin().await;
    let balance = fx.engine.get_balance(&fx.admin).await.unwrap();
    assert!(balance.balance.is_zero());
}

#[tokio::test]
async fn month_summary_compares_with_previous_month() {
    let fx = engine_with_admin().await;
    fx.record(&fx.admin, "a", "1000", "2025-02-03", MovementKind::Income)
        .await;
    fx.record(&fx.admin, "b", "500", "2025-02-20", MovementKind::Income)
        .await;
    fx.record(&fx.admin, "c", "300", "2025-01-10", MovementKind::Expense)
        .await;

    let summary = fx
        .engine
        .get_month_summary(&fx.admin, "2025-02")
        .await
        .unwrap();
    assert_eq!(summary.current.income, Money::new(150_000));
    assert_eq!(summary.current.expense, Money::ZERO);
    assert_eq!(summary.previous.income, Money::ZERO);
    assert_eq!(summary.previous.expense, Money::new(30_000));
    assert_eq!(summary.income_change_percent(), None);
    assert_eq!(summary.expense_change_percent(), Some(-100));
}

#[tokio::test]
async fn month_summary_crosses_the_year_boundary() {
    let fx = engine_with_admin().await;
    fx.record(&fx.admin, "dec", "200", "2024-12-31T23:00:00Z", MovementKind::Expense)
        .await;
    fx.record(&fx.admin, "jan", "100", "2025-01-01", MovementKind::Expense)
        .await;

    let summary = fx
        .engine
        .get_month_summary(&fx.admin, "2025-01")
        .await
        .unwrap();
    assert_eq!(summary.previous.expense, Money::new(20_000));
    assert_eq!(summary.current.expense, Money::new(10_000));
    assert_eq!(summary.expense_change_percent(), Some(-50));
}

#[tokio::test]
async fn csv_matches_the_listing_for_the_same_window() {
    let fx = engine_with_admin().await;
    let other = fx.user("bea@cash.test", Role::Admin).await;
    fx.record(&fx.admin, "Rent, office", "800", "2025-02-05", MovementKind::Expense)
        .await;
    fx.record(&other, "Sale", "1200.5", "2025-02-01", MovementKind::Income)
        .await;
    fx.record(&fx.admin, "Outside", "1", "2025-03-01", MovementKind::Income)
        .await;

    let bytes = fx
        .engine
        .export_csv(&fx.admin, &WindowSelector::month("2025-02"), None, None)
        .await
        .unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let body = text.strip_prefix('\u{feff}').unwrap();
    let lines: Vec<&str> = body.split("\r\n").collect();
    assert_eq!(
        lines,
        [
            "Concept,Amount,Date,Kind,Owner",
            "Sale,1200.5,01/02/2025,income,bea@cash.test",
            "\"Rent, office\",800,05/02/2025,expense,Admin",
            "",
        ]
    );

    let filter = MovementFilter {
        date_from: Some("2025-02-01".to_string()),
        date_to: Some("2025-02-28".to_string()),
        ..Default::default()
    };
    let page = fx
        .engine
        .list_movements(&fx.admin, &filter, PageRequest::new(0, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(page.total_count as usize, lines.len() - 2);
}

#[tokio::test]
async fn csv_rows_run_oldest_first_with_ties_in_insertion_order() {
    let fx = engine_with_admin().await;
    fx.record(&fx.admin, "late", "3", "2025-05-20T10:00:00Z", MovementKind::Income)
        .await;
    for concept in ["tie a", "tie b", "tie c"] {
        fx.record(&fx.admin, concept, "1", "2025-05-10T08:00:00Z", MovementKind::Expense)
            .await;
    }

    let bytes = fx
        .engine
        .export_csv(&fx.admin, &WindowSelector::month("2025-05"), None, None)
        .await
        .unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let concepts: Vec<&str> = text
        .split("\r\n")
        .skip(1)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.split(',').next())
        .collect();
    assert_eq!(concepts, ["tie a", "tie b", "tie c", "late"]);
}

#[tokio::test]
async fn plain_users_cannot_see_aggregates() {
    let fx = engine_with_admin().await;
    let reader = fx.user("reader@cash.test", Role::User).await;

    let err = fx.engine.get_balance(&reader).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    let err = fx
        .engine
        .export_csv(&reader, &WindowSelector::month("2025-02"), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}
