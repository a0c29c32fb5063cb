//! Tests for report queries, CSV export, and branch and monthly reports.

use chrono::{DateTime, NaiveDate, Utc};
use farmstead_shared::types::{ActivityId, BranchId, UserId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rstest::rstest;
use rust_decimal_macros::dec;

use super::csv::{escape_field, export_filename, render_activity_csv};
use super::error::ReportError;
use super::query::{ReportQuery, SortKey, SortOrder};
use super::service::ReportService;
use super::types::BranchRecord;
use crate::dashboard::{ActivityRecord, ActivityReportRow, AssignmentRecord};
use crate::domain::{ActivityType, PerformanceStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn row(description: &str, activity_type: ActivityType, amount: Decimal, on: NaiveDate) -> ActivityReportRow {
    ActivityReportRow {
        activity_id: ActivityId::new(),
        activity_type,
        description: description.to_string(),
        amount,
        activity_date: on,
        created_at: ts(1_700_000_000),
        resources_used: vec![],
        assigned_staff: vec![],
        upcoming_dates: vec![],
        involved_branches: vec![],
        labor_cost: Decimal::ZERO,
    }
}

fn record(activity_type: ActivityType, amount: Decimal, on: NaiveDate) -> ActivityRecord {
    ActivityRecord {
        id: ActivityId::new(),
        description: "x".to_string(),
        activity_type,
        amount,
        activity_date: on,
        created_at: ts(1_700_000_000),
    }
}

fn assigned(activity_id: ActivityId, branch_id: BranchId, status: PerformanceStatus) -> AssignmentRecord {
    AssignmentRecord {
        activity_id,
        user_id: UserId::new(),
        username: "u".to_string(),
        status,
        branch_id: Some(branch_id),
        branch_location: Some("Somewhere".to_string()),
    }
}

// ============================================================================
// Query
// ============================================================================

#[test]
fn test_query_defaults() {
    let q = ReportQuery::parse(None, None, None).unwrap();
    assert_eq!(q.search, None);
    assert_eq!(q.sort, SortKey::ActivityDate);
    assert_eq!(q.order, SortOrder::Desc);

    let q = ReportQuery::parse(Some("  "), Some(""), Some("ASC")).unwrap();
    assert_eq!(q.search, None);
    assert_eq!(q.order, SortOrder::Asc);
}

#[rstest]
#[case("id")]
#[case("type")]
#[case("date")]
fn test_query_accepts_only_column_names(#[case] sort: &str) {
    assert_eq!(
        ReportQuery::parse(None, Some(sort), None),
        Err(ReportError::InvalidSortKey(sort.to_string()))
    );
}

#[test]
fn test_query_rejects_unknown_sort() {
    assert_eq!(
        ReportQuery::parse(None, Some("password"), None),
        Err(ReportError::InvalidSortKey("password".to_string()))
    );
    assert!(matches!(
        ReportQuery::parse(None, None, Some("sideways")),
        Err(ReportError::InvalidSortOrder(_))
    ));
}

#[test]
fn test_search_matches_lists_case_insensitive() {
    let mut a = row("Harvest", ActivityType::Revenue, dec!(10), date(2024, 1, 1));
    a.assigned_staff = vec!["Maria [Completed]".to_string()];
    let mut b = row("Spray", ActivityType::Expense, dec!(5), date(2024, 1, 2));
    b.involved_branches = vec!["North Farm".to_string()];
    let c = row("Weeding", ActivityType::Neutral, dec!(0), date(2024, 1, 3));

    let q = ReportQuery::parse(Some("MARIA"), None, None).unwrap();
    let hits = q.apply(vec![a.clone(), b.clone(), c.clone()]);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].description, "Harvest");

    let q = ReportQuery::parse(Some("north"), None, None).unwrap();
    assert_eq!(q.apply(vec![a.clone(), b.clone(), c.clone()])[0].description, "Spray");

    let q = ReportQuery::parse(Some("neutral"), None, None).unwrap();
    assert_eq!(q.apply(vec![a, b, c])[0].description, "Weeding");
}

#[test]
fn test_sort_by_amount_and_description() {
    let rows = vec![
        row("beta", ActivityType::Revenue, dec!(20), date(2024, 1, 1)),
        row("Alpha", ActivityType::Revenue, dec!(5), date(2024, 1, 2)),
        row("gamma", ActivityType::Expense, dec!(100), date(2024, 1, 3)),
    ];

    let q = ReportQuery::parse(None, Some("amount"), Some("asc")).unwrap();
    let sorted: Vec<_> = q.apply(rows.clone()).into_iter().map(|r| r.amount).collect();
    assert_eq!(sorted, vec![dec!(5), dec!(20), dec!(100)]);

    let q = ReportQuery::parse(None, Some("description"), Some("asc")).unwrap();
    let sorted: Vec<_> = q.apply(rows.clone()).into_iter().map(|r| r.description).collect();
    assert_eq!(sorted, vec!["Alpha", "beta", "gamma"]);

    let q = ReportQuery::parse(None, None, None).unwrap();
    let sorted: Vec<_> = q.apply(rows).into_iter().map(|r| r.activity_date).collect();
    assert_eq!(sorted, vec![date(2024, 1, 3), date(2024, 1, 2), date(2024, 1, 1)]);
}

// ============================================================================
// CSV
// ============================================================================

#[test]
fn test_escape_field() {
    assert_eq!(escape_field("plain"), "plain");
    assert_eq!(escape_field("a, b"), "\"a, b\"");
    assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
}

#[test]
fn test_export_filename() {
    assert_eq!(
        export_filename(date(2024, 10, 18)),
        "farm-activity-report-2024-10-18.csv"
    );
}

#[test]
fn test_render_csv() {
    let mut harvest = row("Harvest, north", ActivityType::Revenue, dec!(1500.00), date(2024, 10, 1));
    harvest.resources_used = vec!["Diesel (20 liters)".to_string(), "Tractor (1)".to_string()];
    harvest.upcoming_dates = vec![date(2024, 11, 2)];
    harvest.labor_cost = dec!(61.0);
    let id = harvest.activity_id;

    let csv = render_activity_csv(&[harvest]);
    let lines: Vec<&str> = csv.split("\r\n").collect();

    assert_eq!(
        lines[0],
        "ID,Description,Type,Amount,Activity Date,Created Date,Resources Used,Assigned Staff,Upcoming Dates,Involved Branches,Labor Cost"
    );
    assert_eq!(
        lines[1],
        format!(
            "{id},\"Harvest, north\",Revenue,1500.00,2024-10-01,2023-11-14 22:13:20,\"Diesel (20 liters), Tractor (1)\",N/A,2024-11-02,N/A,61.0"
        )
    );
    assert_eq!(lines[2], "");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_render_csv_empty() {
    let csv = render_activity_csv(&[]);
    assert_eq!(csv.lines().count(), 1);
}

// ============================================================================
// Branch and monthly reports
// ============================================================================

#[test]
fn test_branch_report_counts_distinct_activities() {
    let north = BranchRecord {
        id: BranchId::new(),
        name: "North".to_string(),
        location: "Hill Road".to_string(),
        staff_count: 2,
    };
    let idle = BranchRecord {
        id: BranchId::new(),
        name: "Idle".to_string(),
        location: "Nowhere".to_string(),
        staff_count: 0,
    };
    let sale = record(ActivityType::Revenue, dec!(300), date(2024, 5, 1));
    let feed = record(ActivityType::Expense, dec!(120), date(2024, 5, 2));

    let assignments = vec![
        assigned(sale.id, north.id, PerformanceStatus::Completed),
        assigned(sale.id, north.id, PerformanceStatus::InProgress),
        assigned(feed.id, north.id, PerformanceStatus::Completed),
    ];

    let report = ReportService::branch_report(
        &[north.clone(), idle],
        &assignments,
        &[sale, feed],
    );

    assert_eq!(report.len(), 2);
    let n = &report[0];
    assert_eq!(n.branch_id, north.id);
    assert_eq!(n.staff_count, 2);
    assert_eq!(n.assigned_activities, 2);
    assert_eq!(n.completed_assignments, 2);
    assert_eq!(n.revenue_amount, dec!(300));
    assert_eq!(n.expense_amount, dec!(120));
    assert_eq!(n.net_profit, dec!(180));

    let i = &report[1];
    assert_eq!(i.assigned_activities, 0);
    assert_eq!(i.net_profit, Decimal::ZERO);
}

#[test]
fn test_monthly_buckets() {
    let activities = vec![
        record(ActivityType::Revenue, dec!(100), date(2024, 1, 15)),
        record(ActivityType::Expense, dec!(30), date(2024, 1, 20)),
        record(ActivityType::Neutral, dec!(0), date(2024, 3, 1)),
        record(ActivityType::Revenue, dec!(999), date(2023, 12, 31)),
    ];

    let report = ReportService::monthly(&activities, 2024).unwrap();

    assert_eq!(report.months.len(), 12);
    assert_eq!(report.months[0].month, 1);
    assert_eq!(report.months[0].net, dec!(70));
    assert_eq!(report.months[0].activity_count, 2);
    assert_eq!(report.months[2].activity_count, 1);
    assert_eq!(report.months[11].month, 12);
    assert_eq!(report.months[11].activity_count, 0);
    assert_eq!(report.total_revenue, dec!(100));
    assert_eq!(report.net_profit, dec!(70));
}

#[test]
fn test_monthly_rejects_bad_year() {
    assert_eq!(
        ReportService::monthly(&[], 0),
        Err(ReportError::InvalidYear(0))
    );
}

#[test]
fn test_year_bounds() {
    let (from, to) = ReportService::year_bounds(2024).unwrap();
    assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(to, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    assert!(ReportService::year_bounds(10_000).is_err());
}

proptest! {
    /// Sorting never drops or invents rows, and descending is the reverse of
    /// ascending for distinct keys.
    #[test]
    fn prop_sort_is_permutation(amounts in prop::collection::btree_set(0i64..100_000, 0..30)) {
        let rows: Vec<ActivityReportRow> = amounts
            .iter()
            .map(|c| row("r", ActivityType::Expense, Decimal::new(*c, 2), date(2024, 1, 1)))
            .collect();

        let asc = ReportQuery { sort: SortKey::Amount, order: SortOrder::Asc, search: None }
            .apply(rows.clone());
        let mut desc = ReportQuery { sort: SortKey::Amount, order: SortOrder::Desc, search: None }
            .apply(rows.clone());

        prop_assert_eq!(asc.len(), rows.len());
        desc.reverse();
        prop_assert_eq!(asc, desc);
    }

    /// Monthly buckets add up to the yearly totals.
    #[test]
    fn prop_monthly_totals(entries in prop::collection::vec((1u32..=12, 0i64..100_000, any::<bool>()), 0..50)) {
        let activities: Vec<ActivityRecord> = entries
            .iter()
            .map(|(m, cents, revenue)| {
                let t = if *revenue { ActivityType::Revenue } else { ActivityType::Expense };
                record(t, Decimal::new(*cents, 2), date(2024, *m, 1))
            })
            .collect();

        let report = ReportService::monthly(&activities, 2024).unwrap();
        let net: Decimal = report.months.iter().map(|m| m.net).sum();
        prop_assert_eq!(net, report.net_profit);
        let count: u64 = report.months.iter().map(|m| m.activity_count).sum();
        prop_assert_eq!(count, activities.len() as u64);
    }
}
