//! CSV export of the activity report (RFC 4180).

use chrono::NaiveDate;

use crate::dashboard::ActivityReportRow;

/// Header row of the export.
pub const CSV_HEADER: [&str; 11] = [
    "ID",
    "Description",
    "Type",
    "Amount",
    "Activity Date",
    "Created Date",
    "Resources Used",
    "Assigned Staff",
    "Upcoming Dates",
    "Involved Branches",
    "Labor Cost",
];

/// Placeholder for empty list cells.
pub const EMPTY_CELL: &str = "N/A";

/// Download filename for an export generated on `today`.
#[must_use]
pub fn export_filename(today: NaiveDate) -> String {
    format!("farm-activity-report-{}.csv", today.format("%Y-%m-%d"))
}

/// Quotes a field if it contains a comma, quote, or line break.
#[must_use]
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn list_cell<T: AsRef<str>>(items: &[T]) -> String {
    if items.is_empty() {
        EMPTY_CELL.to_string()
    } else {
        items
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn write_record(out: &mut String, fields: &[String]) {
    let line = fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&line);
    out.push_str("\r\n");
}

/// Renders rows as CSV with CRLF line endings.
#[must_use]
pub fn render_activity_csv(rows: &[ActivityReportRow]) -> String {
    let mut out = String::new();
    let header: Vec<String> = CSV_HEADER.iter().map(ToString::to_string).collect();
    write_record(&mut out, &header);

    for row in rows {
        let dates: Vec<String> = row
            .upcoming_dates
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect();
        write_record(
            &mut out,
            &[
                row.activity_id.to_string(),
                row.description.clone(),
                row.activity_type.label().to_string(),
                row.amount.round_dp(2).to_string(),
                row.activity_date.format("%Y-%m-%d").to_string(),
                row.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                list_cell(&row.resources_used),
                list_cell(&row.assigned_staff),
                list_cell(&dates),
                list_cell(&row.involved_branches),
                row.labor_cost.round_dp(2).to_string(),
            ],
        );
    }
    out
}
