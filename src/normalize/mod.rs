//! Field normalizer: derives canonical fields from raw fields, once per
//! dataset load.
//!
//! All recovery is per-field: a bad date becomes null, bad numeric text
//! becomes 0, a missing grouping category becomes a fixed default. The
//! normalizer never rejects a frame.

pub mod calendar;

pub use calendar::{closing_bucket, ClosingBucket, MONTH_NAMES};

use crate::model::{parse_currency, parse_date, DatasetName, Frame, Record, Value};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default label for missing grouping categories.
pub const UNKNOWN: &str = "Unknown";

/// Terminal deal stages: a deal in one of these counts as closed.
pub static CLOSED_STAGES: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["Closed-Won", "Closed (Lost)", "Closed (Future prospect)"]);

/// Score-bucket labels with their sampling weights.
pub static SCORE_BUCKETS: Lazy<Vec<(&'static str, f64)>> = Lazy::new(|| {
    vec![
        ("Under 50", 0.70),
        ("50-100", 0.20),
        ("100-150", 0.05),
        ("Over 150", 0.05),
    ]
});

const SCORE_SEED: u64 = 42;

/// Normalize a raw frame for `dataset`. `today` anchors the calendar-derived
/// fields (closing bucket, days overdue) so a load is reproducible.
pub fn normalize(dataset: DatasetName, frame: Frame, today: NaiveDate) -> Frame {
    match dataset {
        DatasetName::Deals => normalize_deals(frame, today),
        DatasetName::Invoices => normalize_invoices(frame, today),
        DatasetName::Accounts => normalize_accounts(frame),
    }
}

/// The columns a normalized frame carries: the raw schema plus the derived
/// fields. Used for spec validation and for the degraded-empty case.
pub fn normalized_columns(dataset: DatasetName) -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = dataset.raw_columns().to_vec();
    match dataset {
        DatasetName::Deals => {
            columns.extend(["Closing Month", "Closing Bucket", "Year", "Month", "Is Closed"]);
        }
        DatasetName::Invoices => {
            columns.extend([
                "Invoice Date",
                "Due Date",
                "Year",
                "Month",
                "Quarter",
                "MP",
                "Name",
                "Days Overdue",
                "Receivables",
                "Paid Amount",
            ]);
        }
        DatasetName::Accounts => {
            columns.push("Score Bucket");
        }
    }
    columns
}

fn normalize_deals(frame: Frame, today: NaiveDate) -> Frame {
    let mut out = Frame::new(
        normalized_columns(DatasetName::Deals)
            .iter()
            .map(|c| c.to_string())
            .collect(),
    );
    for raw in frame.rows() {
        let mut row = raw.clone();
        coalesce_text(&mut row, "Stage", "");
        coalesce_text(&mut row, "Deal Owner Name", UNKNOWN);
        coerce_number(&mut row, "Amount");
        coerce_number(&mut row, "Consulting Fee");
        coerce_number(&mut row, "Sales Cycle Duration");
        coerce_date(&mut row, "Created Time");
        coerce_date(&mut row, "Closing Date");

        let closing = row.date("Closing Date");
        match closing {
            Some(date) => {
                row.set("Closing Month", Value::text(calendar::month_year_label(date)));
                row.set("Year", Value::Number(date.year() as f64));
                row.set("Month", Value::text(calendar::month_name(date)));
            }
            None => {
                row.set("Closing Month", Value::Null);
                row.set("Year", Value::Null);
                row.set("Month", Value::Null);
            }
        }
        row.set(
            "Closing Bucket",
            Value::text(closing_bucket(closing, today).as_str()),
        );
        let is_closed = row
            .text("Stage")
            .is_some_and(|stage| CLOSED_STAGES.contains(&stage));
        row.set("Is Closed", Value::Number(if is_closed { 1.0 } else { 0.0 }));
        out.push(row);
    }
    out
}

fn normalize_invoices(frame: Frame, today: NaiveDate) -> Frame {
    let mut out = Frame::new(
        normalized_columns(DatasetName::Invoices)
            .iter()
            .map(|c| c.to_string())
            .collect(),
    );
    for raw in frame.rows() {
        // Every invoice view is date-bucketed; rows without a parsable
        // invoice date are excluded here.
        let Some(invoice_date) = parse_date(&raw.value("Invoice_Date")) else {
            continue;
        };
        let mut row = raw.clone();
        row.set("Invoice Date", Value::Date(invoice_date));
        row.set("Year", Value::Number(invoice_date.year() as f64));
        row.set("Month", Value::text(calendar::month_name(invoice_date)));
        row.set("Quarter", Value::text(calendar::quarter_label(invoice_date)));

        let location = raw.value("Location");
        row.set("MP", location);
        coalesce_text(&mut row, "MP", UNKNOWN);
        let name = raw.text("Client_Name").unwrap_or("").to_string();
        row.set("Name", Value::text(name));

        let amount = parse_currency(&raw.value("Invoice_Amount_USD"))
            .unwrap_or(0.0)
            .abs();
        row.set("Invoice_Amount_USD", Value::Number(amount));
        coerce_number(&mut row, "Quantity");
        let outstanding = row.number("Quantity").unwrap_or(0.0);
        row.set("Paid Amount", Value::Number(amount - outstanding));

        let due = parse_date(&raw.value("Invoice_DueDate"));
        match due {
            Some(date) => {
                row.set("Due Date", Value::Date(date));
                let overdue = (today - date).num_days().max(0);
                row.set("Days Overdue", Value::Number(overdue as f64));
            }
            None => {
                row.set("Due Date", Value::Null);
                row.set("Days Overdue", Value::Null);
            }
        }

        let open = raw.text("Status") == Some("AUTHORISED") && raw.value("FullyPaidOnDate").is_blank();
        row.set(
            "Receivables",
            Value::Number(if open { amount } else { 0.0 }),
        );
        out.push(row);
    }
    out
}

fn normalize_accounts(frame: Frame) -> Frame {
    let mut out = Frame::new(
        normalized_columns(DatasetName::Accounts)
            .iter()
            .map(|c| c.to_string())
            .collect(),
    );
    // The source has no score column; buckets are simulated with a fixed
    // seed so a load is reproducible.
    let mut rng = StdRng::seed_from_u64(SCORE_SEED);
    for raw in frame.rows() {
        let mut row = raw.clone();
        coalesce_text(&mut row, "Account Owner Name", UNKNOWN);
        row.set("Score Bucket", Value::text(sample_bucket(&mut rng)));
        out.push(row);
    }
    out
}

fn sample_bucket(rng: &mut StdRng) -> &'static str {
    let roll: f64 = rng.random();
    let mut cumulative = 0.0;
    for (label, weight) in SCORE_BUCKETS.iter() {
        cumulative += weight;
        if roll < cumulative {
            return label;
        }
    }
    SCORE_BUCKETS.last().map(|(label, _)| *label).unwrap_or(UNKNOWN)
}

fn coalesce_text(row: &mut Record, field: &str, default: &str) {
    if row.is_blank(field) {
        row.set(field, Value::text(default));
    }
}

fn coerce_number(row: &mut Record, field: &str) {
    let value = match parse_currency(&row.value(field)) {
        Some(n) => Value::Number(n),
        None => Value::Null,
    };
    row.set(field, value);
}

fn coerce_date(row: &mut Record, field: &str) {
    let value = match parse_date(&row.value(field)) {
        Some(d) => Value::Date(d),
        None => Value::Null,
    };
    row.set(field, value);
}
