//! Transaction ingestion from CSV and JSON exports
//!
//! CSV headers are matched case-insensitively against a set of common
//! aliases, so exports from most banks and budgeting tools load without a
//! per-format parser. Rows without a usable date are skipped; amounts that
//! fail to parse become 0.0.

use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::Result;
use crate::models::{datetime_format, Transaction};
use crate::tags::TagSet;

/// Category assigned when neither the file nor a merchant hint provides one
pub const UNCATEGORIZED: &str = "uncategorized";

/// Merchant keywords that imply a base category
const MERCHANT_CATEGORY_HINTS: &[(&str, &str)] = &[
    ("uber", "travel"),
    ("lyft", "travel"),
    ("mcdonald", "food"),
    ("starbucks", "food"),
    ("amazon", "shopping"),
    ("netflix", "entertainment"),
    ("cinema", "entertainment"),
];

const DATE_COLUMNS: &[&str] = &["date", "transaction_date"];
const MERCHANT_COLUMNS: &[&str] = &["merchant", "description"];
const AMOUNT_COLUMNS: &[&str] = &["amount", "debit", "credit"];
const CATEGORY_COLUMNS: &[&str] = &["base_category", "category"];
const NOTES_COLUMNS: &[&str] = &["notes"];

/// Guess a base category from the merchant name
///
/// Returns `fallback` (or "uncategorized") when no hint matches.
pub fn guess_category(merchant: &str, fallback: Option<&str>) -> String {
    let merchant = merchant.to_lowercase();
    MERCHANT_CATEGORY_HINTS
        .iter()
        .find(|(keyword, _)| merchant.contains(keyword))
        .map(|(_, category)| category.to_string())
        .unwrap_or_else(|| fallback.unwrap_or(UNCATEGORIZED).to_string())
}

/// Column positions resolved from the header row
struct ColumnMap {
    headers: Vec<String>,
}

impl ColumnMap {
    fn new(headers: &StringRecord) -> Self {
        Self {
            headers: headers.iter().map(|h| h.trim().to_lowercase()).collect(),
        }
    }

    /// First non-empty value among the aliases, in alias order
    fn get<'r>(&self, record: &'r StringRecord, aliases: &[&str]) -> Option<&'r str> {
        aliases.iter().find_map(|alias| {
            let idx = self.headers.iter().position(|h| h == alias)?;
            record
                .get(idx)
                .map(str::trim)
                .filter(|value| !value.is_empty())
        })
    }
}

/// Parse a transaction date in any of the accepted formats
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    if let Some(dt) = datetime_format::parse(s) {
        return Some(dt);
    }
    let s = s.trim();
    ["%d/%m/%Y", "%m/%d/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse an amount, tolerating thousands separators
///
/// Unparseable and non-finite values ("NaN", "inf") become 0.0.
pub fn parse_amount(s: &str) -> f64 {
    s.replace(',', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse CSV data into untagged transactions
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnMap::new(rdr.headers()?);
    if !DATE_COLUMNS
        .iter()
        .any(|alias| columns.headers.iter().any(|h| h == alias))
    {
        debug!(headers = ?columns.headers, "CSV has no date column, every row will be skipped");
    }

    let mut transactions = Vec::new();
    let mut skipped = 0;

    for (row, result) in rdr.records().enumerate() {
        let record = result?;

        let date = match columns.get(&record, DATE_COLUMNS).and_then(parse_date) {
            Some(date) => date,
            None => {
                debug!(row = row + 1, "Skipping row without a usable date");
                skipped += 1;
                continue;
            }
        };

        let merchant = columns
            .get(&record, MERCHANT_COLUMNS)
            .unwrap_or("")
            .to_string();
        let amount = columns
            .get(&record, AMOUNT_COLUMNS)
            .map(parse_amount)
            .unwrap_or(0.0);
        let base_category = match columns.get(&record, CATEGORY_COLUMNS) {
            Some(category) if !category.eq_ignore_ascii_case(UNCATEGORIZED) => {
                category.to_lowercase()
            }
            _ => guess_category(&merchant, None),
        };
        let notes = columns
            .get(&record, NOTES_COLUMNS)
            .unwrap_or("")
            .to_string();

        transactions.push(Transaction {
            id: None,
            user_id: None,
            date,
            amount,
            merchant,
            base_category,
            source: "csv".to_string(),
            notes,
            derived_tags: TagSet::new(),
        });
    }

    debug!(
        parsed = transactions.len(),
        skipped, "Parsed CSV transactions"
    );
    Ok(transactions)
}

/// Parse CSV bytes, replacing invalid UTF-8 rather than failing
pub fn parse_csv_bytes(content: &[u8]) -> Result<Vec<Transaction>> {
    let text = String::from_utf8_lossy(content);
    parse_csv(text.as_bytes())
}

/// Parse a JSON array of transaction records
pub fn parse_json<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let transactions: Vec<Transaction> = serde_json::from_reader(reader)?;
    debug!(parsed = transactions.len(), "Parsed JSON transactions");
    Ok(transactions)
}
