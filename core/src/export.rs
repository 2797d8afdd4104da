//! Winner history as spreadsheet-ready CSV.

use alloc::borrow::Cow;
use alloc::string::{String, ToString};

use chrono::DateTime;
use raffle_abi::WinnerRecord;

pub const CSV_HEADER: &str = "draw_number,name,phone,timestamp";
const UTF8_BOM: char = '\u{feff}';
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Quote a field if it contains a delimiter, quote or line break.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        let mut quoted = String::with_capacity(field.len() + 2);
        quoted.push('"');
        quoted.push_str(&field.replace('"', "\"\""));
        quoted.push('"');
        Cow::Owned(quoted)
    } else {
        Cow::Borrowed(field)
    }
}

/// UTC `YYYY-MM-DD HH:MM:SS`; empty when out of range.
pub fn format_timestamp(timestamp_ms: u64) -> String {
    i64::try_from(timestamp_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

/// Render `winners` (in the given order) with a header line. `bom` prefixes
/// a UTF-8 byte-order mark so spreadsheet tools detect non-Latin names.
pub fn winners_to_csv(winners: &[WinnerRecord], bom: bool) -> String {
    let mut out = String::new();
    if bom {
        out.push(UTF8_BOM);
    }
    out.push_str(CSV_HEADER);
    out.push_str("\r\n");
    for w in winners {
        out.push_str(&w.draw_number.to_string());
        out.push(',');
        out.push_str(&escape_field(&w.name));
        out.push(',');
        out.push_str(&escape_field(&w.phone));
        out.push(',');
        out.push_str(&format_timestamp(w.timestamp_ms));
        out.push_str("\r\n");
    }
    out
}
