//! Roster import from tabular text.
//!
//! The host reads the file; this module splits delimited text into rows and
//! maps rows onto participants. Header cells are matched against known
//! aliases (English and Hebrew). A sheet without a recognizable header is
//! read positionally as name, phone, quantity.

use alloc::string::String;
use alloc::vec::Vec;

use raffle_abi::Participant;
use raffle_lib::{klog_debug, klog_info};

use crate::error::{RaffleError, RaffleResult};

pub const NAME_ALIASES: &[&str] = &[
    "name",
    "full name",
    "fullname",
    "participant",
    "שם",
    "שם מלא",
    "משתתף",
];

pub const PHONE_ALIASES: &[&str] = &[
    "phone",
    "phone number",
    "mobile",
    "cell",
    "tel",
    "telephone",
    "טלפון",
    "נייד",
    "מספר טלפון",
    "פלאפון",
];

pub const QUANTITY_ALIASES: &[&str] = &[
    "quantity",
    "qty",
    "tickets",
    "amount",
    "count",
    "כמות",
    "כרטיסים",
    "מספר כרטיסים",
];

const DELIMITERS: [char; 3] = [',', ';', '\t'];

/// Column positions of the recognized fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: Option<usize>,
    pub phone: Option<usize>,
    pub quantity: Option<usize>,
}

impl ColumnMap {
    pub const POSITIONAL: ColumnMap = ColumnMap {
        name: Some(0),
        phone: Some(1),
        quantity: Some(2),
    };

    fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.quantity.is_none()
    }
}

fn normalize(cell: &str) -> String {
    let trimmed = cell.trim().trim_start_matches('\u{feff}').trim();
    trimmed.to_lowercase()
}

/// First alias (in list order) that names some header cell wins.
fn find_column(header: &[String], aliases: &[&str]) -> Option<usize> {
    let normalized: Vec<String> = header.iter().map(|c| normalize(c)).collect();
    aliases
        .iter()
        .find_map(|alias| normalized.iter().position(|cell| cell == alias))
}

/// Map a header row; `None` when no cell matches any alias.
pub fn map_header(header: &[String]) -> Option<ColumnMap> {
    let map = ColumnMap {
        name: find_column(header, NAME_ALIASES),
        phone: find_column(header, PHONE_ALIASES),
        quantity: find_column(header, QUANTITY_ALIASES),
    };
    if map.is_empty() { None } else { Some(map) }
}

/// Ticket quantity of a cell. Blank, negative or non-numeric cells mean
/// unlimited (`0`); fractional values are truncated.
pub fn parse_quantity(cell: &str) -> u32 {
    let cell = cell.trim();
    if let Ok(n) = cell.parse::<u32>() {
        return n;
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 1.0 => {
            if v >= u32::MAX as f64 { u32::MAX } else { v as u32 }
        }
        _ => 0,
    }
}

fn cell(row: &[String], column: Option<usize>) -> &str {
    column
        .and_then(|c| row.get(c))
        .map(String::as_str)
        .unwrap_or("")
}

/// Convert rows into participants. Rows that identify nobody are dropped.
/// Fails with [`RaffleError::ImportEmpty`] if nothing usable remains.
pub fn import_rows(rows: &[Vec<String>]) -> RaffleResult<Vec<Participant>> {
    let (map, body) = match rows.split_first() {
        Some((header, rest)) => match map_header(header) {
            Some(map) => (map, rest),
            None => (ColumnMap::POSITIONAL, rows),
        },
        None => return Err(RaffleError::ImportEmpty),
    };
    klog_debug!("import: column map {:?}", map);

    let mut out = Vec::with_capacity(body.len());
    let mut skipped = 0usize;
    for row in body {
        let quantity = parse_quantity(cell(row, map.quantity));
        match Participant::new(cell(row, map.name), cell(row, map.phone), quantity) {
            Some(p) => out.push(p),
            None => skipped += 1,
        }
    }

    if out.is_empty() {
        return Err(RaffleError::ImportEmpty);
    }
    klog_info!("import: {} participants, {} rows skipped", out.len(), skipped);
    Ok(out)
}

fn detect_delimiter(first_line: &str) -> char {
    let mut best = ',';
    let mut best_count = 0usize;
    for delim in DELIMITERS {
        let mut in_quotes = false;
        let count = first_line
            .chars()
            .filter(|&c| {
                if c == '"' {
                    in_quotes = !in_quotes;
                }
                !in_quotes && c == delim
            })
            .count();
        if count > best_count {
            best = delim;
            best_count = count;
        }
    }
    best
}

fn end_row(row: &mut Vec<String>, field: &mut String, rows: &mut Vec<Vec<String>>) {
    row.push(core::mem::take(field));
    if row.iter().any(|c| !c.trim().is_empty()) {
        rows.push(core::mem::take(row));
    } else {
        row.clear();
    }
}

/// Split delimited text into rows of cells.
///
/// The delimiter (comma, semicolon or tab) is taken from the first line.
/// Double-quoted cells may contain delimiters, newlines and `""` escapes.
/// A leading UTF-8 BOM is ignored, as are lines with no content.
pub fn parse_delimited(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delim = detect_delimiter(text.lines().next().unwrap_or(""));

    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            '\r' => {}
            '\n' => end_row(&mut row, &mut field, &mut rows),
            c if c == delim => row.push(core::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    if !field.is_empty() || !row.is_empty() {
        end_row(&mut row, &mut field, &mut rows);
    }
    rows
}

/// Parse and map delimited text in one go.
pub fn import_text(text: &str) -> RaffleResult<Vec<Participant>> {
    import_rows(&parse_delimited(text))
}
