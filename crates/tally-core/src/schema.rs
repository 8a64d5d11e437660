//! Field mapping tables
//!
//! Each entity lists its fields once as [`FieldBinding`]s: the field name in
//! the record, a [`FieldKind`] tag, and plain functions to read and write the
//! struct member. Loading looks each name up with [`get_value`], coerces the
//! text by its tag and assigns it. Text that does not parse is skipped and
//! the member keeps its default.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{Gender, Phone};
use crate::record::{
    enumerate_strings, escape_value, field_exists, get_value, join_strings, replace_value_with,
    Boundary, ReplaceOptions, LINE_ENDING,
};

/// Date format written back to records
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date formats accepted when reading, tried in order
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Date-time formats accepted when reading; only the date part is kept
const DATE_TIME_FORMATS: [&str; 4] = [
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Type tag of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Comma-delimited list of strings
    TextList,
    /// Comma-delimited list of dates
    DateList,
    Bool,
    Int,
    Date,
    Gender,
    Phone,
}

/// A field value coerced from record text
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    TextList(Vec<String>),
    DateList(Vec<NaiveDate>),
    Bool(bool),
    Int(i64),
    Date(NaiveDate),
    Gender(Gender),
    Phone(Phone),
}

/// One row of an entity's mapping table
pub struct FieldBinding<T> {
    /// Field name in the record
    pub name: &'static str,
    pub kind: FieldKind,
    /// Format the member as record text; empty means "nothing to write"
    pub read: fn(&T) -> String,
    /// Assign a value already coerced to `kind`
    pub write: fn(&mut T, FieldValue),
}

/// A type that can be loaded from and saved to a record
pub trait Entity: Sized {
    fn bindings() -> Vec<FieldBinding<Self>>;
}

/// Parse a boolean the way record files spell them (`True`, `false`, ...)
pub fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Format a boolean for a record
pub fn format_bool(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}

/// Parse a date in any of the accepted formats
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Format a list of dates as comma-delimited record text
pub fn format_dates(dates: &[NaiveDate]) -> String {
    let items: Vec<String> = dates
        .iter()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .collect();
    join_strings(&items)
}

/// Coerce record text to a value of the given kind
///
/// Returns `None` when the text does not parse.
pub fn coerce(kind: FieldKind, raw: &str) -> Option<FieldValue> {
    match kind {
        FieldKind::Text => Some(FieldValue::Text(raw.to_string())),
        FieldKind::TextList => Some(FieldValue::TextList(enumerate_strings(raw))),
        FieldKind::DateList => Some(FieldValue::DateList(
            enumerate_strings(raw)
                .iter()
                .filter_map(|item| parse_date(item))
                .collect(),
        )),
        FieldKind::Bool => parse_bool(raw).map(FieldValue::Bool),
        FieldKind::Int => raw.trim().parse().ok().map(FieldValue::Int),
        FieldKind::Date => parse_date(raw).map(FieldValue::Date),
        FieldKind::Gender => raw.parse().ok().map(FieldValue::Gender),
        FieldKind::Phone => Some(FieldValue::Phone(Phone::parse(raw))),
    }
}

/// Assign every field found in `document` to `target`
///
/// Returns how many fields were assigned.
pub fn populate<T: Entity>(target: &mut T, document: &str) -> usize {
    let mut assigned = 0;
    for binding in T::bindings() {
        let raw = get_value(document, binding.name);
        if raw.is_empty() {
            continue;
        }
        if let Some(value) = coerce(binding.kind, &raw) {
            (binding.write)(target, value);
            assigned += 1;
        }
    }
    assigned
}

/// Build an entity from its defaults and a record
pub fn load<T: Entity + Default>(document: &str) -> T {
    let mut entity = T::default();
    populate(&mut entity, document);
    entity
}

/// Write an entity's fields into an existing record
///
/// Fields the entity does not know about are left untouched. Empty members
/// are only written when the record already has that field, so clearing a
/// value clears it on disk without adding blank fields.
pub fn merge<T: Entity>(document: &str, source: &T) -> String {
    let options = ReplaceOptions {
        create_line: true,
        boundary: Boundary::Lookup,
        escape: true,
    };

    let mut result = document.to_string();
    for binding in T::bindings() {
        let text = (binding.read)(source);
        if text.is_empty() && !field_exists(&result, binding.name) {
            continue;
        }
        result = replace_value_with(&result, binding.name, &text, &options);
    }
    result
}

/// Render an entity as a fresh record, one field per line
pub fn render<T: Entity>(source: &T) -> String {
    let mut out = String::new();
    for binding in T::bindings() {
        let text = (binding.read)(source);
        if text.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "{} = \"{}\"{}",
            binding.name,
            escape_value(&text),
            LINE_ENDING
        ));
    }
    out
}
