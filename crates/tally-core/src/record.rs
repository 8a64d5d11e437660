//! Flat record parsing
//!
//! A record is a plain string holding `Name = "Value"` assignments separated
//! by spaces or newlines. There is no structured in-memory form: every
//! operation re-scans the string and mutations return a new string.
//!
//! Values escape `"` as `\"` and `\` as `\\`. A quote preceded by an odd run
//! of backslashes is part of the value; any other quote terminates it.
//!
//! None of these functions fail. A missing or malformed field reads as an
//! empty string, and callers that need to tell "missing" apart from "empty"
//! use [`field_exists`] first.

use serde::{Deserialize, Serialize};

/// Line terminator written after a field created on its own line
pub const LINE_ENDING: &str = "\r\n";

/// Separator between the field name and its value
const ASSIGN: &str = " = ";

/// Characters accepted in front of a field name by [`Boundary::Lookup`],
/// in the order they are tried
const LOOKUP_BOUNDARIES: [char; 3] = ['\n', '\r', ' '];

/// Rule used to decide where a field name starts
///
/// Both rules exist so that a field name which is the suffix of another
/// (`Name` inside `UserName`) is not matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Offset 0 first, then a single leading space
    #[default]
    Legacy,
    /// A leading `\n`, `\r` or space (first character with any hit wins),
    /// then offset 0
    Lookup,
}

impl Boundary {
    /// Whether this rule finds a qualified occurrence of `name`
    pub fn finds(self, document: &str, name: &str) -> bool {
        self.locate(document, name).is_some()
    }

    /// Byte offset of the first character of `name`, if a qualified
    /// occurrence exists
    fn locate(self, document: &str, name: &str) -> Option<usize> {
        let marker = format!("{}{}", name, ASSIGN);
        let at_start = document.starts_with(&marker);

        match self {
            Boundary::Legacy => {
                if at_start {
                    return Some(0);
                }
                document.find(&format!(" {}", marker)).map(|idx| idx + 1)
            }
            Boundary::Lookup => {
                for ch in LOOKUP_BOUNDARIES {
                    if let Some(idx) = document.find(&format!("{}{}", ch, marker)) {
                        return Some(idx + ch.len_utf8());
                    }
                }
                at_start.then_some(0)
            }
        }
    }
}

impl std::fmt::Display for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Boundary::Legacy => write!(f, "legacy"),
            Boundary::Lookup => write!(f, "lookup"),
        }
    }
}

impl std::str::FromStr for Boundary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(Boundary::Legacy),
            "lookup" => Ok(Boundary::Lookup),
            other => Err(format!(
                "Unknown boundary rule '{}'. Use 'legacy' or 'lookup'.",
                other
            )),
        }
    }
}

/// Where the value of a located field sits
#[derive(Debug, PartialEq, Eq)]
enum Slot {
    /// No opening quote anywhere after the name
    Unquoted,
    /// The opening quote is the last character of the document
    Open,
    /// Raw (still escaped) value between `start` and `end`
    Span { start: usize, end: usize },
}

/// Find the value slot for a field whose name starts at `name_start`
fn value_slot(document: &str, name_start: usize, name: &str) -> Slot {
    let from = name_start + name.len();
    let start = match document[from..].find('"') {
        Some(offset) => from + offset + 1,
        None => return Slot::Unquoted,
    };

    if start == document.len() {
        return Slot::Open;
    }

    Slot::Span {
        start,
        end: closing_quote(document, start),
    }
}

/// Position of the quote that ends a value starting at `start`
///
/// An unterminated value runs to the end of the document.
fn closing_quote(document: &str, start: usize) -> usize {
    let bytes = document.as_bytes();
    let mut cursor = start;

    while let Some(offset) = document[cursor..].find('"') {
        let candidate = cursor + offset;
        if !is_escaped(bytes, candidate) {
            return candidate;
        }
        cursor = candidate + 1;
    }

    document.len()
}

/// Whether the byte at `pos` is preceded by an odd run of backslashes
fn is_escaped(bytes: &[u8], pos: usize) -> bool {
    let run = bytes[..pos]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count();
    run % 2 == 1
}

/// Decode a raw value: `\"` becomes `"`, then `\\` becomes `\`
pub fn unescape_value(raw: &str) -> String {
    raw.replace("\\\"", "\"").replace("\\\\", "\\")
}

/// Encode a value so that [`get_value`] decodes it back unchanged
pub fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Get the decoded value of a field
///
/// Returns an empty string when the field is missing, has no value, or the
/// value is empty. The first qualified occurrence wins.
pub fn get_value(document: &str, name: &str) -> String {
    let Some(name_start) = Boundary::Lookup.locate(document, name) else {
        return String::new();
    };

    match value_slot(document, name_start, name) {
        Slot::Span { start, end } if end > start => unescape_value(&document[start..end]),
        _ => String::new(),
    }
}

/// Check whether a field is present at all, regardless of its value
pub fn field_exists(document: &str, name: &str) -> bool {
    Boundary::Lookup.locate(document, name).is_some()
}

/// Options for [`replace_value_with`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOptions {
    /// Terminate an appended field with [`LINE_ENDING`]
    pub create_line: bool,
    /// Boundary rule used to find the existing field
    pub boundary: Boundary,
    /// Escape the new value before writing it
    pub escape: bool,
}

impl ReplaceOptions {
    /// Options matching the historical mutator, with the given line mode
    pub fn legacy(create_line: bool) -> Self {
        Self {
            create_line,
            ..Self::default()
        }
    }
}

/// Replace a field's value, appending the field if it is missing
///
/// `new_data` is written as-is; callers escape it themselves. When the field
/// is missing it is appended after a single space, followed by a line
/// terminator if `create_line` is set.
pub fn replace_value(document: &str, name: &str, new_data: &str, create_line: bool) -> String {
    replace_value_with(document, name, new_data, &ReplaceOptions::legacy(create_line))
}

/// Replace a field's value using explicit [`ReplaceOptions`]
pub fn replace_value_with(
    document: &str,
    name: &str,
    new_data: &str,
    options: &ReplaceOptions,
) -> String {
    let data = if options.escape {
        escape_value(new_data)
    } else {
        new_data.to_string()
    };

    let Some(name_start) = options.boundary.locate(document, name) else {
        let mut result = String::with_capacity(document.len() + name.len() + data.len() + 8);
        result.push_str(document);
        if !document.is_empty() {
            result.push(' ');
        }
        result.push_str(name);
        result.push_str(ASSIGN);
        result.push('"');
        result.push_str(&data);
        result.push('"');
        if options.create_line {
            result.push_str(LINE_ENDING);
        }
        return result;
    };

    let mut result = document.to_string();
    match value_slot(document, name_start, name) {
        Slot::Unquoted => {
            let at = name_start + name.len() + ASSIGN.len();
            result.insert_str(at, &format!("\"{}\"", data));
        }
        Slot::Open => {
            result.push_str(&data);
            result.push('"');
        }
        Slot::Span { start, end } => {
            result.replace_range(start..end, &data);
        }
    }
    result
}

/// Split comma-delimited data into its non-empty segments, in order
pub fn enumerate_strings(data: &str) -> Vec<String> {
    data.split(',')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split the decoded value of a field on commas
pub fn enumerate_field(document: &str, name: &str) -> Vec<String> {
    enumerate_strings(&get_value(document, name))
}

/// Join items with commas, the inverse of [`enumerate_strings`]
pub fn join_strings<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_value_simple() {
        let doc = "Grade = \"90\" Course = \"Math\"";
        assert_eq!(get_value(doc, "Grade"), "90");
        assert_eq!(get_value(doc, "Course"), "Math");
    }

    #[test]
    fn test_get_value_missing_field() {
        let doc = "Grade = \"90\"";
        assert_eq!(get_value(doc, "Course"), "");
        assert_eq!(get_value("", "Course"), "");
    }

    #[test]
    fn test_get_value_escaped_quotes() {
        let doc = r#"Name = "he said \"hi\"""#;
        assert_eq!(get_value(doc, "Name"), r#"he said "hi""#);
    }

    #[test]
    fn test_get_value_escaped_backslash_before_closing_quote() {
        // Two backslashes are an escaped backslash, so the quote closes the value
        let doc = r#"Path = "C:\\" Next = "x""#;
        assert_eq!(get_value(doc, "Path"), r"C:\");
        assert_eq!(get_value(doc, "Next"), "x");
    }

    #[test]
    fn test_get_value_odd_backslash_run() {
        let doc = r#"Path = "a\\\"b""#;
        assert_eq!(get_value(doc, "Path"), r#"a\"b"#);
    }

    #[test]
    fn test_get_value_does_not_match_suffix() {
        let doc = "UserName = \"bob\" Name = \"alice\"";
        assert_eq!(get_value(doc, "Name"), "alice");
        assert_eq!(get_value(doc, "UserName"), "bob");
    }

    #[test]
    fn test_get_value_suffix_only_is_missing() {
        let doc = "UserName = \"bob\"";
        assert_eq!(get_value(doc, "Name"), "");
        assert!(!field_exists(doc, "Name"));
    }

    #[test]
    fn test_get_value_newline_boundary() {
        let doc = "A = \"1\"\r\nName = \"carol\"\r\n";
        assert_eq!(get_value(doc, "Name"), "carol");
        assert_eq!(get_value(doc, "A"), "1");
    }

    #[test]
    fn test_get_value_prefers_boundary_match_over_start() {
        let doc = "Name = \"first\" Name = \"second\"";
        assert_eq!(get_value(doc, "Name"), "second");
    }

    #[test]
    fn test_get_value_empty_value() {
        let doc = "Name = \"\" Other = \"x\"";
        assert_eq!(get_value(doc, "Name"), "");
        assert!(field_exists(doc, "Name"));
    }

    #[test]
    fn test_get_value_quote_at_end() {
        assert_eq!(get_value("Name = \"", "Name"), "");
    }

    #[test]
    fn test_get_value_no_quote() {
        assert_eq!(get_value("Name = bob", "Name"), "");
    }

    #[test]
    fn test_get_value_unterminated() {
        assert_eq!(get_value("Name = \"bob", "Name"), "bob");
    }

    #[test]
    fn test_get_value_non_ascii() {
        let doc = "Motto = \"ñandú — ok\" City = \"Zürich\"";
        assert_eq!(get_value(doc, "Motto"), "ñandú — ok");
        assert_eq!(get_value(doc, "City"), "Zürich");
    }

    #[test]
    fn test_replace_value_existing() {
        let doc = "Grade = \"90\" Course = \"Math\"";
        let result = replace_value(doc, "Grade", "95", false);
        assert_eq!(result, "Grade = \"95\" Course = \"Math\"");
        assert_eq!(get_value(&result, "Grade"), "95");
        assert_eq!(get_value(&result, "Course"), "Math");
    }

    #[test]
    fn test_replace_value_after_space() {
        let doc = "Grade = \"90\" Course = \"Math\"";
        let result = replace_value(doc, "Course", "Science", false);
        assert_eq!(result, "Grade = \"90\" Course = \"Science\"");
    }

    #[test]
    fn test_replace_value_missing_inline() {
        let result = replace_value("A = \"1\"", "B", "2", false);
        assert_eq!(result, "A = \"1\" B = \"2\"");
    }

    #[test]
    fn test_replace_value_missing_new_line() {
        let result = replace_value("A = \"1\"", "B", "2", true);
        assert_eq!(result, "A = \"1\" B = \"2\"\r\n");
    }

    #[test]
    fn test_replace_value_empty_document() {
        assert_eq!(replace_value("", "A", "1", false), "A = \"1\"");
        assert_eq!(replace_value("", "A", "1", true), "A = \"1\"\r\n");
    }

    #[test]
    fn test_replace_value_open_slot() {
        let result = replace_value("Name = \"", "Name", "bob", false);
        assert_eq!(result, "Name = \"bob\"");
    }

    #[test]
    fn test_replace_value_unquoted_slot() {
        let result = replace_value("Name = ", "Name", "bob", false);
        assert_eq!(result, "Name = \"bob\"");
        assert_eq!(get_value(&result, "Name"), "bob");
    }

    #[test]
    fn test_replace_value_empty_value() {
        let result = replace_value("Name = \"\" X = \"1\"", "Name", "bob", false);
        assert_eq!(result, "Name = \"bob\" X = \"1\"");
    }

    #[test]
    fn test_replace_value_skips_escaped_quotes() {
        let doc = r#"Note = "say \"hi\"" X = "1""#;
        let result = replace_value(doc, "Note", "bye", false);
        assert_eq!(result, "Note = \"bye\" X = \"1\"");
    }

    #[test]
    fn test_replace_value_unterminated_runs_to_end() {
        let result = replace_value("Name = \"abc", "Name", "xyz", false);
        assert_eq!(result, "Name = \"xyz");
        assert_eq!(get_value(&result, "Name"), "xyz");
    }

    #[test]
    fn test_replace_value_writes_raw_literal() {
        let result = replace_value("", "Quote", r#"a\"b"#, false);
        assert_eq!(result, r#"Quote = "a\"b""#);
        assert_eq!(get_value(&result, "Quote"), r#"a"b"#);
    }

    #[test]
    fn test_replace_value_is_idempotent() {
        let doc = "Grade = \"90\"\r\nCourse = \"Math\"\r\n";
        for create_line in [false, true] {
            let once = replace_value(doc, "Grade", "95", create_line);
            let twice = replace_value(&once, "Grade", "95", create_line);
            assert_eq!(once, twice);

            let once = replace_value(doc, "Teacher", "Smith", create_line);
            let twice = replace_value(&once, "Teacher", "Smith", create_line);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_legacy_boundary_misses_newline_prefixed_field() {
        // Lookup sees the field, the legacy mutator does not and appends
        let doc = "A = \"1\"\r\nB = \"2\"";
        assert_eq!(get_value(doc, "B"), "2");

        let legacy = replace_value(doc, "B", "3", false);
        assert_eq!(legacy, "A = \"1\"\r\nB = \"2\" B = \"3\"");

        let options = ReplaceOptions {
            boundary: Boundary::Lookup,
            ..ReplaceOptions::default()
        };
        let unified = replace_value_with(doc, "B", "3", &options);
        assert_eq!(unified, "A = \"1\"\r\nB = \"3\"");
    }

    #[test]
    fn test_replace_with_escape() {
        let options = ReplaceOptions {
            escape: true,
            ..ReplaceOptions::default()
        };
        let value = r#"C:\dir "quoted""#;
        let result = replace_value_with("Path = \"old\"", "Path", value, &options);
        assert_eq!(get_value(&result, "Path"), value);
    }

    #[test]
    fn test_escape_round_trip() {
        for value in [r"\", r#"""#, r#"\""#, r#""\"#, r"a\\b", r#"x"y\z"#] {
            assert_eq!(unescape_value(&escape_value(value)), value);
        }
    }

    #[test]
    fn test_enumerate_strings() {
        assert_eq!(enumerate_strings("a,,b,"), vec!["a", "b"]);
        assert_eq!(enumerate_strings(",a,b,a"), vec!["a", "b", "a"]);
        assert!(enumerate_strings("").is_empty());
        assert!(enumerate_strings(",,,").is_empty());
    }

    #[test]
    fn test_enumerate_field() {
        let doc = "Students = \"amy,ben,,cal\" Name = \"x\"";
        assert_eq!(enumerate_field(doc, "Students"), vec!["amy", "ben", "cal"]);
        assert!(enumerate_field(doc, "Classes").is_empty());
    }

    #[test]
    fn test_join_strings() {
        assert_eq!(join_strings(&["a", "b"]), "a,b");
        assert_eq!(join_strings::<&str>(&[]), "");
        let items = enumerate_strings("x,y,z");
        assert_eq!(join_strings(&items), "x,y,z");
    }

    #[test]
    fn test_boundary_from_str() {
        assert_eq!("legacy".parse::<Boundary>().unwrap(), Boundary::Legacy);
        assert_eq!("Lookup".parse::<Boundary>().unwrap(), Boundary::Lookup);
        assert!("other".parse::<Boundary>().is_err());
        assert_eq!(Boundary::Lookup.to_string(), "lookup");
    }

    #[test]
    fn test_boundary_finds() {
        let doc = "A = \"1\"\r\nB = \"2\"\r\n";
        assert!(Boundary::Legacy.finds(doc, "A"));
        assert!(!Boundary::Legacy.finds(doc, "B"));
        assert!(Boundary::Lookup.finds(doc, "B"));
        assert!(!Boundary::Lookup.finds(doc, "C"));
    }
}
