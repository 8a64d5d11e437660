//! Display text helpers

use std::path::Path;

use chrono::TimeDelta;

use crate::record::get_value;

/// Greeting built from the first word of a name
///
/// Returns an empty string when the name has no leading word.
pub fn welcome_message(name: &str) -> String {
    let first = name.split(' ').next().unwrap_or_default();
    if first.is_empty() {
        String::new()
    } else {
        format!("Hi {}!", first)
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

fn hours_and_minutes(hours: i64, minutes: i64) -> String {
    if hours > 0 && minutes > 0 {
        format!("{} {}", plural(hours, "hour"), plural(minutes, "minute"))
    } else if hours > 0 {
        plural(hours, "hour")
    } else {
        plural(minutes, "minute")
    }
}

/// Label for a number of seconds, truncated to whole minutes
pub fn time_label_from_seconds(seconds: f64) -> String {
    let total_minutes = seconds as i64 / 60;
    hours_and_minutes(total_minutes / 60, total_minutes % 60)
}

/// Label for a duration, rounding to the nearest minute
pub fn time_label(duration: TimeDelta) -> String {
    let mut hours = duration.num_hours();
    let mut minutes = duration.num_minutes() % 60;
    if duration.num_seconds() % 60 >= 30 {
        minutes += 1;
    }
    if minutes == 60 {
        minutes = 0;
        hours += 1;
    }
    hours_and_minutes(hours, minutes)
}

/// Join items into a readable list: `a`, `a and b`, `a, b, and c`
pub fn friendly_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

/// Read the `Name` field of a record file
///
/// Returns `None` if the file cannot be read.
pub fn friendly_name(path: &Path) -> Option<String> {
    let data = std::fs::read_to_string(path).ok()?;
    Some(get_value(&data, "Name"))
}
