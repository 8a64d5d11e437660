//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use tally_core::text::{friendly_list, welcome_message};
use tally_core::{Profile, School, SearchQuery, UserEntry};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is in JSON mode
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize output: {}", e),
        }
    }

    /// Print a single field value
    pub fn print_value(&self, field: &str, value: &str, present: bool) {
        match self.format {
            OutputFormat::Human => {
                if present {
                    println!("{}", value);
                } else {
                    println!("{} (not set)", field);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "field": field,
                        "value": value,
                        "present": present
                    })
                );
            }
            OutputFormat::Quiet => {
                println!("{}", value);
            }
        }
    }

    /// Print a list of strings, one per line
    pub fn print_list(&self, items: &[String]) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("No items.");
                    return;
                }
                for item in items {
                    println!("{}", item);
                }
                println!("\n{} item(s)", items.len());
            }
            OutputFormat::Json => self.print_json(items),
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item);
                }
            }
        }
    }

    /// Print a tokenized search query
    pub fn print_query(&self, query: &SearchQuery) {
        match self.format {
            OutputFormat::Human => {
                if query.is_empty() {
                    println!("Empty query.");
                    return;
                }
                println!("Phrases:     {}", quoted(&query.phrases));
                println!("Words:       {}", friendly_list(&query.words));
                println!("Loose words: {}", friendly_list(&query.loose_words));
            }
            OutputFormat::Json => self.print_json(query),
            OutputFormat::Quiet => {
                for phrase in &query.phrases {
                    println!("\"{}\"", phrase);
                }
                for word in &query.loose_words {
                    println!("{}", word);
                }
            }
        }
    }

    /// Print the user folders
    pub fn print_users(&self, users: &[UserEntry]) {
        match self.format {
            OutputFormat::Human => {
                if users.is_empty() {
                    println!("No users found.");
                    return;
                }
                for user in users {
                    let folder = user
                        .folder
                        .file_name()
                        .map(|f| f.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    println!(
                        "{:<16} | {:<16} | {}",
                        truncate(&folder, 16),
                        truncate(&user.user_name, 16),
                        user.name
                    );
                }
                println!("\n{} user(s)", users.len());
            }
            OutputFormat::Json => self.print_json(users),
            OutputFormat::Quiet => {
                for user in users {
                    println!("{}", user.user_name);
                }
            }
        }
    }

    /// Print a profile with its recent files
    pub fn print_profile(&self, profile: &Profile, recent: &[String]) {
        match self.format {
            OutputFormat::Human => {
                let greeting = welcome_message(&profile.name);
                if !greeting.is_empty() {
                    println!("{}", greeting);
                    println!();
                }
                println!("Name:      {}", profile.name);
                println!("User name: {}", profile.user_name);
                if !profile.motto.is_empty() {
                    println!("Motto:     {}", profile.motto);
                }
                println!("Teacher:   {}", if profile.is_teacher { "yes" } else { "no" });
                if profile.is_teacher && !profile.students.is_empty() {
                    println!("Students:  {}", friendly_list(&profile.students));
                }
                if !profile.classes.is_empty() {
                    println!("Classes:   {}", friendly_list(&profile.classes));
                }
                if !profile.contact.phone.is_empty() {
                    println!("Phone:     {}", profile.contact.phone);
                }
                if !profile.contact.city.is_empty() {
                    println!(
                        "Location:  {}, {}",
                        profile.contact.city, profile.contact.country
                    );
                }

                if !recent.is_empty() {
                    println!();
                    println!("── Recent ({}) ──", recent.len());
                    for file in recent {
                        println!("{}", file);
                    }
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "profile": profile,
                        "recent": recent
                    })
                );
            }
            OutputFormat::Quiet => {
                println!("{}", profile.user_name);
            }
        }
    }

    /// Print a school record
    pub fn print_school(&self, school: &School) {
        match self.format {
            OutputFormat::Human => {
                println!("School:        {}", school.name);
                println!("Holidays:      {}", school.holidays.len());
                println!("Vacation days: {}", school.vacation_days.len());
                if !school.contact.city.is_empty() {
                    println!(
                        "Location:      {}, {}",
                        school.contact.city, school.contact.state
                    );
                }
            }
            OutputFormat::Json => self.print_json(school),
            OutputFormat::Quiet => {
                println!("{}", school.name);
            }
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "success": true, "message": message }))
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn quoted(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("\"{}\"", item)).collect();
    friendly_list(&quoted)
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_output_mode_checks() {
        let json = Output::new(OutputFormat::Json);
        assert!(json.is_json());
        assert!(!json.is_quiet());

        let quiet = Output::new(OutputFormat::Quiet);
        assert!(quiet.is_quiet());
        assert!(!quiet.is_json());

        let human = Output::new(OutputFormat::Human);
        assert!(!human.is_json() && !human.is_quiet());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long user name", 10), "a very ...");
        assert_eq!(truncate("ñandú ñandú ñandú", 8), "ñandú...");
    }

    #[test]
    fn test_quoted() {
        let items = vec!["red apple".to_string(), "pear".to_string()];
        assert_eq!(quoted(&items), "\"red apple\" and \"pear\"");
        assert_eq!(quoted(&[]), "");
    }
}
