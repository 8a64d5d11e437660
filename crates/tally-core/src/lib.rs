//! Tally Core Library
//!
//! This crate reads and edits flat record files: plain text holding
//! `Name = "Value"` assignments, one entity per file. User profiles,
//! schools and recent-file lists are all stored this way.
//!
//! # Quick Start
//!
//! ```
//! use tally_core::record::{get_value, replace_value, enumerate_field};
//!
//! let doc = "Grade = \"90\" Course = \"Math\" Tags = \"a,,b\"";
//! assert_eq!(get_value(doc, "Course"), "Math");
//!
//! let doc = replace_value(doc, "Grade", "95", false);
//! assert_eq!(get_value(&doc, "Grade"), "95");
//! assert_eq!(enumerate_field(&doc, "Tags"), vec!["a", "b"]);
//! ```
//!
//! # Modules
//!
//! - `record`: Field lookup, replacement and list splitting
//! - `search`: Search query tokenizing
//! - `text`: Display text helpers
//! - `schema`: Field mapping tables used to load and save entities
//! - `models`: Profiles, contact details and schools
//! - `session`: The logged-on user's state
//! - `directory`: User folder scanning and account changes
//! - `storage`: Record file persistence
//! - `config`: Application configuration

pub mod config;
pub mod directory;
pub mod models;
pub mod record;
pub mod schema;
pub mod search;
pub mod session;
pub mod storage;
pub mod text;

pub use config::Config;
pub use directory::{UserDirectory, UserEntry};
pub use models::{ContactInfo, Gender, Phone, Profile, School};
pub use record::{Boundary, ReplaceOptions};
pub use search::SearchQuery;
pub use session::Session;
pub use storage::{RecordFile, StorageError, StorageResult};
