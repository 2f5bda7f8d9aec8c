//! # taskling
//!
//! A hybrid parser that turns free-form natural-language task commands into
//! structured tasks, plus the thin layers around it: a durable store and an
//! optional HTTP API.
//!
//! ## Architecture
//!
//! - **Command parsing** (`command`): ordered rule stages over one working
//!   text — scaffold stripping, priority, category, due dates — with a
//!   bounded fuzzy date parser
//! - **Fallback classifiers** (`classify`): optional naive-Bayes models
//!   consulted only when a rule stage found nothing
//! - **Task store** (`store`): redb-backed persistence with
//!   case-insensitive name uniqueness and filter/sort queries
//! - **HTTP boundary** (`server`, feature `server`): axum routes over the
//!   parser and store
//!
//! ## Library usage
//!
//! ```
//! use taskling::command::CommandParser;
//!
//! let parser = CommandParser::new();
//! let parsed = parser.parse("remind me to submit report with high priority by monday");
//! assert_eq!(parsed.name, "submit report");
//! assert_eq!(parsed.priority.level(), 3);
//! assert!(parsed.due_date.is_some());
//! ```

pub mod classify;
pub mod command;
pub mod error;
pub mod paths;
#[cfg(feature = "server")]
pub mod server;
pub mod store;
pub mod task;
