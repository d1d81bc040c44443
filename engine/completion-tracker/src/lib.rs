//! # Completion Tracker
//!
//! Remembers which gameweeks already had their standings published so a
//! scheduled re-run does not notify twice.
//!
//! ## Architecture
//!
//! - **CompletionStore**: trait shared by every marker backend
//! - **FileCompletionTracker**: plain text file, one gameweek id per line
//! - **InMemoryCompletionTracker**: process-local set for tests and dry runs
//!
//! ## Usage
//!
//! ```rust
//! use completion_tracker::{CompletionStore, FileCompletionTracker};
//! use tempfile::TempDir;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let temp_dir = TempDir::new()?;
//!     let tracker = FileCompletionTracker::open(temp_dir.path().join("gameweekdb")).await?;
//!
//!     if !tracker.is_marked(7).await? {
//!         tracker.mark(7).await?;
//!     }
//!     assert!(tracker.is_marked(7).await?);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod store;

pub use error::{Result, TrackerError};
pub use store::{CompletionStore, FileCompletionTracker, InMemoryCompletionTracker};
