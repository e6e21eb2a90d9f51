//! File-based logging for the calculator.
//!
//! All `tracing` events and spans emitted by the crate end up in
//! `popcalc.log` inside the data directory. Nothing is written to the
//! terminal, so logging never interferes with the front end.
//!
//! # Architecture
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter (rotating) → popcalc.log
//! ```
//!
//! # Configuration
//!
//! Level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `file_writer`: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::{FileWriter, MAX_BACKUP_FILES, MAX_FILE_SIZE_BYTES};
pub use init::init_tracing;
