//! Background task for asynchronous storage writes.
//!
//! The session posts writes and never waits for them; this module owns the
//! task that applies them in order.
//!
//! # Architecture
//!
//! - `messages`: write requests and per-write responses
//! - `handler`: worker task and the handle used to post to it

pub mod handler;
pub mod messages;

pub use handler::{PersistenceHandle, PersistenceWorker};
pub use messages::{StoreMessage, WorkerResponse};
