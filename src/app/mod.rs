//! Application layer coordinating state, events, and actions.
//!
//! This module sits between a front end (the terminal binary, or any other
//! host) and the calculator, editor, storage and worker layers.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Session operation → Event → Event Handler → State Mutations → Actions → Side Effects
//!                                                                 ↓
//!                                          Persistence Worker / Clipboard
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transitions
//! - [`modes`]: Session lifecycle phase
//! - [`state`]: Central state container
//! - [`session`]: Public session API executing actions and notifying observers

pub mod actions;
pub mod handler;
pub mod modes;
pub mod session;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::SessionPhase;
pub use session::CalculatorSession;
pub use state::AppState;
