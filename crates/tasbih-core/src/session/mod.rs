//! Counting session.
//!
//! [`SessionEngine`] owns the live count and drives feedback and
//! persistence. [`SessionState`] is the plain data it guards.

mod engine;
mod guard;
mod state;


pub use engine::{SessionEngine, SessionSettings, MAX_TRANSITION_DELAY_MS};
pub use state::SessionState;
