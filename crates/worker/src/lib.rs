//! Worker primitives for the effect scheduler.
//!
//! * [`spawn`] routes futures onto the ambient Tokio runtime, falling back to
//!   a small shared runtime when called from a non-async host.
//! * [`TokenSlots`] keeps one live [`GenerationToken`] per key so a newer
//!   fetch supersedes and cancels an older one.

mod class;
mod spawn;
mod token;

pub use class::TaskClass;
pub use spawn::spawn;
pub use token::{GenerationClock, GenerationToken, TokenSlots};
