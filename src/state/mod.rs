//! Moderation state containers.
//!
//! State is explicitly constructed and explicitly owned; the engine holds
//! one instance of each container and all mutation goes through their
//! methods. There are no process-wide singletons.

mod registry;
mod warnings;

pub use registry::{Evaluation, ModerationRegistry};
pub use warnings::WarningTracker;
