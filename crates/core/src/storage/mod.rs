//! Persistence boundary for polls and responses

pub mod deadline;
pub mod ports;

pub use deadline::with_deadline;
pub use ports::PollStore;
