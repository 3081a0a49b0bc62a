//! Standard unit of work wrappers.

pub mod timeout;

pub use timeout::{TimeoutWork, WorkTimeout};
