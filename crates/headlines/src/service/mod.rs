//! The read-through service: cache, then store, then upstream.

mod deadline;
mod error;
mod flight;
mod read_through;
mod views;

pub use error::{service_error_to_status_code, ServiceError};
pub use read_through::ReadThrough;
pub use views::{ViewCounter, ViewWorker};
