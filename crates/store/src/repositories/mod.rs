//! Store implementations, one module per record type.

pub mod progress_store;
pub mod result_store;

pub use progress_store::ProgressStore;
pub use result_store::ResultStore;
