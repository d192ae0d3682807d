//! Storage backend traits.

mod adapter;
mod backend;

pub use adapter::{ConnectOptions, GraphAdapter};
pub use backend::{GraphBackend, IntoRecords};
