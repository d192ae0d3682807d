//! Backend selection.
//!
//! The factory maps database-type tags to adapter constructors.

mod backend_factory;

pub use backend_factory::{AdapterDescriptor, BackendFactory, BackendRegistry, Constructor};
