//! Array Nodes - Blueprint nodes exposing the generic array algorithms
//!
//! This crate contains the node registry, the execution context handed to
//! each node, and the registration of one node per array algorithm. Nodes
//! read their arguments from input pins, resolve named script functions on
//! the `Object` pin and forward to [`array_algorithms`].

pub use array_algorithms;
pub use array_types;

mod config;
mod executor;
mod logging;
mod nodes;
mod registry;

pub use config::*;
pub use executor::*;
pub use logging::*;
pub use nodes::*;
pub use registry::*;
