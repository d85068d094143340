//! Array Types - Core data structures for type-erased script arrays
//!
//! This crate contains the pieces every array node agrees on: runtime type
//! descriptors, element references over raw element bytes, the dynamic array
//! container with its random-access iterators, and the node/pin schema used
//! to describe array nodes to the editor.
//!
//! Element types are plain old data. Every value is moved around with byte
//! copies sized by its descriptor, so types that need construction or
//! destruction logic cannot live in a [`ScriptArray`].

mod array;
mod descriptor;
mod element;
mod error;
mod iter;
mod types;
mod value;

pub use array::*;
pub use descriptor::*;
pub use element::*;
pub use error::*;
pub use iter::*;
pub use types::*;
pub use value::*;
