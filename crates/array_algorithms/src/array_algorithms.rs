//! Array Algorithms - Generic algorithms over type-erased script arrays
//!
//! Every algorithm here works on arrays whose element type is only known at
//! runtime. Predicates and comparators are script functions, called through
//! the [`Invoker`] seam with arguments marshalled into a raw parameter block.

pub use array_types;

mod invoke;
mod marshal;
mod modify;
mod native;
mod sample;
mod search;

pub use invoke::*;
pub use marshal::*;
pub use modify::*;
pub use native::*;
pub use sample::*;
pub use search::*;
