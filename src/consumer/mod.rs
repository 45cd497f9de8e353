//! Repository content consumers
//!
//! Consumer traits, the explicit consumer registry and the per-file
//! selection predicate. Built-in consumers live in [`builtin`]; the
//! indexing consumer lives in `crate::indexing`.

pub mod builtin;
mod error;
mod predicate;
mod registry;
mod traits;

pub use error::{ConsumerError, ConsumerResult};
pub use predicate::WantsFilePredicate;
pub use registry::{ConsumerDescriptor, ConsumerKind, ConsumerRegistry, Selection};
pub use traits::{Consumer, InvalidContentConsumer, KnownContentConsumer};
