//! Read-through caching in front of data-access collaborators.

mod key;
mod layer;

pub use key::{entity_pattern, CacheKey};
pub use layer::CacheLayer;
