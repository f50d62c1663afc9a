//! HTTP adapters.
//!
//! - [`events`] - `POST /events`, the ingest route for producers outside
//!   this process. In-process producers hold the bus directly.

pub mod events;

pub use events::{events_router, EventIngestState};
