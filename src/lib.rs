//! campus-notify - event-driven notifications and cache coherency for a
//! multi-tenant learning platform.
//!
//! Domain events flow through an in-process bus to two subscribers: the
//! notification dispatcher (persist per recipient, push live to connected
//! channels) and the cache invalidation handler (evict affected
//! read-through entries).

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
