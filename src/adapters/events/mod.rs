//! Event bus adapters.
//!
//! - `InProcessEventBus` - the process-local publish/subscribe bus
//! - `dispatch` - the fire-and-forget primitive each emit goes through

mod dispatch;
mod in_process;

pub use in_process::InProcessEventBus;
