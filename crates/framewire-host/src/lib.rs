//! Host-process side of framewire.
//!
//! The privileged process exposes native objects to render-process script
//! code: it publishes registrations, executes incoming call requests and
//! sends back results. Method failures travel to the script caller as
//! rejected promises, never as local faults.

pub mod router;

pub use router::{HostObject, HostRouter};
