//! Core application primitives (cycle runtime, scheduler, HTTP)

pub mod http;
pub mod runtime;
pub mod scheduler;

pub use runtime::*;
pub use scheduler::*;
