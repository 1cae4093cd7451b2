#![forbid(unsafe_code)]

//! Core: geometry, interaction events, animation primitives and errors.

pub mod animation;
pub mod error;
pub mod event;
pub mod geometry;
pub mod logging;

pub use error::{ArborError, HierarchyFault, Result};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
