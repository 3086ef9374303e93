//! Browser-driven booking engine
//!
//! Resilient form automation against the booking portal: time arithmetic,
//! selector fallback chains, the navigation flow, and per-attempt session
//! lifecycle. The engine is stateless across attempts; everything runs inside
//! one isolated session supplied by [`session`].

pub mod clock;
pub mod driver;
pub mod navigator;
pub mod page;
pub mod selectors;
pub mod session;

pub use page::{PortalPage, SelectControl};
pub use session::{book, run_session};
