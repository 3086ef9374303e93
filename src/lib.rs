//! roombook - Meeting-Room Booking Service
//!
//! A web service that books meeting rooms on a third-party portal by driving
//! a real browser, plus a chat-completion passthrough.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **Booking**: The browser-driven automation engine (time arithmetic,
//!   selector fallback chains, navigation flow, session lifecycle)
//! - **LLM**: Chat-completion passthrough client
//! - **Server**: HTTP routes, bearer auth, and rate limiting

pub mod booking;
pub mod core;
pub mod llm;
pub mod server;

// Re-export commonly used items
pub use core::{Config, Result, RoombookError};
pub use core::{BookingRequest, BookingResult};
