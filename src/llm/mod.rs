//! LLM integration
//!
//! A single chat-completion passthrough client; the service never lets the
//! model decide to book rooms.

pub mod openai;

pub use openai::ChatClient;
