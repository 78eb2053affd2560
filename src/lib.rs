// Public API for integration tests and potential library usage

pub mod api;
pub mod error;
pub mod llm;
pub mod pack;
pub mod prompt;
pub mod protocol;
pub mod server;
pub mod state;
pub mod types;
pub mod ws;
