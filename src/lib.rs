pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod intake;
pub mod pipeline;
pub mod publisher;
