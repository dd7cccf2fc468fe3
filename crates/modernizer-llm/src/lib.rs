//! Modernizer-LLM: chat-completion client for source modernization
//!
//! Turns one Java source file into a two-message prompt, sends it to an
//! OpenAI-compatible completion endpoint (Groq by default) and hands the
//! model's text back untouched.
//!
//! The credential is resolved once into a [`ModelConfig`] and passed in
//! explicitly; nothing reads the process environment after construction.

pub mod client;
pub mod config;
pub mod error;
pub mod fakes;
pub mod prompt;

pub use client::{GroqClient, ModernizationModel};
pub use config::{ModelConfig, API_KEY_VAR, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::{ModelError, Result};
pub use prompt::{system_prompt, user_prompt};
