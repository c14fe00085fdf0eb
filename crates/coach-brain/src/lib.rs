//! OpenRouter chat-completion gateway.
//!
//! This crate wraps the single outbound call the coach service makes: one
//! `POST /chat/completions` with a fixed model, a message list and a fixed
//! temperature, returning the text of the first choice.
//!
//! - [`CompletionGateway`] - The seam the orchestrator depends on
//! - [`OpenRouterBrain`] - HTTP implementation against an OpenRouter-compatible API
//! - [`BrainError`] - Transport, HTTP and response-shape failures
//!
//! # Example
//!
//! ```rust,no_run
//! use coach_brain::{ChatMessage, CompletionGateway, OpenRouterBrain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = OpenRouterBrain::from_env()?;
//!     let reply = brain
//!         .complete(vec![
//!             ChatMessage::system("Você é um coach pessoal."),
//!             ChatMessage::user("Como organizo minha semana?"),
//!         ])
//!         .await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use api_types::ChatMessage;
pub use brain::{CompletionGateway, OpenRouterBrain};
pub use config::{CoachBrainConfig, CoachBrainConfigBuilder, DEFAULT_API_URL, DEFAULT_MODEL};
pub use error::BrainError;

// Re-export async_trait for implementors
pub use async_trait::async_trait;
