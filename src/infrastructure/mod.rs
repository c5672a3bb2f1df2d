//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the AssemblyAI API, `.env` files and the config file.

pub mod config;
pub mod credentials;
pub mod transcription;

// Re-export adapters
pub use config::XdgConfigStore;
pub use credentials::{ApiKeyResolver, CredentialError, CredentialSource};
pub use transcription::AssemblyAiClient;
