//! # vb-protocol
//!
//! Core protocol definitions and data models for the VibeBuilder client.
//!
//! This crate defines all shared data structures used for:
//! - Deserializing the backend's streamed build events
//! - Mapping pipeline steps to display identities
//! - Describing UI effects as Render Intents
//! - Serializing request bodies for the build and refine endpoints
//!
//! ## Modules
//!
//! - [`agent_models`]: Step-to-agent display identity mapping
//! - [`event_models`]: The streamed Event Record and its payload
//! - [`render_models`]: Render Intents consumed by the UI
//! - [`request_models`]: Request bodies for `/api/build` and `/api/refine`
//!
//! ## Design Principles
//!
//! - Minimal dependencies: only serde
//! - Pure data: no I/O, no channels, no presentation logic
//! - Independent compilation: no dependencies on other workspace crates

pub mod agent_models;
pub mod event_models;
pub mod render_models;
pub mod request_models;

// Re-export all public types for convenience
pub use agent_models::*;
pub use event_models::*;
pub use render_models::*;
pub use request_models::*;
