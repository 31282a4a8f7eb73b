//! # vb-client
//!
//! Streaming update controller for the VibeBuilder client.
//!
//! This crate consumes the backend's chunked event stream and turns it
//! into Render Intents for the UI:
//! - Reconstructing complete text lines from arbitrarily-fragmented
//!   byte chunks
//! - Filtering and deserializing event-carrying lines
//! - Classifying each event into chat, status, and artifact updates
//! - Owning the build session's state machine and the de-duplicated
//!   current artifact
//!
//! ## Modules
//!
//! - [`api`]: Streaming HTTP client for the build and refine endpoints
//! - [`controller`]: Drives one stream end-to-end
//! - [`decoder`]: Byte chunks to complete text lines
//! - [`parser`]: Event lines to structured records
//! - [`router`]: Event records to Render Intents
//! - [`session`]: Build-lifecycle state machine
//! - [`ops`]: Command loop bridging the UI to the controller

pub mod api;
pub mod controller;
pub mod decoder;
pub mod error;
pub mod ops;
pub mod parser;
pub mod router;
pub mod session;

pub use api::ApiClient;
pub use controller::UpdateController;
pub use error::ClientError;
pub use ops::{run_client, ClientOp};
pub use session::{Session, SessionPhase};
