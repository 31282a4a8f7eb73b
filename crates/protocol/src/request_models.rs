//! Request bodies for the backend's streaming endpoints.

use serde::{Deserialize, Serialize};

/// Body for `POST /api/build`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Free-text description of the app to build.
    pub idea: String,
}

/// Body for `POST /api/refine`.
///
/// Carries the full current artifact as the base the refinement
/// augments, plus the user's feedback.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RefineRequest {
    pub code: String,
    pub feedback: String,
}
