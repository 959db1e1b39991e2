// Submission pipeline: compose a request from form state, then drive it through the lifecycle.
// All network I/O goes through api_client::AnalysisBackend.

pub mod composer;
pub mod lifecycle;
