// Handwriting analysis: both endpoints share one upstream-call → extract routine.
// All upstream calls go through llm_client::VisionModel.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod service;
pub mod upload;
