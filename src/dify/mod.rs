//! Dify module - completion requests for the three generators

mod client;
mod request;

pub use client::{DifyClient, DifyError, GenerationOutcome, DEFAULT_ENDPOINT, DEFAULT_USER};
pub use request::{
    ComicStripInputs, GenerationKind, GenerationRequest, PunchlineDirection, PunchlineInputs,
    StoryAdaptationInputs, MAX_RESULTS, MIN_RESULTS,
};
