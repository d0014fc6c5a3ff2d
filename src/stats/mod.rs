//! Stats module - emotion summaries over chart rows

mod emotion;

pub use emotion::EmotionSummary;
