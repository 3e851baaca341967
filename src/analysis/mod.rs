//! Text analysis module
//! Heuristic summarization, entity, keyword, sentiment, classification,
//! readability and statistics steps coordinated by the engine

pub mod classifier;
pub mod engine;
pub mod entities;
pub mod keywords;
pub mod patterns;
pub mod readability;
pub mod sentiment;
pub mod statistics;
pub mod summarizer;
pub mod text_processor;

pub use engine::AnalysisEngine;
pub use text_processor::TextProcessor;
