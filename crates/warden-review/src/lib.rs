//! Issue completeness checking.
//!
//! Provides the check pipeline: event loading, label classification,
//! language detection, the required-section catalog, prompt construction,
//! model clients, and GitHub comment posting.

pub mod catalog;
pub mod classify;
pub mod event;
pub mod github;
pub mod language;
pub mod llm;
pub mod pipeline;
pub mod prompt;
