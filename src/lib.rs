/// AI Course Generator
///
/// Thin orchestration service: generates a structured course outline for a
/// topic via a generative-text API, then attaches one representative video
/// per lesson via a video-search API. Served over HTTP for the terminal UI.

pub mod api;
pub mod config;
pub mod llm;
pub mod outline;
pub mod reading;
pub mod youtube;

// Re-export main types for easy access
pub use crate::api::models::{CourseResponse, LessonVideoBundle, ModuleVideoBundle};
pub use crate::config::Config;
pub use crate::llm::{LLMConfig, LLMProvider, LLM};
pub use crate::outline::{generate_course_outline, CourseOutline, Lesson, Module};
pub use crate::reading::{ReadingContentFinder, ReadingItem};
pub use crate::youtube::{VideoRecord, VideoSearch, YouTubeClient};
