//! API data models

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reading::ReadingItem;
use crate::youtube::VideoRecord;

/// Request body for course generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRequest {
    pub topic: String,
}

/// Composite course-generation response. Always returned whole: generator
/// parse errors ride along inside `course_outline` as data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseResponse {
    pub course_outline: Value,
    pub lesson_videos: Vec<ModuleVideoBundle>,
}

/// Per-module video results, lessons in outline order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleVideoBundle {
    pub module_title: String,
    pub lessons: Vec<LessonVideoBundle>,
}

/// Per-lesson video results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LessonVideoBundle {
    pub lesson_title: String,
    pub videos: Vec<VideoRecord>,
}

/// Request body for the secondary reading-content lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingRequest {
    pub query: String,
}

/// Reading-content response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingResponse {
    pub items: Vec<ReadingItem>,
}
