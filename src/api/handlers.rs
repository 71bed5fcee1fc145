//! API request handlers

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info};

use super::models::{CourseResponse, LessonVideoBundle, ModuleVideoBundle, ReadingResponse};
use crate::llm::LLM;
use crate::outline::generate_course_outline;
use crate::reading::ReadingContentFinder;
use crate::youtube::VideoSearch;

/// Handle health check requests
pub async fn health_check() -> Result<Value> {
    Ok(serde_json::json!({
        "status": "healthy",
        "service": "course-generator",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Generate a course outline and fetch related videos for each lesson.
///
/// One outline call, then one sequential video search per lesson in outline
/// order. Outline parse errors are embedded in the response; transport
/// failures on either external call propagate and fail the whole request.
pub async fn generate_course(
    llm: &dyn LLM,
    video_search: &dyn VideoSearch,
    topic: &str,
    topic_max_results: u32,
) -> Result<CourseResponse> {
    info!("Generating course for topic: {}", topic);

    let course_outline = generate_course_outline(llm, topic).await?;

    let lesson_videos = match course_outline.get("modules") {
        Some(modules) => collect_module_bundles(video_search, modules, topic).await?,
        None => vec![fallback_bundle(video_search, topic, topic_max_results).await?],
    };

    Ok(CourseResponse {
        course_outline,
        lesson_videos,
    })
}

async fn collect_module_bundles(
    video_search: &dyn VideoSearch,
    modules: &Value,
    topic: &str,
) -> Result<Vec<ModuleVideoBundle>> {
    let modules = modules.as_array().map(Vec::as_slice).unwrap_or(&[]);

    let mut bundles = Vec::with_capacity(modules.len());
    for module in modules {
        let module_title = module
            .get("module_title")
            .and_then(Value::as_str)
            .unwrap_or(topic);

        let lessons = module
            .get("lessons")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut lesson_bundles = Vec::with_capacity(lessons.len());
        for lesson in lessons {
            let lesson_title = lesson
                .get("lesson_title")
                .and_then(Value::as_str)
                .unwrap_or(topic);

            // The lesson title embeds the topic by prompt contract, so a
            // single search result is enough.
            let videos = video_search.search_videos(lesson_title, 1).await?;
            lesson_bundles.push(LessonVideoBundle {
                lesson_title: lesson_title.to_string(),
                videos,
            });
        }

        bundles.push(ModuleVideoBundle {
            module_title: module_title.to_string(),
            lessons: lesson_bundles,
        });
    }

    Ok(bundles)
}

/// Fallback when the outline carries no `modules` key (e.g. the embedded
/// error object): one synthetic module named after the topic.
async fn fallback_bundle(
    video_search: &dyn VideoSearch,
    topic: &str,
    max_results: u32,
) -> Result<ModuleVideoBundle> {
    debug!("Outline has no modules key, searching by topic: {}", topic);

    let videos = video_search.search_videos(topic, max_results).await?;
    Ok(ModuleVideoBundle {
        module_title: topic.to_string(),
        lessons: vec![LessonVideoBundle {
            lesson_title: topic.to_string(),
            videos,
        }],
    })
}

/// Handle reading-content requests (secondary, best-effort feature)
pub async fn fetch_reading(finder: &ReadingContentFinder, query: &str) -> ReadingResponse {
    ReadingResponse {
        items: finder.fetch_reading_content(query).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatMessage, LLMProvider, LLMResponse};
    use crate::youtube::VideoRecord;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedLLM {
        reply: String,
    }

    #[async_trait]
    impl LLM for ScriptedLLM {
        async fn chat(&self, _messages: Vec<ChatMessage>) -> Result<LLMResponse> {
            Ok(LLMResponse {
                content: self.reply.clone(),
                tokens_used: None,
            })
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn provider_type(&self) -> LLMProvider {
            LLMProvider::Gemini
        }
    }

    #[derive(Default)]
    struct RecordingSearch {
        calls: Mutex<Vec<(String, u32)>>,
    }

    impl RecordingSearch {
        fn calls(&self) -> Vec<(String, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VideoSearch for RecordingSearch {
        async fn search_videos(&self, query: &str, max_results: u32) -> Result<Vec<VideoRecord>> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), max_results));
            Ok(vec![VideoRecord {
                title: format!("Video for {}", query),
                video_id: "vid01".to_string(),
                url: "https://www.youtube.com/watch?v=vid01".to_string(),
                channel: "Channel".to_string(),
                published_at: "2024-01-01T00:00:00Z".to_string(),
            }])
        }
    }

    #[tokio::test]
    async fn test_one_search_per_lesson_in_order() {
        let llm = ScriptedLLM {
            reply: r#"{
                "course_title": "C",
                "modules": [
                    {"module_title": "M1", "lessons": [{"lesson_title": "L1"}]}
                ]
            }"#
            .to_string(),
        };
        let search = RecordingSearch::default();

        let response = generate_course(&llm, &search, "topic", 5).await.unwrap();

        assert_eq!(search.calls(), vec![("L1".to_string(), 1)]);
        assert_eq!(response.lesson_videos[0].module_title, "M1");
        assert_eq!(response.lesson_videos[0].lessons[0].lesson_title, "L1");
        assert_eq!(response.lesson_videos[0].lessons[0].videos.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_modules_falls_back_to_topic_search() {
        let llm = ScriptedLLM {
            reply: r#"{"course_title": "No modules here"}"#.to_string(),
        };
        let search = RecordingSearch::default();

        let response = generate_course(&llm, &search, "Rust basics", 5).await.unwrap();

        assert_eq!(search.calls(), vec![("Rust basics".to_string(), 5)]);
        assert_eq!(response.lesson_videos.len(), 1);
        assert_eq!(response.lesson_videos[0].module_title, "Rust basics");
        assert_eq!(
            response.lesson_videos[0].lessons[0].lesson_title,
            "Rust basics"
        );
    }

    #[tokio::test]
    async fn test_generator_error_embedded_and_fallback_used() {
        let llm = ScriptedLLM {
            reply: "certainly! here is your course".to_string(),
        };
        let search = RecordingSearch::default();

        let response = generate_course(&llm, &search, "Chess", 5).await.unwrap();

        assert_eq!(response.course_outline["error"], "Invalid JSON response");
        assert_eq!(search.calls(), vec![("Chess".to_string(), 5)]);
    }

    #[tokio::test]
    async fn test_missing_titles_default_to_topic() {
        let llm = ScriptedLLM {
            reply: r#"{"modules": [{"lessons": [{"description": "untitled"}]}]}"#.to_string(),
        };
        let search = RecordingSearch::default();

        let response = generate_course(&llm, &search, "Go", 5).await.unwrap();

        assert_eq!(search.calls(), vec![("Go".to_string(), 1)]);
        assert_eq!(response.lesson_videos[0].module_title, "Go");
        assert_eq!(response.lesson_videos[0].lessons[0].lesson_title, "Go");
    }

    #[tokio::test]
    async fn test_non_array_modules_yields_no_bundles() {
        // Presence of the key selects the module branch even when its value
        // is not iterable.
        let llm = ScriptedLLM {
            reply: r#"{"modules": "oops"}"#.to_string(),
        };
        let search = RecordingSearch::default();

        let response = generate_course(&llm, &search, "Go", 5).await.unwrap();

        assert!(search.calls().is_empty());
        assert!(response.lesson_videos.is_empty());
    }
}
