//! Course outline generation via the configured LLM provider.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::llm::{ChatMessage, LLM};

/// Course outline as requested from the generator. The prompt instructs the
/// model to emit JSON in exactly this shape; the orchestrator nevertheless
/// passes the parsed value through unvalidated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseOutline {
    pub course_title: String,
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Module {
    pub module_title: String,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lesson {
    pub lesson_title: String,
    pub description: String,
}

/// Generate a structured course outline for the given topic.
///
/// Returns the parsed outline as a JSON value. When the generator's reply is
/// not parseable JSON the error is embedded as
/// `{"error": "Invalid JSON response", "raw_response": <text>}` and the call
/// still succeeds; only transport-level failures propagate as `Err`.
pub async fn generate_course_outline(llm: &dyn LLM, topic: &str) -> Result<Value> {
    let messages = vec![ChatMessage {
        role: "user".to_string(),
        content: build_outline_prompt(topic),
    }];

    let response = llm.chat(messages).await?;
    let cleaned = strip_code_fence(&response.content);
    debug!("Generator returned {} chars for topic {}", cleaned.len(), topic);

    match serde_json::from_str::<Value>(cleaned) {
        Ok(outline) => Ok(outline),
        Err(e) => {
            warn!("Failed to parse outline JSON from generator: {}", e);
            Ok(json!({
                "error": "Invalid JSON response",
                "raw_response": cleaned,
            }))
        }
    }
}

/// Prompt contract: every lesson title embeds the topic keyword so a relevant
/// video can be searched per lesson afterwards.
fn build_outline_prompt(topic: &str) -> String {
    format!(
        r#"You are an AI that creates structured learning courses.
Given the topic "{topic}", create a well-structured course outline with modules and lessons.
Each lesson title must include the topic "{topic}" to ensure video relevance when searching later.

The response must be in valid JSON format without any extra text.
Use the following JSON schema:

{{
  "course_title": "string",
  "modules": [
    {{
      "module_title": "string",
      "lessons": [
        {{
          "lesson_title": "string",
          "description": "string"
        }}
      ]
    }}
  ]
}}

Ensure that:
- The course title is descriptive.
- There are multiple modules (e.g., Module 1, Module 2, ...).
- Each module contains 3-5 lessons.
- Each lesson title includes the keyword "{topic}".
- Each lesson has a short description."#
    )
}

/// Strip a surrounding markdown code fence (```json ... ``` or ``` ... ```).
///
/// Known edge case: a reply whose JSON legitimately ends in a literal "```"
/// inside a string value would be corrupted by the suffix strip. Left as-is.
fn strip_code_fence(content: &str) -> &str {
    let content = content.trim();

    let inner = content
        .strip_prefix("```json")
        .or_else(|| content.strip_prefix("```"));

    if let Some(inner) = inner {
        if let Some(inner) = inner.strip_suffix("```") {
            return inner.trim();
        }
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LLMProvider, LLMResponse};
    use async_trait::async_trait;

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

    struct UnreachableLLM;

    #[async_trait]
    impl LLM for UnreachableLLM {
        async fn chat(&self, _messages: Vec<ChatMessage>) -> Result<LLMResponse> {
            Err(anyhow::anyhow!("connection refused"))
        }

        async fn is_available(&self) -> bool {
            false
        }

        fn provider_type(&self) -> LLMProvider {
            LLMProvider::Gemini
        }
    }

    const OUTLINE_JSON: &str = r#"{
  "course_title": "Rust from Scratch",
  "modules": [
    {
      "module_title": "Module 1",
      "lessons": [
        {"lesson_title": "Rust basics", "description": "Getting started"}
      ]
    }
  ]
}"#;

    #[test]
    fn test_strip_code_fence_with_json_marker() {
        let fenced = format!("```json\n{}\n```", OUTLINE_JSON);
        assert_eq!(strip_code_fence(&fenced), OUTLINE_JSON);
    }

    #[test]
    fn test_strip_code_fence_bare_fence() {
        let fenced = format!("```\n{}\n```", OUTLINE_JSON);
        assert_eq!(strip_code_fence(&fenced), OUTLINE_JSON);
    }

    #[test]
    fn test_strip_code_fence_unfenced_passthrough() {
        assert_eq!(strip_code_fence(OUTLINE_JSON), OUTLINE_JSON);
        assert_eq!(strip_code_fence("  not json  "), "not json");
    }

    #[test]
    fn test_fenced_and_unfenced_parse_identically() {
        let fenced = format!("```json\n{}\n```", OUTLINE_JSON);
        let from_fenced: Value = serde_json::from_str(strip_code_fence(&fenced)).unwrap();
        let from_plain: Value = serde_json::from_str(OUTLINE_JSON).unwrap();
        assert_eq!(from_fenced, from_plain);
    }

    #[tokio::test]
    async fn test_malformed_reply_embeds_error_object() {
        let llm = ScriptedLLM {
            reply: "not json".to_string(),
        };
        let outline = generate_course_outline(&llm, "Rust").await.unwrap();
        assert_eq!(outline["error"], "Invalid JSON response");
        assert_eq!(outline["raw_response"], "not json");
    }

    #[tokio::test]
    async fn test_valid_reply_passes_through_unvalidated() {
        // Valid JSON without a modules key is returned uncorrected.
        let llm = ScriptedLLM {
            reply: r#"{"course_title": "Orphan"}"#.to_string(),
        };
        let outline = generate_course_outline(&llm, "Rust").await.unwrap();
        assert_eq!(outline["course_title"], "Orphan");
        assert!(outline.get("modules").is_none());
    }

    #[tokio::test]
    async fn test_fenced_reply_parses_to_outline() {
        let llm = ScriptedLLM {
            reply: format!("```json\n{}\n```", OUTLINE_JSON),
        };
        let outline = generate_course_outline(&llm, "Rust basics").await.unwrap();
        assert_eq!(outline["course_title"], "Rust from Scratch");
        let typed: CourseOutline = serde_json::from_value(outline).unwrap();
        assert_eq!(typed.modules.len(), 1);
        assert!(typed.modules[0].lessons[0].lesson_title.contains("Rust basics"));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let result = generate_course_outline(&UnreachableLLM, "Rust").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_prompt_embeds_topic() {
        let prompt = build_outline_prompt("Linear algebra");
        assert!(prompt.contains("\"Linear algebra\""));
        assert!(prompt.contains("course_title"));
    }
}
