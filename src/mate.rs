//! Climate Mate: advice, article summaries, quizzes and chat on top of a text generator.
//!
//! Every operation here returns usable content even when the generator fails.

use std::sync::Arc;

use tracing::warn;

use crate::advice::{GoalStatus, compose_advice_prompt, fallback_advice};
use crate::clients::{ChatTurn, TextGenerator};
use crate::news::Article;
use crate::quiz::{QUIZ_PROMPT, QuizQuestion, parse_quiz};

pub const CHAT_FAILURE_REPLY: &str = "Something went wrong in the conversation.";

#[derive(Clone)]
pub struct ClimateMate {
    generator: Arc<dyn TextGenerator>,
}

impl ClimateMate {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// A new weekly goal and a motivational message.
    pub async fn advise(&self, footprint: f64, previous_goal: &str, goal_status: &GoalStatus) -> String {
        let prompt = compose_advice_prompt(footprint, previous_goal, goal_status);
        match self.generator.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("Generator returned blank advice, using fallback logic");
                fallback_advice(footprint, goal_status)
            }
            Err(e) => {
                warn!("Generator failed, using fallback logic: {}", e);
                fallback_advice(footprint, goal_status)
            }
        }
    }

    /// Two or three bullet points about an article, or an error line to show in its place.
    pub async fn summarize(&self, article: &Article) -> String {
        let prompt = format!(
            "Summarize the following climate news article in 2-3 bullet points:\n\n\
             Title: {}\n\n\
             Description: {}",
            article.title_or_default(),
            article.description_or_default()
        );
        match self.generator.generate(&prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("Summary generation failed: {}", e);
                format!("Error generating summary: {}", e)
            }
        }
    }

    /// Five climate questions, or none when the generator is unavailable.
    pub async fn generate_quiz(&self) -> Vec<QuizQuestion> {
        match self.generator.generate(QUIZ_PROMPT).await {
            Ok(raw) => parse_quiz(raw.trim()),
            Err(e) => {
                warn!("Failed to generate quiz: {}", e);
                Vec::new()
            }
        }
    }

    /// Send one chat message against `history`. The new user and model turns
    /// are returned for the caller to append; a failed turn returns none.
    pub async fn chat(&self, history: &[ChatTurn], message: &str) -> ChatReply {
        match self.generator.chat(history, message).await {
            Ok(reply) => {
                let reply = reply.trim().to_string();
                ChatReply {
                    turns: vec![ChatTurn::user(message), ChatTurn::model(reply.clone())],
                    reply,
                }
            }
            Err(e) => {
                warn!("Chat turn failed: {}", e);
                ChatReply {
                    reply: CHAT_FAILURE_REPLY.to_string(),
                    turns: Vec::new(),
                }
            }
        }
    }
}

/// Outcome of one chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub reply: String,
    pub turns: Vec<ChatTurn>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::GenerationError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a fixed text, or fails, and records the prompts it saw.
    struct Scripted {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn respond(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .ok_or_else(|| GenerationError::Http("connection refused".into()))
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.respond(prompt)
        }

        async fn chat(&self, _history: &[ChatTurn], message: &str) -> Result<String, GenerationError> {
            self.respond(message)
        }
    }

    #[tokio::test]
    async fn test_advice_uses_generator_text() {
        let mate = ClimateMate::new(Scripted::ok("  Goal: Walk\nAdvice: Go!  \n"));
        let text = mate.advise(300.0, "", &GoalStatus::Yes).await;
        assert_eq!(text, "Goal: Walk\nAdvice: Go!");
    }

    #[tokio::test]
    async fn test_advice_falls_back_on_failure() {
        let mate = ClimateMate::new(Scripted::failing());
        let text = mate.advise(1200.0, "Eat less meat", &GoalStatus::Partially).await;
        assert_eq!(
            text,
            fallback_advice(1200.0, &GoalStatus::Partially)
        );
    }

    #[tokio::test]
    async fn test_advice_falls_back_on_blank_reply() {
        let mate = ClimateMate::new(Scripted::ok("   "));
        let text = mate.advise(10.0, "", &GoalStatus::No).await;
        assert!(text.starts_with("Goal: You're doing great"));
    }

    #[tokio::test]
    async fn test_summary_prompt_and_failure_text() {
        let generator = Scripted::ok("- point one");
        let mate = ClimateMate::new(generator.clone());
        let article = Article::fetch_failed("boom");
        assert_eq!(mate.summarize(&article).await, "- point one");
        let prompt = generator.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("Title: News fetch failed"));
        assert!(prompt.contains("Description: boom"));

        let mate = ClimateMate::new(Scripted::failing());
        let text = mate.summarize(&article).await;
        assert!(text.starts_with("Error generating summary:"));
        assert!(text.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_quiz_empty_on_failure() {
        let mate = ClimateMate::new(Scripted::failing());
        assert!(mate.generate_quiz().await.is_empty());

        let mate = ClimateMate::new(Scripted::ok(
            "Q: Q1?\na) A\nb) B\nc) C\nd) D\nAnswer: b",
        ));
        let quiz = mate.generate_quiz().await;
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz[0].answer, "b");
    }

    #[tokio::test]
    async fn test_chat_turns_only_on_success() {
        let mate = ClimateMate::new(Scripted::failing());
        let failed = mate.chat(&[], "hi").await;
        assert_eq!(failed.reply, CHAT_FAILURE_REPLY);
        assert!(failed.turns.is_empty());

        let mate = ClimateMate::new(Scripted::ok("Hello! "));
        let ok = mate.chat(&[], "hi").await;
        assert_eq!(ok.reply, "Hello!");
        assert_eq!(ok.turns, vec![ChatTurn::user("hi"), ChatTurn::model("Hello!")]);
    }
}
