use anyhow::Result;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::cortex::{ChatModel, SYSTEM_PROMPT};
use super::interests::{extract_interests, Interest};
use super::session::{ChatSession, Turn};
use super::window::{assemble, ConversationWindow};
use crate::memory::{CourseCatalog, CourseRecord};

pub const NO_MATCH_APOLOGY: &str =
    "\n\nSorry, I couldn't find an exact match. Could you share more details or specify other interests?";

/// Model reply with the recommendation merge applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub interests: BTreeSet<Interest>,
    pub course: Option<CourseRecord>,
}

/// Turns a user message into a reply: model call, history update, then course lookup.
pub struct Advisor {
    model: Arc<dyn ChatModel>,
    catalog: Arc<dyn CourseCatalog>,
    memory_window: usize,
}

impl Advisor {
    pub fn new(model: Arc<dyn ChatModel>, catalog: Arc<dyn CourseCatalog>, memory_window: usize) -> Self {
        Self {
            model,
            catalog,
            memory_window,
        }
    }

    pub async fn respond(&self, session: &mut ChatSession, user_text: &str) -> Result<String> {
        Ok(self.respond_detailed(session, user_text).await?.text)
    }

    pub async fn respond_detailed(&self, session: &mut ChatSession, user_text: &str) -> Result<Reply> {
        let window = ConversationWindow::replay(session.turns(), self.memory_window);
        let prompt = assemble(SYSTEM_PROMPT, &window, user_text);

        let response = self.model.complete(&prompt).await?;
        session.record(Turn::new(user_text, response.clone()));

        let interests = extract_interests(session.turns());
        tracing::debug!(session = %session.id, turns = session.len(), ?interests, "turn recorded");

        if interests.is_empty() {
            return Ok(Reply {
                text: response,
                interests,
                course: None,
            });
        }

        let course = self.catalog.recommend(&interests).await?;
        let text = match &course {
            Some(record) => format!("{}{}", response, render_recommendation(record)),
            None => format!("{}{}", response, NO_MATCH_APOLOGY),
        };
        tracing::info!(course = ?course.as_ref().map(|c| &c.course_name), "recommendation merged");

        Ok(Reply {
            text,
            interests,
            course,
        })
    }
}

pub fn render_recommendation(course: &CourseRecord) -> String {
    format!(
        "\n\nBased on your interests, I recommend the **{}** course:\n\
         - **Duration**: {}\n\
         - **Time Commitment**: {} daily\n\
         - **Fees**: {}\n\
         If this aligns with your goals, I can share further details or suggest alternatives.",
        course.course_name, course.duration, course.time, course.fees
    )
}
