use crate::core::advisor::Advisor;
use crate::core::session::ChatSession;
use anyhow::Result;
use colored::*;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const TITLE: &str = "Chat with ZoroBot!";
pub const GREETING: &str = "Hello! I'm Zoro, your friendly career course advisor. Let's chat about your interests like 'Data Science,' 'Python,' or 'Flutter,' and I'll recommend the best courses for you!";
pub const INPUT_LABEL: &str = "Ask a question or share your interest:";
pub const SPEAKER: &str = "Zoro:";

#[derive(Debug, PartialEq)]
pub enum Input<'a> {
    Message(&'a str),
    Reset,
    Quit,
    Empty,
}

pub fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        "" => Input::Empty,
        "/reset" => Input::Reset,
        "/quit" | "/exit" => Input::Quit,
        text => Input::Message(text),
    }
}

/// Terminal chat. One turn in flight at a time; a failed turn is reported and the loop keeps going.
pub async fn chat_loop<R>(reader: R, advisor: &Advisor) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    println!("{}", TITLE.green().bold());
    println!("{}\n", GREETING);

    let mut session = ChatSession::new();
    let mut lines = reader.lines();

    loop {
        println!("{}", INPUT_LABEL.cyan());
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Reset => {
                tracing::info!(session = %session.id, turns = session.len(), "session reset");
                session = ChatSession::new();
                println!("{}", "🧹 Conversation cleared.".yellow());
            }
            Input::Message(text) => match advisor.respond(&mut session, text).await {
                Ok(reply) => println!("{} {}\n", SPEAKER.green().bold(), reply),
                Err(e) => eprintln!("{} {:#}\n", "⚠️ Turn failed:".red(), e),
            },
        }
    }

    println!("{}", "👋 Goodbye.".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cortex::ChatModel;
    use crate::core::interests::Interest;
    use crate::core::window::PromptMessage;
    use crate::memory::{CourseCatalog, CourseRecord};
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingModel(AtomicUsize);

    #[async_trait]
    impl ChatModel for CountingModel {
        async fn complete(&self, _messages: &[PromptMessage]) -> Result<String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok("ok".to_string())
        }
    }

    struct EmptyCatalog;

    #[async_trait]
    impl CourseCatalog for EmptyCatalog {
        async fn recommend(&self, _interests: &BTreeSet<Interest>) -> Result<Option<CourseRecord>> {
            Ok(None)
        }
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("   "), Input::Empty);
        assert_eq!(parse_input("/reset"), Input::Reset);
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(parse_input("  python?  "), Input::Message("python?"));
    }

    #[tokio::test]
    async fn test_loop_skips_blank_lines_and_stops_on_quit() -> Result<()> {
        let model = Arc::new(CountingModel(AtomicUsize::new(0)));
        let advisor = Advisor::new(model.clone(), Arc::new(EmptyCatalog), 5);
        let input: &[u8] = b"hello\n\n/reset\npython\n/quit\nnever sent\n";

        chat_loop(input, &advisor).await?;

        assert_eq!(model.0.load(Ordering::SeqCst), 2);
        Ok(())
    }
}
