use std::collections::BTreeSet;
use std::fmt;

use super::session::Turn;

/// Course topics a user can express interest in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Interest {
    Python,
    DataScience,
    Flutter,
    MernStack,
}

impl Interest {
    /// Matching order. An utterance yields only the first topic it mentions.
    pub const PRIORITY: [Interest; 4] = [
        Interest::Python,
        Interest::DataScience,
        Interest::Flutter,
        Interest::MernStack,
    ];

    /// Course node name in the graph.
    pub fn label(&self) -> &'static str {
        match self {
            Interest::Python => "Python",
            Interest::DataScience => "Data Science",
            Interest::Flutter => "Flutter",
            Interest::MernStack => "MERN Stack",
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Interest::Python => "python",
            Interest::DataScience => "data science",
            Interest::Flutter => "flutter",
            Interest::MernStack => "mern stack",
        }
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn detect(utterance: &str) -> Option<Interest> {
    let content = utterance.to_lowercase();
    Interest::PRIORITY
        .into_iter()
        .find(|interest| content.contains(interest.keyword()))
}

/// Scans every human turn of the history, not just the memory window.
pub fn extract_interests(history: &[Turn]) -> BTreeSet<Interest> {
    history.iter().filter_map(|turn| detect(&turn.human)).collect()
}

pub fn labels(interests: &BTreeSet<Interest>) -> Vec<String> {
    interests.iter().map(|i| i.label().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(humans: &[&str]) -> Vec<Turn> {
        humans.iter().map(|h| Turn::new(*h, "ok")).collect()
    }

    #[test]
    fn test_empty_history_has_no_interests() {
        assert!(extract_interests(&[]).is_empty());
    }

    #[test]
    fn test_case_insensitive_match() {
        assert_eq!(detect("I love PYTHON"), Some(Interest::Python));
        assert_eq!(detect("Tell me about Data Science"), Some(Interest::DataScience));
        assert_eq!(detect("what about MERN stack?"), Some(Interest::MernStack));
        assert_eq!(detect("hello there"), None);
    }

    #[test]
    fn test_first_match_wins_per_turn() {
        assert_eq!(
            detect("data science with python"),
            Some(Interest::Python)
        );
        assert_eq!(
            detect("flutter or mern stack"),
            Some(Interest::Flutter)
        );

        let found = extract_interests(&history(&["I'm interested in Python and also MERN Stack"]));
        assert_eq!(found, BTreeSet::from([Interest::Python]));
    }

    #[test]
    fn test_union_across_turns() {
        let h = history(&[
            "I'm interested in Python and also MERN Stack",
            "what about MERN stack?",
            "python again",
        ]);
        let found = extract_interests(&h);
        assert_eq!(found, BTreeSet::from([Interest::Python, Interest::MernStack]));
        assert_eq!(labels(&found), vec!["Python", "MERN Stack"]);
    }

    #[test]
    fn test_extraction_is_stable() {
        let h = history(&["flutter", "nothing here", "Data Science"]);
        assert_eq!(extract_interests(&h), extract_interests(&h));
    }

    #[test]
    fn test_only_human_text_is_scanned() {
        let h = vec![Turn::new("hi", "Python is a great language")];
        assert!(extract_interests(&h).is_empty());
    }
}
