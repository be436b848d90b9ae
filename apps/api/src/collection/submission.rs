use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separates the author label from the poem.
pub const AUTHOR_SEPARATOR: char = '：';

/// One poem as sent by the submission form.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub author: Option<String>,
    pub text: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum SubmissionError {
    #[error("poem text must not be empty")]
    EmptyPoem,
}

/// Response body for an accepted submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionAccepted {
    pub collection: String,
    pub entry: String,
}

impl Submission {
    /// Builds the entry line: `"{author}：{poem}"`, or just the poem when no
    /// author was given.
    pub fn to_entry(&self) -> Result<String, SubmissionError> {
        let poem = self.text.trim();
        if poem.is_empty() {
            return Err(SubmissionError::EmptyPoem);
        }

        let author = self.author.as_deref().map(str::trim).unwrap_or_default();
        if author.is_empty() {
            Ok(poem.to_string())
        } else {
            Ok(format!("{author}{AUTHOR_SEPARATOR}{poem}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(author: Option<&str>, text: &str) -> Submission {
        Submission {
            author: author.map(str::to_string),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_entry_with_author_label() {
        let entry = submission(Some(" 紀友則 "), " ひさかたの ").to_entry().unwrap();
        assert_eq!(entry, "紀友則：ひさかたの");
    }

    #[test]
    fn test_entry_without_author() {
        assert_eq!(submission(None, "poem").to_entry().unwrap(), "poem");
        assert_eq!(submission(Some("   "), "poem").to_entry().unwrap(), "poem");
    }

    #[test]
    fn test_blank_poem_is_rejected() {
        assert_eq!(
            submission(Some("someone"), " \n\t").to_entry(),
            Err(SubmissionError::EmptyPoem)
        );
    }

    #[test]
    fn test_author_is_optional_in_json() {
        let parsed: Submission = serde_json::from_str(r#"{"text":"poem"}"#).unwrap();
        assert!(parsed.author.is_none());
    }
}
