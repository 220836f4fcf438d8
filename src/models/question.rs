//! Question model

use serde::{Deserialize, Serialize};

/// A submitted question.
///
/// `answer` stays empty until someone answers; later answers overwrite it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub content: String,
    pub answer: String,
}

impl Question {
    /// Whether an answer has been recorded
    pub fn is_answered(&self) -> bool {
        !self.answer.is_empty()
    }
}

/// A question's text together with its replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionWithPosts {
    pub content: String,
    pub posts: Vec<super::Post>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unanswered_question_serializes_empty_answer() {
        let question = Question {
            id: 3,
            content: "What is ownership?".to_string(),
            answer: String::new(),
        };

        assert!(!question.is_answered());
        assert_eq!(
            serde_json::to_value(&question).unwrap(),
            serde_json::json!({ "id": 3, "content": "What is ownership?", "answer": "" })
        );
    }

    #[test]
    fn test_empty_posts_serialize_as_array() {
        let detail = QuestionWithPosts {
            content: "q".to_string(),
            posts: Vec::new(),
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["posts"], serde_json::json!([]));
    }
}
