//! Post model

use serde::{Deserialize, Serialize};

/// A reply attached to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub content: String,
    #[serde(rename = "questionId")]
    pub question_id: i64,
}

/// Input for creating a post
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostInput {
    pub content: String,
    #[serde(rename = "questionId")]
    pub question_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_id_uses_camel_case() {
        let post = Post {
            id: 1,
            content: "reply".to_string(),
            question_id: 7,
        };

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["questionId"], 7);
        assert!(json.get("question_id").is_none());
    }
}
