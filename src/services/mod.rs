//! Business logic layer
//!
//! Services sit between the HTTP handlers and the repositories:
//! - `user`: signup, login and session validation
//! - `question`: questions, posts and answers
//! - `password`: Argon2id hashing

pub mod password;
pub mod question;
pub mod user;

pub use question::{QuestionService, QuestionServiceError};
pub use user::{LoginInput, SignupInput, UserService, UserServiceError};
