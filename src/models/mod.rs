//! Data models
//!
//! Entities stored by the board (User, Session, Question, Post) and the
//! input types accepted by the services.

mod post;
mod question;
mod session;
mod user;

pub use post::{CreatePostInput, Post};
pub use question::{Question, QuestionWithPosts};
pub use session::Session;
pub use user::User;
