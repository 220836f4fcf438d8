//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the statements for a single entity.

pub mod post;
pub mod question;
pub mod session;
pub mod user;

pub use post::{PostRepository, SqlxPostRepository};
pub use question::{QuestionRepository, SqlxQuestionRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
pub use user::{SqlxUserRepository, UserRepository};
