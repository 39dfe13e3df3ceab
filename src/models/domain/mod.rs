pub mod exam_mode;
pub mod question;
pub mod quiz_session;
pub mod user_answer;
pub use exam_mode::ExamMode;
pub use question::{ExamDomain, Question, QuestionType};
pub use quiz_session::{DomainResult, QuizScreen, QuizSession};
pub use user_answer::UserAnswer;
