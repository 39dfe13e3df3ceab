pub mod clock;
pub mod grading_service;
pub mod question_service;
pub mod quiz_session_service;
pub mod scoring_service;
pub mod timer_driver;
