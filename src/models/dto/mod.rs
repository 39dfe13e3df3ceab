pub mod quiz_settings;

pub use quiz_settings::QuizSettings;
