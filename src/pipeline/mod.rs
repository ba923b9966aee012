pub mod intent;
pub mod form;
pub mod prediction;
pub mod conversation;
pub mod dispatch; // Routes messages and questionnaire submissions
