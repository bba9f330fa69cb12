pub mod answer;
pub mod candidate;
pub mod criterion;
pub mod evaluation;
pub mod job;
pub mod question;
pub mod template;
