pub mod config;
pub mod prompt;
pub mod submit;
