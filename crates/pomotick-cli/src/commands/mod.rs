pub mod completions;
pub mod config;
pub mod engine;
pub mod run;
