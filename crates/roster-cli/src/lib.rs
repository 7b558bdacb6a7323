pub mod cli;
pub mod commands;
pub mod exercise;
pub mod formatting;
