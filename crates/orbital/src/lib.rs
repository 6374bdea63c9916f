pub mod config;
pub mod deck;
pub mod events;
pub mod gui;
pub mod macros;
pub mod summarize;
pub mod sys;
