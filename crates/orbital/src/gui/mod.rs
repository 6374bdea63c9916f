pub mod app;
pub mod input;
pub mod ring;
pub mod theme;
