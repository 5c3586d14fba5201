pub mod commands;
pub mod controller;
pub mod matcher;

pub use controller::SearchController;
