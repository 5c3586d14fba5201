pub mod commands;
pub mod controller;
pub mod route;

pub use controller::{RegistrationForm, SessionController, SessionState};
pub use route::Route;
