//! HTML page handlers.

pub mod home;

pub use home::home_handler;
