pub mod compose;
pub mod config;
pub mod scroll;
pub mod session;
