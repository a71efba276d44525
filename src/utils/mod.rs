pub mod logger;
pub mod poll;
pub mod session_store;
