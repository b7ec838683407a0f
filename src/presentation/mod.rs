pub mod app_state;
pub mod charts;
pub mod error;
pub mod handlers;
pub mod page;
