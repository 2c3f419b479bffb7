pub mod analytics;
pub mod app;
pub mod attribution;
pub mod classify;
pub mod index;
