pub mod config;
pub mod error;
pub mod event;
pub mod health;
pub mod http;
pub mod model;
pub mod store;
pub mod util;
