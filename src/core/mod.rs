pub mod attendance;
pub mod calculator;
pub mod config;
pub mod export;
pub mod list;
pub mod location;
pub mod log;
pub mod offices;
pub mod store;
pub mod summary;
pub mod ticker;
pub mod view_model;
