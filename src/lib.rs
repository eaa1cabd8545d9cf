pub mod analytics;
pub mod config;
pub mod geometry;
pub mod pose;
pub mod protocol;
