pub mod config;
pub mod decade;
pub mod fetch;
pub mod map;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod scrape;
pub mod server;
pub mod types;
