pub mod config;
pub mod watermark;
