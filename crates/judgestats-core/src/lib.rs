pub mod config;
pub mod engine;
pub mod errors;
pub mod filter;
pub mod index;
pub mod model;
pub mod report;
pub mod storage;
