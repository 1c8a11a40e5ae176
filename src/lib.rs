pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod global;
pub mod normalizer;
pub mod pipeline;
pub mod retrieval;
pub mod workflow;
