pub mod analysis;
pub mod attributes;
pub mod coefficients;
pub mod config;
pub mod evaluation;
pub mod output;
pub mod resolver;
pub mod scenario;
pub mod server;
