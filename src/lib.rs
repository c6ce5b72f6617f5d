// Library exports for scgsearch
pub mod annotate;
pub mod candidates;
pub mod config;
pub mod coverage;
pub mod error;
pub mod gateway;
pub mod lookup;
pub mod pipeline;
pub mod record;
pub mod runner;
pub mod scratch;
