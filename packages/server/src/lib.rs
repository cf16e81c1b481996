// Site Migration Pattern Miner - API Core
//
// This crate provides the backend API for mining legacy page inventories
// for recurring structural patterns. The algorithmic core lives in the
// `mining` library; this crate adds the REST surface, configuration and
// the background analysis workers.

pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;
