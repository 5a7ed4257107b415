pub mod api;
pub mod backtest;
pub mod benchmark;
pub mod config;
pub mod engine;
pub mod model;
pub mod staking;
pub mod venues;
