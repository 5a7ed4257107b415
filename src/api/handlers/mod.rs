pub mod apy;
pub mod backtest;
