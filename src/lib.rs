pub mod auth;
pub mod cli;
pub mod config;
pub mod context;
pub mod ledger;
pub mod logging;
pub mod relay;
pub mod storage;

pub use context::AppContext;
