pub mod config;
pub mod error;
pub mod filters;
pub mod logging;
pub mod output;
pub mod pager;
pub mod session;
pub mod stats;
pub mod table;
