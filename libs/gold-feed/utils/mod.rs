//! Shared utilities

pub mod market_hours;
pub mod shutdown;

pub use market_hours::is_market_open;
pub use shutdown::Shutdown;
