pub mod automation;
pub mod caching;
pub mod finance;
pub mod server;
