pub mod config;
pub mod fetch;
pub mod http;
pub mod ical;
pub mod middleware;
