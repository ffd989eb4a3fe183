//! Checker implementations.

pub mod memory;
pub mod tcp;

pub use memory::InMemoryChecker;
pub use tcp::{TcpChecker, Upstream, parse_upstreams};
