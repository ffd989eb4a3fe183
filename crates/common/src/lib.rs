//! Value types shared by the health core and the gateway server.

pub mod types;

pub use types::{RequestId, ServiceName};
