// HTTP module: server and the cluster API client.

pub mod client;
pub mod server;

// Re-export middleware interfaces from the dedicated middleware module
pub use crate::middleware::middleware::Middleware;
pub use crate::middleware::recover_middleware::panics_counter;

// Re-export server types
pub use server::{HttpServer, Server};

// Common controller interface
pub use crate::controller::controller::Controller;
