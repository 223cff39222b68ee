// Application wiring: long-lived resources and the HTTP server.

pub mod app;
pub mod server;

pub use app::App;
