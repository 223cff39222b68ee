// Shared test support code for unit and integration tests.

pub mod cluster;
pub mod common;
pub mod harness;
pub mod source;

pub use cluster::FakeApiServer;
pub use common::*;
pub use harness::TestService;
pub use source::{FailingSource, StaticSource};
