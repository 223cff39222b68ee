//! Integration tests for noderank.
//!
//! End-to-end scenarios run the full HTTP stack against a fake cluster API
//! server bound to an ephemeral port.

mod cases_probe_test;

pub mod support;
