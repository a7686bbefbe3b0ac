//! Shared helpers for the integration tests.

#![allow(dead_code)]

use quill_ir::test_harness::Field;
use quill_ir::{DataType, Node};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Scalar int64 value `x`.
pub fn x() -> Node {
    Field::scalar("x", DataType::Int64)
}

/// Columnar int64 value `y`.
pub fn y() -> Node {
    Field::column("y", DataType::Int64)
}
