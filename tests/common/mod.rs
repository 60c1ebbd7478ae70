#![allow(dead_code)]

pub use flowdag_test_utils::init_tracing;
