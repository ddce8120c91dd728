//! Tests for the bill service

mod service_tests;
mod validation_tests;
