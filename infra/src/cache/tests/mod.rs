//! Tests for the cache module

mod revocation_store_tests;
