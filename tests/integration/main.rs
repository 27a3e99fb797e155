//! Integration tests

mod postgres_tests;
mod support;
