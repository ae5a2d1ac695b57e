//! Integration tests for Site-Sweep

mod crawl_tests;
mod support;
