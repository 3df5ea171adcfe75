//! Integration test crate for the Veris oracle.
//!
//! This crate has no library code — it only contains integration tests
//! that exercise end-to-end consensus flows across multiple workspace
//! crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p veris-integration-tests
//! ```
