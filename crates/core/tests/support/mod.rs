//! Shared test helpers for `dogcamp-core` integration tests.
//!
//! In-memory implementations of the store ports and a scripted remote
//! catalog so orchestrator tests can focus on behaviour instead of
//! boilerplate.

pub mod catalog;
pub mod repositories;
