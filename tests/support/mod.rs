//! Shared helpers for integration tests.

pub mod fakes;
pub mod pages;
pub mod socket_guard;
