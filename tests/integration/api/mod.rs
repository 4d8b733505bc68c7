//! HTTP API integration tests

pub mod messaging_test;
pub mod presence_test;
pub mod school_test;
pub mod socket_test;
