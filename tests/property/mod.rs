//! Property-based tests

pub mod conversation_proptest;
pub mod thread_id_proptest;
