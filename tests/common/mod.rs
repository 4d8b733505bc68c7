//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - An in-memory application under `axum-test`
//! - Seeding helpers for students, teachers and classrooms
//! - Authentication test helpers
//! - Custom assertion macros
//! - An optional PostgreSQL fixture

pub mod app;
pub mod assertions;
pub mod database;

pub use app::*;
pub use auth_helpers::*;
pub use database::*;
