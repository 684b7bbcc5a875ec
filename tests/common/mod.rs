//! Common test utilities and helpers
//!
//! This module provides shared utilities for the integration tests:
//! - An in-process application backed by the in-memory store
//! - Multipart body and cookie helpers
//! - Custom assertion macros
//! - PostgreSQL fixtures for the database-backed store

#![allow(dead_code)]

pub mod assertions;
pub mod auth_helpers;
pub mod database;

pub use auth_helpers::*;
