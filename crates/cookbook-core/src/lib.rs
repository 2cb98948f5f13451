//! Core types and trait definitions for the Cookbook recipe catalog.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod domain;
pub mod recipe;
pub mod seed;
pub mod store;
