//! Core library for bricktools
//!
//! This crate implements the **Functional Core** of the bricktools
//! application, following the Functional Core - Imperative Shell
//! architectural pattern.
//!
//! # Architecture Overview
//!
//! The bricktools project uses a two-crate architecture to enforce
//! separation of concerns:
//!
//! - **`bricktools_core`** (this crate): Pure decision and transformation
//!   functions with zero I/O
//! - **`bricktools`**: I/O operations and orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Deterministic**: Behavior is predictable and reproducible
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! The core crate is organized by domain:
//!
//! - [`partlist`]: Part-list line types and the single-item upsert decision
//! - [`movelist`]: Batch-move classification, source-drain policy, and
//!   per-item result assembly
//! - [`colors`]: Color reference data transformations
//!
//! Each module contains:
//!
//! - **Domain models**: Structured types representing API responses and outputs
//! - **Decision functions**: Pure functions the shell executes against the
//!   remote inventory
//! - **Comprehensive tests**: Unit tests using fixture data (no mocking)

pub mod colors;
pub mod movelist;
pub mod partlist;
