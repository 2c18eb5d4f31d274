//! Shared foundational types used across the dpo detailed-placement crates.
//!
//! This crate provides the common result type and the `define_id!` macro used
//! to declare the opaque arena indices of rows, regions, nodes, edges and pins.

#![warn(missing_docs)]

pub mod ids;
pub mod result;

pub use result::{DpoResult, InternalError};
