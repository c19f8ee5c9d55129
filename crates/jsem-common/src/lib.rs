//! Common types and utilities for the jsem JavaScript analyzer.
//!
//! This crate provides foundational types used across all jsem crates:
//! - Line/column positions and the byte-offset `LineMap`
//! - Centralized limits for tree walks

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position, TokenLocation};

// Centralized limits and thresholds
pub mod limits;
