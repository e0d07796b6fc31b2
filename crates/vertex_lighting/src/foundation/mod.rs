//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types for world positions
//! - The 8-bit vertex colour value type
//! - Handle types for the session arenas
//! - Logging utilities

pub mod math;
pub mod color;
pub mod collections;
pub mod logging;
