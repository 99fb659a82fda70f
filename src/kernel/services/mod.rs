//! Services layer (ports + adapters).
//!
//! - `ports`: pure contracts/types used across the crate (kernel-facing).
//! - `adapters`: storage and filesystem implementations (IO/async).

pub mod adapters;
pub mod ports;
