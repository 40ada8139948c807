//! Top-level facade crate for jobtrack.
//!
//! Re-exports core types and the service library so users can depend on a single crate.

pub mod core {
    pub use jobtrack_core::*;
}

pub mod service {
    pub use jobtrack_service::*;
}
