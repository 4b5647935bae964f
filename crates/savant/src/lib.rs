//! Top-level facade crate for Savant.
//!
//! Re-exports core wire types and the hub library so users can depend on a single crate.

pub mod core {
    pub use savant_core::*;
}

pub mod hub {
    pub use savant_hub::*;
}
