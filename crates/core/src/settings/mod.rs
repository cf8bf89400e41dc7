//! Integration settings: credential lifecycle

pub mod key_rotation;
pub mod ports;

pub use key_rotation::{mask_key, KeyRotationService};
