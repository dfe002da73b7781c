//! Secure memory handling for sensitive cryptographic data.

mod secure;

pub use secure::{SecureBuffer, mem_cleanse};
