/*!
Secure buffer custody for secret key material.

All secret bytes held by this crate live in a [`SecureBuffer`]. The wipe
itself is delegated to the engine's cleanse primitive, which guarantees
the writes are not elided, and runs again on drop so no exit path leaves
key material hot.
*/

use libc::c_void;

use crate::ffi;

/// Sets a buffer's bytes to zero through the engine's cleanse primitive.
/// Use it to wipe "hot" memory areas such as exported secret keys.
/// No-op on an empty slice.
pub fn mem_cleanse(buf: &mut [u8]) {
    if buf.is_empty() {
        return;
    }
    unsafe {
        ffi::OQS_MEM_cleanse(buf.as_mut_ptr() as *mut c_void, buf.len());
    }
}

/// Owned byte buffer with an explicit, idempotent wipe.
///
/// The unit of custody for every secret this crate holds. Once
/// [`zeroize`](SecureBuffer::zeroize) has run, reading the buffer yields
/// only zero bytes; the buffer is wiped again when dropped.
#[derive(Default)]
pub struct SecureBuffer {
    bytes: Vec<u8>,
}

impl SecureBuffer {
    /// Create an empty buffer. Holds no allocation until bytes arrive.
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Create a buffer of `len` zero bytes, ready to be filled by a
    /// native call.
    pub fn zeroed(len: usize) -> Self {
        Self { bytes: vec![0u8; len] }
    }

    /// Copy `bytes` into a new buffer.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self { bytes: bytes.to_vec() }
    }

    /// Number of bytes held.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Immutable view of the held bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable pointer for native fills. The caller must not write past
    /// `len()`.
    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr()
    }

    /// Overwrite every held byte with zero. Idempotent; no-op when empty.
    /// The length is preserved.
    pub fn zeroize(&mut self) {
        mem_cleanse(&mut self.bytes);
    }

    /// Wipe the held bytes and empty the buffer.
    pub fn clear(&mut self) {
        self.zeroize();
        self.bytes.clear();
    }
}

impl Drop for SecureBuffer {
    fn drop(&mut self) {
        self.zeroize();
    }
}
