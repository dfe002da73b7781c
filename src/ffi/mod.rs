/*!
Raw FFI boundary to the native liboqs engine.

Everything in this module is a direct declaration of the engine's C
surface: catalog queries, algorithm descriptors, the key-encapsulation
and signature entry points, the secure-wipe primitive, and the entropy
hooks. The engine performs no validation of its own, so every pointer
and length passed through here must already have been checked by the
safe layers above.

The descriptor structs are declared as *prefixes* of the engine's real
structs: only the metadata fields read by this crate appear, and the
structs are never sized, moved, or constructed on this side. Trailing
fields added by newer engine versions therefore cannot cause layout
drift.
*/

#![allow(non_camel_case_types)]

use libc::{c_char, c_int, c_void};

/// Status code returned by fallible engine calls.
pub type OQS_STATUS = c_int;

/// The engine reports success as zero.
pub const OQS_SUCCESS: OQS_STATUS = 0;

/// Entry point the engine invokes whenever it needs entropy after a
/// custom generator has been installed. The callee must fill exactly
/// `bytes_to_read` bytes of `random_array` before returning.
pub type rand_algorithm_ptr = unsafe extern "C" fn(random_array: *mut u8, bytes_to_read: usize);

/// Prefix view of the engine's KEM descriptor.
///
/// Field order and types mirror the engine header. Accessed only through
/// the pointer returned by [`OQS_KEM_new`].
#[repr(C)]
pub struct OQS_KEM {
    pub method_name: *const c_char,
    pub alg_version: *const c_char,
    pub claimed_nist_level: u8,
    pub ind_cca: bool,
    pub length_public_key: usize,
    pub length_secret_key: usize,
    pub length_ciphertext: usize,
    pub length_shared_secret: usize,
}

/// Prefix view of the engine's signature descriptor.
#[repr(C)]
pub struct OQS_SIG {
    pub method_name: *const c_char,
    pub alg_version: *const c_char,
    pub claimed_nist_level: u8,
    pub euf_cma: bool,
    pub sig_with_ctx_support: bool,
    pub length_public_key: usize,
    pub length_secret_key: usize,
    pub length_signature: usize,
}

unsafe extern "C" {
    // Process lifecycle and memory hygiene.
    pub fn OQS_init();
    pub fn OQS_MEM_cleanse(ptr: *mut c_void, len: usize);

    // KEM catalog.
    pub fn OQS_KEM_alg_count() -> c_int;
    pub fn OQS_KEM_alg_identifier(i: usize) -> *const c_char;
    pub fn OQS_KEM_alg_is_enabled(method_name: *const c_char) -> c_int;

    // KEM instances. `OQS_KEM_new` returns null when the algorithm is not
    // usable in this build; `OQS_KEM_free` accepts null.
    pub fn OQS_KEM_new(method_name: *const c_char) -> *mut OQS_KEM;
    pub fn OQS_KEM_free(kem: *mut OQS_KEM);
    pub fn OQS_KEM_keypair(
        kem: *const OQS_KEM,
        public_key: *mut u8,
        secret_key: *mut u8,
    ) -> OQS_STATUS;
    pub fn OQS_KEM_encaps(
        kem: *const OQS_KEM,
        ciphertext: *mut u8,
        shared_secret: *mut u8,
        public_key: *const u8,
    ) -> OQS_STATUS;
    pub fn OQS_KEM_decaps(
        kem: *const OQS_KEM,
        shared_secret: *mut u8,
        ciphertext: *const u8,
        secret_key: *const u8,
    ) -> OQS_STATUS;

    // Signature catalog.
    pub fn OQS_SIG_alg_count() -> c_int;
    pub fn OQS_SIG_alg_identifier(i: usize) -> *const c_char;
    pub fn OQS_SIG_alg_is_enabled(method_name: *const c_char) -> c_int;

    // Signature instances.
    pub fn OQS_SIG_new(method_name: *const c_char) -> *mut OQS_SIG;
    pub fn OQS_SIG_free(sig: *mut OQS_SIG);
    pub fn OQS_SIG_keypair(
        sig: *const OQS_SIG,
        public_key: *mut u8,
        secret_key: *mut u8,
    ) -> OQS_STATUS;
    pub fn OQS_SIG_sign(
        sig: *const OQS_SIG,
        signature: *mut u8,
        signature_len: *mut usize,
        message: *const u8,
        message_len: usize,
        secret_key: *const u8,
    ) -> OQS_STATUS;
    pub fn OQS_SIG_sign_with_ctx_str(
        sig: *const OQS_SIG,
        signature: *mut u8,
        signature_len: *mut usize,
        message: *const u8,
        message_len: usize,
        ctx_str: *const u8,
        ctx_str_len: usize,
        secret_key: *const u8,
    ) -> OQS_STATUS;
    pub fn OQS_SIG_verify(
        sig: *const OQS_SIG,
        message: *const u8,
        message_len: usize,
        signature: *const u8,
        signature_len: usize,
        public_key: *const u8,
    ) -> OQS_STATUS;
    pub fn OQS_SIG_verify_with_ctx_str(
        sig: *const OQS_SIG,
        message: *const u8,
        message_len: usize,
        signature: *const u8,
        signature_len: usize,
        ctx_str: *const u8,
        ctx_str_len: usize,
        public_key: *const u8,
    ) -> OQS_STATUS;

    // Entropy hooks. `OQS_randombytes` draws from whichever generator is
    // currently active process-wide.
    pub fn OQS_randombytes(random_array: *mut u8, bytes_to_read: usize);
    pub fn OQS_randombytes_switch_algorithm(algorithm: *const c_char) -> OQS_STATUS;
    pub fn OQS_randombytes_custom_algorithm(algorithm_ptr: rand_algorithm_ptr);
}
