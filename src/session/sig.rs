/*!
Signature session.

Mirrors the key-encapsulation session for the signature family, with
signing in place of encapsulation: context-string-qualified sign and
verify variants plus a secret-key import path for key material that
originates outside [`Signature::generate_keypair`].

Verification returns a boolean verdict: an engine rejection means "the
signature is wrong", which is an expected outcome, not an operational
error.
*/

use std::ffi::{CStr, CString};
use std::ptr::NonNull;

use tracing::trace;

use crate::error::{Error, Result};
use crate::ffi;
use crate::memory::SecureBuffer;
use crate::registry;

/// Signature algorithm details, snapshotted from the engine at init.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct SigDetails {
    /// Human-readable algorithm name
    pub name: String,
    /// Algorithm implementation version
    pub version: String,
    /// Vendor-claimed NIST security level
    pub claimed_nist_level: u8,
    /// Whether the algorithm claims existential unforgeability
    pub euf_cma: bool,
    /// Whether the algorithm accepts a context string
    pub sig_with_ctx_support: bool,
    /// Public key length in bytes
    pub length_public_key: usize,
    /// Secret key length in bytes
    pub length_secret_key: usize,
    /// Maximum signature length in bytes; actual signatures may be shorter
    pub max_length_signature: usize,
}

/// Exclusively owned native signature instance, released exactly once.
struct SigHandle(NonNull<ffi::OQS_SIG>);

impl SigHandle {
    fn acquire(name: &CStr) -> Option<Self> {
        NonNull::new(unsafe { ffi::OQS_SIG_new(name.as_ptr()) }).map(Self)
    }

    fn as_ptr(&self) -> *const ffi::OQS_SIG {
        self.0.as_ptr()
    }
}

impl Drop for SigHandle {
    fn drop(&mut self) {
        unsafe { ffi::OQS_SIG_free(self.0.as_ptr()) }
    }
}

// The handle is plain engine heap state with no thread affinity.
unsafe impl Send for SigHandle {}

/// Stateful signature session: one algorithm instance plus the secret
/// key custodied for it.
///
/// Lifecycle matches [`KeyEncapsulation`](crate::KeyEncapsulation), with
/// [`import_secret_key`](Self::import_secret_key) as an additional way
/// into the key-bearing state.
///
/// # Example
///
/// ```no_run
/// use pqc_engine::Signature;
///
/// let mut signer = Signature::new();
/// signer.init("ML-DSA-65", None)?;
/// let public_key = signer.generate_keypair()?;
///
/// let message = b"attack at dawn";
/// let signature = signer.sign(message)?;
/// assert!(signer.verify(message, &signature, &public_key)?);
/// # Ok::<(), pqc_engine::Error>(())
/// ```
#[derive(Default)]
pub struct Signature {
    handle: Option<SigHandle>,
    secret_key: SecureBuffer,
    details: Option<SigDetails>,
}

impl Signature {
    /// Create an uninitialized session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the session to a signature algorithm, optionally supplying
    /// an existing secret key.
    ///
    /// The supplied key is stored as-is; a mis-sized key is rejected at
    /// the first operation that consumes it. Any previous state of the
    /// session is cleaned first.
    pub fn init(&mut self, alg_name: &str, secret_key: Option<&[u8]>) -> Result<()> {
        if !registry::is_sig_enabled(alg_name) {
            // perhaps it's supported
            if registry::is_sig_supported(alg_name) {
                return Err(Error::AlgorithmNotEnabled(alg_name.to_string()));
            }
            return Err(Error::AlgorithmNotSupported(alg_name.to_string()));
        }

        self.clean();

        let c_name = CString::new(alg_name)
            .map_err(|_| Error::AlgorithmNotSupported(alg_name.to_string()))?;
        let handle = SigHandle::acquire(&c_name)
            .ok_or_else(|| Error::AlgorithmNotEnabled(alg_name.to_string()))?;

        self.details = Some(unsafe { snapshot_details(handle.as_ptr()) });
        self.handle = Some(handle);
        if let Some(key) = secret_key {
            self.secret_key = SecureBuffer::from_slice(key);
        }

        trace!(algorithm = alg_name, "signature session initialized");
        Ok(())
    }

    /// Details of the bound algorithm.
    pub fn details(&self) -> Result<&SigDetails> {
        self.details.as_ref().ok_or(Error::Uninitialized)
    }

    /// Generate a key pair and return the public key. The secret key is
    /// custodied by the session; read it with
    /// [`export_secret_key`](Self::export_secret_key).
    pub fn generate_keypair(&mut self) -> Result<Vec<u8>> {
        let handle = self.handle.as_ref().ok_or(Error::Uninitialized)?;
        let details = self.details.as_ref().ok_or(Error::Uninitialized)?;

        let mut public_key = vec![0u8; details.length_public_key];
        let mut secret_key = SecureBuffer::zeroed(details.length_secret_key);

        let rv = unsafe {
            ffi::OQS_SIG_keypair(
                handle.as_ptr(),
                public_key.as_mut_ptr(),
                secret_key.as_mut_ptr(),
            )
        };
        if rv != ffi::OQS_SUCCESS {
            // Partial buffers are dropped (and wiped), never exposed.
            return Err(Error::KeyPairGenerationFailed);
        }

        self.secret_key = secret_key;
        Ok(public_key)
    }

    /// Copy an existing secret key into the session, replacing and
    /// wiping any prior key. This is the import path for key material
    /// that did not come from [`generate_keypair`](Self::generate_keypair).
    pub fn import_secret_key(&mut self, secret_key: &[u8]) -> Result<()> {
        let details = self.details.as_ref().ok_or(Error::Uninitialized)?;

        if secret_key.len() != details.length_secret_key {
            return Err(Error::InvalidSecretKeyLength {
                expected: details.length_secret_key,
                actual: secret_key.len(),
            });
        }

        self.secret_key = SecureBuffer::from_slice(secret_key);
        Ok(())
    }

    /// Immutable view of the custodied secret key; empty when absent.
    pub fn export_secret_key(&self) -> &[u8] {
        self.secret_key.as_slice()
    }

    /// Sign a message with the custodied secret key.
    ///
    /// The returned signature carries the engine-reported length, which
    /// is frequently shorter than the algorithm's declared maximum.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let handle = self.handle.as_ref().ok_or(Error::Uninitialized)?;
        let details = self.details.as_ref().ok_or(Error::Uninitialized)?;

        if self.secret_key.len() != details.length_secret_key {
            return Err(Error::MissingOrInvalidSecretKey);
        }

        let mut signature = vec![0u8; details.max_length_signature];
        let mut signature_len: usize = 0;

        let rv = unsafe {
            ffi::OQS_SIG_sign(
                handle.as_ptr(),
                signature.as_mut_ptr(),
                &mut signature_len,
                message.as_ptr(),
                message.len(),
                self.secret_key.as_slice().as_ptr(),
            )
        };
        if rv != ffi::OQS_SUCCESS {
            return Err(Error::SigningFailed);
        }

        signature.truncate(signature_len);
        Ok(signature)
    }

    /// Sign a message bound to a context string.
    ///
    /// An empty context behaves exactly like [`sign`](Self::sign). A
    /// non-empty context requires the algorithm's context capability.
    pub fn sign_with_ctx_str(&self, message: &[u8], context: &[u8]) -> Result<Vec<u8>> {
        if context.is_empty() {
            return self.sign(message);
        }

        let handle = self.handle.as_ref().ok_or(Error::Uninitialized)?;
        let details = self.details.as_ref().ok_or(Error::Uninitialized)?;

        if !details.sig_with_ctx_support {
            return Err(Error::ContextNotSupported);
        }
        if self.secret_key.len() != details.length_secret_key {
            return Err(Error::MissingOrInvalidSecretKey);
        }

        let mut signature = vec![0u8; details.max_length_signature];
        let mut signature_len: usize = 0;

        let rv = unsafe {
            ffi::OQS_SIG_sign_with_ctx_str(
                handle.as_ptr(),
                signature.as_mut_ptr(),
                &mut signature_len,
                message.as_ptr(),
                message.len(),
                context.as_ptr(),
                context.len(),
                self.secret_key.as_slice().as_ptr(),
            )
        };
        if rv != ffi::OQS_SUCCESS {
            return Err(Error::SigningFailed);
        }

        signature.truncate(signature_len);
        Ok(signature)
    }

    /// Verify a signed message, returning `true` when the signature is
    /// valid and `false` when it is not. Engine rejection is the `false`
    /// verdict, never an error.
    pub fn verify(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool> {
        let handle = self.handle.as_ref().ok_or(Error::Uninitialized)?;
        let details = self.details.as_ref().ok_or(Error::Uninitialized)?;

        if public_key.len() != details.length_public_key {
            return Err(Error::InvalidPublicKeyLength {
                expected: details.length_public_key,
                actual: public_key.len(),
            });
        }
        if signature.len() > details.max_length_signature {
            return Err(Error::InvalidSignatureLength {
                max: details.max_length_signature,
                actual: signature.len(),
            });
        }

        let rv = unsafe {
            ffi::OQS_SIG_verify(
                handle.as_ptr(),
                message.as_ptr(),
                message.len(),
                signature.as_ptr(),
                signature.len(),
                public_key.as_ptr(),
            )
        };

        Ok(rv == ffi::OQS_SUCCESS)
    }

    /// Verify a signed message bound to a context string.
    ///
    /// An empty context behaves exactly like [`verify`](Self::verify).
    pub fn verify_with_ctx_str(
        &self,
        message: &[u8],
        signature: &[u8],
        context: &[u8],
        public_key: &[u8],
    ) -> Result<bool> {
        if context.is_empty() {
            return self.verify(message, signature, public_key);
        }

        let handle = self.handle.as_ref().ok_or(Error::Uninitialized)?;
        let details = self.details.as_ref().ok_or(Error::Uninitialized)?;

        if !details.sig_with_ctx_support {
            return Err(Error::ContextNotSupported);
        }
        if public_key.len() != details.length_public_key {
            return Err(Error::InvalidPublicKeyLength {
                expected: details.length_public_key,
                actual: public_key.len(),
            });
        }
        if signature.len() > details.max_length_signature {
            return Err(Error::InvalidSignatureLength {
                max: details.max_length_signature,
                actual: signature.len(),
            });
        }

        let rv = unsafe {
            ffi::OQS_SIG_verify_with_ctx_str(
                handle.as_ptr(),
                message.as_ptr(),
                message.len(),
                signature.as_ptr(),
                signature.len(),
                context.as_ptr(),
                context.len(),
                public_key.as_ptr(),
            )
        };

        Ok(rv == ffi::OQS_SUCCESS)
    }

    /// Wipe the custodied secret key, release the native handle, and
    /// reset the session for re-init. Idempotent; also runs on drop.
    pub fn clean(&mut self) {
        self.secret_key.clear();
        if self.handle.take().is_some() {
            trace!("signature session cleaned");
        }
        self.details = None;
    }
}

impl Drop for Signature {
    fn drop(&mut self) {
        self.clean();
    }
}

/// Copy the descriptor fields into owned memory; the C strings must not
/// be retained past the handle's lifetime.
unsafe fn snapshot_details(sig: *const ffi::OQS_SIG) -> SigDetails {
    unsafe {
        SigDetails {
            name: CStr::from_ptr((*sig).method_name)
                .to_string_lossy()
                .into_owned(),
            version: CStr::from_ptr((*sig).alg_version)
                .to_string_lossy()
                .into_owned(),
            claimed_nist_level: (*sig).claimed_nist_level,
            euf_cma: (*sig).euf_cma,
            sig_with_ctx_support: (*sig).sig_with_ctx_support,
            length_public_key: (*sig).length_public_key,
            length_secret_key: (*sig).length_secret_key,
            max_length_signature: (*sig).length_signature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_session_fails_explicitly() {
        let mut session = Signature::new();

        assert_eq!(session.details().err(), Some(Error::Uninitialized));
        assert_eq!(session.generate_keypair().err(), Some(Error::Uninitialized));
        assert_eq!(session.import_secret_key(&[0; 32]).err(), Some(Error::Uninitialized));
        assert_eq!(session.sign(b"msg").err(), Some(Error::Uninitialized));
        assert_eq!(session.verify(b"msg", &[], &[]).err(), Some(Error::Uninitialized));
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let mut session = Signature::new();

        assert_eq!(
            session.init("not-a-sig", None).err(),
            Some(Error::AlgorithmNotSupported("not-a-sig".to_string()))
        );
    }
}
