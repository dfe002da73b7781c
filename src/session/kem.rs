/*!
Key-encapsulation session.

Binds one KEM algorithm instance to a custodied secret key and mediates
every operation against it: key-pair generation, encapsulation,
decapsulation, export, and cleansing. Buffer lengths are taken from the
algorithm details snapshotted at init and enforced before any native
call; the engine performs no bounds checking of its own.
*/

use std::ffi::{CStr, CString};
use std::ptr::NonNull;

use tracing::trace;

use crate::error::{Error, Result};
use crate::ffi;
use crate::memory::SecureBuffer;
use crate::registry;

/// KEM algorithm details, snapshotted from the engine at init.
///
/// The byte lengths are load-bearing: every buffer crossing the boundary
/// for this algorithm instance must match them exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct KemDetails {
    /// Human-readable algorithm name
    pub name: String,
    /// Algorithm implementation version
    pub version: String,
    /// Vendor-claimed NIST security level
    pub claimed_nist_level: u8,
    /// Whether the algorithm claims chosen-ciphertext resistance
    pub ind_cca: bool,
    /// Public key length in bytes
    pub length_public_key: usize,
    /// Secret key length in bytes
    pub length_secret_key: usize,
    /// Ciphertext length in bytes
    pub length_ciphertext: usize,
    /// Shared secret length in bytes
    pub length_shared_secret: usize,
}

/// Exclusively owned native KEM instance, released exactly once.
struct KemHandle(NonNull<ffi::OQS_KEM>);

impl KemHandle {
    fn acquire(name: &CStr) -> Option<Self> {
        NonNull::new(unsafe { ffi::OQS_KEM_new(name.as_ptr()) }).map(Self)
    }

    fn as_ptr(&self) -> *const ffi::OQS_KEM {
        self.0.as_ptr()
    }
}

impl Drop for KemHandle {
    fn drop(&mut self) {
        unsafe { ffi::OQS_KEM_free(self.0.as_ptr()) }
    }
}

// The handle is plain engine heap state with no thread affinity.
unsafe impl Send for KemHandle {}

/// Stateful KEM session: one algorithm instance plus the secret key
/// custodied for it.
///
/// Lifecycle: [`init`](Self::init) → [`generate_keypair`](Self::generate_keypair)
/// (or a key supplied at init) → encapsulate/decapsulate →
/// [`clean`](Self::clean). A cleaned session can be re-initialized.
///
/// # Example
///
/// ```no_run
/// use pqc_engine::KeyEncapsulation;
///
/// let mut server = KeyEncapsulation::new();
/// server.init("ML-KEM-768", None)?;
/// let public_key = server.generate_keypair()?;
///
/// let mut client = KeyEncapsulation::new();
/// client.init("ML-KEM-768", None)?;
/// let (ciphertext, shared_secret) = client.encap_secret(&public_key)?;
///
/// assert_eq!(server.decap_secret(&ciphertext)?, shared_secret);
/// # Ok::<(), pqc_engine::Error>(())
/// ```
#[derive(Default)]
pub struct KeyEncapsulation {
    handle: Option<KemHandle>,
    secret_key: SecureBuffer,
    details: Option<KemDetails>,
}

impl KeyEncapsulation {
    /// Create an uninitialized session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the session to a KEM algorithm, optionally supplying an
    /// existing secret key.
    ///
    /// The supplied key is stored as-is; its origin is not validated
    /// here, and a mis-sized key is rejected at the first operation that
    /// consumes it. Without a key, run
    /// [`generate_keypair`](Self::generate_keypair) next. Any previous
    /// state of the session is cleaned first.
    pub fn init(&mut self, alg_name: &str, secret_key: Option<&[u8]>) -> Result<()> {
        if !registry::is_kem_enabled(alg_name) {
            // perhaps it's supported
            if registry::is_kem_supported(alg_name) {
                return Err(Error::AlgorithmNotEnabled(alg_name.to_string()));
            }
            return Err(Error::AlgorithmNotSupported(alg_name.to_string()));
        }

        self.clean();

        let c_name = CString::new(alg_name)
            .map_err(|_| Error::AlgorithmNotSupported(alg_name.to_string()))?;
        let handle = KemHandle::acquire(&c_name)
            .ok_or_else(|| Error::AlgorithmNotEnabled(alg_name.to_string()))?;

        self.details = Some(unsafe { snapshot_details(handle.as_ptr()) });
        self.handle = Some(handle);
        if let Some(key) = secret_key {
            self.secret_key = SecureBuffer::from_slice(key);
        }

        trace!(algorithm = alg_name, "kem session initialized");
        Ok(())
    }

    /// Details of the bound algorithm.
    pub fn details(&self) -> Result<&KemDetails> {
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
            ffi::OQS_KEM_keypair(
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

    /// Immutable view of the custodied secret key; empty when absent.
    pub fn export_secret_key(&self) -> &[u8] {
        self.secret_key.as_slice()
    }

    /// Encapsulate a secret under `public_key`, returning the ciphertext
    /// and the shared secret.
    pub fn encap_secret(&self, public_key: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        let handle = self.handle.as_ref().ok_or(Error::Uninitialized)?;
        let details = self.details.as_ref().ok_or(Error::Uninitialized)?;

        if public_key.len() != details.length_public_key {
            return Err(Error::InvalidPublicKeyLength {
                expected: details.length_public_key,
                actual: public_key.len(),
            });
        }

        let mut ciphertext = vec![0u8; details.length_ciphertext];
        let mut shared_secret = vec![0u8; details.length_shared_secret];

        let rv = unsafe {
            ffi::OQS_KEM_encaps(
                handle.as_ptr(),
                ciphertext.as_mut_ptr(),
                shared_secret.as_mut_ptr(),
                public_key.as_ptr(),
            )
        };
        if rv != ffi::OQS_SUCCESS {
            return Err(Error::EncapsulationFailed);
        }

        Ok((ciphertext, shared_secret))
    }

    /// Recover the shared secret from `ciphertext` using the custodied
    /// secret key.
    pub fn decap_secret(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let handle = self.handle.as_ref().ok_or(Error::Uninitialized)?;
        let details = self.details.as_ref().ok_or(Error::Uninitialized)?;

        if ciphertext.len() != details.length_ciphertext {
            return Err(Error::InvalidCiphertextLength {
                expected: details.length_ciphertext,
                actual: ciphertext.len(),
            });
        }
        if self.secret_key.len() != details.length_secret_key {
            return Err(Error::MissingOrInvalidSecretKey);
        }

        let mut shared_secret = vec![0u8; details.length_shared_secret];

        let rv = unsafe {
            ffi::OQS_KEM_decaps(
                handle.as_ptr(),
                shared_secret.as_mut_ptr(),
                ciphertext.as_ptr(),
                self.secret_key.as_slice().as_ptr(),
            )
        };
        if rv != ffi::OQS_SUCCESS {
            return Err(Error::DecapsulationFailed);
        }

        Ok(shared_secret)
    }

    /// Wipe the custodied secret key, release the native handle, and
    /// reset the session for re-init. Idempotent; also runs on drop.
    pub fn clean(&mut self) {
        self.secret_key.clear();
        if self.handle.take().is_some() {
            trace!("kem session cleaned");
        }
        self.details = None;
    }
}

impl Drop for KeyEncapsulation {
    fn drop(&mut self) {
        self.clean();
    }
}

/// Copy the descriptor fields into owned memory; the C strings must not
/// be retained past the handle's lifetime.
unsafe fn snapshot_details(kem: *const ffi::OQS_KEM) -> KemDetails {
    unsafe {
        KemDetails {
            name: CStr::from_ptr((*kem).method_name)
                .to_string_lossy()
                .into_owned(),
            version: CStr::from_ptr((*kem).alg_version)
                .to_string_lossy()
                .into_owned(),
            claimed_nist_level: (*kem).claimed_nist_level,
            ind_cca: (*kem).ind_cca,
            length_public_key: (*kem).length_public_key,
            length_secret_key: (*kem).length_secret_key,
            length_ciphertext: (*kem).length_ciphertext,
            length_shared_secret: (*kem).length_shared_secret,
        }
    }
}
