/*!
Registry of the engine's algorithm catalog.

The native engine ships a static catalog per family (KEM, signature):
every identifier its build knows about is *supported*, and the subset
usable in the current configuration is *enabled*. The catalog is probed
exactly once, on first touch, and is read-only for the rest of the
process; there is no runtime registration and no teardown.
*/

use std::ffi::{CStr, CString};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{Error, Result};
use crate::ffi;

/// One catalog slot: an algorithm identifier and its runtime usability.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct AlgorithmIdentity {
    /// Identifier string the engine resolves instances from
    pub name: String,
    /// Position in the engine's catalog for the family
    pub index: usize,
    /// Whether the algorithm is usable in this build's configuration
    pub enabled: bool,
}

/// Snapshot of the engine's catalog for both families.
struct AlgorithmRegistry {
    kems: Vec<AlgorithmIdentity>,
    sigs: Vec<AlgorithmIdentity>,
}

impl AlgorithmRegistry {
    /// Initialize the engine and enumerate both family catalogs.
    fn probe() -> Self {
        unsafe {
            ffi::OQS_init();
        }

        let kems = Self::probe_family(
            unsafe { ffi::OQS_KEM_alg_count() } as usize,
            |i| unsafe { ffi::OQS_KEM_alg_identifier(i) },
            |name| unsafe { ffi::OQS_KEM_alg_is_enabled(name.as_ptr()) } != 0,
        );
        let sigs = Self::probe_family(
            unsafe { ffi::OQS_SIG_alg_count() } as usize,
            |i| unsafe { ffi::OQS_SIG_alg_identifier(i) },
            |name| unsafe { ffi::OQS_SIG_alg_is_enabled(name.as_ptr()) } != 0,
        );

        debug!(
            kems = kems.len(),
            kems_enabled = kems.iter().filter(|a| a.enabled).count(),
            sigs = sigs.len(),
            sigs_enabled = sigs.iter().filter(|a| a.enabled).count(),
            "algorithm catalog populated"
        );

        Self { kems, sigs }
    }

    fn probe_family(
        count: usize,
        identifier: impl Fn(usize) -> *const libc::c_char,
        is_enabled: impl Fn(&CString) -> bool,
    ) -> Vec<AlgorithmIdentity> {
        let mut entries = Vec::with_capacity(count);
        for index in 0..count {
            let ptr = identifier(index);
            if ptr.is_null() {
                // In-range identifiers are never null
                continue;
            }
            let name = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
            // Catalog names contain no interior NUL
            let c_name = CString::new(name.clone()).expect("catalog name contains NUL");
            let enabled = is_enabled(&c_name);
            entries.push(AlgorithmIdentity { name, index, enabled });
        }
        entries
    }
}

static REGISTRY: Lazy<AlgorithmRegistry> = Lazy::new(AlgorithmRegistry::probe);

/// Force engine initialization and catalog population. Entry points
/// that reach the engine without consulting the catalog call this first.
pub(crate) fn ensure_engine_initialized() {
    Lazy::force(&REGISTRY);
}

fn kems() -> &'static [AlgorithmIdentity] {
    &REGISTRY.kems
}

fn sigs() -> &'static [AlgorithmIdentity] {
    &REGISTRY.sigs
}

// KEM family

/// Maximum number of KEM algorithms the engine's build knows about.
pub fn kem_count() -> usize {
    kems().len()
}

/// KEM algorithm name for a catalog index.
pub fn kem_name(index: usize) -> Result<&'static str> {
    kems()
        .get(index)
        .map(|a| a.name.as_str())
        .ok_or(Error::InvalidAlgorithmIndex(index))
}

/// All KEM identifiers known to the engine's build, in catalog order.
pub fn supported_kems() -> Vec<&'static str> {
    kems().iter().map(|a| a.name.as_str()).collect()
}

/// The subset of KEM identifiers usable at runtime, in catalog order.
pub fn enabled_kems() -> Vec<&'static str> {
    kems()
        .iter()
        .filter(|a| a.enabled)
        .map(|a| a.name.as_str())
        .collect()
}

/// True if the KEM algorithm is known to the engine's build.
pub fn is_kem_supported(name: &str) -> bool {
    kems().iter().any(|a| a.name == name)
}

/// True if the KEM algorithm is usable at runtime.
pub fn is_kem_enabled(name: &str) -> bool {
    kems().iter().any(|a| a.enabled && a.name == name)
}

/// Full catalog entries for the KEM family.
pub fn kem_identities() -> &'static [AlgorithmIdentity] {
    kems()
}

// Signature family

/// Maximum number of signature algorithms the engine's build knows about.
pub fn sig_count() -> usize {
    sigs().len()
}

/// Signature algorithm name for a catalog index.
pub fn sig_name(index: usize) -> Result<&'static str> {
    sigs()
        .get(index)
        .map(|a| a.name.as_str())
        .ok_or(Error::InvalidAlgorithmIndex(index))
}

/// All signature identifiers known to the engine's build, in catalog order.
pub fn supported_sigs() -> Vec<&'static str> {
    sigs().iter().map(|a| a.name.as_str()).collect()
}

/// The subset of signature identifiers usable at runtime, in catalog order.
pub fn enabled_sigs() -> Vec<&'static str> {
    sigs()
        .iter()
        .filter(|a| a.enabled)
        .map(|a| a.name.as_str())
        .collect()
}

/// True if the signature algorithm is known to the engine's build.
pub fn is_sig_supported(name: &str) -> bool {
    sigs().iter().any(|a| a.name == name)
}

/// True if the signature algorithm is usable at runtime.
pub fn is_sig_enabled(name: &str) -> bool {
    sigs().iter().any(|a| a.enabled && a.name == name)
}

/// Full catalog entries for the signature family.
pub fn sig_identities() -> &'static [AlgorithmIdentity] {
    sigs()
}
