/*!
Entropy bridge to the engine's random-number source.

The engine holds one active generator process-wide: its default system
generator, a named built-in alternative, or a host-supplied custom
source. Every entropy-consuming native call, including key generation
inside sessions, draws from whichever generator is active, so switching
or installing a source affects all threads. Installation is a
serialization point: do it before concurrent operation begins, or under
external synchronization.

The custom source is bridged across the boundary by a single fixed
trampoline registered with the engine; it forwards each request to
whichever host closure the guarded cell currently holds. Installing a
new source supersedes the previous one.
*/

use std::ffi::CString;
use std::slice;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::ffi;
use crate::registry;

/// Names of the engine's built-in generators, for
/// [`switch_algorithm`].
pub mod algorithm {
    /// Default system generator
    pub const SYSTEM: &str = "system";
    /// OpenSSL-backed generator, present when the engine is built with it
    pub const OPENSSL: &str = "OpenSSL";
}

/// Host-supplied generator: must fill the whole slice on every call.
pub type CustomSource = Box<dyn FnMut(&mut [u8]) + Send + 'static>;

/// The indirection cell the trampoline forwards to.
static CUSTOM_SOURCE: Lazy<Mutex<Option<CustomSource>>> = Lazy::new(|| Mutex::new(None));

/// Fixed C-callable entry point registered with the engine. The engine
/// supplies the buffer and the exact count; the installed closure must
/// fill every byte before this returns.
unsafe extern "C" fn custom_source_trampoline(random_array: *mut u8, bytes_to_read: usize) {
    let mut cell = CUSTOM_SOURCE.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(source) = cell.as_mut() {
        let buf = unsafe { slice::from_raw_parts_mut(random_array, bytes_to_read) };
        source(buf);
    }
}

/// Generate `bytes_to_read` fresh random bytes from the active
/// generator.
pub fn random_bytes(bytes_to_read: usize) -> Vec<u8> {
    registry::ensure_engine_initialized();

    let mut result = vec![0u8; bytes_to_read];
    if bytes_to_read > 0 {
        unsafe { ffi::OQS_randombytes(result.as_mut_ptr(), bytes_to_read) };
    }
    result
}

/// Fill `random_array` with random bytes from the active generator. If
/// `bytes_to_read` exceeds the buffer length, only the buffer length is
/// read.
pub fn random_bytes_in_place(random_array: &mut [u8], bytes_to_read: usize) {
    registry::ensure_engine_initialized();

    let n = bytes_to_read.min(random_array.len());
    if n > 0 {
        unsafe { ffi::OQS_randombytes(random_array.as_mut_ptr(), n) };
    }
}

/// Switch the engine to one of its built-in named generators (see
/// [`algorithm`]).
pub fn switch_algorithm(alg_name: &str) -> Result<()> {
    registry::ensure_engine_initialized();

    let c_name = CString::new(alg_name)
        .map_err(|_| Error::UnknownRandomAlgorithm(alg_name.to_string()))?;
    let rv = unsafe { ffi::OQS_randombytes_switch_algorithm(c_name.as_ptr()) };
    if rv != ffi::OQS_SUCCESS {
        return Err(Error::UnknownRandomAlgorithm(alg_name.to_string()));
    }

    debug!(algorithm = alg_name, "random generator switched");
    Ok(())
}

/// Install a host-supplied generator as the process-wide entropy source.
///
/// The closure receives the engine's buffer for each request and must
/// fill it completely. It stays active until superseded by another
/// install or until [`switch_algorithm`] selects a built-in generator
/// again.
pub fn install_custom_source<F>(source: F)
where
    F: FnMut(&mut [u8]) + Send + 'static,
{
    registry::ensure_engine_initialized();

    let mut cell = CUSTOM_SOURCE.lock().unwrap_or_else(|e| e.into_inner());
    *cell = Some(Box::new(source));
    unsafe { ffi::OQS_randombytes_custom_algorithm(custom_source_trampoline) };

    trace!("custom entropy source installed");
}
