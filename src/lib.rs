/*!
# PQC Engine

A safety layer over the native liboqs post-quantum cryptography engine:
key-encapsulation and signature sessions with leak-free lifecycle
management for the secret material that crosses the C boundary.

## Overview

The engine owns the mathematics; this crate owns the custody. It
provides:

- An algorithm registry distinguishing *supported* identifiers (known to
  the engine's build) from *enabled* ones (usable at runtime)
- `KeyEncapsulation` sessions: key-pair generation, encapsulation,
  decapsulation, secret-key export, secure cleansing
- `Signature` sessions: signing and verification, plain and
  context-string-qualified, plus secret-key import
- `SecureBuffer` custody with engine-backed zeroization for every secret
  byte the crate holds, on every exit path including drop
- A process-wide randomness bridge: the engine's built-in generators or
  a host-supplied custom source installed across the boundary

Every buffer length is validated on the safe side before a native call
is made; the engine performs no bounds checking and trusts its caller
completely.

## Example

```no_run
use pqc_engine::{registry, KeyEncapsulation};

// Pick an enabled algorithm from the catalog.
let alg = registry::enabled_kems()[0];

let mut receiver = KeyEncapsulation::new();
receiver.init(alg, None)?;
let public_key = receiver.generate_keypair()?;

let mut sender = KeyEncapsulation::new();
sender.init(alg, None)?;
let (ciphertext, shared_secret) = sender.encap_secret(&public_key)?;

assert_eq!(receiver.decap_secret(&ciphertext)?, shared_secret);
# Ok::<(), pqc_engine::Error>(())
```
*/

// Raw boundary to the native engine
pub mod ffi;

// Error types
pub mod error;

// Secret-byte custody
pub mod memory;

// Algorithm catalog
pub mod registry;

// Stateful KEM and signature sessions
pub mod session;

// Process-wide entropy bridge
pub mod rand;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use memory::{SecureBuffer, mem_cleanse};
pub use registry::AlgorithmIdentity;
pub use session::{KemDetails, KeyEncapsulation, SigDetails, Signature};
