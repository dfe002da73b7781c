/*!
Stateful sessions over the engine's algorithm instances.

A session exclusively owns one native algorithm handle and the secret
key custodied for it. The lifecycle is init → key generation or import →
use → clean; `clean` wipes the key, releases the handle, and returns the
session to its uninitialized state, ready for re-init. Dropping a
session cleans it too, so no exit path leaks the handle or leaves key
material hot.

Sessions are independent of each other and may be driven from different
threads; a single session takes `&mut self` for every state change and
must not be shared without external mutual exclusion.
*/

pub mod kem;
pub mod sig;

pub use kem::{KemDetails, KeyEncapsulation};
pub use sig::{SigDetails, Signature};
