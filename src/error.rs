/*!
Error handling for the engine wrapper.

Every input-shape violation is caught here, on the safe side of the
boundary, before any native call is made; the engine itself performs no
validation. Engine-reported failures map to their own variants and are
never retried by this layer.
*/

use thiserror::Error;

/// Result type for engine wrapper operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for engine wrapper operations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The algorithm name is unknown to the engine's build
    #[error("\"{0}\" is not supported by the engine")]
    AlgorithmNotSupported(String),

    /// The algorithm is compiled in but not usable at runtime
    #[error("\"{0}\" is supported but not enabled by the engine")]
    AlgorithmNotEnabled(String),

    /// Catalog index outside the engine's algorithm count
    #[error("algorithm index {0} is out of range")]
    InvalidAlgorithmIndex(usize),

    /// Session operation attempted before a successful init
    #[error("session is not initialized")]
    Uninitialized,

    /// Public key does not match the algorithm's declared length
    #[error("incorrect public key length: expected {expected}, got {actual}")]
    InvalidPublicKeyLength { expected: usize, actual: usize },

    /// Imported secret key does not match the algorithm's declared length
    #[error("incorrect secret key length: expected {expected}, got {actual}")]
    InvalidSecretKeyLength { expected: usize, actual: usize },

    /// Ciphertext does not match the algorithm's declared length
    #[error("incorrect ciphertext length: expected {expected}, got {actual}")]
    InvalidCiphertextLength { expected: usize, actual: usize },

    /// Signature exceeds the algorithm's maximum length
    #[error("incorrect signature length: at most {max} bytes, got {actual}")]
    InvalidSignatureLength { max: usize, actual: usize },

    /// The session holds no secret key of the declared length
    #[error("secret key is missing or mis-sized; supply one at init or generate a key pair")]
    MissingOrInvalidSecretKey,

    /// Non-empty context string on an algorithm without context support
    #[error("algorithm does not support context strings")]
    ContextNotSupported,

    /// Engine reported a key pair generation failure
    #[error("can not generate keypair")]
    KeyPairGenerationFailed,

    /// Engine reported an encapsulation failure
    #[error("can not encapsulate secret")]
    EncapsulationFailed,

    /// Engine reported a decapsulation failure
    #[error("can not decapsulate secret")]
    DecapsulationFailed,

    /// Engine reported a signing failure
    #[error("can not sign message")]
    SigningFailed,

    /// The engine does not recognize the named random generator
    #[error("can not switch to \"{0}\" random algorithm")]
    UnknownRandomAlgorithm(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::AlgorithmNotSupported("Frodo".to_string());
        assert_eq!(format!("{}", err), "\"Frodo\" is not supported by the engine");

        let err = Error::InvalidPublicKeyLength { expected: 800, actual: 799 };
        assert_eq!(
            format!("{}", err),
            "incorrect public key length: expected 800, got 799"
        );

        let err = Error::InvalidAlgorithmIndex(97);
        assert_eq!(format!("{}", err), "algorithm index 97 is out of range");
    }
}
