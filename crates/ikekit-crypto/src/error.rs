//! Error types for keying operations

use thiserror::Error;

/// Errors from key derivation, randomness and parity operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyingError {
    /// Caller supplied an input of the wrong shape (e.g. a 6-byte parity
    /// payload). Never retried; the caller must fix the input.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the input
        reason: String,
    },

    /// The underlying signer (MAC) rejected the key or failed to produce
    /// output. Propagated unchanged through prf+.
    #[error("signing failed: {reason}")]
    SigningFailed {
        /// Reason reported by the signer
        reason: String,
    },

    /// A required MAC algorithm could not be instantiated, or an IKE PRF
    /// transform id is not supported.
    #[error("algorithm unavailable: {algorithm}")]
    AlgorithmUnavailable {
        /// Name or transform id of the missing algorithm
        algorithm: String,
    },

    /// The operating system RNG failed to fill the buffer
    #[error("entropy unavailable: {reason}")]
    EntropyUnavailable {
        /// Error reported by the OS RNG
        reason: String,
    },
}

impl KeyingError {
    /// Returns true if this error is fatal (unrecoverable)
    ///
    /// Argument, signing and algorithm errors are deterministic: repeating
    /// the call with the same inputs fails the same way. An OS entropy
    /// failure may clear on retry.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::InvalidArgument { .. } => true,
            Self::SigningFailed { .. } => true,
            Self::AlgorithmUnavailable { .. } => true,

            Self::EntropyUnavailable { .. } => false,
        }
    }

    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument { reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_is_fatal() {
        let err = KeyingError::invalid_argument("input must be 7 bytes");
        assert!(err.is_fatal());
    }

    #[test]
    fn signing_failed_is_fatal() {
        let err = KeyingError::SigningFailed { reason: "bad key length".to_string() };
        assert!(err.is_fatal());
    }

    #[test]
    fn entropy_unavailable_is_not_fatal() {
        let err = KeyingError::EntropyUnavailable { reason: "EAGAIN".to_string() };
        assert!(!err.is_fatal());
    }

    #[test]
    fn error_display() {
        let err = KeyingError::invalid_argument("input must be 7 bytes");
        assert_eq!(err.to_string(), "invalid argument: input must be 7 bytes");

        let err = KeyingError::AlgorithmUnavailable { algorithm: "HmacSHA256".to_string() };
        assert_eq!(err.to_string(), "algorithm unavailable: HmacSHA256");
    }
}
