//! Variant fingerprints
//!
//! variant_key = SHA-256 hex digest of the RFC 8785 (JCS) canonical JSON of
//! a resolved variant. Identical settings give identical keys regardless of
//! how the variant was declared.

use buildvar_core::BuildVariant;
use sha2::{Digest, Sha256};

#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    #[error("JCS serialization failed: {0}")]
    Jcs(String),
}

/// Compute the variant key of a resolved variant.
pub fn variant_key(variant: &BuildVariant) -> Result<String, FingerprintError> {
    let jcs_bytes = serde_json_canonicalizer::to_vec(variant)
        .map_err(|e| FingerprintError::Jcs(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&jcs_bytes);
    Ok(hex::encode(hasher.finalize()))
}
