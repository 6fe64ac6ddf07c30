//! Placeholder signing detection
//!
//! Flags identities built on the well-known development key. Such a
//! variant still validates; callers log a warning for release-grade ones.

use buildvar_core::{BuildVariant, SigningIdentity};

/// Alias of the auto-generated development key.
pub const DEBUG_KEY_ALIAS: &str = "androiddebugkey";

/// File name of the auto-generated development keystore.
pub const DEBUG_KEYSTORE_FILE: &str = "debug.keystore";

/// Whether `identity` uses the development key or keystore.
pub fn is_placeholder_identity(identity: &SigningIdentity) -> bool {
    if identity.alias.eq_ignore_ascii_case(DEBUG_KEY_ALIAS) {
        return true;
    }
    identity
        .keystore_location
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.eq_ignore_ascii_case(DEBUG_KEYSTORE_FILE))
}

/// Whether a release-grade variant is signed with a placeholder identity.
pub fn needs_placeholder_warning(variant: &BuildVariant) -> bool {
    variant.is_release_grade() && is_placeholder_identity(&variant.signing)
}
