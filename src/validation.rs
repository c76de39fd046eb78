use crate::error::{Error, Result};

/// Validates an export file prefix.
///
/// The prefix becomes part of a file name in the working directory, so it
/// must not be empty, must not contain path separators or NUL, and must not
/// be `.` or `..`.
pub fn validate_file_prefix(prefix: &str) -> Result<&str> {
    if prefix.is_empty() {
        return Err(Error::InvalidFilePrefix {
            prefix: prefix.to_string(),
            reason: "file prefix cannot be empty".to_string(),
        });
    }

    if prefix.contains(['/', '\\', '\0']) {
        return Err(Error::InvalidFilePrefix {
            prefix: prefix.to_string(),
            reason: "file prefix must not contain path separators".to_string(),
        });
    }

    if prefix == "." || prefix == ".." {
        return Err(Error::InvalidFilePrefix {
            prefix: prefix.to_string(),
            reason: "file prefix must not refer to a directory".to_string(),
        });
    }

    Ok(prefix)
}

/// Checks a key identifier before it becomes a gpg argument.
///
/// Listings hand back primary fingerprints: 40 hex digits for v4 keys and 64
/// for v5 keys made by GnuPG 2.4 and later. Long (16) and short (8) key IDs
/// are accepted too, with or without a `0x` prefix.
///
/// Returns the identifier upper-cased without its prefix.
pub fn validate_keyid(keyid: &str) -> Result<String> {
    let invalid = |reason: String| Error::InvalidKeyId {
        keyid: keyid.to_string(),
        reason,
    };

    let digits = keyid
        .strip_prefix("0x")
        .or_else(|| keyid.strip_prefix("0X"))
        .unwrap_or(keyid);

    if digits.is_empty() {
        return Err(invalid("key ID cannot be empty".to_string()));
    }

    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(invalid(format!("unexpected character {bad:?} in key ID")));
    }

    match digits.len() {
        8 | 16 | 40 | 64 => Ok(digits.to_ascii_uppercase()),
        len => Err(invalid(format!(
            "expected a fingerprint (40 or 64 hex digits) or key ID (8 or 16), got {len} digits"
        ))),
    }
}
