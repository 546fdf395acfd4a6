//! Default physical names and idempotency tokens.
//!
//! When a template omits a resource name one is derived from the logical
//! resource id and the client request token. The same request always yields
//! the same name, so a retried create addresses the same resource instead
//! of leaking a second one.

use blake2::{Blake2b512, Digest};

const SUFFIX_LENGTH: usize = 12;
const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Derives a resource name of at most `max_length` characters.
///
/// The name is the logical id, truncated to leave room for the suffix,
/// followed by `-` and twelve alphanumeric characters derived from the
/// client request token.
pub fn generate_resource_identifier(
    logical_resource_id: Option<&str>,
    client_request_token: &str,
    max_length: usize,
) -> String {
    let digest = digest(&[
        logical_resource_id.unwrap_or_default().as_bytes(),
        client_request_token.as_bytes(),
    ]);
    let suffix: String = digest
        .iter()
        .take(SUFFIX_LENGTH.min(max_length))
        .map(|byte| SUFFIX_ALPHABET[*byte as usize % SUFFIX_ALPHABET.len()] as char)
        .collect();

    let prefix_length = max_length.saturating_sub(SUFFIX_LENGTH + 1);
    let prefix: String = logical_resource_id
        .unwrap_or_default()
        .chars()
        .take(prefix_length)
        .collect();

    if prefix.is_empty() {
        suffix
    } else {
        format!("{prefix}-{suffix}")
    }
}

/// Derives a version 4 UUID from the client request token.
///
/// Used as the provider-side idempotency token for creates that accept one.
pub fn idempotency_token(client_request_token: &str, scope: &str) -> String {
    let digest = digest(&[scope.as_bytes(), client_request_token.as_bytes()]);
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
}

fn digest(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = Blake2b512::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    hasher.finalize().to_vec()
}
