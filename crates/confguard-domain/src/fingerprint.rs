use confguard_types::DocumentRef;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a classified result.
///
/// Identity fields:
/// - category
/// - namespace
/// - rule name
/// - document index and source path (if present)
/// - message (if present)
pub fn fingerprint_for_result(
    category: &str,
    namespace: &str,
    rule: &str,
    document: &DocumentRef,
    message: Option<&str>,
) -> String {
    let index = document.index.to_string();
    let mut parts = vec![category, namespace, rule, index.as_str()];
    if let Some(p) = &document.path {
        parts.push(p.as_str());
    }
    if let Some(m) = message {
        parts.push(m);
    }
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
