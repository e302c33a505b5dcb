//! Filesystem-safe titles.

/// Characters that are not allowed in file names on common filesystems.
const FORBIDDEN: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Replaces every forbidden character (`\ / : * ? " < > |`) with `_`.
///
/// Everything else, Unicode included, is kept as is, so the function is
/// idempotent and never changes the character count.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect()
}
