//! Path normalization and hierarchical fallback lookup for policy tables.

use std::collections::HashMap;

/// Normalize a request path: absolute, duplicate separators collapsed, no
/// trailing slash except for root. Empty input and "." both mean root; lone
/// "." segments are dropped.
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() || trimmed == "." {
        return "/".to_string();
    }
    let mut out = String::with_capacity(trimmed.len() + 1);
    for seg in trimmed.split('/') {
        if seg.is_empty() || seg == "." {
            continue;
        }
        out.push('/');
        out.push_str(seg);
    }
    if out.is_empty() {
        "/".to_string()
    } else {
        out
    }
}

/// Parent of a normalized path; root is its own parent's terminal.
fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &path[..i],
    }
}

/// Resolve a path against a table keyed by normalized paths: exact match
/// first, then strip the last segment until a match is found or root has
/// been tried. `None` means not even root carries an entry; callers must
/// treat that as "no record found", never as an implicit allow.
pub fn resolve<'a, V>(path: &str, table: &'a HashMap<String, V>) -> Option<(&'a str, &'a V)> {
    let mut cur = normalize(path);
    loop {
        if let Some((k, v)) = table.get_key_value(cur.as_str()) {
            return Some((k.as_str(), v));
        }
        if cur == "/" {
            return None;
        }
        cur = parent(&cur).to_string();
    }
}
