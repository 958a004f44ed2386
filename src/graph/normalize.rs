//! Name normalization — the only matching policy in the crate.
//!
//! A name is trimmed, split at CamelCase boundaries, lowercased, and every
//! run of whitespace, hyphens or underscores becomes a single `_`:
//!
//! ```text
//! "Order Service"      -> order_service
//! "order-service"      -> order_service
//! "OrderService"       -> order_service
//! "  ORDER_SERVICE  "  -> order_service
//! "HTTPServer"         -> http_server
//! ```
//!
//! Stored names are normalized once when the graph is indexed, query names
//! once on entry. Both go through [`NameKey::new`].

use serde::Serialize;
use std::fmt;

/// Normalize a raw entity name into its comparison form.
pub fn normalize_name(raw: &str) -> String {
    let chars: Vec<char> = raw.trim().chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);
    let mut pending_sep = false;

    for (i, &c) in chars.iter().enumerate() {
        if is_separator(c) {
            // Leading separators never produce an underscore.
            pending_sep = !out.is_empty();
            continue;
        }

        if c.is_uppercase() && !out.is_empty() && !pending_sep && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            // fooBar, v2Api, HTTPServer
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                pending_sep = true;
            }
        }

        if pending_sep {
            out.push('_');
            pending_sep = false;
        }
        out.extend(c.to_lowercase());
    }

    out
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '-' || c == '_'
}

/// A normalized entity name. The only way to build one is through
/// [`normalize_name`], so two keys are equal exactly when their source names
/// are equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NameKey(String);

impl NameKey {
    pub fn new(raw: &str) -> Self {
        NameKey(normalize_name(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Names made only of whitespace and separators normalize to nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
