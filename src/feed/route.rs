// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use sanitize_filename::{Options, sanitize_with_options};

/// Maximum length of a route id
const MAX_ROUTE_LENGTH: usize = 100;

/// Characters that survive unchanged in a URL path segment and a directory name
fn is_route_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

/// Turn a raw feed identifier into an episode id usable as both a URL path
/// segment and a directory name.
///
/// Returns `None` when nothing usable is left (empty, or only dots).
pub fn route_id(raw: &str) -> Option<String> {
    let options = Options {
        truncate: true,
        windows: true,
        replacement: "-",
    };
    let sanitized = sanitize_with_options(raw.trim(), options);

    let mut id = String::with_capacity(sanitized.len());
    let mut last_was_separator = false;
    for c in sanitized.chars() {
        if is_route_char(c) && c != '-' {
            id.push(c);
            last_was_separator = false;
        } else if !last_was_separator {
            id.push('-');
            last_was_separator = true;
        }
    }

    let id = id.trim_matches('-');
    let id: String = id.chars().take(MAX_ROUTE_LENGTH).collect();
    let id = id.trim_end_matches('-');

    if id.is_empty() || id.chars().all(|c| c == '.') {
        None
    } else {
        Some(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ids_are_kept() {
        assert_eq!(route_id("12").as_deref(), Some("12"));
        assert_eq!(route_id("opening_remarks").as_deref(), Some("opening_remarks"));
        assert_eq!(route_id("ep-3.final").as_deref(), Some("ep-3.final"));
    }

    #[test]
    fn permalink_guids_become_single_segments() {
        let id = route_id("https://example.com/ep/1").unwrap();

        assert_eq!(id, "https-example.com-ep-1");
        assert!(!id.contains('/'));
    }

    #[test]
    fn url_unsafe_characters_are_replaced() {
        assert_eq!(route_id("a b#c?d%e\"f").as_deref(), Some("a-b-c-d-e-f"));
        assert_eq!(route_id("café").as_deref(), Some("caf"));
    }

    #[test]
    fn separators_collapse_and_trim() {
        assert_eq!(route_id("--a//b--").as_deref(), Some("a-b"));
        assert_eq!(route_id("  x  ").as_deref(), Some("x"));
    }

    #[test]
    fn unusable_ids_yield_none() {
        assert_eq!(route_id(""), None);
        assert_eq!(route_id(".."), None);
        assert_eq!(route_id("///"), None);
        assert!(!route_id("../../etc/passwd").unwrap().contains('/'));
    }

    #[test]
    fn long_ids_are_truncated() {
        let long = "x".repeat(300);
        assert_eq!(route_id(&long).unwrap().len(), MAX_ROUTE_LENGTH);
    }
}
