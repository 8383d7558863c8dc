//! Tenant slug generation.
//!
//! Slugs double as subdomain labels, so the output is restricted to
//! lowercase ASCII letters, digits and single hyphens.

use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 6;

/// Turn a restaurant name into a URL- and DNS-friendly slug.
///
/// Characters outside `[A-Za-z0-9_]`, whitespace and `-` are dropped, runs of
/// whitespace, `_` and `-` collapse into a single `-`, and leading or trailing
/// hyphens are trimmed.
pub fn generate_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '_' || c == '-' {
            pending_separator = true;
        }
    }

    slug
}

/// Slug with a random base-36 suffix, for names that are already taken.
pub fn generate_unique_slug(name: &str) -> String {
    let base = generate_slug(name);
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();

    if base.is_empty() {
        suffix
    } else {
        format!("{}-{}", base, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_slug() {
        assert_eq!(generate_slug("Bella Vista"), "bella-vista");
        assert_eq!(generate_slug("  Joe's  Diner!! "), "joes-diner");
        assert_eq!(generate_slug("snake_case--name"), "snake-case-name");
        assert_eq!(generate_slug("--Trim Me--"), "trim-me");
        assert_eq!(generate_slug("Café 24"), "caf-24");
        assert_eq!(generate_slug("!!!"), "");
    }

    #[test]
    fn test_generate_unique_slug() {
        let slug = generate_unique_slug("Bella Vista");
        let (base, suffix) = slug.rsplit_once('-').unwrap();
        assert_eq!(base, "bella-vista");
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| SUFFIX_ALPHABET.contains(&b)));

        assert_eq!(generate_unique_slug("???").len(), SUFFIX_LEN);
    }
}
