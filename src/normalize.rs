//! Input canonicalization shared by every matcher.

/// Trim, lowercase and collapse internal whitespace runs to a single space.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase slug used for synthetic identifiers (`"Couch to 5K"` -> `"couch-to-5k"`).
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Vitamin D  "), "vitamin d");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("couch \t to\n\n5K"), "couch to 5k");
    }

    #[test]
    fn test_normalize_blank_is_empty() {
        assert_eq!(normalize("   \t\n"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Couch to 5K"), "couch-to-5k");
        assert_eq!(slugify("  Omega-3 (fish oil) "), "omega-3-fish-oil");
        assert_eq!(slugify("---"), "");
    }
}
