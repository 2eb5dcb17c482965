//! Ingredient name normalization for duplicate detection and matching.

/// Tokens that link two significant words: when one of these precedes a
/// token, that token is kept. The particles themselves are never emitted
/// past the first position. Tokens are compared after lowercasing and
/// singularization, so "des" matches as "de".
const LINKING_PARTICLES: &[&str] = &[
    "of", "the", "for", "a", "an", "and", "with", "in", "on", "to", "de", "du", "d", "la", "le",
    "l", "au", "aux", "et",
];

/// Qualifier nouns that carry meaning on their own and make the following
/// word significant ("sauce tomate", "wine vinegar"). Listed in their
/// post-singularization form.
const QUALIFIER_NOUNS: &[&str] = &[
    "sauce", "wine", "vin", "cream", "creme", "oil", "huile", "vinegar", "vinaigre", "paste",
    "powder", "syrup", "stock", "broth", "butter", "beurre",
];

/// Reduce a free-text ingredient display name to its canonical matching key.
///
/// Steps: trim trailing whitespace, split on spaces and apostrophes,
/// lowercase each token and strip one trailing "s", then keep the first
/// token unconditionally and each later token whose predecessor is a linking
/// particle or qualifier noun. Linking particles are suppressed from the
/// output in non-initial position.
///
/// "Sauce de Tomates" and "Tomates" thus reduce to "sauce tomate" and
/// "tomate", so minor phrasing differences between a recipe ingredient and a
/// pantry entry still match.
///
/// An input that is empty after trimming yields an empty key, which never
/// meaningfully matches anything. The singularization is a naive heuristic
/// with no locale awareness; that is a documented approximation. The
/// function is deterministic but not idempotent: re-normalizing an already
/// normalized key can over-truncate.
pub fn normalize(raw: &str) -> String {
    let mut kept: Vec<String> = Vec::new();
    let mut previous: Option<String> = None;

    for token in raw.trim_end().split([' ', '\'']) {
        if token.is_empty() {
            continue;
        }

        let token = singularize(&token.to_lowercase());
        if token.is_empty() {
            continue;
        }

        let significant = match &previous {
            None => true,
            Some(prev) => {
                LINKING_PARTICLES.contains(&prev.as_str())
                    || QUALIFIER_NOUNS.contains(&prev.as_str())
            }
        };

        // Particles only arm the keep-next rule once a word has been kept.
        let suppressed = !kept.is_empty() && LINKING_PARTICLES.contains(&token.as_str());
        if significant && !suppressed {
            kept.push(token.clone());
        }

        previous = Some(token);
    }

    kept.join(" ")
}

/// Strip one trailing "s". Naive on purpose.
fn singularize(token: &str) -> String {
    match token.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_trailing_plural() {
        assert_eq!(normalize("Tomates"), "tomate");
        assert_eq!(normalize("onions"), "onion");
    }

    #[test]
    fn test_normalize_keeps_token_after_particle() {
        // "sauce" is kept as the first token, "de" arms the keep-next rule
        // without being emitted, "tomates" is kept and singularized.
        assert_eq!(normalize("Sauce de Tomates"), "sauce tomate");
        assert_eq!(normalize("cream of mushrooms"), "cream mushroom");
    }

    #[test]
    fn test_normalize_drops_unlinked_trailing_words() {
        // "pepper" follows a word that is neither particle nor qualifier.
        assert_eq!(normalize("green peppers"), "green");
    }

    #[test]
    fn test_normalize_splits_on_apostrophe() {
        assert_eq!(normalize("huile d'olive"), "huile olive");
    }

    #[test]
    fn test_normalize_qualifier_keeps_next_word() {
        assert_eq!(normalize("wine vinegar"), "wine vinegar");
    }

    #[test]
    fn test_normalize_empty_and_whitespace() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("Tomates   "), "tomate");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let first = normalize("Sauce de Tomates Fraiches");
        let second = normalize("Sauce de Tomates Fraiches");
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_single_letter_s_survives() {
        assert_eq!(normalize("s"), "s");
    }
}
