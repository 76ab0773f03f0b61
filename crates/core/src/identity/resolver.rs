//! Pure string normalization and identity matching.
//!
//! The ledger uses these helpers to deduplicate assets, categories and
//! platforms during manual entry and CSV import. Matching is always done
//! on the normalized form; stored entities keep their raw names.

/// Separator between the name and context parts of an identity key.
/// Internal whitespace is collapsed by `normalize`, so the separator can
/// never be produced by user input.
const IDENTITY_SEPARATOR: char = '|';

/// Normalizes a free-text identity field: trims, collapses every internal
/// run of whitespace to a single space, and lowercases.
pub fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Builds the normalized identity key for a (name, context) pair.
///
/// The context is the platform-equivalent field for assets; categories
/// and platforms pass an empty context and are matched on name alone.
pub fn identity(name: &str, context: &str) -> String {
    format!(
        "{}{}{}",
        normalize(name),
        IDENTITY_SEPARATOR,
        normalize(context)
    )
}

/// Finds the existing entity whose identity equals the candidate's, or
/// returns `None` so the caller may create a new entity from the raw
/// (un-normalized) candidate values.
pub fn resolve<'a, T, F>(
    candidate_name: &str,
    candidate_context: &str,
    existing: impl IntoIterator<Item = &'a T>,
    identity_of: F,
) -> Option<&'a T>
where
    T: 'a,
    F: Fn(&T) -> String,
{
    let wanted = identity(candidate_name, candidate_context);
    existing.into_iter().find(|entity| identity_of(entity) == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_collapses_and_lowercases() {
        assert_eq!(normalize("  Apple   Inc "), "apple inc");
        assert_eq!(normalize("AAPL"), "aapl");
        assert_eq!(normalize("\tVanguard \n S&P 500 "), "vanguard s&p 500");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["  Apple   Inc ", "BTC ", "  mixed CASE  input "] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_identity_is_case_and_whitespace_insensitive() {
        assert_eq!(
            identity("AAPL", "Schwab"),
            identity(" aapl  ", "  SCHWAB ")
        );
    }

    #[test]
    fn test_identity_distinguishes_contexts() {
        assert_ne!(identity("AAPL", "Schwab"), identity("AAPL", "Fidelity"));
        assert_ne!(identity("AAPL", ""), identity("AAPL", "Schwab"));
    }

    #[test]
    fn test_resolve_matches_normalized_candidates() {
        let existing = vec![
            ("Apple Inc", "Schwab"),
            ("Bitcoin", ""),
        ];
        let found = resolve(" apple   inc ", " SCHWAB", &existing, |(name, ctx)| {
            identity(name, ctx)
        });
        assert_eq!(found, Some(&("Apple Inc", "Schwab")));

        let missing = resolve("Apple Inc", "Fidelity", &existing, |(name, ctx)| {
            identity(name, ctx)
        });
        assert!(missing.is_none());
    }
}
