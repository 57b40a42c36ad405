use crate::error::{Result, SnippetError};

/// Minimum similarity ratio for a stored name to be offered as a suggestion.
pub const SUGGESTION_CUTOFF: f64 = 0.6;

/// Replace every hyphen with an underscore.
pub fn underscored(name: &str) -> String {
    name.replace('-', "_")
}

/// Reject snippet names that cannot be used as CTE aliases.
pub fn validate_snippet_name(name: &str) -> Result<()> {
    if name.contains('-') {
        return Err(SnippetError::InvalidIdentifier {
            identifier: name.to_string(),
            message: format!(
                "Using hyphens (-) in snippet name \"{name}\" isn't allowed. Please use \"{}\" instead",
                underscored(name)
            ),
        });
    }
    Ok(())
}

/// Reject a declared dependency list if any entry contains a hyphen.
///
/// The message proposes the whole list with hyphens replaced.
pub fn validate_dependency_names(with: &[String]) -> Result<()> {
    let offending: Vec<&str> = with
        .iter()
        .map(String::as_str)
        .filter(|name| name.contains('-'))
        .collect();
    if offending.is_empty() {
        return Ok(());
    }

    let corrected = with
        .iter()
        .map(|name| format!("\"{}\"", underscored(name)))
        .collect::<Vec<_>>()
        .join(", ");
    Err(SnippetError::InvalidIdentifier {
        identifier: offending.join(", "),
        message: format!(
            "Using hyphens (-) in the with argument isn't allowed. Please use {corrected} instead"
        ),
    })
}

/// Build the error for a lookup of `name` that is not among `known`.
pub(crate) fn unknown_identifier<'a>(
    name: &str,
    known: impl Iterator<Item = &'a str> + Clone,
) -> SnippetError {
    let hint = match closest_match(name, known.clone()) {
        Some(candidate) => format!("Did you mean \"{candidate}\"?"),
        None => {
            let valid = known
                .map(|key| format!("\"{key}\""))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Valid identifiers are {valid}.")
        }
    };
    SnippetError::UnknownIdentifier {
        name: name.to_string(),
        hint,
    }
}

/// The candidate most similar to `word`, if any reaches [`SUGGESTION_CUTOFF`].
///
/// Equal scores resolve to the lexicographically greatest candidate.
pub fn closest_match<'a>(
    word: &str,
    candidates: impl Iterator<Item = &'a str>,
) -> Option<&'a str> {
    let word: Vec<char> = word.chars().collect();
    let mut best: Option<(f64, &'a str)> = None;

    for candidate in candidates {
        let chars: Vec<char> = candidate.chars().collect();
        let score = similarity_ratio(&chars, &word);
        if score < SUGGESTION_CUTOFF {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_score, best_name)) => {
                score > best_score || (score == best_score && candidate > best_name)
            }
        };
        if better {
            best = Some((score, candidate));
        }
    }

    best.map(|(_, name)| name)
}

/// Ratcliff/Obershelp similarity: `2 * matched / (len(a) + len(b))`.
pub fn similarity_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_chars(a, b) as f64 / total as f64
}

/// Characters covered by the matching blocks of `a` and `b`: the longest
/// common substring, then recursively the same on each side of it.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common substring of `a[alo..ahi]` and `b[blo..bhi]`, preferring
/// the earliest start in `a`, then in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run[j - blo + 1] = length of the match ending at a[i - 1], b[j]
    let mut previous = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        let mut current = vec![0usize; bhi - blo + 1];
        for j in blo..bhi {
            if a[i] != b[j] {
                continue;
            }
            let k = previous[j - blo] + 1;
            current[j - blo + 1] = k;
            if k > best_size {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_size = k;
            }
        }
        previous = current;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        similarity_ratio(&a, &b)
    }

    #[test]
    fn similarity_ratio_matches_known_values() {
        assert!((ratio("foobar", "foo") - 2.0 * 3.0 / 9.0).abs() < 1e-9);
        assert!((ratio("abcd", "bcde") - 0.75).abs() < 1e-9);
        assert_eq!(ratio("same", "same"), 1.0);
        assert_eq!(ratio("abc", "xyz"), 0.0);
        assert_eq!(ratio("", ""), 1.0);
    }

    #[test]
    fn closest_match_prefers_highest_score() {
        let keys = ["writers", "writers_fav", "books"];
        assert_eq!(
            closest_match("writer", keys.iter().copied()),
            Some("writers")
        );
        assert_eq!(closest_match("zzz", keys.iter().copied()), None);
    }

    #[test]
    fn closest_match_breaks_ties_towards_greatest_name() {
        let keys = ["ab", "ac"];
        assert_eq!(closest_match("a", keys.iter().copied()), Some("ac"));
    }

    #[test]
    fn hyphenated_snippet_name_suggests_underscores() {
        let err = validate_snippet_name("my-query").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Using hyphens (-) in snippet name \"my-query\" isn't allowed. Please use \"my_query\" instead"
        );
        assert!(validate_snippet_name("my_query").is_ok());
    }

    #[test]
    fn hyphenated_dependency_lists_whole_corrected_list() {
        let with = vec!["first-one".to_string(), "second".to_string()];
        let err = validate_dependency_names(&with).unwrap_err();
        match &err {
            SnippetError::InvalidIdentifier { identifier, .. } => {
                assert_eq!(identifier, "first-one");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "Using hyphens (-) in the with argument isn't allowed. Please use \"first_one\", \"second\" instead"
        );
    }

    #[test]
    fn unknown_identifier_lists_valid_keys_without_close_match() {
        let keys = ["a", "b"];
        let err = unknown_identifier("zzz", keys.iter().copied());
        assert_eq!(
            err.to_string(),
            "\"zzz\" is not a valid snippet identifier. Valid identifiers are \"a\", \"b\"."
        );
    }
}
