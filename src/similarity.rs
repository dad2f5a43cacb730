//! Fuzzy string similarity for matching predicted entities against gold.
//!
//! The score is the classic Levenshtein *ratio* on a 0-100 scale, where a
//! substitution costs two edits (one deletion plus one insertion). With
//! that weighting the edit distance reduces to `len_a + len_b - 2·LCS`, so
//!
//! ```text
//! ratio = 100 · (len_a + len_b - indel_distance) / (len_a + len_b)
//!       = 100 · 2·LCS / (len_a + len_b)
//! ```
//!
//! Lengths count Unicode scalar values, and comparison is case-sensitive.

/// Length of the longest common subsequence of two char slices.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    // Keep the inner row on the shorter string.
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for &lc in long {
        for (j, &sc) in short.iter().enumerate() {
            curr[j + 1] = if lc == sc {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[short.len()]
}

/// Insertion/deletion edit distance between two strings.
///
/// ```
/// use paperlens::similarity::indel_distance;
///
/// assert_eq!(indel_distance("kitten", "sitting"), 5);
/// assert_eq!(indel_distance("", "abc"), 3);
/// ```
#[must_use]
pub fn indel_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    a.len() + b.len() - 2 * lcs_len(&a, &b)
}

/// Normalized indel similarity in [0.0, 1.0].
///
/// Two empty strings are identical (1.0); one empty string scores 0.0.
#[must_use]
pub fn indel_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    (2 * lcs_len(&a, &b)) as f64 / total as f64
}

/// Fuzzy match ratio on a 0-100 scale.
///
/// Identical strings score 100; otherwise an empty side scores 0. The
/// fractional ratio is rounded half-to-even.
///
/// # Examples
///
/// ```
/// use paperlens::similarity::fuzz_ratio;
///
/// assert_eq!(fuzz_ratio("MIT", "MIT"), 100);
/// assert_eq!(fuzz_ratio("Alice_Smith", "Alice_Smyth"), 91);
/// assert_eq!(fuzz_ratio("NSF", ""), 0);
/// assert!(fuzz_ratio("Alice", "Microsoft") < 70);
/// ```
#[must_use]
pub fn fuzz_ratio(a: &str, b: &str) -> u8 {
    let ratio = indel_similarity(a, b) * 100.0;
    // ratio is within [0, 100] so the cast cannot truncate
    ratio.round_ties_even() as u8
}
