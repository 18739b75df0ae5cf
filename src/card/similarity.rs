//! Fuzzy name comparison.
//!
//! Uses the Ratcliff/Obershelp ratio: twice the number of characters in the
//! recursively found longest matching blocks, over the combined length.

/// Default acceptance threshold for name matches.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Case-insensitive similarity check against `threshold` (inclusive).
pub fn is_similar(a: &str, b: &str, threshold: f64) -> bool {
    similarity_ratio(&a.to_lowercase(), &b.to_lowercase()) >= threshold
}

/// Similarity in `0.0..=1.0`; two empty strings are identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

/// Sum of the sizes of all matching blocks.
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            queue.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties resolve to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // prev[j] = length of the match ending at a[i-1], b[j-1]
    let mut prev = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        let mut current = vec![0usize; bhi - blo + 1];
        for j in blo..bhi {
            if a[i] != b[j] {
                continue;
            }
            let k = prev[j - blo] + 1;
            current[j - blo + 1] = k;
            if k > best_size {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_size = k;
            }
        }
        prev = current;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary() {
        assert!(is_similar("Pikachu", "Pikuchu", 0.7));
        assert!(!is_similar("Pikachu", "Charizard", 0.7));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_similar("PIKACHU", "pikachu", 1.0));
    }

    #[test]
    fn test_ratio_values() {
        // "pik" + "chu" matched out of 14 characters
        assert!((similarity_ratio("pikachu", "pikuchu") - 12.0 / 14.0).abs() < 1e-9);
        // only "ch" in common
        assert!((similarity_ratio("pikachu", "charizard") - 4.0 / 16.0).abs() < 1e-9);
        assert_eq!(similarity_ratio("", ""), 1.0);
        assert_eq!(similarity_ratio("abc", ""), 0.0);
        assert_eq!(similarity_ratio("abcd", "abcd"), 1.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 2 * 7 / 20 = 0.7 exactly
        let ratio = similarity_ratio("abcdefghij", "abcdefgxyz");
        assert!((ratio - 0.7).abs() < 1e-9);
        assert!(is_similar("abcdefghij", "abcdefgxyz", ratio));
    }
}
