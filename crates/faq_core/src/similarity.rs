//! Longest-common-substring similarity in the style of the classic
//! `similar_text` percentage.
//!
//! The first longest common run is located, then the text to its left and to
//! its right is matched recursively. The score is the share of characters
//! covered by those runs across both strings. The result depends on argument
//! order when several runs of equal length exist.

/// Returns `(pos_a, pos_b, len)` of the first longest common run.
///
/// Positions of `a` are scanned in the outer loop and positions of `b` in the
/// inner loop; a later run only wins when it is strictly longer.
fn longest_common_run(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);

    for i in 0..a.len() {
        for j in 0..b.len() {
            let len = a[i..]
                .iter()
                .zip(&b[j..])
                .take_while(|(x, y)| x == y)
                .count();
            if len > best.2 {
                best = (i, j, len);
            }
        }
    }

    best
}

/// Number of characters shared by `a` and `b` under the recursive
/// longest-common-run decomposition.
pub fn similar_chars(a: &[char], b: &[char]) -> usize {
    let (pos_a, pos_b, len) = longest_common_run(a, b);
    if len == 0 {
        return 0;
    }

    let mut sum = len;
    if pos_a > 0 && pos_b > 0 {
        sum += similar_chars(&a[..pos_a], &b[..pos_b]);
    }
    if pos_a + len < a.len() && pos_b + len < b.len() {
        sum += similar_chars(&a[pos_a + len..], &b[pos_b + len..]);
    }
    sum
}

/// Similarity percentage in `[0, 100]`. Two empty strings score 0.
///
/// No normalization is applied here; callers fold case and trim first.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }

    let matched = similar_chars(&a, &b);
    (matched * 2) as f64 * 100.0 / total as f64
}

/// `round(score / 100, 2)`.
pub fn confidence_from_score(score: f64) -> f64 {
    score.round() / 100.0
}
