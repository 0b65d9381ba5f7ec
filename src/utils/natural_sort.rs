use std::cmp::Ordering;

/**
 * Natural-order comparison used for chromosome names and output rows.
 *
 * Walks both strings in lockstep: whitespace on both sides is skipped together,
 * alphabetic or punctuation pairs compare case-insensitively, and as soon as a
 * position falls outside those classes the next digit run on each side is parsed
 * and compared numerically. When either side has no digits left, the remainders
 * compare bytewise. A string that is a prefix of the other compares equal, which
 * keeps the ordering consistent with the tab-terminated row fields it sorts.
 */
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let s1 = a.as_bytes();
    let s2 = b.as_bytes();
    let mut i = 0;
    let mut j = 0;
    while i < s1.len() && j < s2.len() {
        let c1 = s1[i];
        let c2 = s2[j];
        if c1.is_ascii_whitespace() && c2.is_ascii_whitespace() {
            i += 1;
            j += 1;
        } else if (c1.is_ascii_alphabetic() && c2.is_ascii_alphabetic())
            || (c1.is_ascii_punctuation() && c2.is_ascii_punctuation())
        {
            match c1.to_ascii_lowercase().cmp(&c2.to_ascii_lowercase()) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                other => return other,
            }
        } else {
            match (next_number(&s1[i..]), next_number(&s2[j..])) {
                (Some((v1, adv1)), Some((v2, adv2))) => match v1.cmp(&v2) {
                    Ordering::Equal => {
                        i += adv1;
                        j += adv2;
                    }
                    other => return other,
                },
                _ => return s1[i..].cmp(&s2[j..]),
            }
        }
    }
    Ordering::Equal
}

/// Finds the next digit run, returning its value and the bytes consumed up to
/// and including the run.
fn next_number(s: &[u8]) -> Option<(u64, usize)> {
    let start = s.iter().position(|c| c.is_ascii_digit())?;
    let mut end = start;
    let mut value: u64 = 0;
    while end < s.len() && s[end].is_ascii_digit() {
        value = value
            .saturating_mul(10)
            .saturating_add(u64::from(s[end] - b'0'));
        end += 1;
    }
    Some((value, end))
}
