use crate::utils::base_utils::BaseUtils;
use crate::utils::math_utils::MathUtils;
use crate::utils::math_utils::{LOG_LENGTH_FACTOR, LOG_THREE};

/// Base-10 log error rate htslib reports for a missing quality byte (0xFF).
const MISSING_QUAL: f64 = 255.0 / -10.0;

/**
 * Converts stored base-10 log error rates into per-base natural-log match and
 * mismatch scores: ln(1 - err) and ln(err / 3). A stored zero (error rate 1)
 * is replaced by -0.01 before conversion. When `missing_emissions` carries the
 * constant (match, mismatch) Phred-scale scores, bases whose quality byte was
 * absent use those instead of the per-base value.
 */
pub fn match_probabilities(
    qual: &[f64],
    missing_emissions: Option<(i32, i32)>,
) -> (Vec<f64>, Vec<f64>) {
    let mut is_match = Vec::with_capacity(qual.len());
    let mut no_match = Vec::with_capacity(qual.len());
    for &q in qual {
        if let Some((match_score, mismatch_score)) = missing_emissions {
            if q == MISSING_QUAL {
                is_match.push(f64::from(match_score) * std::f64::consts::LN_10 / -10.0);
                no_match.push(f64::from(mismatch_score) * std::f64::consts::LN_10 / -10.0);
                continue;
            }
        }
        let q = if q == 0.0 { -0.01 } else { q };
        let a = q * std::f64::consts::LN_10;
        is_match.push(MathUtils::log1mexp(a));
        no_match.push(a - *LOG_THREE);
    }
    (is_match, no_match)
}

/**
 * Builds the L x 5 position-by-base score matrix: the column of the read's own
 * base at each position holds the match score, every other column the mismatch
 * score.
 */
pub fn set_prob_matrix(qseq: &[u8], is_match: &[f64], no_match: &[f64]) -> Vec<f64> {
    let mut matrix = vec![0.0; qseq.len() * 5];
    for (b, &base) in qseq.iter().enumerate() {
        for i in 0..5 {
            matrix[5 * b + i] = no_match[b];
        }
        matrix[5 * b + BaseUtils::base_index(base)] = is_match[b];
    }
    matrix
}

/**
 * Score of the read aligned with its first base at `pos` on `seq`. The position
 * may be negative; out-of-range positions contribute nothing. Accumulation
 * stops early once the running score falls more than 10 nats below `baseline`
 * (under 1% relative contribution to the best probability mass seen so far).
 */
pub fn calc_prob(matrix: &[f64], read_length: usize, seq: &[u8], pos: i64, baseline: f64) -> f64 {
    let mut probability = 0.0;
    for b in pos..pos + read_length as i64 {
        if b < 0 {
            continue;
        }
        if b >= seq.len() as i64 {
            break;
        }
        probability += matrix[5 * (b - pos) as usize + BaseUtils::base_index(seq[b as usize])];
        if probability < baseline - 10.0 {
            break;
        }
    }
    probability
}

/**
 * Log-probability mass over alignment starts in [pos - L, pos + L), clipped to
 * the sequence. The score at the reported position seeds the baseline, which
 * then tracks the running log-sum so the inner scorer can terminate early.
 */
pub fn calc_prob_window(matrix: &[f64], read_length: usize, seq: &[u8], pos: i64) -> f64 {
    let length = read_length as i64;
    let mut baseline = calc_prob(matrix, read_length, seq, pos, -1000.0);
    let mut probability = 0.0;
    for i in (pos - length)..(pos + length) {
        if i + length < 0 {
            continue;
        }
        if i >= seq.len() as i64 {
            break;
        }
        let p = calc_prob(matrix, read_length, seq, i, baseline);
        probability = if probability == 0.0 {
            p
        } else {
            MathUtils::log_add_exp(probability, p)
        };
        if probability > baseline {
            baseline = probability;
        }
    }
    probability
}

/**
 * Log-probability that the read originated from an unobserved paralogous locus.
 * The distribution bulk is approximated by the perfect-match term plus the
 * hamming-distance-one terms, divided by a length factor alpha^(L - inferred)
 * that penalizes reads longer than their CIGAR-consumed query length.
 */
pub fn calc_prob_elsewhere(
    is_match: &[f64],
    no_match: &[f64],
    read_length: usize,
    inferred_length: i64,
) -> f64 {
    let a: f64 = is_match.iter().sum();
    let delta: Vec<f64> = no_match
        .iter()
        .zip(is_match.iter())
        .map(|(n, m)| n - m)
        .collect();
    MathUtils::log_add_exp(a, a + MathUtils::log_sum_exp(&delta))
        - *LOG_LENGTH_FACTOR * (read_length as i64 - inferred_length) as f64
}

/**
 * Affine-gap alternative to the positional window: one log-space alignment over
 * the same candidate region, global in the read with free start and end in the
 * window. Emissions come from the score matrix; gap penalties arrive as
 * Phred-scaled integers and convert via x * ln 10 / -10.
 */
pub fn calc_prob_dp(
    matrix: &[f64],
    read_length: usize,
    seq: &[u8],
    pos: i64,
    gap_op: i32,
    gap_ex: i32,
) -> f64 {
    let length = read_length as i64;
    let start = (pos - length).max(0);
    let end = (pos + 2 * length).min(seq.len() as i64);
    if start >= end {
        return 0.0;
    }
    let window = &seq[start as usize..end as usize];
    let cols = window.len();
    let gap_open = f64::from(gap_op) * std::f64::consts::LN_10 / -10.0;
    let gap_extend = f64::from(gap_ex) * std::f64::consts::LN_10 / -10.0;

    // Three-state recurrence with rolling rows: m consumes read and window,
    // x consumes read only (insertion), y consumes window only (deletion).
    let mut m_prev = vec![f64::NEG_INFINITY; cols];
    let mut x_prev = vec![f64::NEG_INFINITY; cols];
    let mut y_prev = vec![f64::NEG_INFINITY; cols];
    let mut m_curr = vec![f64::NEG_INFINITY; cols];
    let mut x_curr = vec![f64::NEG_INFINITY; cols];
    let mut y_curr = vec![f64::NEG_INFINITY; cols];

    for i in 0..read_length {
        for j in 0..cols {
            let emission = matrix[5 * i + BaseUtils::base_index(window[j])];
            let diag = if i == 0 {
                0.0
            } else if j == 0 {
                f64::NEG_INFINITY
            } else {
                m_prev[j - 1].max(x_prev[j - 1]).max(y_prev[j - 1])
            };
            m_curr[j] = emission + diag;
            x_curr[j] = if i == 0 {
                gap_open
            } else {
                (m_prev[j] + gap_open).max(x_prev[j] + gap_extend)
            };
            y_curr[j] = if j == 0 {
                f64::NEG_INFINITY
            } else {
                (m_curr[j - 1] + gap_open).max(y_curr[j - 1] + gap_extend)
            };
        }
        std::mem::swap(&mut m_prev, &mut m_curr);
        std::mem::swap(&mut x_prev, &mut x_curr);
        std::mem::swap(&mut y_prev, &mut y_curr);
    }

    let mut best = f64::NEG_INFINITY;
    for j in 0..cols {
        let v = m_prev[j].max(x_prev[j]);
        if v > best {
            best = v;
        }
    }
    best
}

/**
 * Splits a spliced read into exon segments as (query start, query length,
 * reference start) triples, cutting at reference-skip (N) operations. A read
 * without N operations comes back as a single segment.
 */
pub fn splice_segments(cigar: &[(u32, char)], pos: i64) -> Vec<(usize, usize, i64)> {
    let mut segments = Vec::new();
    let mut qpos = 0usize;
    let mut rpos = pos;
    let mut seg_qstart = 0usize;
    let mut seg_rstart = pos;
    for &(len, op) in cigar {
        match op {
            'M' | '=' | 'X' => {
                qpos += len as usize;
                rpos += i64::from(len);
            }
            'I' | 'S' => {
                qpos += len as usize;
            }
            'D' => {
                rpos += i64::from(len);
            }
            'N' => {
                if qpos > seg_qstart {
                    segments.push((seg_qstart, qpos - seg_qstart, seg_rstart));
                }
                rpos += i64::from(len);
                seg_qstart = qpos;
                seg_rstart = rpos;
            }
            _ => {}
        }
    }
    if qpos > seg_qstart {
        segments.push((seg_qstart, qpos - seg_qstart, seg_rstart));
    }
    segments
}
