#[macro_use]
extern crate approx;

use eagle::reads::likelihood::{
    calc_prob, calc_prob_dp, calc_prob_elsewhere, calc_prob_window, match_probabilities,
    set_prob_matrix, splice_segments,
};
use eagle::utils::base_utils::BaseUtils;
use eagle::utils::math_utils::MathUtils;

/// Phred 40 stored as a base-10 log error rate.
const Q40: f64 = -4.0;

fn matrix_for(qseq: &[u8], qual: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let (is_match, no_match) = match_probabilities(qual, None);
    let matrix = set_prob_matrix(qseq, &is_match, &no_match);
    (matrix, is_match, no_match)
}

#[test]
fn test_match_probabilities_phred40() {
    let (is_match, no_match) = match_probabilities(&[Q40], None);
    let a = Q40 * std::f64::consts::LN_10;
    assert!(relative_eq!(is_match[0], (1.0 - a.exp()).ln(), epsilon = 1e-12));
    assert!(relative_eq!(no_match[0], a - 3.0_f64.ln(), epsilon = 1e-12));
    assert!(is_match[0] > no_match[0]);
}

#[test]
fn test_zero_quality_replaced_before_conversion() {
    let (is_match, no_match) = match_probabilities(&[0.0], None);
    let a = -0.01 * std::f64::consts::LN_10;
    assert!(is_match[0].is_finite());
    assert!(relative_eq!(no_match[0], a - 3.0_f64.ln(), epsilon = 1e-12));
}

#[test]
fn test_prob_matrix_layout() {
    let qseq = b"ACGT";
    let (matrix, is_match, no_match) = matrix_for(qseq, &[Q40; 4]);
    assert_eq!(matrix.len(), 20);
    for (b, &base) in qseq.iter().enumerate() {
        for col in 0..5 {
            let expected = if col == BaseUtils::base_index(base) {
                is_match[b]
            } else {
                no_match[b]
            };
            assert_eq!(matrix[5 * b + col], expected);
        }
    }
}

#[test]
fn test_ambiguous_bases_use_the_n_column() {
    let (matrix, is_match, _) = matrix_for(b"RN", &[Q40; 2]);
    // Both map onto column 4, so the two bases share their match slot.
    assert_eq!(matrix[4], is_match[0]);
    assert_eq!(matrix[9], is_match[1]);
}

#[test]
fn test_calc_prob_perfect_alignment() {
    let seq = b"ACGTACGT";
    let (matrix, is_match, _) = matrix_for(seq, &[Q40; 8]);
    let expected: f64 = is_match.iter().sum();
    assert!(relative_eq!(
        calc_prob(&matrix, 8, seq, 0, -1000.0),
        expected,
        epsilon = 1e-12
    ));
}

#[test]
fn test_calc_prob_counts_mismatches() {
    let seq = b"ACGTACGT";
    let read = b"ACGAACGT";
    let (matrix, is_match, no_match) = matrix_for(read, &[Q40; 8]);
    let expected: f64 = is_match.iter().sum::<f64>() - is_match[3] + no_match[3];
    assert!(relative_eq!(
        calc_prob(&matrix, 8, seq, 0, -1000.0),
        expected,
        epsilon = 1e-12
    ));
}

#[test]
fn test_calc_prob_skips_out_of_range_positions() {
    let seq = b"ACGTACGT";
    let (matrix, is_match, _) = matrix_for(seq, &[Q40; 8]);
    // Two bases hang off the left edge; the overlapping suffix of the read
    // (GTACGT...) mismatches, so only verify the sum is finite and bounded by
    // the in-range positions.
    let shifted = calc_prob(&matrix, 8, seq, -2, -1000.0);
    assert!(shifted.is_finite());
    assert!(shifted < is_match.iter().sum::<f64>());
}

#[test]
fn test_window_mass_contains_the_reported_position() {
    let seq = b"AAAACGTACGTAAAA";
    let read = b"CGTACGT";
    let (matrix, _, _) = matrix_for(read, &[Q40; 7]);
    let at_pos = calc_prob(&matrix, 7, seq, 4, -1000.0);
    let windowed = calc_prob_window(&matrix, 7, seq, 4);
    assert!(windowed >= at_pos);
    // The summed mass stays within a factor of 2L of the best position.
    assert!(windowed <= at_pos + (14.0_f64).ln() + 1.0);
}

#[test]
fn test_window_finds_true_position_despite_reported_shift() {
    let seq = b"AAAACGTACGTAAAA";
    let read = b"CGTACGT";
    let (matrix, is_match, _) = matrix_for(read, &[Q40; 7]);
    // Reported two bases away from the true start at 4; the window still
    // captures nearly all of the perfect-match mass.
    let windowed = calc_prob_window(&matrix, 7, seq, 6);
    assert!(windowed > is_match.iter().sum::<f64>() - 1.0);
}

#[test]
fn test_elsewhere_probability() {
    let (is_match, no_match) = match_probabilities(&[Q40; 8], None);
    let a: f64 = is_match.iter().sum();
    let elsewhere = calc_prob_elsewhere(&is_match, &no_match, 8, 8);
    // Perfect-match bulk plus a small hamming-1 correction.
    assert!(elsewhere > a);
    assert!(elsewhere < a + 0.01);

    // A read longer than its CIGAR-consumed length pays the length factor.
    let clipped = calc_prob_elsewhere(&is_match, &no_match, 8, 6);
    assert!(relative_eq!(
        elsewhere - clipped,
        2.0 * 1.3_f64.ln(),
        epsilon = 1e-12
    ));
}

#[test]
fn test_elsewhere_mixture_vanishes_at_zero_omega() {
    // With omega = 0 the mixture weight is -inf and the locus probability
    // passes through unchanged, however often the mixture is applied.
    let pout = -3.0;
    let prgu = -7.5;
    let lgomega = f64::NEG_INFINITY;
    let once = MathUtils::log_add_exp(lgomega + pout, prgu);
    assert_eq!(once, prgu);
    let twice = MathUtils::log_add_exp(lgomega + pout, once);
    assert_eq!(twice, prgu);
}

#[test]
fn test_dp_matches_windowed_model_on_perfect_reads() {
    let seq = b"AAAACGTACGTAAAA";
    let read = b"ACGTACGT";
    let (matrix, is_match, _) = matrix_for(read, &[Q40; 8]);
    let expected: f64 = is_match.iter().sum();
    let dp = calc_prob_dp(&matrix, 8, seq, 3, 6, 1);
    assert!(relative_eq!(dp, expected, epsilon = 1e-9));
}

#[test]
fn test_dp_pays_one_gap_for_a_deletion() {
    let seq = b"AAAACGTACGTAAAA";
    // The read skips the A at reference offset 7: ACGT + CGT.
    let read = b"ACGTCGT";
    let (matrix, is_match, _) = matrix_for(read, &[Q40; 7]);
    let gap_open = 6.0 * std::f64::consts::LN_10 / -10.0;
    let expected: f64 = is_match.iter().sum::<f64>() + gap_open;
    let dp = calc_prob_dp(&matrix, 7, seq, 3, 6, 1);
    assert!(relative_eq!(dp, expected, epsilon = 1e-9));
    // The gapped alignment scores far better than any ungapped placement.
    let windowed = calc_prob_window(&matrix, 7, seq, 3);
    assert!(dp > windowed);
}

#[test]
fn test_splice_segments_cut_at_reference_skips() {
    let cigar = vec![(4, 'M'), (10, 'N'), (4, 'M')];
    assert_eq!(splice_segments(&cigar, 100), vec![(0, 4, 100), (4, 4, 114)]);
}

#[test]
fn test_splice_segments_whole_read_without_skips() {
    let cigar = vec![(8, 'M')];
    assert_eq!(splice_segments(&cigar, 42), vec![(0, 8, 42)]);
}

#[test]
fn test_splice_segments_with_soft_clips_and_indels() {
    let cigar = vec![(2, 'S'), (3, 'M'), (5, 'N'), (1, 'I'), (3, 'M')];
    // Soft clip and insertion consume query only; the skip moves the anchor.
    assert_eq!(splice_segments(&cigar, 50), vec![(0, 5, 50), (5, 4, 58)]);
}
