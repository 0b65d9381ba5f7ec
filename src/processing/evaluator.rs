use std::sync::Arc;

use rust_htslib::bam::{self, Read};

use crate::cli::EagleParameters;
use crate::model::combinations::power_set;
use crate::model::haplotype::construct_altseq;
use crate::model::variant::Variant;
use crate::reads::aligned_read::{parse_xa, AlignedRead};
use crate::reads::likelihood::{
    calc_prob_dp, calc_prob_elsewhere, calc_prob_window, match_probabilities, set_prob_matrix,
    splice_segments,
};
use crate::reference::reference_cache::ReferenceCache;
use crate::utils::base_utils::BaseUtils;
use crate::utils::errors::EagleError;
use crate::utils::math_utils::MathUtils;
use crate::utils::math_utils::{
    INV_LN_10, LOG_NINE_TENTHS, LOG_ONE_HALF, LOG_ONE_TENTH,
};

/// Secondary alignments on the primary chromosome within this many bases of the
/// variant set are rescored against the alternative sequence.
const NEARBY_XA_LIMIT: i64 = 50;

/**
 * Fetches the reads overlapping a region, given in 0-based half-open
 * coordinates. A chromosome absent from the BAM header, or a degenerate region,
 * yields an empty vector rather than an error.
 */
fn fetch_reads(
    params: &EagleParameters,
    chr: &str,
    start: i64,
    end: i64,
) -> Result<Vec<AlignedRead>, EagleError> {
    let mut reader = bam::IndexedReader::from_path(&params.bam)
        .map_err(|err| EagleError::FileOpen(format!("BAM file {}: {}", params.bam, err)))?;
    let tid = match reader.header().tid(chr.as_bytes()) {
        Some(tid) => tid as i32,
        None => return Ok(Vec::new()),
    };
    if reader.fetch((tid, start.max(0), end.max(0))).is_err() {
        return Ok(Vec::new());
    }

    let mut reads = Vec::new();
    let mut record = bam::Record::new();
    while let Some(result) = reader.read(&mut record) {
        result?;
        reads.push(AlignedRead::from_record(&record, chr, params.isc));
    }
    Ok(reads)
}

/// Positional-window or affine-gap score of a read matrix against a sequence.
fn score_sequence(
    matrix: &[f64],
    read_length: usize,
    seq: &[u8],
    pos: i64,
    params: &EagleParameters,
) -> f64 {
    if params.dp {
        calc_prob_dp(matrix, read_length, seq, pos, params.gap_op, params.gap_ex)
    } else {
        calc_prob_window(matrix, read_length, seq, pos)
    }
}

/// Primary-alignment score: spliced reads sum their exon segments, each scored
/// at its own (window-translated) genomic anchor.
fn score_primary(
    matrix: &[f64],
    read_length: usize,
    seq: &[u8],
    pos: i64,
    segments: &[(usize, usize, i64)],
    seq_offset: i64,
    params: &EagleParameters,
) -> f64 {
    if segments.len() > 1 {
        segments
            .iter()
            .map(|&(qstart, qlen, rstart)| {
                score_sequence(
                    &matrix[5 * qstart..5 * (qstart + qlen)],
                    qlen,
                    seq,
                    rstart - seq_offset,
                    params,
                )
            })
            .sum()
    } else {
        score_sequence(matrix, read_length, seq, pos, params)
    }
}

fn write_variant_row(
    output: &mut String,
    var_set: &[Arc<Variant>],
    i: usize,
    read_count: u32,
    has_alt_count: u32,
    total: f64,
    has_alt: f64,
    not_alt: f64,
) {
    let prob = (has_alt - total) * *INV_LN_10;
    let odds = (has_alt - not_alt) * *INV_LN_10;
    let v = &var_set[i];
    output.push_str(&format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.6}\t",
        v.chr,
        v.pos,
        v.ref_allele,
        v.alt_allele,
        read_count,
        has_alt_count,
        MathUtils::format_exp(prob),
        odds
    ));
    output.push('[');
    if var_set.len() > 1 {
        for v in var_set {
            output.push_str(&format!("{},{},{};", v.pos, v.ref_allele, v.alt_allele));
        }
    }
    output.push_str("]\n");
}

fn trace_variant_list(combo: &[Arc<Variant>]) -> String {
    let mut list = String::new();
    for v in combo {
        list.push_str(&format!("{},{},{},{};", v.chr, v.pos, v.ref_allele, v.alt_allele));
    }
    list
}

/**
 * Evaluates one variant set: fetches the overlapping reads, enumerates the
 * bounded power set of combinations, accumulates the reference, alternative and
 * heterozygous hypotheses per combination, then marginalizes per variant into
 * one output row each. Returns None when no reads overlap the region.
 */
pub fn evaluate_variant_set(
    var_set: &[Arc<Variant>],
    params: &EagleParameters,
    refseqs: &ReferenceCache,
) -> Result<Option<String>, EagleError> {
    let nvariants = var_set.len();
    let chr = &var_set[0].chr;
    let first_pos = var_set[0].pos;
    let last_pos = var_set[nvariants - 1].pos;

    // The samtools region chr:first-1-last-1 in half-open coordinates.
    let reads = fetch_reads(params, chr, first_pos - 2, last_pos - 1)?;
    if reads.is_empty() {
        return Ok(None);
    }
    let nreads = reads.len();

    let combos = power_set(nvariants, params.maxh);
    let ncombos = combos.len();
    let var_combos: Vec<Vec<Arc<Variant>>> = combos
        .iter()
        .map(|combo| combo.iter().map(|&i| Arc::clone(&var_set[i])).collect())
        .collect();

    let fasta = refseqs.fetch(chr)?;
    let (seq_offset, refseq): (i64, &[u8]) = if params.window > 0 {
        let start = (first_pos - 1 - params.window).max(0);
        let end = (last_pos - 1 + params.window)
            .min(fasta.seq.len() as i64)
            .max(start);
        (start, &fasta.seq[start as usize..end as usize])
    } else {
        (0, &fasta.seq[..])
    };

    let (alt_prior, het_prior) = if nvariants == 1 || params.mvh {
        (
            (0.5 * (1.0 - params.hetbias)).ln(),
            (0.5 * params.hetbias).ln(),
        )
    } else {
        (
            (0.5 * (1.0 - params.hetbias) / ncombos as f64).ln(),
            (0.5 * params.hetbias / ncombos as f64).ln(),
        )
    };
    let lgomega = params.omega.ln() - (1.0 - params.omega).ln();
    let missing_emissions = params
        .dp
        .then(|| (params.match_score, params.mismatch_score));

    let mut ref_sum = 0.0;
    let mut alt = vec![0.0; ncombos];
    let mut het = vec![0.0; ncombos];
    let mut ref_count = vec![0u32; ncombos];
    let mut alt_count = vec![0u32; ncombos];
    let mut pout = vec![0.0; nreads];
    let mut prgu = vec![0.0; nreads];

    for (seti, combo) in var_combos.iter().enumerate() {
        let altseq = construct_altseq(refseq, combo, seq_offset);

        for (readi, read) in reads.iter().enumerate() {
            if read.is_unmapped {
                continue;
            }
            if params.pao && read.is_secondary {
                continue;
            }
            if params.nodup && read.is_duplicate {
                continue;
            }
            // Records without a stored sequence cannot be scored.
            if read.length() == 0 {
                continue;
            }

            let read_length = read.length();
            let (is_match, no_match) = match_probabilities(&read.qual, missing_emissions);
            let matrix = set_prob_matrix(&read.qseq, &is_match, &no_match);
            let segments = if params.splice {
                splice_segments(&read.cigar, read.pos)
            } else {
                Vec::new()
            };

            // The reference and elsewhere probabilities only depend on the read,
            // so the first combination computes them for the whole pass.
            let mut elsewhere = 0.0;
            if seti == 0 {
                elsewhere =
                    calc_prob_elsewhere(&is_match, &no_match, read_length, read.inferred_length);
                pout[readi] = elsewhere;
                prgu[readi] = score_primary(
                    &matrix,
                    read_length,
                    refseq,
                    read.pos - seq_offset,
                    &segments,
                    seq_offset,
                    params,
                );
            }
            let mut prgv = score_primary(
                &matrix,
                read_length,
                &altseq,
                read.pos - seq_offset,
                &segments,
                seq_offset,
                params,
            );

            // Multi-mapped alignments from the XA tag. Each additional hit
            // log-adds another elsewhere term, scaling the outside-paralog mass
            // with the number of reported locations.
            if !params.pao {
                if let Some(ref tag) = read.multimap {
                    for xa in parse_xa(tag) {
                        let xa_fasta = refseqs.fetch(&xa.chr)?;
                        let opposite = (xa.signed_pos < 0 && !read.is_reverse)
                            || (xa.signed_pos > 0 && read.is_reverse);
                        let xa_matrix;
                        let matrix_for_site: &[f64] = if opposite {
                            let rev_qseq = BaseUtils::reverse_complement(&read.qseq);
                            let rev_is_match: Vec<f64> =
                                is_match.iter().rev().cloned().collect();
                            let rev_no_match: Vec<f64> =
                                no_match.iter().rev().cloned().collect();
                            xa_matrix = set_prob_matrix(&rev_qseq, &rev_is_match, &rev_no_match);
                            &xa_matrix
                        } else {
                            &matrix
                        };

                        let xa_pos = xa.signed_pos.abs() - 1;
                        let mut readprobability = score_sequence(
                            matrix_for_site,
                            read_length,
                            &xa_fasta.seq,
                            xa_pos,
                            params,
                        );
                        if seti == 0 {
                            pout[readi] = MathUtils::log_add_exp(pout[readi], elsewhere);
                            prgu[readi] = MathUtils::log_add_exp(prgu[readi], readprobability);
                        }
                        if xa.chr == read.chr && (xa_pos - combo[0].pos).abs() < NEARBY_XA_LIMIT {
                            readprobability = score_sequence(
                                matrix_for_site,
                                read_length,
                                &altseq,
                                xa_pos - seq_offset,
                                params,
                            );
                        }
                        prgv = MathUtils::log_add_exp(prgv, readprobability);
                    }
                }
            }

            // Mixture with the outside-paralog source, weighted by omega.
            if seti == 0 {
                prgu[readi] = MathUtils::log_add_exp(lgomega + pout[readi], prgu[readi]);
            }
            prgv = MathUtils::log_add_exp(lgomega + pout[readi], prgv);

            // Heterozygosity as an explicit allele frequency mu:
            // P(r|GuGv) = mu P(r|Gv) + (1-mu) P(r|Gu), best of three mixtures.
            let mut phet = MathUtils::log_add_exp(
                *LOG_ONE_HALF + prgv,
                *LOG_ONE_HALF + prgu[readi],
            );
            let phet10 = MathUtils::log_add_exp(
                *LOG_ONE_TENTH + prgv,
                *LOG_NINE_TENTHS + prgu[readi],
            );
            let phet90 = MathUtils::log_add_exp(
                *LOG_NINE_TENTHS + prgv,
                *LOG_ONE_TENTH + prgu[readi],
            );
            if phet10 > phet {
                phet = phet10;
            }
            if phet90 > phet {
                phet = phet90;
            }

            // A read counts only when the hypotheses differ unambiguously.
            if prgv > prgu[readi] && prgv - prgu[readi] > std::f64::consts::LN_2 {
                alt_count[seti] += 1;
            } else if prgu[readi] > prgv && prgu[readi] - prgv > std::f64::consts::LN_2 {
                ref_count[seti] += 1;
            }

            if seti == 0 {
                ref_sum += prgu[readi] + *LOG_ONE_HALF;
            }
            alt[seti] += prgv + alt_prior;
            het[seti] += phet + het_prior;

            if params.verbose {
                eprintln!(
                    "{}\t++\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{}\t{}\t{}",
                    seti,
                    prgu[readi],
                    phet,
                    prgv,
                    pout[readi],
                    alt_count[seti],
                    read.name,
                    trace_variant_list(combo)
                );
            }
        }

        if params.verbose {
            eprintln!(
                "{}\t==\t{:.6}\t{:.6}\t{:.6}\t{}\t{}",
                seti,
                ref_sum,
                het[seti],
                alt[seti],
                alt_count[seti],
                trace_variant_list(combo)
            );
        }
    }

    // Marginal probabilities. `total` keeps only the last combination's value;
    // the guard on has_alt replaces the zero-initialized state rather than
    // log-adding into it.
    let mut total = ref_sum;
    let mut max_ref_count = 0;
    let mut max_alt_count = 0;
    for seti in 0..ncombos {
        total = MathUtils::log_add_exp(ref_sum, MathUtils::log_add_exp(alt[seti], het[seti]));
        if ref_count[seti] > max_ref_count {
            max_ref_count = ref_count[seti];
        }
        if alt_count[seti] > max_alt_count {
            max_alt_count = alt_count[seti];
        }
    }
    let read_count = max_ref_count + max_alt_count;

    let mut output = String::new();
    for i in 0..nvariants {
        let mut has_alt = 0.0;
        let mut not_alt = ref_sum;
        let mut has_alt_count = 0;
        for seti in 0..ncombos {
            let combined = MathUtils::log_add_exp(alt[seti], het[seti]);
            if var_combos[seti].iter().any(|v| **v == *var_set[i]) {
                has_alt = if has_alt == 0.0 {
                    combined
                } else {
                    MathUtils::log_add_exp(has_alt, combined)
                };
                if alt_count[seti] > has_alt_count {
                    has_alt_count = alt_count[seti];
                }
            } else {
                not_alt = MathUtils::log_add_exp(not_alt, combined);
            }
        }
        write_variant_row(
            &mut output,
            var_set,
            i,
            read_count,
            has_alt_count,
            total,
            has_alt,
            not_alt,
        );
    }
    Ok(Some(output))
}
