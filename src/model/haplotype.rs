use std::sync::Arc;

use crate::model::variant::Variant;

/**
 * Applies a combination of variants, in ascending position order, to a copy of
 * the reference window starting at `seq_start` (0 for the whole chromosome).
 *
 * A running offset tracks the net length change from earlier indels so each
 * edit lands where the previous edits left it. A `-` ref allele marks a pure
 * insertion (the edit site shifts one base right of the anchor), a `-` alt
 * allele a pure deletion. Equal-length alleles overwrite in place; unequal
 * lengths splice prefix + alt + suffix.
 */
pub fn construct_altseq(refseq: &[u8], combo: &[Arc<Variant>], seq_start: i64) -> Vec<u8> {
    let mut altseq = refseq.to_vec();
    let mut offset: i64 = 0;
    for curr in combo {
        let mut pos = curr.pos - 1 + offset - seq_start;
        let (var_ref, var_alt): (&str, &str) = if curr.ref_allele == "-" {
            pos += 1;
            ("", curr.alt_allele.as_str())
        } else if curr.alt_allele == "-" {
            (curr.ref_allele.as_str(), "")
        } else {
            (curr.ref_allele.as_str(), curr.alt_allele.as_str())
        };
        offset += var_alt.len() as i64 - var_ref.len() as i64;

        // Edit sites are clamped to the buffer; positions beyond the window can
        // only come from inputs that disagree with the reference.
        let pos = (pos.max(0) as usize).min(altseq.len());
        let ref_end = (pos + var_ref.len()).min(altseq.len());
        if var_ref.len() == var_alt.len() {
            altseq[pos..ref_end].copy_from_slice(&var_alt.as_bytes()[..ref_end - pos]);
        } else {
            let mut newalt =
                Vec::with_capacity(altseq.len() - (ref_end - pos) + var_alt.len());
            newalt.extend_from_slice(&altseq[..pos]);
            newalt.extend_from_slice(var_alt.as_bytes());
            newalt.extend_from_slice(&altseq[ref_end..]);
            altseq = newalt;
        }
    }
    altseq
}
