use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::Arc;

use crate::utils::errors::EagleError;
use crate::utils::natural_sort::natural_cmp;

/**
 * One candidate edit against the reference: chromosome, 1-based position and the
 * reference/alternative allele pair. A single `-` denotes an empty allele, i.e.
 * a pure insertion or deletion. Immutable after construction; the store and the
 * hypothesis sets share entries through `Arc`.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub chr: String,
    pub pos: i64,
    pub ref_allele: String,
    pub alt_allele: String,
}

impl Variant {
    pub fn new(chr: &str, pos: i64, ref_allele: &str, alt_allele: &str) -> Variant {
        Variant {
            chr: chr.to_string(),
            pos,
            ref_allele: ref_allele.to_string(),
            alt_allele: alt_allele.to_string(),
        }
    }

    /// Case-insensitive chromosome ties break on position; distinct chromosomes
    /// fall back to the natural-order comparator.
    pub fn natural_order(a: &Variant, b: &Variant) -> Ordering {
        if a.chr.eq_ignore_ascii_case(&b.chr) {
            a.pos.cmp(&b.pos)
        } else {
            natural_cmp(&a.chr, &b.chr)
        }
    }
}

/**
 * Loads candidate variants from a whitespace-tokenized VCF: column 1 is the
 * chromosome, 2 the position, 4 and 5 the ref and alt alleles. Header and blank
 * lines are skipped. Comma-separated alleles expand to the cross product of
 * single-allele entries. The returned store is naturally sorted.
 */
pub fn read_vcf(filename: &str) -> Result<Vec<Arc<Variant>>, EagleError> {
    let file = File::open(filename)
        .map_err(|err| EagleError::FileOpen(format!("VCF file {}: {}", filename, err)))?;
    let reader = BufReader::new(file);

    let mut variants = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() < 5 {
            return Err(EagleError::BadVcfRecord(line.clone()));
        }
        let pos: i64 = fields[1]
            .parse()
            .map_err(|_| EagleError::BadVcfRecord(line.clone()))?;

        for ref_token in fields[3].split(',').filter(|t| !t.is_empty()) {
            for alt_token in fields[4].split(',').filter(|t| !t.is_empty()) {
                variants.push(Arc::new(Variant {
                    chr: fields[0].to_string(),
                    pos,
                    ref_allele: ref_token.to_ascii_uppercase(),
                    alt_allele: alt_token.to_ascii_uppercase(),
                }));
            }
        }
    }

    variants.sort_by(|a, b| Variant::natural_order(a, b));
    info!("Read VCF: {}\t{} entries", filename, variants.len());
    Ok(variants)
}
