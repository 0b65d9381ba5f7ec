use rust_htslib::bam::record::{Aux, Record};

/**
 * Snapshot of one aligned read taken at fetch time and dropped once its variant
 * set has been scored.
 *
 * Base qualities are stored as base-10 log error rates (phred / -10), so every
 * entry is <= 0. Flag booleans are derived once from the BAM flag word; the
 * secondary bit also covers supplementary alignments. The raw XA aux string is
 * kept for lazy parsing.
 */
#[derive(Debug, Clone)]
pub struct AlignedRead {
    pub name: String,
    pub chr: String,
    pub tid: i32,
    pub pos: i64,
    pub qseq: Vec<u8>,
    pub qual: Vec<f64>,
    pub inferred_length: i64,
    pub cigar: Vec<(u32, char)>,
    pub is_unmapped: bool,
    pub is_reverse: bool,
    pub is_secondary: bool,
    pub is_duplicate: bool,
    pub multimap: Option<String>,
}

impl AlignedRead {
    /**
     * Builds the snapshot from a BAM record. With `trim_soft_clips`, leading and
     * trailing soft-clip segments are removed from the sequence, the qualities
     * and the stored CIGAR, and the inferred length shrinks to match; a read
     * that is soft-clipped end to end is left untouched.
     */
    pub fn from_record(record: &Record, chr: &str, trim_soft_clips: bool) -> AlignedRead {
        let mut qseq = record.seq().as_bytes();
        qseq.make_ascii_uppercase();
        let mut qual: Vec<f64> = record.qual().iter().map(|&q| f64::from(q) / -10.0).collect();
        let mut cigar: Vec<(u32, char)> = record.cigar().iter().map(|c| (c.len(), c.char())).collect();
        let mut inferred_length: i64 = cigar
            .iter()
            .filter(|(_, op)| matches!(op, 'M' | 'I' | 'S' | '=' | 'X'))
            .map(|&(len, _)| i64::from(len))
            .sum();

        if trim_soft_clips {
            let lead = match cigar.first() {
                Some(&(len, 'S')) => len as usize,
                _ => 0,
            };
            let tail = match cigar.last() {
                Some(&(len, 'S')) => len as usize,
                _ => 0,
            };
            if lead + tail > 0 && lead + tail < qseq.len() {
                qseq = qseq[lead..qseq.len() - tail].to_vec();
                qual = qual[lead..qual.len() - tail].to_vec();
                inferred_length -= (lead + tail) as i64;
                if tail > 0 {
                    cigar.pop();
                }
                if lead > 0 {
                    cigar.remove(0);
                }
            }
        }

        let multimap = match record.aux(b"XA") {
            Ok(Aux::String(xa)) => Some(xa.to_string()),
            _ => None,
        };

        AlignedRead {
            name: String::from_utf8_lossy(record.qname()).to_string(),
            chr: chr.to_string(),
            tid: record.tid(),
            pos: record.pos(),
            qseq,
            qual,
            inferred_length,
            cigar,
            is_unmapped: record.is_unmapped(),
            is_reverse: record.is_reverse(),
            is_secondary: record.is_secondary() || record.is_supplementary(),
            is_duplicate: record.is_duplicate(),
            multimap,
        }
    }

    pub fn length(&self) -> usize {
        self.qseq.len()
    }
}

/// One alternative alignment from an XA aux tag entry `chr,±pos,cigar,nm;`.
/// The sign of the position carries the strand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XaAlignment {
    pub chr: String,
    pub signed_pos: i64,
}

/**
 * Parses the semicolon-delimited XA list. Each entry must carry a chromosome, a
 * signed position and a non-empty trailing portion (cigar and edit distance);
 * parsing stops at the first entry that does not, which also absorbs the
 * terminating semicolon.
 */
pub fn parse_xa(tag: &str) -> Vec<XaAlignment> {
    let mut alignments = Vec::new();
    for entry in tag.split(';') {
        let mut fields = entry.splitn(3, ',');
        let chr = match fields.next() {
            Some(chr) if !chr.is_empty() => chr,
            _ => break,
        };
        let signed_pos: i64 = match fields.next().and_then(|p| p.parse().ok()) {
            Some(pos) => pos,
            None => break,
        };
        match fields.next() {
            Some(rest) if !rest.is_empty() => {}
            _ => break,
        }
        alignments.push(XaAlignment {
            chr: chr.to_string(),
            signed_pos,
        });
    }
    alignments
}
