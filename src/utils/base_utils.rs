pub struct BaseUtils {}

impl BaseUtils {
    /**
     * Five-way nucleotide index used by the scoring matrix columns: A, T, G, C,
     * then N. Ambiguity codes and anything else collapse onto the N column.
     */
    pub fn base_index(base: u8) -> usize {
        match base {
            b'A' => 0,
            b'T' => 1,
            b'G' => 2,
            b'C' => 3,
            _ => 4,
        }
    }

    pub fn complement(base: u8) -> u8 {
        match base {
            b'A' => b'T',
            b'T' => b'A',
            b'G' => b'C',
            b'C' => b'G',
            _ => b'N',
        }
    }

    pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
        seq.iter().rev().map(|&base| Self::complement(base)).collect()
    }
}
