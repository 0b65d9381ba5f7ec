use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bio::io::fasta::IndexedReader;

use crate::utils::errors::EagleError;

/// One reference sequence, uppercased on load. Entries live until program exit.
#[derive(Debug)]
pub struct Fasta {
    pub name: String,
    pub seq: Vec<u8>,
}

impl Fasta {
    pub fn seq_length(&self) -> usize {
        self.seq.len()
    }
}

/**
 * Lazily-populated cache of reference sequences, keyed by chromosome name over
 * an indexed FASTA. A miss faults the whole sequence in through the index.
 *
 * The map is guarded by a single mutex spanning the entire lookup-through-insert
 * critical section, so concurrent readers serialize; the cache warms once per
 * chromosome and later hits are O(1) under the same lock. Buckets may hold
 * multiple entries; fetch returns the first whose name matches the key exactly.
 */
#[derive(Debug)]
pub struct ReferenceCache {
    fasta_path: String,
    buckets: Mutex<HashMap<String, Vec<Arc<Fasta>>>>,
}

impl ReferenceCache {
    pub fn new(fasta_path: &str) -> ReferenceCache {
        ReferenceCache {
            fasta_path: fasta_path.to_string(),
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn fetch(&self, name: &str) -> Result<Arc<Fasta>, EagleError> {
        let mut buckets = self.buckets.lock().unwrap();
        if let Some(bucket) = buckets.get(name) {
            for entry in bucket {
                if entry.name == name {
                    return Ok(Arc::clone(entry));
                }
            }
            return Err(EagleError::MissingSequence(name.to_string()));
        }

        let mut reader = IndexedReader::from_file(&self.fasta_path).map_err(|err| {
            EagleError::FileOpen(format!("FA index for {}: {}", self.fasta_path, err))
        })?;
        reader
            .fetch_all(name)
            .map_err(|_| EagleError::MissingSequence(name.to_string()))?;
        let mut seq = Vec::new();
        reader
            .read(&mut seq)
            .map_err(|err| EagleError::FileOpen(format!("sequence {}: {}", name, err)))?;
        seq.make_ascii_uppercase();

        let entry = Arc::new(Fasta {
            name: name.to_string(),
            seq,
        });
        buckets
            .entry(name.to_string())
            .or_insert_with(Vec::new)
            .push(Arc::clone(&entry));
        Ok(entry)
    }
}
