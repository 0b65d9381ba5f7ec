use std::io::Write;
use std::process;
use std::sync::{Arc, Mutex};

use scoped_threadpool::Pool;

use crate::cli::EagleParameters;
use crate::model::variant::Variant;
use crate::model::variant_sets::{group_by_distance, split_same_position};
use crate::processing::evaluator::evaluate_variant_set;
use crate::reference::reference_cache::ReferenceCache;
use crate::utils::errors::EagleError;
use crate::utils::natural_sort::natural_cmp;

pub const OUTPUT_HEADER: &str = "#SEQ\tPOS\tREF\tALT\tReads\tAltReads\tProb\tOdds\tSet";

/**
 * Partitions the variant store into hypothesis sets, fans the sets across the
 * worker pool and writes the naturally-sorted rows behind the header line.
 *
 * The task queue and the result vector sit behind independent mutexes so result
 * assembly never blocks task dispatch; the reference cache carries its own lock.
 * A worker that hits a fatal error reports it and aborts the process, matching
 * the no-partial-progress error model.
 */
pub fn process_variants(
    variants: &[Arc<Variant>],
    params: &EagleParameters,
    refseqs: &ReferenceCache,
    out: &mut dyn Write,
) -> Result<(), EagleError> {
    let mut sets = group_by_distance(variants, params.distlim);
    split_same_position(&mut sets);
    info!("Variants within {} bp:\t{} entries", params.distlim, sets.len());

    info!("Start:\t{} procs\t{}", params.numproc, params.bam);
    let queue: Mutex<Vec<Vec<Arc<Variant>>>> = Mutex::new(sets);
    let results: Mutex<Vec<String>> = Mutex::new(Vec::new());

    let mut pool = Pool::new(params.numproc);
    pool.scoped(|scope| {
        for _ in 0..params.numproc {
            scope.execute(|| loop {
                let task = queue.lock().unwrap().pop();
                let var_set = match task {
                    Some(var_set) => var_set,
                    None => break,
                };
                match evaluate_variant_set(&var_set, params, refseqs) {
                    Ok(Some(rows)) => results.lock().unwrap().push(rows),
                    Ok(None) => {}
                    Err(err) => {
                        error!("{}", err);
                        process::exit(1);
                    }
                }
            });
        }
    });

    let mut results = results.into_inner().unwrap();
    results.sort_by(|a, b| natural_cmp(a, b));
    writeln!(out, "{}", OUTPUT_HEADER)?;
    for rows in &results {
        out.write_all(rows.as_bytes())?;
    }
    info!("Done:\t{}", params.bam);
    Ok(())
}
