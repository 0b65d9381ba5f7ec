use std::sync::Arc;

use crate::model::variant::Variant;

/**
 * Groups the sorted variant store into hypothesis sets: a set grows while the
 * next variant shares the chromosome and sits within `distlim` bases of its
 * predecessor. A distance limit of 0 disables grouping so every variant becomes
 * its own set.
 */
pub fn group_by_distance(variants: &[Arc<Variant>], distlim: i64) -> Vec<Vec<Arc<Variant>>> {
    let mut sets = Vec::new();
    let mut i = 0;
    while i < variants.len() {
        let mut curr = vec![Arc::clone(&variants[i])];
        let mut j = i + 1;
        while distlim > 0
            && j < variants.len()
            && variants[j].chr == variants[j - 1].chr
            && (variants[j].pos - variants[j - 1].pos).abs() <= distlim
        {
            curr.push(Arc::clone(&variants[j]));
            j += 1;
        }
        i = j;
        sets.push(curr);
    }
    sets
}

/**
 * Splits multi-allelic sites into parallel sets. Whenever a set holds two
 * consecutive entries at the same position, the set is duplicated: the original
 * drops the first of the pair, the duplicate drops the second. Repeats until no
 * same-position pair remains, so every surviving set has strictly increasing
 * positions and each alternative allele is evaluated in its own hypothesis set.
 */
pub fn split_same_position(sets: &mut Vec<Vec<Arc<Variant>>>) {
    let mut again = true;
    while again {
        again = false;
        let mut split = Vec::new();
        for set in sets.iter_mut() {
            if set.len() == 1 {
                continue;
            }
            let mut j = 0;
            while j + 1 < set.len() {
                if set[j].pos == set[j + 1].pos {
                    again = true;
                    let mut dup = set.clone();
                    set.remove(j);
                    dup.remove(j + 1);
                    split.push(dup);
                }
                j += 1;
            }
        }
        sets.extend(split);
    }
}
