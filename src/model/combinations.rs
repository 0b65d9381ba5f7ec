use itertools::Itertools;

/**
 * Enumerates the variant combinations evaluated for a set of size n, as 0-based
 * index subsets. Every singleton and the full set are always present; k-subsets
 * for k = 2..n-1 follow in ascending k (lexicographic within a k), and
 * enumeration stops after the first k whose addition pushes the count past
 * n + 1 + maxh.
 */
pub fn power_set(n: usize, maxh: usize) -> Vec<Vec<usize>> {
    let mut combos: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
    if n > 1 {
        combos.push((0..n).collect());
        for k in 2..n {
            combos.extend((0..n).combinations(k));
            if combos.len() - n - 1 >= maxh {
                break;
            }
        }
    }
    combos
}
