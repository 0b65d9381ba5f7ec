pub mod combinations;
pub mod haplotype;
pub mod variant;
pub mod variant_sets;
