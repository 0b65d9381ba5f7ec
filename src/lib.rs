pub mod cli;
pub mod model;
pub mod processing;
pub mod reads;
pub mod reference;
pub mod utils;

// HTS and bio files
extern crate bio;
extern crate rust_htslib;

// Utilities
extern crate clap;
extern crate env_logger;
extern crate itertools;
extern crate libm;
extern crate scoped_threadpool;

#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;
