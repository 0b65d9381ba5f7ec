#[macro_use]
extern crate log;

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;

use clap::ArgMatches;
use env_logger::Builder;
use log::LevelFilter;

use eagle::cli::{build_cli, EagleParameters};
use eagle::model::variant::read_vcf;
use eagle::processing::engine::process_variants;
use eagle::reference::reference_cache::ReferenceCache;
use eagle::utils::errors::EagleError;

fn main() {
    let matches = build_cli().get_matches();
    set_log_level(&matches);
    let params = EagleParameters::generate_from_clap(&matches);

    eprintln!("VCF: {}\nBAM: {}\nREF: {}", params.vcf, params.bam, params.fasta);
    eprintln!(
        "numproc: {}, distlim: {}, hetbias: {:.2}, omega: {:e}, maxh: {}",
        params.numproc, params.distlim, params.hetbias, params.omega, params.maxh
    );
    eprintln!(
        "mvh: {}, pao: {}, isc: {}, nodup: {}, splice: {}, dp: {}, verbose: {}",
        params.mvh, params.pao, params.isc, params.nodup, params.splice, params.dp, params.verbose
    );

    if let Err(err) = run(&params) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(params: &EagleParameters) -> Result<(), EagleError> {
    let variants = read_vcf(&params.vcf)?;
    let refseqs = ReferenceCache::new(&params.fasta);

    let mut out: Box<dyn Write> = match &params.out {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|err| {
            EagleError::FileOpen(format!("output file {}: {}", path, err))
        })?)),
        None => Box::new(io::stdout()),
    };
    process_variants(&variants, params, &refseqs, &mut out)?;
    out.flush()?;
    Ok(())
}

fn set_log_level(matches: &ArgMatches) {
    let mut log_level = LevelFilter::Info;
    if matches.is_present("verbose") {
        log_level = LevelFilter::Debug;
    }
    if matches.is_present("quiet") {
        log_level = LevelFilter::Error;
    }
    let mut builder = Builder::new();
    builder.filter_level(log_level);
    if env::var("RUST_LOG").is_ok() {
        builder.parse_filters(&env::var("RUST_LOG").unwrap());
    }
    if builder.try_init().is_err() {
        panic!("Failed to set log level - has it been specified multiple times?")
    }
}
