use std::process;

use clap::{Arg, ArgMatches, Command};

pub fn build_cli() -> Command<'static> {
    Command::new("eagle")
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            "Explicitly tests the alternative hypothesis against the reference hypothesis \
             for candidate variants, given aligned sequencing data",
        )
        .arg(
            Arg::new("vcf")
                .short('v')
                .long("vcf")
                .value_name("FILE")
                .takes_value(true)
                .required(true)
                .help("variants VCF file"),
        )
        .arg(
            Arg::new("bam")
                .short('a')
                .long("bam")
                .value_name("FILE")
                .takes_value(true)
                .required(true)
                .help("alignment data BAM file (ref coord sorted and indexed)"),
        )
        .arg(
            Arg::new("ref")
                .short('r')
                .long("ref")
                .value_name("FILE")
                .takes_value(true)
                .required(true)
                .help("reference sequence FASTA file (indexed)"),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .value_name("FILE")
                .takes_value(true)
                .help("output file (default: stdout)"),
        )
        .arg(
            Arg::new("numproc")
                .short('t')
                .long("numproc")
                .value_name("INT")
                .takes_value(true)
                .default_value("1")
                .help("number of worker threads"),
        )
        .arg(
            Arg::new("distlim")
                .short('n')
                .long("distlim")
                .value_name("INT")
                .takes_value(true)
                .default_value("10")
                .help("consider nearby variants within n bases as a set of hypotheses (off: 0)"),
        )
        .arg(
            Arg::new("chain")
                .short('s')
                .long("chain")
                .value_name("INT")
                .takes_value(true)
                .default_value("0")
                .help("variant grouping mode; only 0 (distance grouping) is implemented"),
        )
        .arg(
            Arg::new("window")
                .short('w')
                .long("window")
                .value_name("INT")
                .takes_value(true)
                .default_value("0")
                .help(
                    "evaluate against a bounded reference window of this many bases \
                     around the variant set (0: whole chromosome)",
                ),
        )
        .arg(
            Arg::new("maxh")
                .short('m')
                .long("maxh")
                .value_name("INT")
                .takes_value(true)
                .default_value("1024")
                .help("maximum number of combinations in the set of hypotheses, instead of all 2^n"),
        )
        .arg(
            Arg::new("mvh")
                .long("mvh")
                .help("consider nearby variants as one multi-variant hypothesis"),
        )
        .arg(
            Arg::new("pao")
                .long("pao")
                .help("consider primary alignments only"),
        )
        .arg(
            Arg::new("isc")
                .long("isc")
                .help("ignore soft-clipped bases"),
        )
        .arg(
            Arg::new("nodup")
                .long("nodup")
                .help("ignore reads marked as duplicates"),
        )
        .arg(
            Arg::new("splice")
                .long("splice")
                .help("allow spliced reads (RNA-seq), scoring exon segments separately"),
        )
        .arg(
            Arg::new("dp")
                .long("dp")
                .help("use dynamic programming with affine gaps instead of the positional window"),
        )
        .arg(
            Arg::new("match")
                .long("match")
                .value_name("INT")
                .takes_value(true)
                .default_value("1")
                .help("match score for bases without quality values (with --dp)"),
        )
        .arg(
            Arg::new("mismatch")
                .long("mismatch")
                .value_name("INT")
                .takes_value(true)
                .default_value("4")
                .help("mismatch penalty for bases without quality values (with --dp)"),
        )
        .arg(
            Arg::new("gap_op")
                .long("gap_op")
                .value_name("INT")
                .takes_value(true)
                .default_value("6")
                .help("gap open penalty (with --dp)"),
        )
        .arg(
            Arg::new("gap_ex")
                .long("gap_ex")
                .value_name("INT")
                .takes_value(true)
                .default_value("1")
                .help("gap extension penalty (with --dp)"),
        )
        .arg(
            Arg::new("hetbias")
                .short('b')
                .long("hetbias")
                .value_name("FLOAT")
                .takes_value(true)
                .default_value("0.5")
                .help("prior probability bias towards non-homozygous mutations, between 0 and 1"),
        )
        .arg(
            Arg::new("omega")
                .long("omega")
                .value_name("FLOAT")
                .takes_value(true)
                .default_value("1e-5")
                .help("prior probability of a read originating from an outside paralogous source"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("per-read likelihood trace on stderr, plus debug logging"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("unless there is an error, do not print logging information"),
        )
}

/// Runtime configuration shared by the engine and every worker.
#[derive(Debug, Clone)]
pub struct EagleParameters {
    pub vcf: String,
    pub bam: String,
    pub fasta: String,
    pub out: Option<String>,
    pub numproc: u32,
    pub distlim: i64,
    pub chain: i64,
    pub window: i64,
    pub maxh: usize,
    pub mvh: bool,
    pub pao: bool,
    pub isc: bool,
    pub nodup: bool,
    pub splice: bool,
    pub dp: bool,
    pub match_score: i32,
    pub mismatch_score: i32,
    pub gap_op: i32,
    pub gap_ex: i32,
    pub verbose: bool,
    pub hetbias: f64,
    pub omega: f64,
}

impl Default for EagleParameters {
    fn default() -> EagleParameters {
        EagleParameters {
            vcf: String::new(),
            bam: String::new(),
            fasta: String::new(),
            out: None,
            numproc: 1,
            distlim: 10,
            chain: 0,
            window: 0,
            maxh: 1024,
            mvh: false,
            pao: false,
            isc: false,
            nodup: false,
            splice: false,
            dp: false,
            match_score: 1,
            mismatch_score: 4,
            gap_op: 6,
            gap_ex: 1,
            verbose: false,
            hetbias: 0.5,
            omega: 1e-5,
        }
    }
}

impl EagleParameters {
    /**
     * Builds the runtime configuration from parsed arguments. Out-of-range
     * numeric values clamp to their defaults rather than aborting; a value that
     * does not parse at all is fatal with a usage hint.
     */
    pub fn generate_from_clap(m: &ArgMatches) -> EagleParameters {
        let mut numproc: i64 = parse_arg(m, "numproc");
        if numproc < 1 {
            numproc = 1;
        }
        let mut distlim: i64 = parse_arg(m, "distlim");
        if distlim < 0 {
            distlim = 0;
        }
        let mut chain: i64 = parse_arg(m, "chain");
        if chain != 0 {
            warn!("grouping mode {} is not implemented; using distance grouping", chain);
            chain = 0;
        }
        let mut window: i64 = parse_arg(m, "window");
        if window < 0 {
            window = 0;
        }
        let mut maxh: i64 = parse_arg(m, "maxh");
        if maxh < 0 {
            maxh = 1024;
        }
        let mut hetbias: f64 = parse_arg(m, "hetbias");
        if !(0.0..=1.0).contains(&hetbias) {
            hetbias = 0.5;
        }
        let mut omega: f64 = parse_arg(m, "omega");
        if omega <= 0.0 || omega >= 1.0 {
            omega = 1e-5;
        }

        EagleParameters {
            vcf: m.value_of("vcf").unwrap().to_string(),
            bam: m.value_of("bam").unwrap().to_string(),
            fasta: m.value_of("ref").unwrap().to_string(),
            out: m.value_of("out").map(|s| s.to_string()),
            numproc: numproc as u32,
            distlim,
            chain,
            window,
            maxh: maxh as usize,
            mvh: m.is_present("mvh"),
            pao: m.is_present("pao"),
            isc: m.is_present("isc"),
            nodup: m.is_present("nodup"),
            splice: m.is_present("splice"),
            dp: m.is_present("dp"),
            match_score: parse_arg(m, "match"),
            mismatch_score: parse_arg(m, "mismatch"),
            gap_op: parse_arg(m, "gap_op"),
            gap_ex: parse_arg(m, "gap_ex"),
            verbose: m.is_present("verbose"),
            hetbias,
            omega,
        }
    }
}

fn parse_arg<T: std::str::FromStr>(m: &ArgMatches, name: &str) -> T {
    let raw = m.value_of(name).unwrap();
    match raw.parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("failed to convert '{}' for --{}; see --help", raw, name);
            process::exit(1);
        }
    }
}
