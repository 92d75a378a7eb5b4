pub mod cli {
    use clap::{Arg, Command};

    use ampcov_coverage::consts::DEPTH_CMD;

    pub fn create_depth_cli() -> Command {
        Command::new(DEPTH_CMD)
            .about("Aggregate per-base depth over amplicon target windows, one sparse depth map per sample")
            .arg(
                Arg::new("bed")
                    .long("bed")
                    .short('b')
                    .required(true)
                    .help("BED-like file with target windows: chrom start end amplicon_id"),
            )
            .arg(
                Arg::new("input")
                    .long("input")
                    .short('i')
                    .required(true)
                    .help("Directory holding <sample>.per-base.bed.gz depth files"),
            )
            .arg(
                Arg::new("samples")
                    .long("samples")
                    .help("Comma-separated sample ids; defaults to discovering *.per-base.bed.gz in the input directory"),
            )
            .arg(
                Arg::new("output")
                    .long("output")
                    .short('o')
                    .help("Output directory for <sample>.target-depth.tsv files (defaults to the input directory)"),
            )
            .arg(
                Arg::new("threads")
                    .long("threads")
                    .short('t')
                    .default_value("1")
                    .help("Number of samples to process in parallel"),
            )
    }
}

pub mod handlers {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::ArgMatches;

    use ampcov_core::models::TargetSet;
    use ampcov_coverage::{DepthAggregationConfig, discover_samples, run_depth_aggregation};
    use ampcov_overlaprs::TargetIndex;

    pub fn run_depth(matches: &ArgMatches) -> Result<()> {
        let bed = matches
            .get_one::<String>("bed")
            .expect("target window file is required");
        let input_dir = PathBuf::from(
            matches
                .get_one::<String>("input")
                .expect("input directory is required"),
        );
        let output_dir = matches
            .get_one::<String>("output")
            .map(PathBuf::from)
            .unwrap_or_else(|| input_dir.clone());
        let threads: usize = matches
            .get_one::<String>("threads")
            .expect("threads has a default")
            .parse()
            .with_context(|| "threads must be a number")?;

        let targets = TargetSet::try_from(bed.as_str())?;
        let index = TargetIndex::from(&targets);

        let samples: Vec<String> = match matches.get_one::<String>("samples") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => discover_samples(&input_dir)?,
        };
        if samples.is_empty() {
            anyhow::bail!(
                "No samples to process: no *.per-base.bed.gz files in {}",
                input_dir.display()
            );
        }

        println!(
            "Aggregating depth for {} sample(s) over {} target window(s)",
            samples.len(),
            index.len()
        );

        let config = DepthAggregationConfig {
            input_dir,
            output_dir,
            samples,
            threads,
        };
        run_depth_aggregation(&index, &config)
    }
}
