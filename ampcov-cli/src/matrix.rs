pub mod cli {
    use clap::{Arg, ArgAction, Command};

    use ampcov_coverage::consts::{DEFAULT_THRESHOLD, MATRIX_CMD};

    pub fn create_matrix_cli() -> Command {
        Command::new(MATRIX_CMD)
            .about("Pivot per-sample mean depths into an amplicon x sample matrix and report success rates")
            .arg(
                Arg::new("input")
                    .long("input")
                    .short('i')
                    .required(true)
                    .help("Directory holding <sample>_coverage_mean.txt summary files"),
            )
            .arg(
                Arg::new("matrix")
                    .long("matrix")
                    .default_value("amplicon_coverage_matrix.tsv")
                    .help("Output path for the coverage matrix TSV"),
            )
            .arg(
                Arg::new("summary")
                    .long("summary")
                    .default_value("amplicon_coverage_matrix_summary.txt")
                    .help("Output path for the success-rate summary"),
            )
            .arg(
                Arg::new("threshold")
                    .long("threshold")
                    .default_value(DEFAULT_THRESHOLD.to_string())
                    .help("Minimum mean depth for a cell to count as covered"),
            )
            .arg(
                Arg::new("gte")
                    .long("gte")
                    .action(ArgAction::SetTrue)
                    .help("Count coverage exactly at the threshold as success (default is strictly greater)"),
            )
    }
}

pub mod handlers {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::ArgMatches;

    use ampcov_coverage::{
        CoverageMatrix, SuccessReport, ThresholdMode, write_matrix_tsv, write_summary,
    };

    pub fn run_matrix(matches: &ArgMatches) -> Result<()> {
        let input_dir = PathBuf::from(
            matches
                .get_one::<String>("input")
                .expect("input directory is required"),
        );
        let matrix_path = PathBuf::from(
            matches
                .get_one::<String>("matrix")
                .expect("matrix path has a default"),
        );
        let summary_path = PathBuf::from(
            matches
                .get_one::<String>("summary")
                .expect("summary path has a default"),
        );
        let threshold: f64 = matches
            .get_one::<String>("threshold")
            .expect("threshold has a default")
            .parse()
            .with_context(|| "threshold must be a number")?;
        let mode = if matches.get_flag("gte") {
            ThresholdMode::GreaterOrEqual
        } else {
            ThresholdMode::Greater
        };

        let matrix = CoverageMatrix::from_summary_dir(&input_dir)?;
        println!(
            "Built {} x {} coverage matrix ({} populated cells)",
            matrix.n_amplicons(),
            matrix.n_samples(),
            matrix.len()
        );

        let report = SuccessReport::from_matrix(&matrix, threshold, mode);
        print_report(&report);

        write_matrix_tsv(&matrix, &matrix_path)
            .with_context(|| format!("Failed writing matrix: {}", matrix_path.display()))?;
        write_summary(&report, &summary_path)
            .with_context(|| format!("Failed writing summary: {}", summary_path.display()))?;
        println!(
            "Wrote {} and {}",
            matrix_path.display(),
            summary_path.display()
        );

        Ok(())
    }

    fn print_report(report: &SuccessReport) {
        println!("Amplicon success rates:");
        for (amplicon, rate) in &report.amplicon_rates {
            println!("{}: {:.2}%", amplicon, rate);
        }
        println!();
        println!("Sample success rates:");
        for (sample, rate) in &report.sample_rates {
            println!("{}: {:.2}%", sample, rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::cli::create_matrix_cli;
    use ampcov_coverage::consts::{DEFAULT_THRESHOLD, MATRIX_CMD};

    #[test]
    fn threshold_default_comes_from_the_library_const() {
        let matches = create_matrix_cli().get_matches_from([MATRIX_CMD, "--input", "some-dir"]);

        let threshold: f64 = matches
            .get_one::<String>("threshold")
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(threshold, DEFAULT_THRESHOLD);
    }
}
