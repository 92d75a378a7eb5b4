mod depth;
mod matrix;

use anyhow::Result;
use clap::Command;

use ampcov_coverage::consts::{DEPTH_CMD, MATRIX_CMD};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "ampcov";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Aggregate per-position sequencing depth over amplicon target windows and report per-amplicon / per-sample coverage success rates.")
        .subcommand_required(true)
        .subcommand(depth::cli::create_depth_cli())
        .subcommand(matrix::cli::create_matrix_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // PER-SAMPLE DEPTH AGGREGATION
        //
        Some((DEPTH_CMD, matches)) => {
            depth::handlers::run_depth(matches)?;
        }

        //
        // MATRIX + SUCCESS RATES
        //
        Some((MATRIX_CMD, matches)) => {
            matrix::handlers::run_matrix(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
