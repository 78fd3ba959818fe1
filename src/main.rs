use clap::{Parser, Subcommand};
use dummy_regress::report::{AssumptionsReport, BasicReport, HypothesisReport};
use dummy_regress::{AnalysisSchema, PreparedModel};
use std::path::{Path, PathBuf};
use std::process;

const DEFAULT_DATA: &str = "data/gaji_dummy.csv";

#[derive(Parser)]
#[command(
    name = "dummy-regress",
    version,
    about = "OLS regression with dummy variables on the salary dataset",
    long_about = "Fits salary_million ~ experience_years + gender + education_level with \
                  dummy-coded categories, then reports the model, classical assumption \
                  checks and hypothesis tests."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Data overview, model summary and coefficient notes
    Basic {
        /// Path to the CSV file
        #[arg(default_value = DEFAULT_DATA)]
        data: PathBuf,
    },

    /// Residual plots and the classical assumption tests
    Assumptions {
        /// Path to the CSV file
        #[arg(default_value = DEFAULT_DATA)]
        data: PathBuf,
    },

    /// Overall F-test, t-tests and the joint education F-test
    Hypothesis {
        /// Path to the CSV file
        #[arg(default_value = DEFAULT_DATA)]
        data: PathBuf,
    },

    /// All three reports in order
    All {
        /// Path to the CSV file
        #[arg(default_value = DEFAULT_DATA)]
        data: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Basic { data } => run(&data, true, false, false),
        Commands::Assumptions { data } => run(&data, false, true, false),
        Commands::Hypothesis { data } => run(&data, false, false, true),
        Commands::All { data } => run(&data, true, true, true),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}

fn run(
    data: &Path,
    basic: bool,
    assumptions: bool,
    hypothesis: bool,
) -> dummy_regress::Result<()> {
    let model = PreparedModel::from_path(data, AnalysisSchema::salary())?;

    if basic {
        print!("{}", BasicReport::new(&model)?);
    }
    if assumptions {
        if basic {
            println!();
        }
        print!("{}", AssumptionsReport::new(&model)?);
    }
    if hypothesis {
        if basic || assumptions {
            println!();
        }
        print!("{}", HypothesisReport::new(&model)?);
    }
    Ok(())
}
