use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use group_split::config::{SplitConfig, SplitMode};
use group_split::data::loader::load_file;

/// Split the rows of a table into train/test sets or rolling groups and
/// print the row identifiers as JSON.
#[derive(Debug, Parser)]
#[command(name = "group-split", version, about)]
struct Cli {
    /// Table to split (.parquet, .json or .csv)
    data: PathBuf,

    /// JSON file with a split configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Keep the file's row order
    #[arg(long)]
    no_shuffle: bool,

    /// Column whose values identify rows (default: row position)
    #[arg(long)]
    index_column: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Single train/test split of all rows
    TrainTest {
        #[arg(long, default_value_t = 0.2)]
        test_frac: f64,
        /// Exact number of test rows; overrides --test-frac
        #[arg(long)]
        test_size: Option<usize>,
    },
    /// Rolling groups, each optionally split into train/test
    Groups {
        #[arg(short = 'n', long)]
        number_of_groups: usize,
        /// Fraction in [0, 1] of the cumulative end offset shared with the next group
        #[arg(long)]
        overlap: Option<f64>,
        /// Emit raw groups instead of train/test pairs
        #[arg(long)]
        no_test_set: bool,
        #[arg(long, default_value_t = 0.2)]
        test_frac: f64,
    },
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    fn resolve_config(&self) -> Result<SplitConfig> {
        let mut config = match &self.config {
            Some(path) => SplitConfig::from_file(path)?,
            None => SplitConfig::default(),
        };

        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.no_shuffle {
            config.shuffle = false;
        }
        if self.index_column.is_some() {
            config.index_column = self.index_column.clone();
        }
        if let Some(command) = &self.command {
            config.mode = match *command {
                Command::TrainTest {
                    test_frac,
                    test_size,
                } => SplitMode::TrainTest {
                    test_frac,
                    test_size,
                },
                Command::Groups {
                    number_of_groups,
                    overlap,
                    no_test_set,
                    test_frac,
                } => SplitMode::Groups {
                    number_of_groups,
                    overlap,
                    test_set: !no_test_set,
                    test_frac,
                },
            };
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    let mut table = load_file(&cli.data)?;
    if let Some(column) = &config.index_column {
        table = table.with_index_column(column)?;
    }
    log::info!(
        "Loaded {} rows with columns {:?}",
        table.len(),
        table.column_names
    );

    let partitioner = config.partitioner(&table);
    let output = config.run(&partitioner)?;

    let mut stdout = std::io::stdout().lock();
    let written = if cli.pretty {
        serde_json::to_writer_pretty(&mut stdout, &output)
    } else {
        serde_json::to_writer(&mut stdout, &output)
    };
    written.context("writing output")?;
    writeln!(stdout).context("writing output")?;
    Ok(())
}
