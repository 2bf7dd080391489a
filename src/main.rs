use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use log::info;

use nw_aligner::input::read_sequence_pair;
use nw_aligner::{AlignConfig, Aligner, GapModel};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    Global,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Global => f.write_str("global"),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GapModelArg {
    ThreeMatrix,
    NeighborState,
}

impl From<GapModelArg> for GapModel {
    fn from(arg: GapModelArg) -> Self {
        match arg {
            GapModelArg::ThreeMatrix => GapModel::ThreeMatrix,
            GapModelArg::NeighborState => GapModel::NeighborState,
        }
    }
}

/// Global sequence alignment with separate gap opening and extension costs.
#[derive(Debug, Parser)]
#[command(name = "nw_aligner", version)]
struct Cli {
    /// Input file: sequence A on the first line, sequence B on the second
    #[arg(short = 'i', long = "input", default_value = "./test.txt")]
    filename: PathBuf,

    #[arg(short, long, value_enum, default_value = "global")]
    algorithm: Algorithm,

    /// Match score
    #[arg(short, long = "match", allow_hyphen_values = true)]
    match_score: Option<i32>,

    /// Mismatch penalty
    #[arg(short = 'p', long = "miss", allow_hyphen_values = true)]
    miss_penalty: Option<i32>,

    /// Gap opening penalty
    #[arg(short = 'o', long, allow_hyphen_values = true)]
    gap_opening: Option<i32>,

    /// Gap extension penalty
    #[arg(short = 'e', long, allow_hyphen_values = true)]
    gap_extension: Option<i32>,

    #[arg(long, value_enum)]
    gap_model: Option<GapModelArg>,

    /// TOML alignment configuration; explicit flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the score matrix
    #[arg(long)]
    show_matrix: bool,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn align_config(&self) -> Result<AlignConfig> {
        let mut config = match &self.config {
            Some(path) => AlignConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AlignConfig::default(),
        };
        let scoring = &mut config.scoring;
        scoring.match_score = self.match_score.unwrap_or(scoring.match_score);
        scoring.mismatch = self.miss_penalty.unwrap_or(scoring.mismatch);
        scoring.gap_open = self.gap_opening.unwrap_or(scoring.gap_open);
        scoring.gap_ext = self.gap_extension.unwrap_or(scoring.gap_ext);
        if let Some(gap_model) = self.gap_model {
            config.gap_model = gap_model.into();
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.align_config()?;
    let scoring = config.scoring;
    println!(
        "Filename\t:{}\nAlgorithm\t:{}\nMatch score\t:{}\nMiss match\t:{}\nGap opening\t:{}\nGap Extension\t:{}\n",
        cli.filename.display(),
        cli.algorithm,
        scoring.match_score,
        scoring.mismatch,
        scoring.gap_open,
        scoring.gap_ext,
    );

    let (a, b) = read_sequence_pair(&cli.filename)
        .with_context(|| format!("reading {}", cli.filename.display()))?;
    info!("Using {:?} gap model", config.gap_model);

    let result = Aligner::new(config).align(&a, &b)?;
    if cli.show_matrix {
        print!("{}", result.score_matrix);
    }
    println!("{}\n", result.trace);
    println!("Total Alignment Score: {}", result.score);
    println!(
        "Matches: {} / {} columns",
        result.trace.match_count(),
        result.trace.len()
    );

    Ok(())
}
