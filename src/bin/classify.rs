use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use post_classifier::{predict, train};

const USAGE: &str = "Usage: classify TRAIN_FILE TEST_FILE [--debug]";
const DEBUG_FLAG: &str = "--debug";

/// Arguments are strictly positional: `--debug` is only recognised as the
/// third argument, and there are no help or version flags.
#[derive(Parser, Debug)]
#[command(
    name = "classify",
    about = "Train a Naive Bayes post classifier and report its accuracy on a test set.",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// Labeled CSV corpus with `tag` and `content` columns to learn from
    #[arg(allow_hyphen_values = true)]
    train_file: PathBuf,

    /// Labeled CSV corpus to predict and score
    #[arg(allow_hyphen_values = true)]
    test_file: PathBuf,

    /// `--debug` prints the training data, label priors and word likelihoods
    #[arg(allow_hyphen_values = true, value_parser = [DEBUG_FLAG], value_name = "--debug")]
    debug: Option<String>,
}

impl Args {
    fn debug(&self) -> bool {
        self.debug.is_some()
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(_) => {
            println!("{USAGE}");
            return ExitCode::from(1);
        }
    };

    let level = if args.debug() { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    // Both files must open before any work starts.
    let train_file = open(&args.train_file)?;
    let test_file = open(&args.test_file)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let classifier = train(train_file, &mut out, args.debug())
        .with_context(|| format!("Error training on: {}", args.train_file.display()))?;
    predict(&classifier, test_file, &mut out)
        .with_context(|| format!("Error predicting: {}", args.test_file.display()))?;

    out.flush()?;
    Ok(())
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("Error opening file: {}", path.display()))?;
    Ok(BufReader::new(file))
}
