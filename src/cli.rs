use crate::constants::*;
use anyhow::{anyhow, Result};
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

/// Full version string used in the command-line interface.
pub static FULL_VERSION: Lazy<String> = Lazy::new(|| env!("CARGO_PKG_VERSION").to_string());

#[derive(Parser, Debug)]
#[command(name="vrx",
          version=&**FULL_VERSION,
          about="Lowercase nucleotide variant remediation",
          long_about = None,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true
    )]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Remediate(RemediateArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Remediate(_) => "remediate",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(group(
    ArgGroup::new("stores")
        .required(true)
        .args(["dbs", "db_list"]),
))]
#[command(arg_required_else_help(true))]
pub struct RemediateArgs {
    /// Directory where reject lists and other run artifacts are stored
    #[arg(
        short = 'w',
        long = "working-dir",
        value_name = "DIR",
        value_parser = check_dir_exists,
        required = true
    )]
    pub working_dir: PathBuf,

    /// Directory holding one subdirectory per store, each with variants.json and files.json
    #[arg(
        short = 'd',
        long = "data-dir",
        value_name = "DIR",
        value_parser = check_dir_exists,
        required = true
    )]
    pub data_dir: PathBuf,

    /// Identifiers of the variant stores to process
    #[arg(
        long = "db",
        value_name = "DB",
        num_args = 1..
    )]
    pub dbs: Option<Vec<String>>,

    /// File containing store identifiers to process (one per line)
    #[arg(
        long = "db-list",
        value_name = "DB_LIST",
        value_parser = check_file_exists
    )]
    pub db_list: Option<PathBuf>,

    /// Number of threads to use (stores are processed independently)
    #[arg(
        short = '@',
        value_name = "THREADS",
        default_value_t = DEFAULT_NUM_THREADS,
        value_parser = threads_in_range
    )]
    pub num_threads: usize,

    /// Allele length at which the identity switches to a content hash
    #[arg(
        long = "allele-hash-threshold",
        value_name = "LEN",
        default_value_t = DEFAULT_ALLELE_HASH_THRESHOLD,
        help_heading = "Advanced"
    )]
    pub allele_hash_threshold: usize,
}

/// Initializes the verbosity level for logging based on the command-line arguments.
///
/// Sets up the logger with a specific verbosity level that is determined
/// by the number of occurrences of the `-v` or `--verbose` flag in the command-line arguments.
pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.module_path().unwrap_or("unknown_module"),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse::<usize>()
        .map_err(|_| anyhow!("`{}` is not a valid thread number", s))?;
    if thread == 0 {
        return Err(anyhow!("Number of threads must be >= 1"));
    }
    Ok(thread)
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        return Err(anyhow!("File does not exist: {}", path.display()));
    }
    Ok(path.to_path_buf())
}

fn check_dir_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.is_dir() {
        return Err(anyhow!("Directory does not exist: {}", path.display()));
    }
    Ok(path.to_path_buf())
}

impl RemediateArgs {
    pub fn process_db_names(&self) -> Result<Vec<String>> {
        match (&self.dbs, &self.db_list) {
            (Some(dbs), None) => Ok(dbs.clone()),
            (None, Some(list_path)) => Self::read_db_names_from_file(list_path),
            _ => unreachable!("Either --db or --db-list is provided, never both"),
        }
    }

    fn read_db_names_from_file(path: &Path) -> Result<Vec<String>> {
        let file = File::open(path)
            .map_err(|e| anyhow!("Failed to open db list file {}: {}", path.display(), e))?;
        let reader = BufReader::new(file);

        let mut names = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| anyhow!("Error reading line {}: {}", line_num + 1, e))?;
            let trimmed = line.trim();
            // Skip empty or comment lines
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            names.push(trimmed.to_string());
        }

        if names.is_empty() {
            Err(anyhow!("No store identifiers found in the input file"))?;
        }

        Ok(names)
    }
}
