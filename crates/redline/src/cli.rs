use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "redline",
    about = "Compare two text files line by line and character by character",
    version
)]
pub struct Cli {
    /// Original file
    pub old: PathBuf,

    /// Modified file
    pub new: PathBuf,

    /// Print the diff as JSON
    #[arg(long)]
    pub json: bool,

    /// Ignore changes in leading and trailing whitespace
    #[arg(long)]
    pub ignore_trim_whitespace: bool,

    /// Give up after this many milliseconds and report a coarse diff
    #[arg(long, value_name = "MS")]
    pub max_computation_time: Option<u64>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
