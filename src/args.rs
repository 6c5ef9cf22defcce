use crate::classify::{DEFAULT_JUNK_FOLDER, DEFAULT_UNSURE_FOLDER};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(name = "maildir-learn")]
#[clap(author, version, about)]
pub struct Args {
    /// Path to the maildir.
    pub maildir: PathBuf,
    /// The bogofilter executable.
    #[clap(long, default_value = "bogofilter")]
    pub bogofilter: PathBuf,
    /// Directory of the bogofilter database, passed as `-d`.
    #[clap(long)]
    pub database_dir: Option<PathBuf>,
    /// Folder whose messages are spam.
    #[clap(long, default_value = DEFAULT_JUNK_FOLDER)]
    pub junk_folder: String,
    /// Folder whose messages are left alone.
    #[clap(long, default_value = DEFAULT_UNSURE_FOLDER)]
    pub unsure_folder: String,
    /// Reconcile every existing message before watching.
    #[clap(long)]
    pub scan: bool,
    /// Reconcile every existing message and exit.
    #[clap(long)]
    pub oneshot: bool,
    /// Suppress progress output and everything below warnings.
    #[clap(short, long)]
    pub quiet: bool,
    /// Log more, may be repeated.
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn parse_args() -> Self {
        let mut result: Self = Self::parse();
        result.scan |= result.oneshot;
        result
    }
}
