use crate::args::Args;
use indicatif::ProgressBar;
use tracing::Level;

pub fn create_progress_bar(args: &Args, len: usize) -> ProgressBar {
    if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(len as u64)
    }
}

pub fn log_level(args: &Args) -> Level {
    match (args.quiet, args.verbose) {
        (true, _) => Level::WARN,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

pub fn init_logging(args: &Args) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(args))
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_log_level() {
        let level = |argv: &[&str]| log_level(&Args::parse_from(argv));
        assert_eq!(level(&["maildir-learn", "mail"]), Level::INFO);
        assert_eq!(level(&["maildir-learn", "-v", "mail"]), Level::DEBUG);
        assert_eq!(level(&["maildir-learn", "-vv", "mail"]), Level::TRACE);
        assert_eq!(level(&["maildir-learn", "-q", "-v", "mail"]), Level::WARN);
    }
}
