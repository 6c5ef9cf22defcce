mod args;
mod bogofilter;
mod classify;
mod collect;
mod error;
mod reconcile;
mod utils;
mod watch;

use anyhow::{bail, Context, Result};
use args::Args;
use bogofilter::Bogofilter;
use classify::MailboxLayout;
use collect::ScanSummary;
use notify::{Config, RecommendedWatcher, Watcher};
use reconcile::Reconciler;
use std::fs;
use std::sync::mpsc;
use tracing::info;
use watch::Dispatcher;

fn main() -> Result<()> {
    let args = Args::parse_args();
    utils::init_logging(&args);
    do_main(&args)
}

fn report(summary: &ScanSummary) {
    info!(
        "scanned {} messages, corrected {}, failed {}",
        summary.messages, summary.corrected, summary.failed
    );
}

fn do_main(args: &Args) -> Result<()> {
    let root = fs::canonicalize(&args.maildir)
        .with_context(|| format!("cannot open maildir {:?}", args.maildir))?;
    let layout = MailboxLayout::new(root).with_folders(&args.junk_folder, &args.unsure_folder);
    let bogofilter =
        Bogofilter::new(&args.bogofilter).with_database_dir(args.database_dir.clone());
    let reconciler = Reconciler::new(layout, bogofilter);

    if args.oneshot {
        let summary = collect::scan(args, &reconciler).context("cannot list messages")?;
        report(&summary);
        if summary.failed > 0 {
            bail!("{} messages could not be reconciled", summary.failed);
        }
        return Ok(());
    }

    // Watch before scanning so nothing delivered meanwhile is missed.
    let (tx, rx) = mpsc::channel();
    let watcher = RecommendedWatcher::new(tx, Config::default()).context("cannot create watcher")?;
    let mut dispatcher = Dispatcher::new(watcher, reconciler);
    dispatcher.start().context("cannot watch maildir")?;

    if args.scan {
        let summary =
            collect::scan(args, dispatcher.reconciler()).context("cannot list messages")?;
        report(&summary);
    }

    dispatcher.run(rx);
    Ok(())
}
