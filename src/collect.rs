use crate::args::Args;
use crate::bogofilter::Classifier;
use crate::classify::{is_storage_area, MailboxLayout};
use crate::reconcile::Reconciler;
use crate::utils;
use rayon::prelude::*;
use std::io;
use std::path::PathBuf;
use tracing::error;
use walkdir::WalkDir;

/// What an initial scan did.
#[derive(Debug, Default, PartialEq)]
pub struct ScanSummary {
    pub messages: usize,
    pub corrected: usize,
    pub failed: usize,
}

/// Lists every message delivered into the mailbox which is not excluded.
pub fn list_messages(layout: &MailboxLayout) -> io::Result<Vec<PathBuf>> {
    let mut messages = vec![];
    for entry in WalkDir::new(layout.root()) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let in_storage_area = entry
            .path()
            .parent()
            .and_then(|dir| dir.file_name())
            .map_or(false, is_storage_area);
        if in_storage_area && !layout.is_excluded(entry.path()) {
            messages.push(entry.into_path());
        }
    }
    messages.sort();
    Ok(messages)
}

/// Reconciles every message already in the mailbox.
pub fn scan<C>(args: &Args, reconciler: &Reconciler<C>) -> io::Result<ScanSummary>
where
    C: Classifier + Sync,
{
    let messages = list_messages(reconciler.layout())?;
    if messages.is_empty() {
        return Ok(ScanSummary::default());
    }

    let progress = utils::create_progress_bar(args, messages.len());
    let (corrected, failed) = messages
        .par_iter()
        .map(|path| {
            let result = match reconciler.update_status(path) {
                Ok(corrected) => (corrected as usize, 0),
                Err(e) => {
                    error!("{}", e);
                    (0, 1)
                }
            };
            progress.inc(1);
            result
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));
    progress.finish_and_clear();

    Ok(ScanSummary {
        messages: messages.len(),
        corrected,
        failed,
    })
}
