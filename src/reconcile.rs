use crate::bogofilter::Classifier;
use crate::classify::{MailboxLayout, Status};
use crate::error::Result;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// A training command moving the classifier from one belief to another.
///
/// The compound variants retract the earlier training before applying the
/// new one, so a message is never counted as both spam and ham.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Correction {
    MarkHam,
    MarkSpam,
    RetractSpamMarkHam,
    RetractHamMarkSpam,
}

impl Correction {
    /// Picks the correction for a transition, `None` if nothing is to do.
    pub fn between(current: Status, desired: Status) -> Option<Self> {
        match (current, desired) {
            (Status::Unsure, Status::Ham) => Some(Correction::MarkHam),
            (Status::Unsure, Status::Spam) => Some(Correction::MarkSpam),
            (Status::Spam, Status::Ham) => Some(Correction::RetractSpamMarkHam),
            (Status::Ham, Status::Spam) => Some(Correction::RetractHamMarkSpam),
            _ => None,
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            Correction::MarkHam => "-n",
            Correction::MarkSpam => "-s",
            Correction::RetractSpamMarkHam => "-Sn",
            Correction::RetractHamMarkSpam => "-Ns",
        }
    }
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Correction::MarkHam => "mark-ham",
            Correction::MarkSpam => "mark-spam",
            Correction::RetractSpamMarkHam => "retract-spam-mark-ham",
            Correction::RetractHamMarkSpam => "retract-ham-mark-spam",
        })
    }
}

pub struct Reconciler<C> {
    layout: MailboxLayout,
    classifier: C,
}

impl<C: Classifier> Reconciler<C> {
    pub fn new(layout: MailboxLayout, classifier: C) -> Self {
        Reconciler { layout, classifier }
    }

    pub fn layout(&self) -> &MailboxLayout {
        &self.layout
    }

    #[cfg(test)]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Brings the classifier's belief about `path` in line with its folder.
    ///
    /// Returns whether a training command was issued.
    pub fn update_status(&self, path: &Path) -> Result<bool> {
        if self.layout.is_excluded(path) {
            debug!("{:?}: excluded", path);
            return Ok(false);
        }
        let current = self.classifier.inspect(path)?;
        let desired = self.layout.expected_status(path);
        if current == desired {
            debug!("{:?}: already {}", path, current);
            return Ok(false);
        }
        let correction = match Correction::between(current, desired) {
            Some(correction) => correction,
            None => return Ok(false),
        };
        info!("{:?}: {} -> {} ({})", path, current, desired, correction);
        self.classifier.correct(correction, path)?;
        Ok(true)
    }
}
