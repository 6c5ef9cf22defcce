use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_JUNK_FOLDER: &str = ".Junk";
pub const DEFAULT_UNSURE_FOLDER: &str = ".Unsure";

/// What the classifier believes, or should believe, about a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Spam,
    Ham,
    Unsure,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Status::Spam => "spam",
            Status::Ham => "ham",
            Status::Unsure => "unsure",
        })
    }
}

/// Where things live inside the mailbox tree.
///
/// Every path handed to this type is interpreted relative to `root`, one
/// component at a time, so a folder named `tmp` or `.Junk` somewhere above
/// the mailbox never changes the outcome.
#[derive(Clone, Debug)]
pub struct MailboxLayout {
    root: PathBuf,
    junk_folder: String,
    unsure_folder: String,
}

impl MailboxLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        MailboxLayout {
            root: root.into(),
            junk_folder: DEFAULT_JUNK_FOLDER.to_string(),
            unsure_folder: DEFAULT_UNSURE_FOLDER.to_string(),
        }
    }

    pub fn with_folders(mut self, junk: &str, unsure: &str) -> Self {
        self.junk_folder = junk.to_string();
        self.unsure_folder = unsure.to_string();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn components<'a>(&self, path: &'a Path) -> Option<Vec<&'a OsStr>> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let components: Vec<_> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name),
                _ => None,
            })
            .collect();
        if components.is_empty() {
            None
        } else {
            Some(components)
        }
    }

    /// Whether the message at `path` must never be reconciled.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let components = match self.components(path) {
            Some(components) => components,
            // Not inside the mailbox at all.
            None => return true,
        };
        if components[0] == OsStr::new(&self.unsure_folder) {
            return true;
        }
        if components.len() >= 2 && components[components.len() - 2] == "tmp" {
            return true;
        }
        if components
            .iter()
            .any(|c| c.to_string_lossy().contains("dovecot"))
        {
            return true;
        }
        let file_name = components[components.len() - 1].to_string_lossy();
        is_trashed(&file_name)
    }

    /// The status a message at `path` should have, judged by its folder.
    pub fn expected_status(&self, path: &Path) -> Status {
        match self.components(path).as_deref() {
            Some([folder, area, ..])
                if *folder == OsStr::new(&self.junk_folder) && is_storage_area(area) =>
            {
                Status::Spam
            }
            _ => Status::Ham,
        }
    }
}

/// Directories in which delivered messages live.
pub fn is_storage_area(name: &OsStr) -> bool {
    name == "new" || name == "cur"
}

/// Whether the maildir info part of a file name carries the trashed flag.
fn is_trashed(file_name: &str) -> bool {
    match file_name.rfind(":2,") {
        Some(pos) => file_name[pos + 3..].contains('T'),
        None => false,
    }
}
