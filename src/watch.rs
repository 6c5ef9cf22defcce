use crate::bogofilter::Classifier;
use crate::error::{Error, Result};
use crate::reconcile::Reconciler;
use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// A filesystem change the dispatcher cares about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WatchEvent {
    Created { path: PathBuf, is_dir: bool },
    MovedIn { path: PathBuf, is_dir: bool },
}

impl WatchEvent {
    /// Reduces a raw notification to the events we act on.
    pub fn from_notify(event: Event) -> Option<Self> {
        let Event { kind, mut paths, .. } = event;
        match kind {
            EventKind::Create(kind) => {
                let path = paths.pop()?;
                let is_dir = match kind {
                    CreateKind::Folder => true,
                    CreateKind::File => false,
                    _ => path.is_dir(),
                };
                Some(WatchEvent::Created { path, is_dir })
            }
            // A rename inside the tree also produces a `Both` event after
            // the `To` one. Only `To` is taken, so a move is seen once.
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) if paths.len() == 1 => {
                let path = paths.pop()?;
                let is_dir = path.is_dir();
                Some(WatchEvent::MovedIn { path, is_dir })
            }
            _ => None,
        }
    }
}

/// The directories currently being watched. Only ever grows.
#[derive(Debug, Default)]
pub struct WatchSet {
    dirs: HashSet<PathBuf>,
}

impl WatchSet {
    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.contains(dir)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    fn insert(&mut self, dir: PathBuf) {
        self.dirs.insert(dir);
    }
}

/// Something that can start delivering events for one more directory.
pub trait WatchService {
    fn watch_dir(&mut self, dir: &Path) -> notify::Result<()>;
}

impl WatchService for RecommendedWatcher {
    fn watch_dir(&mut self, dir: &Path) -> notify::Result<()> {
        self.watch(dir, RecursiveMode::NonRecursive)
    }
}

pub struct Dispatcher<W, C> {
    watcher: W,
    watched: WatchSet,
    reconciler: Reconciler<C>,
}

impl<W: WatchService, C: Classifier> Dispatcher<W, C> {
    pub fn new(watcher: W, reconciler: Reconciler<C>) -> Self {
        Dispatcher {
            watcher,
            watched: WatchSet::default(),
            reconciler,
        }
    }

    #[cfg(test)]
    pub fn watched(&self) -> &WatchSet {
        &self.watched
    }

    pub fn reconciler(&self) -> &Reconciler<C> {
        &self.reconciler
    }

    /// Watches the mailbox root and every directory already below it.
    pub fn start(&mut self) -> Result<()> {
        let root = self.reconciler.layout().root().to_path_buf();
        self.register_tree(&root)?;
        info!("watching {} directories under {:?}", self.watched.len(), root);
        Ok(())
    }

    /// Watches `dir` and every directory inside it. Returns how many
    /// directories were added to the watch set.
    ///
    /// A directory which cannot be watched does not stop the others from
    /// being watched. The first failure is returned, later ones are logged.
    pub fn register_tree(&mut self, dir: &Path) -> Result<usize> {
        let mut added = 0;
        let mut first_error = None;
        for entry in WalkDir::new(dir)
            .into_iter()
            .filter_entry(|e| e.file_type().is_dir())
        {
            let result = entry
                .map_err(|e| Error::WatchRegistration {
                    path: e.path().unwrap_or(dir).to_path_buf(),
                    source: notify::Error::io(e.into()),
                })
                .and_then(|entry| self.watch_one(entry.into_path()));
            match result {
                Ok(true) => added += 1,
                Ok(false) => {}
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(e) => error!("{}", e),
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(added),
        }
    }

    /// Returns whether `path` is new to the watch set.
    fn watch_one(&mut self, path: PathBuf) -> Result<bool> {
        let fresh = !self.watched.contains(&path);
        // A directory recreated under an old name lost its watch along
        // with the old directory, so always ask again.
        self.watcher
            .watch_dir(&path)
            .map_err(|source| Error::WatchRegistration {
                path: path.clone(),
                source,
            })?;
        if fresh {
            debug!("watching {:?}", path);
            self.watched.insert(path);
        }
        Ok(fresh)
    }

    /// Handles one event. Returns whether a training command was issued.
    pub fn dispatch(&mut self, event: WatchEvent) -> Result<bool> {
        match event {
            WatchEvent::Created { path, is_dir: true }
            | WatchEvent::MovedIn { path, is_dir: true } => {
                let added = self.register_tree(&path)?;
                debug!("{:?}: {} new directories", path, added);
                Ok(false)
            }
            WatchEvent::Created { path, .. } | WatchEvent::MovedIn { path, .. } => {
                self.reconciler.update_status(&path)
            }
        }
    }

    /// Consumes events until the sending side goes away.
    pub fn run(&mut self, events: Receiver<notify::Result<Event>>) {
        for event in events {
            self.handle(event);
        }
    }

    /// Handles one raw notification, logging whatever goes wrong.
    pub fn handle(&mut self, event: notify::Result<Event>) {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                warn!("watch error: {}", e);
                return;
            }
        };
        let event = match WatchEvent::from_notify(event) {
            Some(event) => event,
            None => return,
        };
        if let Err(e) = self.dispatch(event) {
            error!("{}", e);
        }
    }
}
