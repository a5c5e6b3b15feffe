use crate::{
    config::Config,
    error::{Error, Result},
    node::{NodeKind, ScannedNode},
};
use ignore::{DirEntry, WalkBuilder, WalkState};
use std::{fs, path::PathBuf, sync::mpsc};
use tracing::{debug, trace, warn};

/// Statistics collected during scanning.
#[derive(Debug, Default, Clone)]
pub(crate) struct ScanStats {
    /// Regular files found
    files: usize,

    /// Directories found
    directories: usize,

    /// Other entries (sockets, fifos, devices)
    other: usize,

    /// Entries skipped because of walk or metadata errors
    skipped: usize,
}

enum ScanEvent {
    Found(ScannedNode),
    Skipped,
}

/// Walks the root directory and collects nodes with their metadata.
pub(crate) struct Scanner {
    root_dir: PathBuf,
    recursive: bool,
}

impl Scanner {
    /// Creates a new scanner from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            root_dir: config.root_dir.clone(),
            recursive: config.recursive,
        }
    }

    /// Scans the root directory and returns every node below it, sorted by path.
    ///
    /// Metadata lookups run on the walker's worker threads. Nothing is
    /// returned until all of them have completed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Path`] if the root is missing or not a directory and
    /// [`Error::Io`] if it cannot be read. Errors below the root are logged
    /// and the entry skipped.
    pub(crate) fn scan(&self) -> Result<Vec<ScannedNode>> {
        if !self.root_dir.is_dir() {
            return Err(Error::path(&self.root_dir, "root path is not a directory"));
        }
        fs::read_dir(&self.root_dir).map_err(|e| Error::io(&self.root_dir, e))?;

        debug!(
            "Starting {} scan of {}",
            if self.recursive { "recursive" } else { "shallow" },
            self.root_dir.display()
        );

        let (tx, rx) = mpsc::channel();

        let walker = WalkBuilder::new(&self.root_dir)
            .standard_filters(false)
            .follow_links(false)
            .max_depth(if self.recursive { None } else { Some(1) })
            .threads(num_cpus::get())
            .build_parallel();

        walker.run(|| {
            let tx = tx.clone();
            Box::new(move |result| {
                let event = match result {
                    Ok(entry) if entry.depth() == 0 => return WalkState::Continue,
                    Ok(entry) => Self::inspect(&entry),
                    Err(e) => {
                        warn!("Walk error: {}", e);
                        ScanEvent::Skipped
                    }
                };

                if tx.send(event).is_err() {
                    return WalkState::Quit;
                }
                WalkState::Continue
            })
        });
        drop(tx);

        let mut stats = ScanStats::default();
        let mut nodes = Vec::new();
        for event in rx {
            match event {
                ScanEvent::Found(node) => {
                    match node.kind() {
                        NodeKind::File => stats.files += 1,
                        NodeKind::Directory => stats.directories += 1,
                        NodeKind::Other => stats.other += 1,
                    }
                    nodes.push(node);
                }
                ScanEvent::Skipped => stats.skipped += 1,
            }
        }

        debug!(
            "Scan complete: {} files, {} directories, {} other, {} skipped",
            stats.files, stats.directories, stats.other, stats.skipped
        );

        if stats.skipped > 0 {
            warn!("Skipped {} entries during scanning (non-fatal)", stats.skipped);
        }

        // Sort for deterministic ordering
        nodes.sort_by(|a, b| a.path().cmp(b.path()));

        Ok(nodes)
    }

    /// Looks up the metadata of a single entry.
    ///
    /// Uses `stat`, so a symlink is classified by its target. The walker never
    /// descends through symlinks.
    fn inspect(entry: &DirEntry) -> ScanEvent {
        let path = entry.path();

        let Some(name) = entry.file_name().to_str() else {
            warn!("Skipping entry with non UTF-8 name: {}", path.display());
            return ScanEvent::Skipped;
        };
        let Some(parent) = path.parent() else {
            return ScanEvent::Skipped;
        };

        match fs::metadata(path) {
            Ok(metadata) => {
                let kind = NodeKind::from_metadata(&metadata);
                trace!("Found {:?}: {}", kind, path.display());
                ScanEvent::Found(ScannedNode::new(parent, name, kind))
            }
            Err(e) => {
                warn!("Failed to stat {}: {}", path.display(), e);
                ScanEvent::Skipped
            }
        }
    }
}
