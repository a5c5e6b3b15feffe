use std::fs::Metadata;
use std::path::{Path, PathBuf};

/// Type of a filesystem entry, taken from its metadata at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Anything else (socket, fifo, device)
    Other,
}

impl NodeKind {
    /// Classifies metadata obtained by `stat`.
    #[must_use]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        if metadata.is_dir() {
            Self::Directory
        } else if metadata.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// A filesystem entry discovered by the scanner.
///
/// Never mutated after the scan; later stages wrap it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedNode {
    path: PathBuf,
    parent: PathBuf,
    name: String,
    kind: NodeKind,
}

impl ScannedNode {
    /// Creates a node for `name` inside `parent`.
    #[must_use]
    pub fn new(parent: impl Into<PathBuf>, name: impl Into<String>, kind: NodeKind) -> Self {
        let parent = parent.into();
        let name = name.into();
        Self {
            path: parent.join(&name),
            parent,
            name,
            kind,
        }
    }

    /// Absolute path of the node.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute path of the containing directory.
    #[must_use]
    pub fn parent(&self) -> &Path {
        &self.parent
    }

    /// Base name; the only part the find pattern is tested against.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry type.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns true if this is a regular file.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File)
    }

    /// Returns true if this is a directory.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory)
    }
}

/// A node that passed the type, match and exclusion filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateNode {
    node: ScannedNode,
}

impl CandidateNode {
    pub(crate) const fn new(node: ScannedNode) -> Self {
        Self { node }
    }

    /// The scanned node this candidate was selected from.
    #[must_use]
    pub const fn node(&self) -> &ScannedNode {
        &self.node
    }

    /// Unwraps the scanned node.
    #[must_use]
    pub fn into_node(self) -> ScannedNode {
        self.node
    }
}

/// A candidate paired with its computed target.
///
/// `new_path` is derived from the parent and name recorded at scan time, so
/// renames applied earlier in the same run never change it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    node: ScannedNode,
    new_name: String,
    new_path: PathBuf,
}

impl RenamePlan {
    /// Creates a plan renaming `node` to `new_name` within its parent.
    #[must_use]
    pub fn new(node: ScannedNode, new_name: impl Into<String>) -> Self {
        let new_name = new_name.into();
        let new_path = node.parent().join(&new_name);
        Self {
            node,
            new_name,
            new_path,
        }
    }

    /// The original node.
    #[must_use]
    pub const fn node(&self) -> &ScannedNode {
        &self.node
    }

    /// Current path of the node.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.node.path()
    }

    /// Current base name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.node.name()
    }

    /// Computed base name.
    #[must_use]
    pub fn new_name(&self) -> &str {
        &self.new_name
    }

    /// Computed target path.
    #[must_use]
    pub fn new_path(&self) -> &Path {
        &self.new_path
    }

    /// Returns true if substitution left the name as it was.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.new_name == self.node.name()
    }
}
