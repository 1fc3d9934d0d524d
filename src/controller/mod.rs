//! The resource-controller abstraction over cgroup v1 hierarchies.
//!
//! Each controller owns one subsystem subtree of a mounted v1 hierarchy
//! (`<root>/<subsystem>`) and exposes the same small contract: create a group
//! directory and apply limits, update limits on a live group, and read the
//! group's counters into a [`Stats`] sub-record. Controllers are stateless
//! beyond their root path; all mutable state lives in the kernel filesystem
//! they wrap, so a single controller value serves every cgroup path under its
//! hierarchy for the life of the process.
//!
//! This crate ships the memory controller. The remaining subsystems follow
//! the identical interface and lifecycle pattern and differ only in field
//! sets and file names; they are expected to be supplied by the embedding
//! runtime via the same [`Controller`] trait.

pub(crate) mod memory;

pub use memory::MemoryController;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::fsutil::FileError;
use crate::limits::Resources;
use crate::stats::{StatParseError, Stats};

/// The fixed enumeration of cgroup v1 subsystem names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Name {
    Blkio,
    Cpu,
    Cpuacct,
    Cpuset,
    Devices,
    Freezer,
    Hugetlb,
    Memory,
    NetCls,
    NetPrio,
    PerfEvent,
    Pids,
}

impl Name {
    /// Every subsystem name, in kernel listing order.
    pub const ALL: [Name; 12] = [
        Name::Blkio,
        Name::Cpu,
        Name::Cpuacct,
        Name::Cpuset,
        Name::Devices,
        Name::Freezer,
        Name::Hugetlb,
        Name::Memory,
        Name::NetCls,
        Name::NetPrio,
        Name::PerfEvent,
        Name::Pids,
    ];

    /// Returns the kernel directory name of the subsystem.
    pub fn as_str(self) -> &'static str {
        match self {
            Name::Blkio => "blkio",
            Name::Cpu => "cpu",
            Name::Cpuacct => "cpuacct",
            Name::Cpuset => "cpuset",
            Name::Devices => "devices",
            Name::Freezer => "freezer",
            Name::Hugetlb => "hugetlb",
            Name::Memory => "memory",
            Name::NetCls => "net_cls",
            Name::NetPrio => "net_prio",
            Name::PerfEvent => "perf_event",
            Name::Pids => "pids",
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by controller operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The kernel refused to toggle kernel-memory accounting. The toggle is
    /// only accepted while the cgroup has neither tasks nor children, so this
    /// is a lifecycle conflict rather than an I/O failure, and callers may
    /// retry once the group is empty again.
    #[error(
        "failed to set kernel memory limit on `{path}`: tasks have already joined this cgroup or it has children"
    )]
    KernelMemoryBusy { path: PathBuf },

    /// An operation on a kernel control file failed.
    #[error(transparent)]
    File(#[from] FileError),

    /// A counter file held data the parser could not understand.
    #[error("failed to parse `{path}`: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: StatParseError,
    },
}

/// One resource dimension of a cgroup v1 hierarchy.
///
/// Implementations must not synchronize concurrent operations on the same
/// relative path; the caller driving the cgroup lifecycle owns that ordering.
pub trait Controller: Send + Sync {
    /// Returns the fixed dimension identifier.
    fn name(&self) -> Name;

    /// Joins the controller root with the relative cgroup path `path`.
    ///
    /// Pure concatenation: no existence check and no traversal
    /// sanitization is performed. A leading `/` on `path` is treated as
    /// relative to the controller root.
    fn path(&self, path: &str) -> PathBuf;

    /// Ensures the on-disk directory for `path` exists (creating parents as
    /// needed) and applies every provided limit.
    ///
    /// Idempotent: repeating a create with the same limits re-applies the
    /// same values without error.
    fn create(&self, path: &str, resources: &Resources) -> Result<(), Error>;

    /// Applies the provided limits to a live cgroup. Never creates the
    /// directory.
    fn update(&self, path: &str, resources: &Resources) -> Result<(), Error>;

    /// Reads the dimension's kernel counter files and populates its
    /// sub-record of `stats`.
    ///
    /// On error the sub-record may be partially populated; callers must not
    /// rely on its contents.
    fn stat(&self, path: &str, stats: &mut Stats) -> Result<(), Error>;
}

/// Constructs the controller for `name` rooted at the hierarchy mount `root`.
///
/// Returns `None` for the dimensions this crate leaves to the embedding
/// runtime.
pub fn controller(name: Name, root: &Path) -> Option<Box<dyn Controller>> {
    match name {
        Name::Memory => Some(Box::new(MemoryController::new(root))),
        _ => None,
    }
}

/// Root-joins a relative cgroup path, tolerating a leading `/`.
pub(crate) fn join(root: &Path, path: &str) -> PathBuf {
    root.join(path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_directory_names() {
        assert_eq!(Name::Memory.as_str(), "memory");
        assert_eq!(Name::NetCls.as_str(), "net_cls");
        assert_eq!(Name::PerfEvent.as_str(), "perf_event");
        assert_eq!(Name::Memory.to_string(), "memory");
    }

    #[test]
    fn test_factory_constructs_memory_only() {
        let root = Path::new("/sys/fs/cgroup");
        let memory = controller(Name::Memory, root).expect("memory controller");
        assert_eq!(memory.name(), Name::Memory);
        assert!(controller(Name::Cpu, root).is_none());
        assert!(controller(Name::Freezer, root).is_none());
    }

    #[test]
    fn test_join_tolerates_leading_slash() {
        let root = Path::new("/sys/fs/cgroup/memory");
        assert_eq!(join(root, "mygroup"), root.join("mygroup"));
        assert_eq!(join(root, "/mygroup"), root.join("mygroup"));
        assert_eq!(join(root, "a/b"), root.join("a/b"));
    }
}
