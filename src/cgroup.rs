//! Named aggregates of resource controllers.

use std::fmt;
use std::path::Path;

use crate::controller::{self, Controller, Error, Name};
use crate::limits::Resources;
use crate::stats::Stats;

/// One cgroup: a relative hierarchy path plus the controllers active for it.
///
/// All controllers share the same relative path; operations fan across them
/// in order and stop at the first failure. The on-disk directories may be
/// removed externally at any time, in which case operations fail with the
/// underlying I/O error instead of panicking.
pub struct Cgroup {
    path: String,
    controllers: Vec<Box<dyn Controller>>,
}

impl Cgroup {
    /// Builds a cgroup from an explicit controller set.
    pub fn new(path: impl Into<String>, controllers: Vec<Box<dyn Controller>>) -> Self {
        Self {
            path: path.into(),
            controllers,
        }
    }

    /// Builds a cgroup aggregating every controller this crate implements,
    /// rooted at the v1 hierarchy mount `root`.
    pub fn v1(root: impl AsRef<Path>, path: impl Into<String>) -> Self {
        let controllers = Name::ALL
            .iter()
            .filter_map(|&name| controller::controller(name, root.as_ref()))
            .collect();
        Self::new(path, controllers)
    }

    /// Returns the relative hierarchy path shared by all controllers.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Creates the group under every controller and applies `resources`.
    pub fn create(&self, resources: &Resources) -> Result<(), Error> {
        for controller in &self.controllers {
            controller.create(&self.path, resources)?;
        }
        Ok(())
    }

    /// Applies `resources` to the live group under every controller.
    pub fn update(&self, resources: &Resources) -> Result<(), Error> {
        for controller in &self.controllers {
            controller.update(&self.path, resources)?;
        }
        Ok(())
    }

    /// Queries every controller and returns the combined snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first controller error; the snapshot under construction is
    /// discarded in that case.
    pub fn stat(&self) -> Result<Stats, Error> {
        let mut stats = Stats::default();
        for controller in &self.controllers {
            controller.stat(&self.path, &mut stats)?;
        }
        Ok(stats)
    }
}

impl fmt::Debug for Cgroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<Name> = self.controllers.iter().map(|c| c.name()).collect();
        f.debug_struct("Cgroup")
            .field("path", &self.path)
            .field("controllers", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::memory::testutil;
    use crate::limits::MemoryLimits;

    #[test]
    fn test_v1_aggregates_implemented_controllers() {
        let cgroup = Cgroup::v1("/sys/fs/cgroup", "mygroup");
        assert_eq!(cgroup.path(), "mygroup");
        let debug = format!("{cgroup:?}");
        assert!(debug.contains("Memory"));
    }

    #[test]
    fn test_create_then_stat_roundtrip() {
        let root = tempfile::tempdir().unwrap();
        let cgroup = Cgroup::v1(root.path(), "mygroup");
        testutil::populate(&root.path().join("memory/mygroup"));
        cgroup
            .create(&Resources::with_memory(MemoryLimits {
                limit: Some(100_000_000),
                ..Default::default()
            }))
            .unwrap();

        let stats = cgroup.stat().unwrap();
        let memory = stats.memory.unwrap();
        assert_eq!(memory.usage.limit, 100_000_000);
        assert_eq!(memory.cache, 1024);
    }

    #[test]
    fn test_stat_fails_for_removed_group() {
        let root = tempfile::tempdir().unwrap();
        let cgroup = Cgroup::v1(root.path(), "gone");
        assert!(cgroup.stat().is_err());
    }
}
