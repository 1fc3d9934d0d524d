//! The memory controller, reference implementation of [`Controller`].
//!
//! The memory subsystem is the most constrained of the v1 controllers:
//!
//! - Kernel-memory accounting can only be activated while the cgroup has
//!   neither tasks nor children. Activation is a probe: write `1`, then `-1`,
//!   to `memory.kmem.limit_in_bytes`. An `EBUSY` from the kernel at that
//!   point means the lifecycle window has closed and is reported as
//!   [`Error::KernelMemoryBusy`].
//! - The kernel enforces `memsw.limit_in_bytes >= limit_in_bytes` at all
//!   times, so updating both limits in one call requires choosing a write
//!   order that never transiently violates the invariant (grow swap first,
//!   shrink memory first).
//! - OOM notifications are delivered through an eventfd registered against
//!   the group's `cgroup.event_control` file.
//!
//! Counter reads come from `memory.stat` (`key value` lines, missing keys
//! defaulting to zero) plus four files for each of the plain, swap, kernel
//! and kernel TCP usage classes, all of which must be readable for a stat
//! pass to succeed.

use std::io::{self, BufReader, Write as _};
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::path::{Path, PathBuf};

use nix::sys::eventfd::{EfdFlags, eventfd};

use crate::fsutil::{self, FileError};
use crate::limits::{MemoryLimits, Resources};
use crate::stats::{MemoryEntry, MemoryStats, Stats, parse_kv};

use super::{Controller, Error, Name};

/// Controls the `memory` subsystem of a cgroup v1 hierarchy.
#[derive(Debug)]
pub struct MemoryController {
    root: PathBuf,
}

impl MemoryController {
    /// Creates a controller rooted at `<root>/memory`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().join(Name::Memory.as_str()),
        }
    }

    /// Registers an OOM notification channel for the cgroup at `path`.
    ///
    /// Opens the group's `memory.oom_control` file, creates an eventfd and
    /// registers the pair with the kernel via `cgroup.event_control`. The
    /// control file is closed again before returning; the kernel keeps the
    /// registration alive for as long as the returned descriptor is open.
    ///
    /// The caller owns the returned descriptor and receives one counter
    /// increment on it per OOM event. Registering twice yields two
    /// independent descriptors.
    ///
    /// # Errors
    ///
    /// Fails if the control file is missing (e.g. the cgroup was removed) or
    /// the registration write is rejected. The eventfd never outlives a
    /// failed registration.
    pub fn register_oom_event(&self, path: &str) -> Result<OwnedFd, Error> {
        let root = self.path(path);
        let control = fsutil::open_file(root.join("memory.oom_control"))?;
        let efd = eventfd(0, EfdFlags::EFD_CLOEXEC).map_err(|errno| {
            FileError::new(
                "create eventfd for",
                &root,
                io::Error::from_raw_os_error(errno as i32),
            )
        })?;
        // On failure `efd` drops here, closing the descriptor.
        write_event_control(&root, efd.as_raw_fd(), control.as_raw_fd())?;
        Ok(efd)
    }

    /// Probes `memory.kmem.limit_in_bytes` with `1` then `-1` to activate
    /// kernel-memory accounting. Without this, kernel memory is not
    /// accounted at all; with tasks or children already present the kernel
    /// answers `EBUSY`.
    fn enable_kernel_memory(&self, path: &str) -> Result<(), Error> {
        let limit_path = self.path(path).join("memory.kmem.limit_in_bytes");
        for probe in [1i64, -1] {
            fsutil::write_value(&limit_path, probe).map_err(|err| {
                if err.source.raw_os_error() == Some(libc::EBUSY) {
                    Error::KernelMemoryBusy {
                        path: self.path(path),
                    }
                } else {
                    Error::File(err)
                }
            })?;
        }
        Ok(())
    }

    fn apply(&self, path: &str, settings: &[Setting]) -> Result<(), Error> {
        for setting in settings {
            if let Some(value) = setting.value {
                let file = self.path(path).join(format!("memory.{}", setting.name));
                fsutil::write_value(file, value)?;
            }
        }
        Ok(())
    }
}

impl Controller for MemoryController {
    fn name(&self) -> Name {
        Name::Memory
    }

    fn path(&self, path: &str) -> PathBuf {
        super::join(&self.root, path)
    }

    fn create(&self, path: &str, resources: &Resources) -> Result<(), Error> {
        fsutil::create_dir_all(self.path(path))?;
        let Some(memory) = resources.memory.as_ref() else {
            return Ok(());
        };
        if memory.kernel.is_some() {
            self.enable_kernel_memory(path)?;
        }
        self.apply(path, &settings(memory))
    }

    fn update(&self, path: &str, resources: &Resources) -> Result<(), Error> {
        let Some(memory) = resources.memory.as_ref() else {
            return Ok(());
        };
        let both_provided =
            matches!((memory.limit, memory.swap), (Some(l), Some(s)) if l > 0 && s > 0);
        let settings = if both_provided {
            let current = fsutil::read_uint(self.path(path).join("memory.limit_in_bytes"))?;
            update_settings(memory, current)
        } else {
            settings(memory)
        };
        self.apply(path, &settings)
    }

    fn stat(&self, path: &str, stats: &mut Stats) -> Result<(), Error> {
        let root = self.path(path);
        let stat_path = root.join("memory.stat");
        let file = fsutil::open_file(&stat_path)?;
        let raw = parse_kv(BufReader::new(file)).map_err(|source| Error::Stat {
            path: stat_path,
            source,
        })?;

        // Counters absent from memory.stat read as zero; the kernel only
        // emits the ones the running configuration supports.
        let get = |key: &str| raw.get(key).copied().unwrap_or_default();
        let mut memory = MemoryStats {
            cache: get("cache"),
            rss: get("rss"),
            rss_huge: get("rss_huge"),
            mapped_file: get("mapped_file"),
            dirty: get("dirty"),
            writeback: get("writeback"),
            pgpgin: get("pgpgin"),
            pgpgout: get("pgpgout"),
            pgfault: get("pgfault"),
            pgmajfault: get("pgmajfault"),
            inactive_anon: get("inactive_anon"),
            active_anon: get("active_anon"),
            inactive_file: get("inactive_file"),
            active_file: get("active_file"),
            unevictable: get("unevictable"),
            hierarchical_memory_limit: get("hierarchical_memory_limit"),
            hierarchical_memsw_limit: get("hierarchical_memsw_limit"),
            total_cache: get("total_cache"),
            total_rss: get("total_rss"),
            total_rss_huge: get("total_rss_huge"),
            total_mapped_file: get("total_mapped_file"),
            total_dirty: get("total_dirty"),
            total_writeback: get("total_writeback"),
            total_pgpgin: get("total_pgpgin"),
            total_pgpgout: get("total_pgpgout"),
            total_pgfault: get("total_pgfault"),
            total_pgmajfault: get("total_pgmajfault"),
            total_inactive_anon: get("total_inactive_anon"),
            total_active_anon: get("total_active_anon"),
            total_inactive_file: get("total_inactive_file"),
            total_active_file: get("total_active_file"),
            total_unevictable: get("total_unevictable"),
            ..Default::default()
        };

        memory.usage = read_entry(&root, "")?;
        memory.swap = read_entry(&root, "memsw")?;
        memory.kernel = read_entry(&root, "kmem")?;
        memory.kernel_tcp = read_entry(&root, "kmem.tcp")?;

        stats.memory = Some(memory);
        Ok(())
    }
}

/// Registers an eventfd against a cgroup: the event-control protocol is the
/// two descriptors as decimal integers separated by a single space.
fn write_event_control(root: &Path, efd: RawFd, cfd: RawFd) -> Result<(), FileError> {
    let path = root.join("cgroup.event_control");
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .open(&path)
        .map_err(|source| FileError::new("open", &path, source))?;
    write!(file, "{efd} {cfd}").map_err(|source| FileError::new("write", &path, source))
}

/// Reads the four counter files of one usage class. `module` is empty for
/// plain usage, or one of `memsw`, `kmem`, `kmem.tcp`.
///
/// Unlike `memory.stat` keys, these files are required: any read failure is
/// fatal to the whole stat pass.
fn read_entry(root: &Path, module: &str) -> Result<MemoryEntry, Error> {
    let file = |name: &str| {
        if module.is_empty() {
            root.join(format!("memory.{name}"))
        } else {
            root.join(format!("memory.{module}.{name}"))
        }
    };
    Ok(MemoryEntry {
        usage: fsutil::read_uint(file("usage_in_bytes"))?,
        max: fsutil::read_uint(file("max_usage_in_bytes"))?,
        failcnt: fsutil::read_uint(file("failcnt"))?,
        limit: fsutil::read_uint(file("limit_in_bytes"))?,
    })
}

/// One optional limit write, skipped entirely when the knob was not provided.
struct Setting {
    name: &'static str,
    value: Option<u64>,
}

/// The ordered limit-settings list. The memory limit and the swap limit sit
/// at indices 0 and 1 so the update path can reorder them.
fn settings(memory: &MemoryLimits) -> Vec<Setting> {
    vec![
        Setting {
            name: "limit_in_bytes",
            value: memory.limit,
        },
        Setting {
            name: "memsw.limit_in_bytes",
            value: memory.swap,
        },
        Setting {
            name: "kmem.limit_in_bytes",
            value: memory.kernel,
        },
        Setting {
            name: "kmem.tcp.limit_in_bytes",
            value: memory.kernel_tcp,
        },
        Setting {
            name: "oom_control",
            value: oom_control_value(memory),
        },
        Setting {
            name: "swappiness",
            value: memory.swappiness,
        },
    ]
}

/// Chooses the write order for a combined memory/swap update.
///
/// The kernel rejects any state where the swap limit is below the memory
/// limit. When the new swap limit exceeds the current memory limit, capacity
/// is growing: write swap first so the memory write lands under it. Otherwise
/// capacity is shrinking: write memory first so the swap write never
/// undercuts it.
fn update_settings(memory: &MemoryLimits, current_limit: u64) -> Vec<Setting> {
    let mut settings = settings(memory);
    if memory.swap.is_some_and(|swap| current_limit < swap) {
        settings.swap(0, 1);
    }
    settings
}

/// The OOM-killer-disable flag is written as `1` when set; it is never
/// written as `0`.
fn oom_control_value(memory: &MemoryLimits) -> Option<u64> {
    memory.disable_oom_killer.unwrap_or(false).then_some(1)
}
