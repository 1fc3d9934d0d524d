//! Point-in-time resource-usage snapshots for one cgroup.
//!
//! A [`Stats`] value aggregates the counters of every resource dimension a
//! cgroup is subject to. Each dimension's sub-record starts out absent and is
//! populated by the controller owning that dimension during a
//! [`stat`](crate::controller::Controller::stat) pass; a dimension that no
//! tracked controller covers simply stays `None`.
//!
//! Snapshots are plain data: cloning one is cheap enough for fan-out, and all
//! records serialize for downstream consumers that want raw counters instead
//! of the exported metric series.

mod error;
mod parser;

pub use error::StatParseError;
pub use parser::parse_kv;

use serde::Serialize;

/// A point-in-time aggregate of resource usage, keyed by dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Process-count accounting from the pids controller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pids: Option<PidsStats>,
    /// CPU time and throttling from the cpu/cpuacct controllers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuStats>,
    /// Memory accounting from the memory controller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryStats>,
    /// Huge-page accounting, one record per supported page size.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hugetlb: Vec<HugetlbStats>,
    /// Block-I/O accounting from the blkio controller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blkio: Option<BlkioStats>,
}

/// Process-count accounting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PidsStats {
    /// Number of tasks currently in the cgroup.
    pub current: u64,
    /// Maximum number of tasks, 0 meaning unlimited.
    pub limit: u64,
}

/// CPU usage and throttling counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CpuStats {
    pub usage: CpuUsage,
    pub throttling: Throttle,
}

/// CPU time consumed by the cgroup, in nanoseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CpuUsage {
    /// Total time across all CPUs.
    pub total: u64,
    /// Per-CPU breakdown of `total`, indexed by CPU number.
    pub per_cpu: Vec<u64>,
    /// Time spent in kernel space.
    pub kernel: u64,
    /// Time spent in user space.
    pub user: u64,
}

/// Bandwidth-throttling counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Throttle {
    /// Number of enforcement periods that have elapsed.
    pub periods: u64,
    /// Number of periods in which the cgroup hit its quota.
    pub throttled_periods: u64,
    /// Total time the cgroup spent throttled, in nanoseconds.
    pub throttled_time: u64,
}

/// Memory counters from `memory.stat` plus the four usage classes.
///
/// Field names follow the kernel's counter names; the `total_` variants are
/// the hierarchical sums including descendant cgroups. A counter the kernel
/// did not report reads as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    pub cache: u64,
    pub rss: u64,
    pub rss_huge: u64,
    pub mapped_file: u64,
    pub dirty: u64,
    pub writeback: u64,
    pub pgpgin: u64,
    pub pgpgout: u64,
    pub pgfault: u64,
    pub pgmajfault: u64,
    pub inactive_anon: u64,
    pub active_anon: u64,
    pub inactive_file: u64,
    pub active_file: u64,
    pub unevictable: u64,
    pub hierarchical_memory_limit: u64,
    pub hierarchical_memsw_limit: u64,
    pub total_cache: u64,
    pub total_rss: u64,
    pub total_rss_huge: u64,
    pub total_mapped_file: u64,
    pub total_dirty: u64,
    pub total_writeback: u64,
    pub total_pgpgin: u64,
    pub total_pgpgout: u64,
    pub total_pgfault: u64,
    pub total_pgmajfault: u64,
    pub total_inactive_anon: u64,
    pub total_active_anon: u64,
    pub total_inactive_file: u64,
    pub total_active_file: u64,
    pub total_unevictable: u64,
    /// Plain memory usage (`memory.usage_in_bytes` and friends).
    pub usage: MemoryEntry,
    /// Memory-plus-swap usage (`memory.memsw.*`).
    pub swap: MemoryEntry,
    /// Kernel memory usage (`memory.kmem.*`).
    pub kernel: MemoryEntry,
    /// Kernel TCP buffer usage (`memory.kmem.tcp.*`).
    pub kernel_tcp: MemoryEntry,
}

/// One usage class of the memory controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryEntry {
    /// Configured limit in bytes.
    pub limit: u64,
    /// Current usage in bytes.
    pub usage: u64,
    /// High-water mark in bytes.
    pub max: u64,
    /// Number of times usage hit the limit.
    pub failcnt: u64,
}

/// Huge-page accounting for one page size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HugetlbStats {
    /// Kernel page-size name, e.g. `2MB` or `1GB`.
    pub page_size: String,
    pub usage: u64,
    pub max: u64,
    pub failcnt: u64,
}

/// Block-I/O accounting, one entry list per kernel counter file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlkioStats {
    pub io_merged_recursive: Vec<BlkioEntry>,
    pub io_queued_recursive: Vec<BlkioEntry>,
    pub io_service_bytes_recursive: Vec<BlkioEntry>,
    pub io_service_time_recursive: Vec<BlkioEntry>,
    pub io_serviced_recursive: Vec<BlkioEntry>,
    pub io_time_recursive: Vec<BlkioEntry>,
    pub io_wait_time_recursive: Vec<BlkioEntry>,
    pub sectors_recursive: Vec<BlkioEntry>,
}

/// One per-device, per-operation block-I/O counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlkioEntry {
    /// Operation name as reported by the kernel (`Read`, `Write`, `Sync`, …).
    pub op: String,
    /// Device node path, when resolved.
    pub device: String,
    pub major: u64,
    pub minor: u64,
    pub value: u64,
}
