use super::{Metric, Value, ValueType};
use crate::stats::{MemoryStats, Stats};

fn value(stats: &Stats, get: fn(&MemoryStats) -> u64) -> Option<Vec<Value>> {
    let memory = stats.memory.as_ref()?;
    Some(vec![Value::single(get(memory) as f64)])
}

pub(super) fn metrics() -> Vec<Metric> {
    vec![
        Metric {
            name: "memory_cache_bytes",
            help: "The cache amount used",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.cache),
        },
        Metric {
            name: "memory_rss_bytes",
            help: "The rss amount used",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.rss),
        },
        Metric {
            name: "memory_rss_huge_bytes",
            help: "The rss huge pages amount used",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.rss_huge),
        },
        Metric {
            name: "memory_mapped_file_bytes",
            help: "The mapped file amount used",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.mapped_file),
        },
        Metric {
            name: "memory_dirty_bytes",
            help: "The dirty pages amount",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.dirty),
        },
        Metric {
            name: "memory_writeback_bytes",
            help: "The writeback amount",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.writeback),
        },
        Metric {
            name: "memory_pgpgin_total",
            help: "The pgpgin amount",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.pgpgin),
        },
        Metric {
            name: "memory_pgpgout_total",
            help: "The pgpgout amount",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.pgpgout),
        },
        Metric {
            name: "memory_pgfault_total",
            help: "The pgfault amount",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.pgfault),
        },
        Metric {
            name: "memory_pgmajfault_total",
            help: "The pgmajfault amount",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.pgmajfault),
        },
        Metric {
            name: "memory_inactive_anon_bytes",
            help: "The inactive anonymous memory amount",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.inactive_anon),
        },
        Metric {
            name: "memory_active_anon_bytes",
            help: "The active anonymous memory amount",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.active_anon),
        },
        Metric {
            name: "memory_inactive_file_bytes",
            help: "The inactive file memory amount",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.inactive_file),
        },
        Metric {
            name: "memory_active_file_bytes",
            help: "The active file memory amount",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.active_file),
        },
        Metric {
            name: "memory_unevictable_bytes",
            help: "The unevictable memory amount",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.unevictable),
        },
        Metric {
            name: "memory_hierarchical_memory_limit_bytes",
            help: "The hierarchical memory limit",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.hierarchical_memory_limit),
        },
        Metric {
            name: "memory_hierarchical_memsw_limit_bytes",
            help: "The hierarchical memory plus swap limit",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.hierarchical_memsw_limit),
        },
        Metric {
            name: "memory_total_cache_bytes",
            help: "The total cache amount used",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.total_cache),
        },
        Metric {
            name: "memory_total_rss_bytes",
            help: "The total rss amount used",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.total_rss),
        },
        Metric {
            name: "memory_total_rss_huge_bytes",
            help: "The total rss huge pages amount used",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.total_rss_huge),
        },
        Metric {
            name: "memory_total_mapped_file_bytes",
            help: "The total mapped file amount used",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.total_mapped_file),
        },
        Metric {
            name: "memory_total_dirty_bytes",
            help: "The total dirty pages amount",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.total_dirty),
        },
        Metric {
            name: "memory_total_writeback_bytes",
            help: "The total writeback amount",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.total_writeback),
        },
        Metric {
            name: "memory_total_pgpgin_total",
            help: "The total pgpgin amount",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.total_pgpgin),
        },
        Metric {
            name: "memory_total_pgpgout_total",
            help: "The total pgpgout amount",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.total_pgpgout),
        },
        Metric {
            name: "memory_total_pgfault_total",
            help: "The total pgfault amount",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.total_pgfault),
        },
        Metric {
            name: "memory_total_pgmajfault_total",
            help: "The total pgmajfault amount",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.total_pgmajfault),
        },
        Metric {
            name: "memory_total_inactive_anon_bytes",
            help: "The total inactive anonymous memory amount",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.total_inactive_anon),
        },
        Metric {
            name: "memory_total_active_anon_bytes",
            help: "The total active anonymous memory amount",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.total_active_anon),
        },
        Metric {
            name: "memory_total_inactive_file_bytes",
            help: "The total inactive file memory amount",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.total_inactive_file),
        },
        Metric {
            name: "memory_total_active_file_bytes",
            help: "The total active file memory amount",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.total_active_file),
        },
        Metric {
            name: "memory_total_unevictable_bytes",
            help: "The total unevictable memory amount",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.total_unevictable),
        },
        Metric {
            name: "memory_usage_usage_bytes",
            help: "The memory usage",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.usage.usage),
        },
        Metric {
            name: "memory_usage_max_bytes",
            help: "The memory maximum usage",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.usage.max),
        },
        Metric {
            name: "memory_usage_failcnt_total",
            help: "The memory limit hit count",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.usage.failcnt),
        },
        Metric {
            name: "memory_usage_limit_bytes",
            help: "The memory limit",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.usage.limit),
        },
        Metric {
            name: "memory_swap_usage_bytes",
            help: "The swap usage",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.swap.usage),
        },
        Metric {
            name: "memory_swap_max_bytes",
            help: "The swap maximum usage",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.swap.max),
        },
        Metric {
            name: "memory_swap_failcnt_total",
            help: "The swap limit hit count",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.swap.failcnt),
        },
        Metric {
            name: "memory_swap_limit_bytes",
            help: "The swap limit",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.swap.limit),
        },
        Metric {
            name: "memory_kernel_usage_bytes",
            help: "The kernel memory usage",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.kernel.usage),
        },
        Metric {
            name: "memory_kernel_max_bytes",
            help: "The kernel memory maximum usage",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.kernel.max),
        },
        Metric {
            name: "memory_kernel_failcnt_total",
            help: "The kernel memory limit hit count",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.kernel.failcnt),
        },
        Metric {
            name: "memory_kernel_limit_bytes",
            help: "The kernel memory limit",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.kernel.limit),
        },
        Metric {
            name: "memory_kernel_tcp_usage_bytes",
            help: "The kernel tcp memory usage",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.kernel_tcp.usage),
        },
        Metric {
            name: "memory_kernel_tcp_max_bytes",
            help: "The kernel tcp memory maximum usage",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.kernel_tcp.max),
        },
        Metric {
            name: "memory_kernel_tcp_failcnt_total",
            help: "The kernel tcp memory limit hit count",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.kernel_tcp.failcnt),
        },
        Metric {
            name: "memory_kernel_tcp_limit_bytes",
            help: "The kernel tcp memory limit",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| value(stats, |memory| memory.kernel_tcp.limit),
        },
    ]
}
