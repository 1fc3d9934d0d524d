use super::{Metric, Value, ValueType};
use crate::stats::BlkioEntry;

/// Expands one kernel counter list into one sample per device and operation.
fn blkio_values(entries: &[BlkioEntry]) -> Option<Vec<Value>> {
    if entries.is_empty() {
        return None;
    }
    Some(
        entries
            .iter()
            .map(|entry| Value {
                v: entry.value as f64,
                labels: vec![
                    entry.op.clone(),
                    entry.major.to_string(),
                    entry.minor.to_string(),
                ],
            })
            .collect(),
    )
}

pub(super) fn metrics() -> Vec<Metric> {
    vec![
        Metric {
            name: "blkio_io_merged_recursive_total",
            help: "The blkio io merged recursive",
            vt: ValueType::Counter,
            labels: &["op", "major", "minor"],
            get_values: |stats| blkio_values(&stats.blkio.as_ref()?.io_merged_recursive),
        },
        Metric {
            name: "blkio_io_queued_recursive_total",
            help: "The blkio io queued recursive",
            vt: ValueType::Counter,
            labels: &["op", "major", "minor"],
            get_values: |stats| blkio_values(&stats.blkio.as_ref()?.io_queued_recursive),
        },
        Metric {
            name: "blkio_io_service_bytes_recursive_bytes",
            help: "The blkio io service bytes recursive",
            vt: ValueType::Counter,
            labels: &["op", "major", "minor"],
            get_values: |stats| blkio_values(&stats.blkio.as_ref()?.io_service_bytes_recursive),
        },
        Metric {
            name: "blkio_io_service_time_recursive_total",
            help: "The blkio io service time recursive",
            vt: ValueType::Counter,
            labels: &["op", "major", "minor"],
            get_values: |stats| blkio_values(&stats.blkio.as_ref()?.io_service_time_recursive),
        },
        Metric {
            name: "blkio_io_serviced_recursive_total",
            help: "The blkio io serviced recursive",
            vt: ValueType::Counter,
            labels: &["op", "major", "minor"],
            get_values: |stats| blkio_values(&stats.blkio.as_ref()?.io_serviced_recursive),
        },
        Metric {
            name: "blkio_io_time_recursive_total",
            help: "The blkio io time recursive",
            vt: ValueType::Counter,
            labels: &["op", "major", "minor"],
            get_values: |stats| blkio_values(&stats.blkio.as_ref()?.io_time_recursive),
        },
        Metric {
            name: "blkio_io_wait_time_recursive_total",
            help: "The blkio io wait time recursive",
            vt: ValueType::Counter,
            labels: &["op", "major", "minor"],
            get_values: |stats| blkio_values(&stats.blkio.as_ref()?.io_wait_time_recursive),
        },
        Metric {
            name: "blkio_sectors_recursive_total",
            help: "The blkio sectors recursive",
            vt: ValueType::Counter,
            labels: &["op", "major", "minor"],
            get_values: |stats| blkio_values(&stats.blkio.as_ref()?.sectors_recursive),
        },
    ]
}
