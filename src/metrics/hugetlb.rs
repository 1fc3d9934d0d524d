use super::{Metric, Value, ValueType};
use crate::stats::HugetlbStats;

fn page_values(hugetlb: &[HugetlbStats], get: fn(&HugetlbStats) -> u64) -> Option<Vec<Value>> {
    if hugetlb.is_empty() {
        return None;
    }
    Some(
        hugetlb
            .iter()
            .map(|entry| Value {
                v: get(entry) as f64,
                labels: vec![entry.page_size.clone()],
            })
            .collect(),
    )
}

pub(super) fn metrics() -> Vec<Metric> {
    vec![
        Metric {
            name: "hugetlb_usage_bytes",
            help: "The hugetlb usage per page size",
            vt: ValueType::Gauge,
            labels: &["page"],
            get_values: |stats| page_values(&stats.hugetlb, |entry| entry.usage),
        },
        Metric {
            name: "hugetlb_max_bytes",
            help: "The hugetlb maximum usage per page size",
            vt: ValueType::Gauge,
            labels: &["page"],
            get_values: |stats| page_values(&stats.hugetlb, |entry| entry.max),
        },
        Metric {
            name: "hugetlb_failcnt_total",
            help: "The hugetlb allocation failure count per page size",
            vt: ValueType::Counter,
            labels: &["page"],
            get_values: |stats| page_values(&stats.hugetlb, |entry| entry.failcnt),
        },
    ]
}
