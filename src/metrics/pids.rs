use super::{Metric, Value, ValueType};

pub(super) fn metrics() -> Vec<Metric> {
    vec![
        Metric {
            name: "pids_current",
            help: "The current number of pids in the cgroup",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| {
                let pids = stats.pids.as_ref()?;
                Some(vec![Value::single(pids.current as f64)])
            },
        },
        Metric {
            name: "pids_limit",
            help: "The limit to the number of pids in the cgroup",
            vt: ValueType::Gauge,
            labels: &[],
            get_values: |stats| {
                let pids = stats.pids.as_ref()?;
                Some(vec![Value::single(pids.limit as f64)])
            },
        },
    ]
}
