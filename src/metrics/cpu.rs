use super::{Metric, Value, ValueType};

pub(super) fn metrics() -> Vec<Metric> {
    vec![
        Metric {
            name: "cpu_total_nanoseconds",
            help: "The total cpu time for the cgroup",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| {
                let cpu = stats.cpu.as_ref()?;
                Some(vec![Value::single(cpu.usage.total as f64)])
            },
        },
        Metric {
            name: "cpu_kernel_nanoseconds",
            help: "The total kernel cpu time for the cgroup",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| {
                let cpu = stats.cpu.as_ref()?;
                Some(vec![Value::single(cpu.usage.kernel as f64)])
            },
        },
        Metric {
            name: "cpu_user_nanoseconds",
            help: "The total user cpu time for the cgroup",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| {
                let cpu = stats.cpu.as_ref()?;
                Some(vec![Value::single(cpu.usage.user as f64)])
            },
        },
        Metric {
            name: "per_cpu_nanoseconds",
            help: "The total cpu time per cpu",
            vt: ValueType::Counter,
            labels: &["cpu"],
            get_values: |stats| {
                let cpu = stats.cpu.as_ref()?;
                Some(
                    cpu.usage
                        .per_cpu
                        .iter()
                        .enumerate()
                        .map(|(index, time)| Value {
                            v: *time as f64,
                            labels: vec![index.to_string()],
                        })
                        .collect(),
                )
            },
        },
        Metric {
            name: "cpu_throttle_periods_total",
            help: "The total number of cpu enforcement periods",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| {
                let cpu = stats.cpu.as_ref()?;
                Some(vec![Value::single(cpu.throttling.periods as f64)])
            },
        },
        Metric {
            name: "cpu_throttled_periods_total",
            help: "The total number of periods the cgroup was throttled in",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| {
                let cpu = stats.cpu.as_ref()?;
                Some(vec![Value::single(cpu.throttling.throttled_periods as f64)])
            },
        },
        Metric {
            name: "cpu_throttled_time_nanoseconds",
            help: "The total time the cgroup spent throttled",
            vt: ValueType::Counter,
            labels: &[],
            get_values: |stats| {
                let cpu = stats.cpu.as_ref()?;
                Some(vec![Value::single(cpu.throttling.throttled_time as f64)])
            },
        },
    ]
}
