//! Prometheus export pipeline for tracked cgroups.
//!
//! A [`Collector`] owns a registry of tracked cgroups keyed by an external
//! identifier and the static table of exported metrics, one sub-table per
//! resource dimension. On every scrape it snapshots the tracked set, releases
//! the registry lock, and queries each cgroup's counters on its own thread;
//! a cgroup whose stat fails is logged and skipped so one broken group never
//! suppresses the samples of the others.
//!
//! Every sample carries the tracked identifier as its `id` label; dimensions
//! with sub-series add their own labels (block I/O expands into one sample
//! per device and operation, huge pages per page size, per-CPU time per CPU
//! index).
//!
//! ```no_run
//! use cgctl::{Cgroup, Collector};
//!
//! let registry = prometheus::Registry::new();
//! let collector = Collector::new(&registry)?;
//! collector.add("redis", Cgroup::v1("/sys/fs/cgroup", "redis"))?;
//! // every registry.gather() now stats the tracked cgroups
//! # Ok::<(), cgctl::metrics::Error>(())
//! ```

mod blkio;
mod cpu;
mod hugetlb;
mod memory;
mod pids;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, RwLock};
use std::thread;

use prometheus::Registry;
use prometheus::core::{Desc, Describer};
use prometheus::proto::{self, MetricFamily, MetricType};
use protobuf::RepeatedField;

use crate::cgroup::Cgroup;
use crate::stats::Stats;

const NAMESPACE: &str = "container";

/// Errors reported by the collector registry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned by [`Collector::add`] when the identifier is already tracked.
    /// The existing entry is left untouched; a duplicate add usually
    /// indicates a retried admission and is safe to treat as a no-op.
    #[error("cgroup `{id}` is already being collected")]
    AlreadyCollected { id: String },

    /// Descriptor construction or prometheus-side registration failed.
    #[error(transparent)]
    Register(#[from] prometheus::Error),
}

/// Whether a metric exports as a gauge or a monotonic counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueType {
    Gauge,
    Counter,
}

/// One labeled sample extracted from a snapshot.
pub(crate) struct Value {
    pub v: f64,
    /// Label values beyond the cgroup identifier, in the order of the
    /// metric's label names.
    pub labels: Vec<String>,
}

impl Value {
    pub(crate) fn single(v: f64) -> Self {
        Self {
            v,
            labels: Vec::new(),
        }
    }
}

/// Static definition of one exported metric series.
pub(crate) struct Metric {
    pub name: &'static str,
    pub help: &'static str,
    pub vt: ValueType,
    /// Label names beyond the implicit `id` label.
    pub labels: &'static [&'static str],
    /// Extracts the samples; `None` when the dimension is absent from the
    /// snapshot.
    pub get_values: fn(&Stats) -> Option<Vec<Value>>,
}

impl Metric {
    fn desc(&self) -> Result<Desc, prometheus::Error> {
        let labels: Vec<String> = std::iter::once("id")
            .chain(self.labels.iter().copied())
            .map(String::from)
            .collect();
        prometheus::Opts::new(self.name, self.help)
            .namespace(NAMESPACE)
            .variable_labels(labels)
            .describe()
    }

    /// Renders the metric's samples for one cgroup as a constant metric
    /// family. Returns `None` when the snapshot has nothing to contribute.
    fn collect(&self, id: &str, stats: &Stats) -> Option<MetricFamily> {
        let values = (self.get_values)(stats)?;
        if values.is_empty() {
            return None;
        }
        let metrics: Vec<proto::Metric> = values
            .into_iter()
            .map(|value| {
                let mut metric = proto::Metric::default();
                let mut pairs = Vec::with_capacity(1 + self.labels.len());
                pairs.push(label_pair("id", id));
                for (name, label) in self.labels.iter().zip(&value.labels) {
                    pairs.push(label_pair(name, label));
                }
                metric.set_label(RepeatedField::from_vec(pairs));
                match self.vt {
                    ValueType::Gauge => {
                        let mut gauge = proto::Gauge::default();
                        gauge.set_value(value.v);
                        metric.set_gauge(gauge);
                    }
                    ValueType::Counter => {
                        let mut counter = proto::Counter::default();
                        counter.set_value(value.v);
                        metric.set_counter(counter);
                    }
                }
                metric
            })
            .collect();

        let mut family = MetricFamily::default();
        family.set_name(format!("{NAMESPACE}_{}", self.name));
        family.set_help(self.help.to_string());
        family.set_field_type(match self.vt {
            ValueType::Gauge => MetricType::GAUGE,
            ValueType::Counter => MetricType::COUNTER,
        });
        family.set_metric(RepeatedField::from_vec(metrics));
        Some(family)
    }
}

fn label_pair(name: &str, value: &str) -> proto::LabelPair {
    let mut pair = proto::LabelPair::default();
    pair.set_name(name.to_string());
    pair.set_value(value.to_string());
    pair
}

/// Collects container stats and exports them in the prometheus format.
///
/// Cheaply clonable; all clones share the tracked set. The collector
/// registers itself with the provided registry exactly once, at construction.
#[derive(Clone)]
pub struct Collector {
    inner: Arc<Inner>,
}

struct Inner {
    cgroups: RwLock<HashMap<String, Arc<Cgroup>>>,
    metrics: Vec<Metric>,
    descs: Vec<Desc>,
}

impl Collector {
    /// Builds the full five-dimension metric table and registers the
    /// collector with `registry`.
    pub fn new(registry: &Registry) -> Result<Self, Error> {
        let mut metrics = Vec::new();
        metrics.extend(pids::metrics());
        metrics.extend(cpu::metrics());
        metrics.extend(memory::metrics());
        metrics.extend(hugetlb::metrics());
        metrics.extend(blkio::metrics());
        let descs = metrics
            .iter()
            .map(Metric::desc)
            .collect::<Result<Vec<_>, _>>()?;

        let collector = Self {
            inner: Arc::new(Inner {
                cgroups: RwLock::new(HashMap::new()),
                metrics,
                descs,
            }),
        };
        registry.register(Box::new(collector.clone()))?;
        Ok(collector)
    }

    /// Tracks `cgroup` under `id` so its stats are collected on every scrape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyCollected`] if `id` is already tracked,
    /// leaving the existing entry in place.
    pub fn add(&self, id: impl Into<String>, cgroup: Cgroup) -> Result<(), Error> {
        let id = id.into();
        let mut cgroups = self.inner.cgroups.write().expect("cgroup registry poisoned");
        if cgroups.contains_key(&id) {
            return Err(Error::AlreadyCollected { id });
        }
        cgroups.insert(id, Arc::new(cgroup));
        Ok(())
    }

    /// Stats one cgroup and renders its sample set. A failing cgroup
    /// contributes nothing; the failure is logged and never escalated, so
    /// the rest of the scrape completes.
    fn collect_one(&self, id: &str, cgroup: &Cgroup) -> Vec<MetricFamily> {
        let stats = match cgroup.stat() {
            Ok(stats) => stats,
            Err(err) => {
                log::error!(
                    target: "metrics",
                    "failed to stat cgroup: id={id}, error={err}"
                );
                return Vec::new();
            }
        };
        self.inner
            .metrics
            .iter()
            .filter_map(|metric| metric.collect(id, &stats))
            .collect()
    }
}

impl prometheus::core::Collector for Collector {
    fn desc(&self) -> Vec<&Desc> {
        self.inner.descs.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        // Snapshot the tracked set and drop the lock before any kernel I/O;
        // adds racing an in-flight scrape take effect on the next one.
        let tracked: Vec<(String, Arc<Cgroup>)> = {
            let cgroups = self.inner.cgroups.read().expect("cgroup registry poisoned");
            cgroups
                .iter()
                .map(|(id, cgroup)| (id.clone(), Arc::clone(cgroup)))
                .collect()
        };

        let mut families: Vec<MetricFamily> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();
        thread::scope(|scope| {
            let tasks: Vec<_> = tracked
                .iter()
                .map(|(id, cgroup)| scope.spawn(move || self.collect_one(id, cgroup)))
                .collect();
            // The join doubles as the completion barrier: the scrape returns
            // only once every per-cgroup task has finished. Samples of the
            // same series from different cgroups merge into one family.
            for task in tasks {
                for mut family in task.join().expect("collection task panicked") {
                    match by_name.entry(family.get_name().to_string()) {
                        Entry::Occupied(slot) => {
                            let merged = families[*slot.get()].mut_metric();
                            for metric in family.take_metric().into_vec() {
                                merged.push(metric);
                            }
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(families.len());
                            families.push(family);
                        }
                    }
                }
            }
        });
        families
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::memory::testutil;
    use prometheus::core::Collector as _;

    fn tracked_collector(registry: &Registry) -> Collector {
        Collector::new(registry).expect("collector construction")
    }

    fn family<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
        families
            .iter()
            .find(|f| f.get_name() == name)
            .unwrap_or_else(|| panic!("family `{name}` not collected"))
    }

    fn ids(family: &MetricFamily) -> Vec<&str> {
        family
            .get_metric()
            .iter()
            .flat_map(|m| m.get_label())
            .filter(|l| l.get_name() == "id")
            .map(|l| l.get_value())
            .collect()
    }

    #[test]
    fn test_describe_before_any_cgroup_is_tracked() {
        let registry = Registry::new();
        let collector = tracked_collector(&registry);
        let descs = collector.desc();
        assert!(!descs.is_empty());
        assert!(
            descs
                .iter()
                .any(|d| d.fq_name == "container_memory_cache_bytes")
        );
        assert!(descs.iter().any(|d| d.fq_name == "container_pids_current"));
    }

    #[test]
    fn test_duplicate_add_is_rejected_and_keeps_original() {
        let root = tempfile::tempdir().unwrap();
        testutil::populate(&root.path().join("memory/first"));

        let registry = Registry::new();
        let collector = tracked_collector(&registry);
        collector
            .add("mycontainer", Cgroup::v1(root.path(), "first"))
            .unwrap();
        let err = collector
            .add("mycontainer", Cgroup::v1(root.path(), "second"))
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyCollected { id } if id == "mycontainer"));

        // The original entry still collects: "second" has no files on disk,
        // so samples can only come from "first".
        let families = collector.collect();
        let cache = family(&families, "container_memory_cache_bytes");
        assert_eq!(ids(cache), vec!["mycontainer"]);
        assert_eq!(cache.get_metric()[0].get_gauge().get_value(), 1024.0);
    }

    #[test]
    fn test_collect_emits_samples_per_tracked_cgroup() {
        let root = tempfile::tempdir().unwrap();
        testutil::populate(&root.path().join("memory/one"));
        testutil::populate(&root.path().join("memory/two"));

        let registry = Registry::new();
        let collector = tracked_collector(&registry);
        collector.add("one", Cgroup::v1(root.path(), "one")).unwrap();
        collector.add("two", Cgroup::v1(root.path(), "two")).unwrap();

        let families = collector.collect();
        let usage = family(&families, "container_memory_usage_usage_bytes");
        let mut seen = ids(usage);
        seen.sort_unstable();
        assert_eq!(seen, vec!["one", "two"]);
        for metric in usage.get_metric() {
            assert_eq!(metric.get_gauge().get_value(), 101.0);
        }
    }

    #[test]
    fn test_single_failing_cgroup_does_not_abort_collection() {
        let root = tempfile::tempdir().unwrap();
        testutil::populate(&root.path().join("memory/healthy"));
        testutil::populate(&root.path().join("memory/healthy2"));

        let registry = Registry::new();
        let collector = tracked_collector(&registry);
        collector
            .add("healthy", Cgroup::v1(root.path(), "healthy"))
            .unwrap();
        collector
            .add("healthy2", Cgroup::v1(root.path(), "healthy2"))
            .unwrap();
        // No files on disk: every stat for this entry fails.
        collector
            .add("broken", Cgroup::v1(root.path(), "broken"))
            .unwrap();

        let families = collector.collect();
        let cache = family(&families, "container_memory_cache_bytes");
        let mut seen = ids(cache);
        seen.sort_unstable();
        assert_eq!(seen, vec!["healthy", "healthy2"]);
    }

    #[test]
    fn test_gather_through_registry() {
        let root = tempfile::tempdir().unwrap();
        testutil::populate(&root.path().join("memory/one"));

        let registry = Registry::new();
        let collector = tracked_collector(&registry);
        collector.add("one", Cgroup::v1(root.path(), "one")).unwrap();

        let families = registry.gather();
        assert!(
            families
                .iter()
                .any(|f| f.get_name() == "container_memory_rss_bytes")
        );
    }

    #[test]
    fn test_metric_table_expands_device_labels() {
        use crate::stats::{BlkioEntry, BlkioStats, Stats};

        let stats = Stats {
            blkio: Some(BlkioStats {
                io_service_bytes_recursive: vec![
                    BlkioEntry {
                        op: "Read".into(),
                        device: String::new(),
                        major: 8,
                        minor: 0,
                        value: 512,
                    },
                    BlkioEntry {
                        op: "Write".into(),
                        device: String::new(),
                        major: 8,
                        minor: 16,
                        value: 1024,
                    },
                ],
                ..Default::default()
            }),
            ..Default::default()
        };

        let registry = Registry::new();
        let collector = tracked_collector(&registry);
        let families = collector.collect_one_for_test("db", &stats);
        let bytes = family(&families, "container_blkio_io_service_bytes_recursive_bytes");
        assert_eq!(bytes.get_metric().len(), 2);

        let labels: Vec<(String, String)> = bytes.get_metric()[0]
            .get_label()
            .iter()
            .map(|l| (l.get_name().to_string(), l.get_value().to_string()))
            .collect();
        assert!(labels.contains(&("id".into(), "db".into())));
        assert!(labels.contains(&("op".into(), "Read".into())));
        assert!(labels.contains(&("major".into(), "8".into())));
        assert!(labels.contains(&("minor".into(), "0".into())));
        assert_eq!(bytes.get_metric()[0].get_counter().get_value(), 512.0);
    }

    #[test]
    fn test_absent_dimensions_emit_no_families() {
        let registry = Registry::new();
        let collector = tracked_collector(&registry);
        let families = collector.collect_one_for_test("empty", &Stats::default());
        assert!(families.is_empty());
    }

    impl Collector {
        /// Renders the table against a prepared snapshot, bypassing kernel I/O.
        fn collect_one_for_test(&self, id: &str, stats: &Stats) -> Vec<MetricFamily> {
            self.inner
                .metrics
                .iter()
                .filter_map(|metric| metric.collect(id, stats))
                .collect()
        }
    }
}
