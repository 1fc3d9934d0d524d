//! cgctl: resource control and usage accounting for Linux containers via
//! cgroup v1 hierarchies.
//!
//! The crate wraps the kernel's control-group filesystem with two subsystems:
//!
//! - A [`Controller`] abstraction over one resource dimension of a hierarchy,
//!   with the memory controller as the shipped implementation. Controllers
//!   create group directories, apply optional resource limits under the
//!   kernel's ordering and lifecycle constraints, read counter files into
//!   [`Stats`] snapshots, and (for memory) register OOM notification
//!   eventfds.
//! - A [`Collector`] that tracks an arbitrary, changing set of [`Cgroup`]s
//!   and exports their live counters as prometheus metric families, statting
//!   every tracked group concurrently and isolating per-group failures.
//!
//! Limits are applied through [`Resources`] documents in which every knob is
//! optional; an unset knob leaves the corresponding kernel file untouched.
//!
//! # Platform requirements
//!
//! - Linux with cgroup v1 hierarchies mounted (commonly `/sys/fs/cgroup`).
//! - Read access to the tracked groups' counter files; write access to their
//!   control files for limit application and OOM registration.

pub mod cgroup;
pub mod controller;
pub mod fsutil;
pub mod limits;
pub mod metrics;
pub mod stats;

pub use cgroup::Cgroup;
pub use controller::{Controller, MemoryController, Name};
pub use limits::{MemoryLimits, Resources};
pub use metrics::Collector;
pub use stats::Stats;
