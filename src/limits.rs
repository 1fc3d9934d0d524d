//! Resource-limit documents applied when a cgroup is created or updated.
//!
//! Every knob is optional: `None` means "do not modify the kernel file", which
//! is distinct from an explicit zero. Controllers only ever write the knobs
//! that were provided, so a partial update never clobbers unrelated limits.

use serde::{Deserialize, Serialize};

/// Per-dimension resource knobs for one cgroup.
///
/// A dimension left `None` is skipped entirely by every controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    /// Memory limits, applied by the memory controller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryLimits>,
}

impl Resources {
    /// Returns a document carrying only the given memory limits.
    pub fn with_memory(memory: MemoryLimits) -> Self {
        Self {
            memory: Some(memory),
        }
    }
}

/// Knobs written to the memory controller's kernel files.
///
/// All byte quantities are absolute limits; the kernel treats its own
/// "unlimited" sentinel as a very large number, so no special casing is needed
/// here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLimits {
    /// Hard memory limit in bytes (`memory.limit_in_bytes`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Memory-plus-swap limit in bytes (`memory.memsw.limit_in_bytes`). The
    /// kernel requires this to stay at or above the memory limit at all
    /// times.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap: Option<u64>,
    /// Kernel memory limit in bytes (`memory.kmem.limit_in_bytes`). Providing
    /// this at creation time also activates kernel-memory accounting, which
    /// the kernel only permits while the cgroup has neither tasks nor
    /// children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel: Option<u64>,
    /// Kernel TCP buffer limit in bytes (`memory.kmem.tcp.limit_in_bytes`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_tcp: Option<u64>,
    /// Disables the kernel OOM killer for the cgroup when `Some(true)`.
    /// Written as `1` to `memory.oom_control`; never written otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_oom_killer: Option<bool>,
    /// Swap propensity, 0 to 100 (`memory.swappiness`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swappiness: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_knobs_are_absent_from_serialization() {
        let resources = Resources::with_memory(MemoryLimits {
            limit: Some(100_000_000),
            ..Default::default()
        });
        let json = serde_json::to_string(&resources).unwrap();
        assert_eq!(json, r#"{"memory":{"limit":100000000}}"#);
    }

    #[test]
    fn test_zero_is_not_absence() {
        let resources = Resources::with_memory(MemoryLimits {
            swappiness: Some(0),
            ..Default::default()
        });
        let json = serde_json::to_string(&resources).unwrap();
        let back: Resources = serde_json::from_str(&json).unwrap();
        let memory = back.memory.unwrap();
        assert_eq!(memory.swappiness, Some(0));
        assert_eq!(memory.limit, None);
    }

    #[test]
    fn test_empty_document_roundtrip() {
        let back: Resources = serde_json::from_str("{}").unwrap();
        assert_eq!(back, Resources::default());
    }
}
