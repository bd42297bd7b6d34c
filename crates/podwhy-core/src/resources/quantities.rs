use std::collections::BTreeMap;
use tracing::trace;

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Parse a resource quantity string into a scalar.
///
/// Supported forms: `"500m"` (thousandths), `"64Ki"`, `"256Mi"`, `"1Gi"`
/// (binary multiples, integer mantissa) and plain decimals such as `"2"` or
/// `"0.5"`. Absent or unparsable input yields `0.0`; diagnostics must keep
/// running on malformed objects, so this never fails.
pub fn parse_quantity(value: Option<&str>) -> f64 {
    let Some(raw) = value else {
        return 0.0;
    };
    let s = raw.trim();

    let parsed = if let Some(num) = s.strip_suffix('m') {
        num.parse::<i64>().ok().map(|n| n as f64 / 1000.0)
    } else if let Some(num) = s.strip_suffix("Ki") {
        num.parse::<i64>().ok().map(|n| n as f64 * KIB)
    } else if let Some(num) = s.strip_suffix("Mi") {
        num.parse::<i64>().ok().map(|n| n as f64 * MIB)
    } else if let Some(num) = s.strip_suffix("Gi") {
        num.parse::<i64>().ok().map(|n| n as f64 * GIB)
    } else {
        s.parse::<f64>().ok().filter(|v| v.is_finite())
    };

    match parsed {
        Some(v) => v,
        None => {
            trace!("Unparsable quantity {:?}, treating as 0", raw);
            0.0
        }
    }
}

/// CPU and memory amounts, normalized
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResourceQuantities {
    /// CPU in cores (1.0 = 1 core)
    pub cpu_cores: f64,
    /// Memory in bytes
    pub memory_bytes: f64,
}

impl ResourceQuantities {
    /// Get CPU and memory from a raw resource map (`"cpu"` / `"memory"` keys)
    pub fn from_resource_map(resources: &BTreeMap<String, String>) -> Self {
        Self {
            cpu_cores: parse_quantity(resources.get("cpu").map(String::as_str)),
            memory_bytes: parse_quantity(resources.get("memory").map(String::as_str)),
        }
    }

    /// Sum the requests of several containers. Missing entries count as zero.
    pub fn sum<'a, I>(requests: I) -> Self
    where
        I: IntoIterator<Item = &'a BTreeMap<String, String>>,
    {
        requests
            .into_iter()
            .map(Self::from_resource_map)
            .fold(Self::default(), |acc, r| Self {
                cpu_cores: acc.cpu_cores + r.cpu_cores,
                memory_bytes: acc.memory_bytes + r.memory_bytes,
            })
    }
}
