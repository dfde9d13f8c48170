//! Layer-size analysis of a built image.
//!
//! Input is one record per line in `id|size|createdBy` form, as produced by
//! `docker history --no-trunc --format '{{.ID}}|{{.Size}}|{{.CreatedBy}}'`.

use crate::error::{OptimizerError, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::Path;

/// Layers at or above this size are reported.
pub const DEFAULT_LARGE_LAYER_BYTES: u64 = 50 * 1000 * 1000;

static SIZE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([0-9]+(?:\.[0-9]+)?)\s*([kKMGT]?)i?B\s*$").unwrap());

/// One image layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerRecord {
    pub id: String,
    pub size_bytes: u64,
    pub created_by: String,
}

/// A large layer and what to do about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerFinding {
    pub id: String,
    pub size_bytes: u64,
    pub created_by: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryReport {
    pub total_bytes: u64,
    pub layer_count: usize,
    /// Layers ordered by size, largest first.
    pub layers: Vec<LayerRecord>,
    pub findings: Vec<LayerFinding>,
}

/// Parse a size as printed by docker (`0B`, `512kB`, `12.3MB`, `1.2GB`).
pub fn parse_size(text: &str) -> Option<u64> {
    let caps = SIZE_PATTERN.captures(text)?;
    let value: f64 = caps[1].parse().ok()?;
    let multiplier = match &caps[2] {
        "" => 1.0,
        "k" | "K" => 1e3,
        "M" => 1e6,
        "G" => 1e9,
        "T" => 1e12,
        _ => return None,
    };
    let bytes = (value * multiplier).round();
    // out-of-range sizes would saturate in the cast
    (bytes < u64::MAX as f64).then_some(bytes as u64)
}

/// Human-readable size, docker style.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [(&str, f64); 3] = [("GB", 1e9), ("MB", 1e6), ("kB", 1e3)];
    for (unit, scale) in UNITS {
        if bytes as f64 >= scale {
            return format!("{:.1}{}", bytes as f64 / scale, unit);
        }
    }
    format!("{}B", bytes)
}

/// Parse history text; malformed lines are skipped.
pub fn parse_history(text: &str) -> Vec<LayerRecord> {
    let mut layers = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // createdBy may itself contain pipes
        let mut parts = line.splitn(3, '|');
        let (Some(id), Some(size), Some(created_by)) = (parts.next(), parts.next(), parts.next())
        else {
            warn!("history line {}: expected id|size|createdBy", index + 1);
            continue;
        };
        let Some(size_bytes) = parse_size(size) else {
            warn!("history line {}: unrecognized size {:?}", index + 1, size);
            continue;
        };
        layers.push(LayerRecord {
            id: id.trim().to_string(),
            size_bytes,
            created_by: created_by.trim().to_string(),
        });
    }
    debug!("parsed {} history layer(s)", layers.len());
    layers
}

/// Read and parse a history file.
pub fn load_history(path: &Path) -> Result<Vec<LayerRecord>> {
    let text = std::fs::read_to_string(path).map_err(|source| OptimizerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_history(&text))
}

fn recommendation_for(created_by: &str) -> String {
    let cmd = created_by.to_lowercase();
    if cmd.contains("apt-get install") || cmd.contains("apt install") {
        "Use --no-install-recommends and remove /var/lib/apt/lists/* in the same RUN.".to_string()
    } else if cmd.contains("apk add") {
        "Use `apk add --no-cache`.".to_string()
    } else if cmd.contains("yum install") || cmd.contains("dnf install") {
        "Run `yum clean all` in the same RUN as the install.".to_string()
    } else if cmd.contains("npm install") || cmd.contains("npm ci") || cmd.contains("yarn") {
        "Install only production dependencies, or build in a separate stage.".to_string()
    } else if cmd.contains("pip install") {
        "Use `pip install --no-cache-dir`.".to_string()
    } else if cmd.contains("copy") || cmd.contains("add ") {
        "Copy only what the image needs and keep build artifacts out via .dockerignore.".to_string()
    } else {
        "Check whether this layer's content is needed in the final image.".to_string()
    }
}

/// Summarize layers and flag those at or above `threshold_bytes`.
pub fn analyze_history(layers: &[LayerRecord], threshold_bytes: u64) -> HistoryReport {
    let total_bytes = layers
        .iter()
        .fold(0u64, |total, l| total.saturating_add(l.size_bytes));

    let mut sorted = layers.to_vec();
    sorted.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));

    let findings = sorted
        .iter()
        .filter(|l| l.size_bytes >= threshold_bytes)
        .map(|l| LayerFinding {
            id: l.id.clone(),
            size_bytes: l.size_bytes,
            created_by: l.created_by.clone(),
            recommendation: recommendation_for(&l.created_by),
        })
        .collect();

    HistoryReport {
        total_bytes,
        layer_count: layers.len(),
        layers: sorted,
        findings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HISTORY: &str = "\
sha256:aaa|0B|/bin/sh -c #(nop)  CMD [\"node\" \"index.js\"]
sha256:bbb|245MB|/bin/sh -c npm install
sha256:ccc|12.5kB|/bin/sh -c #(nop) COPY file:abc in /app/package.json
garbage line
sha256:ddd|120MB|/bin/sh -c apt-get update && apt-get install -y curl | tee log
sha256:eee|lots|/bin/sh -c echo
";

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("0B"), Some(0));
        assert_eq!(parse_size("12.5kB"), Some(12_500));
        assert_eq!(parse_size("245MB"), Some(245_000_000));
        assert_eq!(parse_size("1.2GB"), Some(1_200_000_000));
        assert_eq!(parse_size("lots"), None);
        assert_eq!(parse_size("99999999999TB"), None);
    }

    #[test]
    fn test_oversized_layers_are_skipped() {
        let layers = parse_history("a|99999999999TB|x\nb|99999999999TB|y\nc|1MB|z\n");
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].id, "c");
    }

    #[test]
    fn test_total_saturates() {
        let layer = |id: &str| LayerRecord {
            id: id.to_string(),
            size_bytes: u64::MAX - 1,
            created_by: "COPY dir:abc in /".to_string(),
        };
        let report = analyze_history(&[layer("a"), layer("b")], DEFAULT_LARGE_LAYER_BYTES);
        assert_eq!(report.total_bytes, u64::MAX);
        assert_eq!(report.findings.len(), 2);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0B");
        assert_eq!(format_bytes(12_500), "12.5kB");
        assert_eq!(format_bytes(245_000_000), "245.0MB");
    }

    #[test]
    fn test_parse_history_skips_malformed() {
        let layers = parse_history(HISTORY);
        assert_eq!(layers.len(), 4);
        assert_eq!(layers[3].id, "sha256:ddd");
        assert!(layers[3].created_by.ends_with("| tee log"));
    }

    #[test]
    fn test_analyze_history() {
        let report = analyze_history(&parse_history(HISTORY), DEFAULT_LARGE_LAYER_BYTES);
        assert_eq!(report.layer_count, 4);
        assert_eq!(report.total_bytes, 365_012_500);
        assert_eq!(report.layers[0].id, "sha256:bbb");
        assert_eq!(report.findings.len(), 2);
        assert!(report.findings[0].recommendation.contains("production"));
        assert!(report.findings[1].recommendation.contains("--no-install-recommends"));
    }

    #[test]
    fn test_load_history() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(HISTORY.as_bytes()).unwrap();
        assert_eq!(load_history(file.path()).unwrap().len(), 4);
        assert!(load_history(Path::new("/nonexistent/history.txt")).is_err());
    }
}
