use crate::error::{ExportError, ExportResult};
use crate::exporter::StepProfiler;
use crate::types::{AttrValue, ExportSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

pub const ROADNET_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTiming {
    pub stage: String,
    pub millis: u64,
}

/// Sidecar summary of one export run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub roadnet_version: String,
    pub input_path: String,
    pub input_sha256: String,
    pub output_path: String,
    pub node_count: usize,
    pub edge_count: usize,
    /// Graph-level attributes of the input, e.g. its `crs`
    pub graph_metadata: BTreeMap<String, AttrValue>,
    pub stage_timings: Vec<StageTiming>,
    pub exported_at: DateTime<Utc>,
}

impl ExportReport {
    pub fn new(
        input_path: &Path,
        output_path: &Path,
        summary: &ExportSummary,
        profiler: &StepProfiler,
    ) -> ExportResult<Self> {
        Ok(Self {
            roadnet_version: ROADNET_VERSION.to_string(),
            input_path: input_path.display().to_string(),
            input_sha256: calculate_file_hash(input_path)?,
            output_path: output_path.display().to_string(),
            node_count: summary.node_count,
            edge_count: summary.edge_count,
            graph_metadata: summary.graph_metadata.clone(),
            stage_timings: profiler
                .timings()
                .iter()
                .map(|(stage, duration)| StageTiming {
                    stage: stage.clone(),
                    millis: duration.as_millis() as u64,
                })
                .collect(),
            exported_at: Utc::now(),
        })
    }

    pub fn save(&self, path: &Path) -> ExportResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| ExportError::io(path, e))?;
        Ok(())
    }
}

/// SHA-256 of the file contents, as lowercase hex
pub fn calculate_file_hash(path: &Path) -> ExportResult<String> {
    let bytes = std::fs::read(path).map_err(|e| ExportError::io(path, e))?;
    Ok(calculate_bytes_hash(&bytes))
}

pub fn calculate_bytes_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_consistency() {
        let data = b"<graphml></graphml>";
        assert_eq!(calculate_bytes_hash(data), calculate_bytes_hash(data));
        assert_ne!(calculate_bytes_hash(data), calculate_bytes_hash(b"<graphml/>"));
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            calculate_bytes_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_report_roundtrip_through_file() {
        let dir = std::env::temp_dir().join("roadnet_report_test");
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("input.graphml");
        std::fs::write(&input, b"").unwrap();

        let mut profiler = StepProfiler::new(false);
        profiler.time_step("1. Load GraphML", || ());
        let summary = ExportSummary {
            node_count: 3,
            edge_count: 4,
            graph_metadata: BTreeMap::from([(
                "crs".to_string(),
                AttrValue::Str("epsg:4326".to_string()),
            )]),
        };
        let report = ExportReport::new(&input, &dir.join("out.json"), &summary, &profiler).unwrap();
        assert_eq!(report.stage_timings.len(), 1);
        assert_eq!(report.input_sha256, calculate_bytes_hash(b""));

        let report_path = dir.join("report.json");
        report.save(&report_path).unwrap();
        let loaded: ExportReport =
            serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(loaded.node_count, 3);
        assert_eq!(loaded.edge_count, 4);
        assert_eq!(
            loaded.graph_metadata.get("crs"),
            Some(&AttrValue::Str("epsg:4326".to_string()))
        );

        std::fs::remove_dir_all(dir).ok();
    }
}
