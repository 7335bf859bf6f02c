use crate::config::ExportConfig;
use crate::error::ExportResult;
use crate::graphml::{load_graphml, GraphMlOptions};
use crate::graphs::{GraphSource, RecordBuilder, RoadGraph};
use crate::types::*;
use std::path::Path;
use std::time::{Duration, Instant};

/// Simple profiler that collects timings for export stages.
///
/// Timings are always recorded (export reports use them); `verbose`
/// only controls whether each step is printed as it finishes.
pub struct StepProfiler {
    verbose: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        if self.verbose {
            println!("⏱️  {}: {:.0}ms", step_name, elapsed.as_millis());
        }

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn total(&self) -> Duration {
        self.timings.iter().map(|(_, d)| *d).sum()
    }

    pub fn print_summary(&self) {
        if !self.verbose || self.timings.is_empty() {
            return;
        }

        println!("\n📊 Performance Summary:");
        let total = self.total();

        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            println!(
                "   {:.<35} {:.0}ms ({:.1}%)",
                step,
                duration.as_millis(),
                percentage
            );
        }
        println!("   {:.<35} {:.0}ms", "Total", total.as_millis());
    }
}

/// Loads a road-network GraphML file and writes it out as a `GraphDocument`.
///
/// The run is all-or-nothing: the output file is only touched once every
/// record has been built, and any error aborts the export.
pub struct GraphExporter {
    config: ExportConfig,
}

impl GraphExporter {
    pub fn new(config: ExportConfig) -> ExportResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn load(&self, graph_path: &Path) -> ExportResult<RoadGraph> {
        let options = GraphMlOptions {
            apply_key_defaults: self.config.apply_key_defaults,
        };
        load_graphml(graph_path, &options)
    }

    /// Build the output document from any graph without touching the filesystem
    pub fn build_document(&self, graph: &dyn GraphSource) -> ExportResult<GraphDocument> {
        RecordBuilder::new(&self.config).build_document(graph)
    }

    /// Export `graph_path` to `output_path`, overwriting any existing file
    pub fn export(&self, graph_path: &Path, output_path: &Path) -> ExportResult<ExportSummary> {
        self.export_with_profiler(graph_path, output_path, &mut StepProfiler::new(false))
    }

    pub fn export_with_profiler(
        &self,
        graph_path: &Path,
        output_path: &Path,
        profiler: &mut StepProfiler,
    ) -> ExportResult<ExportSummary> {
        println!("📂 Loading graph: {}", graph_path.display());
        let graph = profiler.time_step("1. Load GraphML", || self.load(graph_path))?;

        let builder = RecordBuilder::new(&self.config);

        println!("📍 Exporting nodes...");
        let nodes = profiler.time_step("2. Export Nodes", || builder.build_nodes(&graph))?;

        println!("🛣️  Exporting edges...");
        let edges = profiler.time_step("3. Export Edges", || builder.build_edges(&graph))?;

        let document = GraphDocument { nodes, edges };

        println!("💾 Writing JSON file: {}", output_path.display());
        profiler.time_step("4. Write JSON", || document.save_to_json(output_path))?;

        let summary = ExportSummary {
            node_count: document.nodes.len(),
            edge_count: document.edges.len(),
            graph_metadata: graph
                .attributes
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        };
        println!("✅ Done!");
        println!("   - Nodes: {}", summary.node_count);
        println!("   - Edges: {}", summary.edge_count);

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiler_records_when_quiet() {
        let mut profiler = StepProfiler::new(false);
        let value = profiler.time_step("step", || 41 + 1);
        assert_eq!(value, 42);
        assert_eq!(profiler.timings().len(), 1);
        assert_eq!(profiler.timings()[0].0, "step");
    }

    #[test]
    fn test_exporter_rejects_invalid_config() {
        let config = ExportConfig {
            latitude_keys: vec![],
            ..ExportConfig::default()
        };
        assert!(GraphExporter::new(config).is_err());
    }
}
