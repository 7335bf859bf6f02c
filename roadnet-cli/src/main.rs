use anyhow::Result;
use clap::Parser;
use std::path::Path;

// Import from roadnet-core
use roadnet_core::{CoordinateFallback, ExportConfig, ExportReport, GraphExporter, StepProfiler};

#[derive(Parser)]
#[command(name = "roadnet-export")]
#[command(about = "Convert a security-annotated road-network GraphML file into map-client JSON")]
struct Args {
    /// Path to the GraphML file to export (.graphml or .graphml.gz)
    #[arg(short, long, default_value = "taipei_with_security.graphml")]
    input: String,

    /// Output JSON file path (overwritten if it exists)
    #[arg(short, long, default_value = "taipei_with_security.json")]
    output: String,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// How coordinate aliases are resolved: presence or falsy
    #[arg(long)]
    coordinate_fallback: Option<CoordinateFallback>,

    /// Write an export report (input digest, counts, stage timings) to this path
    #[arg(long)]
    report: Option<String>,

    /// Enable detailed profiling of all export steps
    #[arg(long)]
    profile: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("🦀 Roadnet Graph Exporter");

    // Check if input file exists
    if !Path::new(&args.input).exists() {
        println!("❌ Input graph not found: {}", args.input);
        println!("   Please generate the GraphML file first (run the camera map builder).");
        std::process::exit(1);
    }

    let mut config = ExportConfig::load_with_fallback(args.config.as_deref());

    // Apply CLI overrides to config
    if let Some(policy) = args.coordinate_fallback {
        config.coordinate_fallback = policy;
    }

    let exporter = GraphExporter::new(config)?;

    let input_path = Path::new(&args.input);
    let output_path = Path::new(&args.output);
    let mut profiler = StepProfiler::new(args.profile);

    match exporter.export_with_profiler(input_path, output_path, &mut profiler) {
        Ok(summary) => {
            println!("\n📄 JSON file generated: {}", args.output);
            println!("   Copy this file into the client project's assets/mock_data/ directory");

            if let Some(report_path) = &args.report {
                let report = ExportReport::new(input_path, output_path, &summary, &profiler)?;
                report.save(Path::new(report_path))?;
                println!("🧾 Export report saved to: {}", report_path);
            }

            profiler.print_summary();
        }
        Err(e) => {
            eprintln!("❌ Export failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}
