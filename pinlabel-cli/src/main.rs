//! pinlabel CLI - add net labels from a CubeMX pinout to a KiCad legacy schematic.

use clap::{Parser, ValueEnum};
use pinlabel::{
    AnnotateRequest, AnnotateSummary, LabelOptions, LabelRecord, PinLabelCore, WriteMode,
    ALT_FUNCTION_SEPARATOR, DEFAULT_LABEL_OFFSET,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pinlabel")]
#[command(about = "Label KiCad legacy schematic pins from a CubeMX pinout export", long_about = None)]
#[command(version)]
struct Cli {
    /// Symbol library holding the MCU, such as <project>-cache.lib
    #[arg(value_name = "LIBRARY")]
    library: PathBuf,

    /// Component name, such as STM32F767BGTx; matched as a substring
    #[arg(value_name = "COMPONENT")]
    component: String,

    /// Pinout table exported from CubeMX (columns Name, Signal, Position)
    #[arg(value_name = "PINOUT_CSV")]
    pinout: PathBuf,

    /// Schematic that places the component
    #[arg(value_name = "SCHEMATIC")]
    schematic: PathBuf,

    /// Schematic the labels are appended to
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Look for this name in the schematic instead of COMPONENT
    #[arg(long, value_name = "NAME")]
    instance: Option<String>,

    /// Distance between a pin end and its label
    #[arg(long, default_value_t = DEFAULT_LABEL_OFFSET, allow_negative_numbers = true)]
    offset: i64,

    /// Separator between a pin name and its alternate function
    #[arg(long, default_value_t = ALT_FUNCTION_SEPARATOR)]
    separator: char,

    /// Write the output only if every row resolves
    #[arg(long)]
    atomic: bool,

    /// Print the labels instead of writing the output
    #[arg(long, conflicts_with = "atomic")]
    dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Progress and summary as plain text
    Human,
    /// JSON summary on stdout, progress on stderr
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.format);

    let exit_code = handle_annotate(&cli);
    process::exit(exit_code);
}

fn init_tracing(format: &OutputFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time();

    match format {
        OutputFormat::Human => builder
            .with_ansi(std::io::stdout().is_terminal())
            .with_writer(std::io::stdout)
            .init(),
        OutputFormat::Json => builder
            .with_ansi(std::io::stderr().is_terminal())
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn handle_annotate(cli: &Cli) -> i32 {
    let request = AnnotateRequest {
        library: cli.library.clone(),
        component: cli.component.clone(),
        pinout: cli.pinout.clone(),
        schematic: cli.schematic.clone(),
        output: cli.output.clone(),
        instance: cli.instance.clone(),
    };
    let options = LabelOptions {
        offset: cli.offset,
        separator: cli.separator,
        write_mode: if cli.atomic {
            WriteMode::Atomic
        } else {
            WriteMode::Append
        },
    };

    let result = if cli.dry_run {
        let mut labels: Vec<LabelRecord> = Vec::new();
        PinLabelCore::annotate_into(&request, &options, &mut labels)
    } else {
        PinLabelCore::annotate(&request, &options)
    };

    match result {
        Ok(summary) => match cli.format {
            OutputFormat::Human => {
                output_human(&summary, &request, cli.dry_run);
                0
            }
            OutputFormat::Json => output_json(&summary, &request, cli.dry_run),
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn output_human(summary: &AnnotateSummary, request: &AnnotateRequest, dry_run: bool) {
    if dry_run {
        for label in &summary.labels {
            print!("{}", label);
        }
        return;
    }

    println!(
        "Wrote {} labels to {} ({} unused pins skipped)",
        summary.labels.len(),
        request.output.display(),
        summary.skipped
    );
}

fn output_json(summary: &AnnotateSummary, request: &AnnotateRequest, dry_run: bool) -> i32 {
    let output = serde_json::json!({
        "component": summary.component,
        "anchor": summary.anchor,
        "labels": summary.labels,
        "skipped": summary.skipped,
        "output": request.output.display().to_string(),
        "written": !dry_run,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}
