extern crate hea;

use clap::Parser;
use hea::input::read_audit_project;
use hea::output::FileOutput;
use hea::run_audit;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct AuditArgs {
    /// Audit project file naming the input tables and improvement scenarios
    project_file: PathBuf,
    /// Directory the report CSVs are written into (defaults to the project
    /// file's directory)
    #[arg(long, short)]
    output_dir: Option<PathBuf>,
    /// Also write an echo of the parsed input tables
    #[arg(long, default_value_t = false)]
    echo_input: bool,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = AuditArgs::parse();

    let project = read_audit_project(BufReader::new(File::open(&args.project_file)?))?;
    let base_dir = args
        .project_file
        .parent()
        .unwrap_or(Path::new("."))
        .to_path_buf();
    let output_dir = args.output_dir.unwrap_or_else(|| base_dir.clone());
    let output = FileOutput::new(output_dir, "audit_{}.csv".to_string());

    run_audit(&project, &base_dir, &output, args.echo_input)?;
    info!("audit reports written");

    Ok(())
}
