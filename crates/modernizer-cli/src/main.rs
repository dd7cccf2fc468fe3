//! JDK Modernizer CLI
//!
//! The `jdk-modernizer` command copies a legacy Maven project into a fresh
//! workspace and modernizes it there.
//!
//! ## Commands
//!
//! - `run`: full pipeline (copy, pom.xml retargeting, model rewrite,
//!   OpenRewrite, compile check)
//! - `scan`: list the Java files the pipeline would send to the model
//! - `verify`: compile an existing workspace

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use modernizer_core::{
    init_tracing, level_for_verbosity, preview_project, verify_project, DescriptorOutcome,
    FileStatus, LogFormat, ModernizeOptions, RewriteOrchestrator, RunReport, Workspace,
    DEFAULT_JAVA_RELEASE,
};
use modernizer_llm::{GroqClient, ModelConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use modernizer_maven::MavenConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "jdk-modernizer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Modernize legacy Java/Maven projects with an LLM and OpenRewrite",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy a project into a new workspace and modernize it there
    Run {
        /// Legacy project to read (never modified)
        #[arg(short, long, default_value = "./samples/legacy-app")]
        input: PathBuf,

        /// Workspace to create; deleted and recreated on every run
        #[arg(short, long, default_value = "./samples/modernized-app")]
        output: PathBuf,

        /// Java release written into pom.xml and requested from the model
        #[arg(long, default_value = DEFAULT_JAVA_RELEASE)]
        release: String,

        /// Skip the OpenRewrite formatting pass over pom.xml
        #[arg(long)]
        skip_pom_format: bool,

        /// Write the run report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,

        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        maven: MavenArgs,
    },

    /// List the Java sources a run would rewrite, with a short preview
    Scan {
        /// Project root to scan
        #[arg(default_value = "./samples/legacy-app")]
        path: PathBuf,

        /// Characters of each file to print
        #[arg(long, default_value = "50")]
        preview: usize,
    },

    /// Compile an existing workspace with `mvn clean compile`
    Verify {
        /// Workspace to compile
        #[arg(short, long, default_value = "./samples/modernized-app")]
        workspace: PathBuf,

        #[command(flatten)]
        maven: MavenArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct ModelArgs {
    /// Completion API key
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Dotenv file consulted when the API key is not set
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Chat model identifier
    #[arg(long, env = "GROQ_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "GROQ_API_BASE", default_value = DEFAULT_BASE_URL)]
    api_base: String,

    /// Per-request timeout for the completion API, in seconds
    #[arg(long, default_value = "180")]
    model_timeout: u64,
}

impl ModelArgs {
    fn config(&self) -> modernizer_llm::Result<ModelConfig> {
        Ok(
            ModelConfig::resolve(self.api_key.clone(), Some(&self.env_file))?
                .with_model(&self.model)
                .with_base_url(&self.api_base)
                .with_timeout_secs(self.model_timeout),
        )
    }
}

#[derive(Args, Debug, Clone)]
struct MavenArgs {
    /// Maven executable
    #[arg(long = "mvn", env = "MAVEN_BIN", default_value = "mvn")]
    binary: String,

    /// Timeout for `mvn rewrite:run`, in seconds
    #[arg(long, default_value = "1800")]
    rewrite_timeout: u64,

    /// Timeout for the pom.xml formatting pass, in seconds
    #[arg(long, default_value = "600")]
    format_timeout: u64,

    /// Timeout for `mvn clean compile`, in seconds
    #[arg(long, default_value = "1200")]
    compile_timeout: u64,
}

impl MavenArgs {
    fn config(&self) -> MavenConfig {
        MavenConfig {
            binary: self.binary.clone(),
            rewrite_timeout_secs: self.rewrite_timeout,
            format_timeout_secs: self.format_timeout,
            compile_timeout_secs: self.compile_timeout,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_tracing(format, level_for_verbosity(cli.verbose));

    match cli.command {
        Commands::Run {
            input,
            output,
            release,
            skip_pom_format,
            report,
            model,
            maven,
        } => {
            let options = ModernizeOptions {
                java_release: release,
                maven: maven.config(),
                format_descriptor: !skip_pom_format,
            };
            cmd_run(&input, &output, &model, options, report.as_deref()).await
        }
        Commands::Scan { path, preview } => cmd_scan(&path, preview),
        Commands::Verify { workspace, maven } => cmd_verify(&workspace, &maven.config()).await,
    }
}

async fn cmd_run(
    input: &Path,
    output: &Path,
    model: &ModelArgs,
    options: ModernizeOptions,
    report_path: Option<&Path>,
) -> Result<()> {
    let config = model
        .config()
        .context("Failed to resolve completion API credential")?;
    let client = GroqClient::new(config).context("Failed to build completion client")?;
    info!(
        model = %client.model(),
        java_release = %options.java_release,
        "Using completion model"
    );

    let orchestrator =
        RewriteOrchestrator::new(Workspace::new(input, output), Arc::new(client), options);

    let workspace = orchestrator.workspace();
    println!(
        "Modernizing {} -> {}",
        workspace.input_root().display(),
        workspace.output_root().display()
    );
    println!();

    let report = orchestrator
        .run()
        .await
        .context("Failed to prepare modernization workspace")?;

    if let Some(path) = report_path {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write run report to {}", path.display()))?;
        println!("Report written to {}", path.display());
        println!();
    }

    print_summary(&report);

    if report.succeeded() {
        println!("\n✓ Modernized project compiles");
        Ok(())
    } else {
        anyhow::bail!("Modernized project does not compile")
    }
}

fn print_summary(report: &RunReport) {
    println!("Run ID: {}", report.run_id);
    match &report.descriptor {
        DescriptorOutcome::Missing => println!("pom.xml: not found, skipped"),
        DescriptorOutcome::Updated { edit, formatted } => println!(
            "pom.xml: {} version tags retargeted{}{}",
            edit.versions_replaced,
            if edit.release_inserted { ", release tag added" } else { "" },
            if *formatted { ", formatted" } else { "" }
        ),
        DescriptorOutcome::Failed { error } => println!("pom.xml: ✗ {}", error),
    }
    println!();

    for file in &report.files {
        match &file.status {
            FileStatus::Rewritten => println!("  ✓ {}", file.path.display()),
            FileStatus::Unchanged => println!("  = {}", file.path.display()),
            FileStatus::Failed { error, .. } => {
                println!("  ✗ {}: {}", file.path.display(), error)
            }
        }
    }

    println!();
    println!(
        "Summary: {} rewritten, {} unchanged, {} failed",
        report.rewritten_count(),
        report.unchanged_count(),
        report.failed_count()
    );
    println!(
        "OpenRewrite: {}",
        if report.refactor.success { "✓ applied" } else { "✗ failed" }
    );
    println!(
        "Compile: {}",
        if report.verification.success { "✓ PASSED" } else { "✗ FAILED" }
    );
    if let Some(diagnostics) = &report.verification.diagnostics {
        println!("{}", diagnostics.trim_end());
    }
}

fn cmd_scan(path: &Path, preview: usize) -> Result<()> {
    if !path.is_dir() {
        anyhow::bail!("Project directory not found: {}", path.display());
    }

    let previews = preview_project(path, preview);
    println!("Found {} Java files in {}", previews.len(), path.display());

    for file in &previews {
        println!();
        println!("--- {} ({}) ---", file.file_name, file.path.display());
        println!("{}", file.preview);
    }
    Ok(())
}

async fn cmd_verify(workspace: &Path, maven: &MavenConfig) -> Result<()> {
    if !workspace.is_dir() {
        anyhow::bail!("Workspace not found: {}", workspace.display());
    }

    let result = verify_project(workspace, maven).await;
    if result.success {
        println!("✓ {} compiles", workspace.display());
        return Ok(());
    }

    println!("✗ {} does not compile", workspace.display());
    if let Some(diagnostics) = &result.diagnostics {
        println!("{}", diagnostics.trim_end());
    }
    anyhow::bail!("Compilation failed")
}
