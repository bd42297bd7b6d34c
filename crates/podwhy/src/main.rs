mod display;

use clap::{Parser, ValueEnum};
use podwhy_client::{
    capture_snapshot, load_client_config, ApiClient, ClusterDataProvider, FileProvider,
};
use podwhy_explainer::Explainer;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "podwhy",
    version,
    about = "Explain why a pending pod cannot be placed on any node"
)]
struct Cli {
    /// Name of the pod to analyze
    pod: String,

    /// Namespace of the pod
    #[arg(short, long)]
    namespace: String,

    /// Path to the kubeconfig file
    #[arg(long, env = "KUBECONFIG")]
    kubeconfig: Option<String>,

    /// Kubeconfig context to use instead of the current one
    #[arg(long)]
    context: Option<String>,

    /// Skip verification of the API server certificate
    #[arg(long)]
    insecure_skip_tls_verify: bool,

    /// Seconds to wait for the cluster snapshot
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Read the cluster snapshot from a YAML/JSON List document instead of a cluster
    #[arg(long, conflicts_with_all = ["context", "insecure_skip_tls_verify"])]
    snapshot: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Diagnostics go to stderr so stdout carries only the analysis
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> miette::Result<()> {
    let provider = create_provider(&cli).await?;

    let snapshot = capture_snapshot(
        provider.as_ref(),
        &cli.namespace,
        &cli.pod,
        Duration::from_secs(cli.timeout),
    )
    .await?;

    let results = Explainer::new().explain(&snapshot);

    match cli.output {
        OutputFormat::Table => print!(
            "{}",
            display::render_table(&cli.pod, &cli.namespace, &results)
        ),
        OutputFormat::Json => println!("{}", display::render_json(&results)?),
    }

    Ok(())
}

/// Pick the snapshot source: an offline file or the cluster behind the kubeconfig
async fn create_provider(cli: &Cli) -> miette::Result<Box<dyn ClusterDataProvider>> {
    if let Some(path) = &cli.snapshot {
        info!("Reading cluster snapshot from {}", path.display());
        return Ok(Box::new(FileProvider::load(path)?));
    }

    debug!("Kubeconfig override: {:?}", cli.kubeconfig);

    let config = load_client_config(
        cli.kubeconfig.as_deref(),
        cli.context.as_deref(),
        cli.insecure_skip_tls_verify,
    )
    .await?;
    info!("Connecting to {}", config.cluster_url);

    Ok(Box::new(ApiClient::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["podwhy", "web-0", "-n", "shop"]).unwrap();
        assert_eq!(cli.pod, "web-0");
        assert_eq!(cli.namespace, "shop");
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.output, OutputFormat::Table);
        assert!(!cli.insecure_skip_tls_verify);
        assert!(cli.snapshot.is_none());
    }

    #[test]
    fn test_namespace_is_required() {
        assert!(Cli::try_parse_from(["podwhy", "web-0"]).is_err());
    }

    #[test]
    fn test_cli_options() {
        let cli = Cli::try_parse_from([
            "podwhy",
            "web-0",
            "--namespace",
            "shop",
            "--snapshot",
            "cluster.yaml",
            "--timeout",
            "5",
            "-o",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.snapshot, Some(PathBuf::from("cluster.yaml")));
        assert_eq!(cli.timeout, 5);
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[tokio::test]
    async fn test_run_against_missing_snapshot_file_fails() {
        let cli = Cli::try_parse_from([
            "podwhy",
            "web-0",
            "-n",
            "shop",
            "--snapshot",
            "/nonexistent/podwhy-snapshot.yaml",
        ])
        .unwrap();
        assert!(run(cli).await.is_err());
    }
}
