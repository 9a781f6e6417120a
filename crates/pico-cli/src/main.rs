//! pico - generate a Helm values.yaml from Kubernetes manifests

use clap::Parser;
use console::style;
use pico_convert::{DEFAULT_OUTPUT, ManifestPaths};
use std::path::PathBuf;
use std::process::ExitCode;

mod convert;
mod error;
mod exit_codes;
mod logging;

const AFTER_HELP: &str = "\
Arguments are positional: deployment, then service, then route.
Pass \"\" to skip a manifest.

EXAMPLES:
  pico ./deployment.yaml
  pico ./deployment.yaml ./service.yaml ./route.yaml
  pico \"\" ./service.yaml
  pico ./deployment.yaml --dry-run

CAUTION:
  The output file (values.yaml by default) is overwritten without confirmation.";

#[derive(Parser)]
#[command(name = "pico")]
#[command(version)]
#[command(about = "Generate a Helm values.yaml from Deployment, Service and Route manifests", long_about = None)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Deployment manifest
    #[arg(value_name = "DEPLOYMENT")]
    deployment: Option<String>,

    /// Service manifest
    #[arg(value_name = "SERVICE")]
    service: Option<String>,

    /// Route manifest (enables ingress)
    #[arg(value_name = "ROUTE")]
    route: Option<String>,

    /// Output file
    #[arg(short, long, env = "PICO_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Print the values to stdout instead of writing the file
    #[arg(long)]
    dry_run: bool,

    /// List every field taken from the manifests
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    logging::initialize_logging(cli.debug);

    let paths = ManifestPaths::from_args(
        [cli.deployment, cli.service, cli.route].map(Option::unwrap_or_default),
    );

    if paths.is_empty() {
        print_usage_hint();
        return ExitCode::from(exit_codes::SUCCESS);
    }

    match convert::run(&paths, &cli.output, cli.dry_run, cli.verbose) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}

fn print_usage_hint() {
    println!(
        "{}",
        style("You must add at least one yaml file to extract values from").yellow()
    );
    println!();
    println!("  {}", style("pico ./my_deployment.yaml ./my_service.yaml ./my_route.yaml").cyan());
    println!();
    println!("{} {}", style("For more info use:").dim(), style("pico --help").cyan());
}
