//! varsgen CLI.
//!
//! Writes the deployment variables for one environment to standard output
//! as YAML.

use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use varsgen::config::{Environment, DEFAULT_DNS_BASE, DEFAULT_ENV_NAME};
use varsgen::error::Result;
use varsgen::manifest::{assemble, Catalog};

#[derive(Parser)]
#[command(name = "varsgen")]
#[command(about = "Generate deployment variables: URIs, secrets and internal TLS certificates", long_about = None)]
struct Cli {
    /// DNS base name, e.g. example.com
    #[arg(long, default_value = DEFAULT_DNS_BASE)]
    dns_base: String,

    /// Short name for environment, e.g. myenv
    #[arg(long, default_value = DEFAULT_ENV_NAME)]
    env: String,
}

fn main() -> ExitCode {
    varsgen::logging::init();
    let cli = Cli::parse();
    let environment = Environment::new(cli.dns_base, cli.env);

    match run(&environment, Catalog::standard(), &mut std::io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Generate the manifest for `environment` and write it to `out`.
///
/// Nothing reaches `out` unless generation and serialization both succeed.
fn run(environment: &Environment, catalog: &Catalog, out: &mut impl Write) -> Result<()> {
    let manifest = assemble(environment, catalog)?;
    let yaml = manifest.to_yaml()?;

    out.write_all(yaml.as_bytes())?;
    out.flush()?;
    Ok(())
}
