use clap::Parser;
use next_unscore::{config, output, pipeline};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "next-unscore")]
#[command(about = "Strip underscore prefixes from a static Next.js export")]
#[command(long_about = "\
Strip underscore prefixes from a static Next.js export

Renames, in order, inside the export directory:

  _next/                                    → next/
  next/static/<chunk id>/_buildManifest.js  → buildManifest.js
  next/static/<chunk id>/_ssgManifest.js    → ssgManifest.js
  next/static/chunks/pages/_app-<hash>.js   → app-<hash>.js
  next/static/chunks/pages/_error-<hash>.js → error-<hash>.js

then rewrites every reference to those paths inside .html and .js files.
Each rewritten file is printed on stdout. The directory is changed in place
and the run is not repeatable on its own output.

Set RUST_LOG=next_unscore=debug to log every rename.")]
#[command(version)]
struct Cli {
    /// Export directory to transform
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Validate the layout and print the planned renames without changing anything
    #[arg(long)]
    check: bool,

    /// TOML file overriding the well-known names
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print a stock config file with all options documented
    #[arg(long, exclusive = true)]
    gen_config: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "next_unscore=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(cli.config.as_deref())?;
    if cli.check {
        let plan = pipeline::check(&cli.dir, &config)?;
        output::print_plan(&plan, &cli.dir);
    } else {
        pipeline::adapt(&cli.dir, &config, output::print_rewritten)?;
    }
    Ok(())
}
