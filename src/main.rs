use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use spillguard::{Config, Result, SpillVerifier, lister::s3::S3BucketLister};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for spillguard
#[derive(Parser)]
#[command(name = "spillguard")]
#[command(about = "Verify that the current account owns its spill bucket")]
#[command(version)]
struct Cli {
   #[arg(
      long,
      global = true,
      env = "SPILLGUARD_CONFIG",
      help = "Config file merged over the global config"
   )]
   config: Option<PathBuf>,

   #[command(subcommand)]
   command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
   #[command(about = "List buckets and check that the spill bucket is among them")]
   Check {
      #[arg(long, help = "Spill bucket to check (overrides config)")]
      bucket: Option<String>,

      #[arg(long, help = "JSON output")]
      json: bool,
   },

   #[command(about = "Print the effective configuration")]
   Config,
}

#[derive(Serialize)]
struct CheckReport {
   location: String,
   bucket:   String,
   state:    &'static str,
   owned:    bool,
   error:    Option<String>,
}

#[tokio::main]
async fn main() {
   tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
      .with_writer(std::io::stderr)
      .init();

   let cli = Cli::parse();
   if let Err(err) = run(cli).await {
      eprintln!("{err}");
      std::process::exit(err.exit_code());
   }
}

async fn run(cli: Cli) -> Result<()> {
   match cli.command {
      Cmd::Check { bucket, json } => check(cli.config.as_deref(), bucket, json).await,
      Cmd::Config => {
         let cfg = load_config(cli.config.as_deref())?;
         print!("{}", toml::to_string_pretty(&cfg)?);
         Ok(())
      },
   }
}

async fn check(config_path: Option<&Path>, bucket: Option<String>, json: bool) -> Result<()> {
   let mut cfg = load_config(config_path)?;
   if let Some(bucket) = bucket {
      cfg.spill_bucket = bucket;
   }
   cfg.validate()?;

   let location = cfg.spill_location();
   let lister = S3BucketLister::from_env(&cfg).await;
   let mut verifier = SpillVerifier::new(location.bucket(), lister);
   let outcome = verifier.check_location(&location).await;

   if json {
      let report = CheckReport {
         location: location.to_string(),
         bucket:   verifier.bucket().to_owned(),
         state:    verifier.state().as_str(),
         owned:    outcome.is_ok(),
         error:    outcome.as_ref().err().map(|e| e.to_string()),
      };
      println!("{}", serde_json::to_string_pretty(&report)?);
   } else if outcome.is_ok() {
      println!("ok: {location} is owned by the current account");
   }

   outcome
}

fn load_config(path: Option<&Path>) -> Result<Config> {
   match path {
      Some(path) => Ok(Config::load_from(path)?),
      None => Ok(Config::load()),
   }
}
