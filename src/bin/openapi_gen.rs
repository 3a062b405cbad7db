//! Build-time form-data generator
//!
//! Offline pipeline, independent of the running dashboard:
//!
//! ```text
//! chaosdash-openapi gen <SCHEMA_SOURCE> <OUT_DIR>
//! chaosdash-openapi wrap-refs <SWAGGER>
//! ```

use anyhow::{bail, Context};
use chaosdash_rs::codegen::{generate_forms, wrap_refs_with_all_of};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "chaosdash-openapi", version, about = "Build-time form-data generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate per-kind form-data files from a type-declaration source
    Gen {
        /// Path to the OpenAPI-generated type declarations
        schema_source: PathBuf,
        /// Directory receiving the generated files
        out_dir: PathBuf,
    },
    /// Wrap the targeted swagger `$ref` properties in `allOf` envelopes
    WrapRefs {
        /// Swagger document, rewritten in place
        swagger: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Cli::parse().command {
        Command::Gen {
            schema_source,
            out_dir,
        } => {
            let report = generate_forms(&schema_source, &out_dir)
                .context("form generation failed")?;

            tracing::info!(
                "Generated {} kinds, {} failed",
                report.generated.len(),
                report.failed.len()
            );
            if !report.failed.is_empty() {
                bail!("{} kinds failed to generate", report.failed.len());
            }
            Ok(())
        }
        Command::WrapRefs { swagger } => {
            wrap_refs_with_all_of(&swagger).context("swagger rewrite failed")?;
            tracing::info!("Rewrote $refs in {}", swagger.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_gen_subcommand_parses_paths() {
        let cli = Cli::try_parse_from(["chaosdash-openapi", "gen", "types.rs", "out"]).unwrap();
        match cli.command {
            Command::Gen {
                schema_source,
                out_dir,
            } => {
                assert_eq!(schema_source, PathBuf::from("types.rs"));
                assert_eq!(out_dir, PathBuf::from("out"));
            }
            Command::WrapRefs { .. } => panic!("expected gen subcommand"),
        }
    }

    #[test]
    fn test_wrap_refs_subcommand_parses() {
        let cli =
            Cli::try_parse_from(["chaosdash-openapi", "wrap-refs", "swagger.yaml"]).unwrap();
        assert!(matches!(cli.command, Command::WrapRefs { .. }));
    }

    #[test]
    fn test_missing_arguments_rejected() {
        assert!(Cli::try_parse_from(["chaosdash-openapi", "gen", "types.rs"]).is_err());
        assert!(Cli::try_parse_from(["chaosdash-openapi"]).is_err());
    }
}
