mod format;

use anyhow::Context;
use anyhow::Result;
use apollo_resolver_types::generate;
use apollo_resolver_types::Config;
use apollo_resolver_types::Dialect;
use apollo_resolver_types::Flow;
use apollo_resolver_types::Schema;
use apollo_resolver_types::TypeScript;
use clap::Parser;
use clap::ValueEnum;
use std::fs;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init();
    let app = ResolverTypes::parse();
    app.run()
}

/// Generate typed resolver contracts for a GraphQL schema.
#[derive(Debug, Parser)]
#[command(name = "apollo-resolver-types", version)]
struct ResolverTypes {
    /// The GraphQL schema to generate declarations for.
    schema: PathBuf,

    /// JSON file binding schema types to models.
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[arg(long, short, value_enum, default_value_t = Target::Typescript)]
    dialect: Target,

    /// Write the declarations to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Do not emit pass-through resolvers, regardless of the configuration.
    #[arg(long)]
    no_default_resolvers: bool,

    /// Pipe the declarations through this command, e.g. `prettier --parser typescript`.
    #[arg(long, value_name = "COMMAND")]
    format_with: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Target {
    Typescript,
    Flow,
}

impl ResolverTypes {
    fn run(&self) -> Result<()> {
        let source_text = fs::read_to_string(&self.schema)
            .with_context(|| format!("could not read schema `{}`", self.schema.display()))?;
        let schema = Schema::parse(&source_text, &self.schema)?;

        let mut config = match &self.config {
            Some(path) => Config::from_path(path)?,
            None => Config::default(),
        };
        if self.no_default_resolvers {
            config.default_resolvers = false;
        }

        let dialect: &dyn Dialect = match self.dialect {
            Target::Typescript => &TypeScript,
            Target::Flow => &Flow,
        };
        let generated = generate(&schema, &config, dialect)?;
        if !generated.warnings.is_empty() {
            log::info!(
                "{} types fell back to generated or unknown types",
                generated.warnings.len()
            );
        }

        let source = match &self.format_with {
            Some(command) => format::format_or_keep(command, generated.source),
            None => generated.source,
        };
        match &self.output {
            Some(path) => fs::write(path, source)
                .with_context(|| format!("could not write `{}`", path.display()))?,
            None => print!("{source}"),
        }
        Ok(())
    }
}
