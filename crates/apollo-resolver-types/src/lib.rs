//! <div align="center">
//!   <h1><code>apollo-resolver-types</code></h1>
//!
//!   <p>
//!     <strong>Typed resolver contracts for GraphQL schemas, in TypeScript or Flow.</strong>
//!   </p>
//! </div>
//!
//! Given a GraphQL schema and a map from schema types to the models that
//! implement them, `apollo-resolver-types` generates declarations describing
//! what every field resolver receives and returns: the parent value, the
//! arguments, the context and the result, with nullability, list wrapping and
//! subscription streams spelled out.
//!
//! ## Example
//! ```rust
//! use apollo_resolver_types::{generate, Config, Model, Schema, TypeScript};
//!
//! let schema = Schema::parse(
//!     r#"
//!     type Query { user(id: ID!): User }
//!     type User { id: ID! posts(limit: Int): [Post!]! }
//!     type Post { title: String }
//!     "#,
//!     "schema.graphql",
//! )?;
//! let config = Config::default().model("User", Model::new("UserModel", "./models"));
//!
//! let generated = generate(&schema, &config, &TypeScript)?;
//! assert!(generated.source.contains("export type PostsArgs = {\n    limit: number | null;\n  };"));
//! assert!(generated.source.contains("import type { UserModel } from './models';"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Types without a model still get a usable parent type, generated from
//! their fields. Each of them is reported in [`Generated::warnings`].

#![forbid(unsafe_code)]
#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(future_incompatible, rust_2018_idioms)]

pub mod config;
mod defaults;
mod diagnostics;
pub mod dialect;
#[cfg(feature = "apollo-compiler")]
mod from_compiler;
pub mod index;
mod inputs;
pub mod projection;
pub mod resolve;
pub mod schema;

pub use config::Config;
pub use config::ConfigError;
pub use config::ContextDescriptor;
pub use config::Model;
pub use defaults::default_resolvers;
pub use diagnostics::GenerateError;
pub use diagnostics::Warning;
pub use dialect::Dialect;
pub use dialect::Flow;
pub use dialect::TypeScript;
#[cfg(feature = "apollo-compiler")]
pub use from_compiler::ParseError;
pub use inputs::distinct_input_types;
pub use projection::Projection;
pub use projection::Projector;
pub use schema::Schema;

use index::SchemaIndex;

/// Generated source text, and what the user should know about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub source: String,
    /// Types and scalars that fell back to structural or unknown types.
    pub warnings: Vec<Warning>,
}

/// Project `schema` with `config` and render the declarations in `dialect`.
///
/// The output only depends on the inputs: generating twice from the same
/// schema and configuration yields identical text.
pub fn generate(
    schema: &Schema,
    config: &Config,
    dialect: &dyn Dialect,
) -> Result<Generated, GenerateError> {
    let projection = project(schema, config)?;
    Ok(Generated {
        source: projection.render(dialect).to_string(),
        warnings: projection.warnings,
    })
}

/// Build the schema index and project every declaration, without rendering.
pub fn project(schema: &Schema, config: &Config) -> Result<Projection, GenerateError> {
    let index = SchemaIndex::build(schema)?;
    log::debug!(
        "projecting {} types with {} bound models",
        schema.types.len(),
        config.models.iter().count()
    );
    Projector::new(schema, index, config).project()
}
