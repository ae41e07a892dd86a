//! Developer supplied bindings from schema types to implementation models.
//!
//! A configuration is usually read from a JSON file:
//!
//! ```json
//! {
//!   "context": { "name": "Context", "path": "./context" },
//!   "defaultResolvers": true,
//!   "models": {
//!     "User": { "name": "UserModel", "path": "./models/user" },
//!     "Role": { "name": "Role", "path": "./models/role", "enumAlias": true }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use std::path::PathBuf;

/// Errors that can occur while loading a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read configuration file `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a generation run needs besides the schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub models: ModelMap,

    /// Type of the resolver context. Without one, resolvers receive an `any` context.
    #[serde(default)]
    pub context: Option<ContextDescriptor>,

    /// Emit pass-through resolver bundles for fields that need no custom logic.
    #[serde(default = "enabled")]
    pub default_resolvers: bool,
}

fn enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelMap::default(),
            context: None,
            default_resolvers: true,
        }
    }
}

impl Config {
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&source)
    }

    pub fn model(mut self, type_name: &str, model: Model) -> Self {
        self.models.insert(type_name, model);
        self
    }

    pub fn context(mut self, context: ContextDescriptor) -> Self {
        self.context = Some(context);
        self
    }

    pub fn default_resolvers(mut self, enabled: bool) -> Self {
        self.default_resolvers = enabled;
        self
    }
}

/// Schema type name to model bindings, in the order they were declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ModelMap(IndexMap<String, Model>);

impl ModelMap {
    pub fn get(&self, type_name: &str) -> Option<&Model> {
        self.0.get(type_name)
    }

    pub fn insert(&mut self, type_name: &str, model: Model) -> Option<Model> {
        self.0.insert(type_name.to_owned(), model)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Model)> {
        self.0.iter().map(|(name, model)| (name.as_str(), model))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The implementation type backing a schema type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Model {
    /// Type expression used verbatim in generated signatures.
    pub name: String,

    /// Module the model is imported from.
    pub path: String,

    /// For schema enums: the model is itself an enum type, rather than an
    /// object whose values are the enum values.
    #[serde(default)]
    pub enum_alias: bool,

    /// Properties the model is known to expose. When set, only these fields
    /// receive default resolvers.
    #[serde(default)]
    pub fields: Option<Vec<String>>,
}

impl Model {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_owned(),
            path: path.to_owned(),
            enum_alias: false,
            fields: None,
        }
    }

    pub fn enum_alias(mut self) -> Self {
        self.enum_alias = true;
        self
    }

    pub fn fields<'a>(mut self, fields: impl IntoIterator<Item = &'a str>) -> Self {
        self.fields = Some(fields.into_iter().map(str::to_owned).collect());
        self
    }

    /// The identifier to import for this model.
    ///
    /// Model names may be qualified or generic (`db.User`, `Row<User>`);
    /// only the leading identifier is imported.
    pub fn import_binding(&self) -> &str {
        let end = self
            .name
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(self.name.len());
        &self.name[..end]
    }

    /// Whether a default resolver may read `field` straight off the model.
    pub fn exposes(&self, field: &str) -> bool {
        match &self.fields {
            Some(fields) => fields.iter().any(|known| known == field),
            None => true,
        }
    }
}

/// The type resolvers receive as their `context` argument.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextDescriptor {
    pub name: String,
    pub path: String,
}

impl ContextDescriptor {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_owned(),
            path: path.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_reads_a_json_config() {
        let config = Config::from_json_str(indoc! {r#"
            {
              "context": { "name": "Context", "path": "./context" },
              "models": {
                "User": { "name": "UserModel", "path": "./models/user", "fields": ["id"] },
                "Role": { "name": "Role", "path": "./models/role", "enumAlias": true }
              }
            }
        "#})
        .unwrap();

        assert!(config.default_resolvers);
        assert_eq!(
            config.context,
            Some(ContextDescriptor::new("Context", "./context"))
        );
        let user = config.models.get("User").unwrap();
        assert_eq!(user.name, "UserModel");
        assert!(user.exposes("id"));
        assert!(!user.exposes("email"));
        assert!(config.models.get("Role").unwrap().enum_alias);

        let names: Vec<_> = config.models.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["User", "Role"]);
    }

    #[test]
    fn it_rejects_unknown_keys() {
        let error = Config::from_json_str(r#"{ "modles": {} }"#).unwrap_err();
        assert!(matches!(error, ConfigError::Json(_)));
        assert!(error.to_string().contains("unknown field `modles`"), "{error}");
    }

    #[test]
    fn it_imports_the_leading_identifier() {
        assert_eq!(Model::new("User", "./user").import_binding(), "User");
        assert_eq!(Model::new("db.User", "./db").import_binding(), "db");
        assert_eq!(Model::new("Row<User>", "./rows").import_binding(), "Row");
    }

    #[test]
    fn it_reports_missing_files() {
        let error = Config::from_path("does/not/exist.json").unwrap_err();
        assert!(matches!(error, ConfigError::Io { .. }));
    }
}
