use std::fmt;

/// A schema invariant that generation relies on does not hold.
///
/// These are normally rejected while parsing and validating the schema, so
/// they indicate a schema that was assembled by hand or not validated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("`{referrer}` refers to `{name}`, which is not defined in the schema")]
    UnknownType { name: String, referrer: String },

    #[error("`{referrer}` expects `{name}` to be {expected}, but it is {found}")]
    UnexpectedKind {
        name: String,
        referrer: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Something worth telling the user about that does not stop generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Warning {
    /// The type has no model binding, so a structural fallback was generated.
    MissingModel { type_name: String },
    /// The custom scalar has no model binding, so its values are typed as unknown.
    UnboundScalar { type_name: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingModel { type_name } => write!(
                f,
                "no model is bound to `{type_name}`, resolvers receive its fields as a plain object"
            ),
            Warning::UnboundScalar { type_name } => write!(
                f,
                "no model is bound to scalar `{type_name}`, its values are typed as unknown"
            ),
        }
    }
}
