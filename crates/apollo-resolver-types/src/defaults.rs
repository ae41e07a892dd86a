//! Pass-through resolvers for fields that read a property of the parent.
//!
//! Whether the parent really has a same-named property is never checked here.
//! The generated bundle is typed against the parent declaration instead.

use crate::config::Model;
use crate::projection::ResolverKind;
use crate::schema::FieldDefinition;

/// Fields of an object type that can be resolved by reading `parent[field]`.
///
/// A field qualifies when it takes no arguments, its name is a plain
/// identifier, and the parent plausibly exposes it: every field of an unbound
/// type is part of its generated parent record, and a bound model exposes a
/// field unless it lists its known properties without it. Unbound root
/// operation types have an empty parent, so none of their fields qualify.
/// Subscription fields must produce a stream and are never defaulted.
pub fn default_resolvers<'a>(
    fields: &[&'a FieldDefinition],
    model: Option<&Model>,
    is_root: bool,
    kind: ResolverKind,
) -> Vec<&'a FieldDefinition> {
    if kind == ResolverKind::Subscription || (is_root && model.is_none()) {
        return Vec::new();
    }
    fields
        .iter()
        .copied()
        .filter(|field| reads_parent_property(field))
        .filter(|field| model.map_or(true, |model| model.exposes(&field.name)))
        .collect()
}

/// Fields declared by the fallback parent record of an unbound type.
pub(crate) fn reads_parent_property(field: &FieldDefinition) -> bool {
    field.arguments.is_empty() && is_plain_identifier(&field.name)
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_well && !name.starts_with("__") && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::InputValueDefinition;
    use crate::schema::Type;
    use pretty_assertions::assert_eq;

    const REQUEST: ResolverKind = ResolverKind::Request;

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("id", Type::named("ID").non_null()),
            FieldDefinition::new("email", Type::named("String")),
            FieldDefinition::new("posts", Type::named("Post").list())
                .argument(InputValueDefinition::new("limit", Type::named("Int"))),
            FieldDefinition::new("__internal", Type::named("String")),
        ]
    }

    fn names(fields: Vec<&FieldDefinition>) -> Vec<&str> {
        fields.into_iter().map(|field| field.name.as_str()).collect()
    }

    #[test]
    fn it_defaults_fields_without_arguments() {
        let fields = fields();
        let fields: Vec<_> = fields.iter().collect();

        assert_eq!(names(default_resolvers(&fields, None, false, REQUEST)), ["id", "email"]);

        let model = Model::new("UserModel", "./models");
        assert_eq!(
            names(default_resolvers(&fields, Some(&model), false, REQUEST)),
            ["id", "email"]
        );
    }

    #[test]
    fn it_only_defaults_known_model_properties() {
        let fields = fields();
        let fields: Vec<_> = fields.iter().collect();
        let model = Model::new("UserModel", "./models").fields(["id", "posts"]);

        assert_eq!(names(default_resolvers(&fields, Some(&model), false, REQUEST)), ["id"]);
    }

    #[test]
    fn it_skips_unbound_root_types() {
        let fields = fields();
        let fields: Vec<_> = fields.iter().collect();

        assert!(default_resolvers(&fields, None, true, REQUEST).is_empty());

        let root = Model::new("Root", "./root");
        assert_eq!(
            names(default_resolvers(&fields, Some(&root), true, REQUEST)),
            ["id", "email"]
        );
    }

    #[test]
    fn it_never_defaults_subscription_fields() {
        let fields = fields();
        let fields: Vec<_> = fields.iter().collect();
        let root = Model::new("Root", "./root");

        assert!(
            default_resolvers(&fields, Some(&root), true, ResolverKind::Subscription).is_empty()
        );
        assert!(default_resolvers(&fields, None, true, ResolverKind::Subscription).is_empty());
    }
}
