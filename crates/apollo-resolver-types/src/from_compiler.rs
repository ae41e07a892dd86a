use crate::schema;
use apollo_compiler::ast;
use apollo_compiler::schema::ExtendedType;
use std::path::Path;

/// The schema text could not be parsed or is not a valid GraphQL schema.
#[derive(Debug, thiserror::Error)]
#[error("invalid schema:\n{0}")]
pub struct ParseError(String);

impl schema::Schema {
    /// Parse and validate schema text, then convert it.
    ///
    /// `path` is only used in diagnostics.
    pub fn parse(source_text: &str, path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let schema = apollo_compiler::Schema::parse_and_validate(source_text, path)
            .map_err(|invalid| ParseError(invalid.errors.to_string()))?;
        Ok(Self::from_compiler(&schema))
    }

    /// Convert a compiler schema, leaving out built-in scalars and introspection types.
    pub fn from_compiler(compiler_schema: &apollo_compiler::Schema) -> Self {
        let mut schema = Self::new();
        for (name, definition) in &compiler_schema.types {
            if definition.is_built_in() {
                continue;
            }
            let name = name.as_str();
            match definition {
                ExtendedType::Scalar(_) => {
                    schema.insert(schema::ScalarType::new(name));
                }
                ExtendedType::Object(object) => {
                    let mut def = schema::ObjectType::new(name);
                    for interface in &object.implements_interfaces {
                        def = def.interface(interface.name.as_str());
                    }
                    for field in object.fields.values() {
                        def = def.field(field_definition(field));
                    }
                    schema.insert(def);
                }
                ExtendedType::Interface(interface) => {
                    let mut def = schema::InterfaceType::new(name);
                    for parent in &interface.implements_interfaces {
                        def = def.interface(parent.name.as_str());
                    }
                    for field in interface.fields.values() {
                        def = def.field(field_definition(field));
                    }
                    schema.insert(def);
                }
                ExtendedType::Union(union_) => {
                    let mut def = schema::UnionType::new(name);
                    for member in &union_.members {
                        def = def.member(member.name.as_str());
                    }
                    schema.insert(def);
                }
                ExtendedType::Enum(enum_) => {
                    let mut def = schema::EnumType::new(name);
                    for value in enum_.values.keys() {
                        def = def.value(value.as_str());
                    }
                    schema.insert(def);
                }
                ExtendedType::InputObject(input) => {
                    let mut def = schema::InputObjectType::new(name);
                    for field in input.fields.values() {
                        def = def.field(input_value_definition(field));
                    }
                    schema.insert(def);
                }
            }
        }

        let roots = &compiler_schema.schema_definition;
        schema.query = roots.query.as_ref().map(|root| root.name.to_string());
        schema.mutation = roots.mutation.as_ref().map(|root| root.name.to_string());
        schema.subscription = roots.subscription.as_ref().map(|root| root.name.to_string());
        schema
    }
}

fn field_definition(field: &ast::FieldDefinition) -> schema::FieldDefinition {
    let mut def = schema::FieldDefinition::new(field.name.as_str(), convert_type(&field.ty));
    for argument in &field.arguments {
        def = def.argument(input_value_definition(argument));
    }
    def
}

fn input_value_definition(value: &ast::InputValueDefinition) -> schema::InputValueDefinition {
    schema::InputValueDefinition::new(value.name.as_str(), convert_type(&value.ty))
}

fn convert_type(ty: &ast::Type) -> schema::Type {
    match ty {
        ast::Type::Named(name) => schema::Type::Named(name.to_string()),
        ast::Type::NonNullNamed(name) => schema::Type::NonNullNamed(name.to_string()),
        ast::Type::List(inner) => schema::Type::List(Box::new(convert_type(inner))),
        ast::Type::NonNullList(inner) => schema::Type::NonNullList(Box::new(convert_type(inner))),
    }
}
