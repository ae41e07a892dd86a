//! Cross-reference registries derived from a [`Schema`].
//!
//! Registries are flat maps keyed by type name that borrow from the schema.
//! Definitions never point at each other, so walking the many-to-many
//! relation between output types and input types is always a name lookup.

use crate::schema::FieldDefinition;
use crate::schema::InputObjectType;
use crate::schema::Schema;
use crate::schema::TypeDefinition;
use crate::GenerateError;
use indexmap::IndexMap;
use indexmap::IndexSet;

/// One argument of one field whose type is an input object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputUsage<'s> {
    pub field: &'s str,
    pub argument: &'s str,
    pub input: &'s str,
}

#[derive(Debug, Default)]
pub struct SchemaIndex<'s> {
    input_types: IndexMap<&'s str, &'s InputObjectType>,
    /// Every input-typed argument of an object or interface type, duplicates included.
    input_usages: IndexMap<&'s str, Vec<InputUsage<'s>>>,
    implementers: IndexMap<&'s str, IndexSet<&'s str>>,
    union_members: IndexMap<&'s str, IndexSet<&'s str>>,
}

impl<'s> SchemaIndex<'s> {
    /// Build every registry in a single pass over the schema, in declaration order.
    pub fn build(schema: &'s Schema) -> Result<Self, GenerateError> {
        let mut index = Self::default();

        for definition in schema.types.values() {
            match definition {
                TypeDefinition::InputObject(input) => {
                    index.input_types.insert(&input.name, input);
                }
                TypeDefinition::Interface(interface) => {
                    index.implementers.entry(&interface.name).or_default();
                }
                TypeDefinition::Union(union_) => {
                    let mut members = IndexSet::with_capacity(union_.members.len());
                    for member in &union_.members {
                        expect_object(schema, member, &union_.name)?;
                        members.insert(member.as_str());
                    }
                    index.union_members.insert(&union_.name, members);
                }
                _ => {}
            }
        }

        for definition in schema.types.values() {
            match definition {
                TypeDefinition::Object(object) => {
                    for interface in &object.implements_interfaces {
                        expect_interface(schema, interface, &object.name)?;
                        index
                            .implementers
                            .entry(interface.as_str())
                            .or_default()
                            .insert(&object.name);
                    }
                    let usages = index.usages(schema.effective_fields(object));
                    index.input_usages.insert(&object.name, usages);
                }
                TypeDefinition::Interface(interface) => {
                    for parent in &interface.implements_interfaces {
                        expect_interface(schema, parent, &interface.name)?;
                    }
                    let usages = index.usages(interface.fields.values());
                    index.input_usages.insert(&interface.name, usages);
                }
                _ => {}
            }
        }

        Ok(index)
    }

    fn usages(&self, fields: impl IntoIterator<Item = &'s FieldDefinition>) -> Vec<InputUsage<'s>> {
        let mut usages = Vec::new();
        for field in fields {
            for argument in &field.arguments {
                let input = argument.ty.inner_named_type();
                if let Some(definition) = self.input_types.get(input).copied() {
                    usages.push(InputUsage {
                        field: &field.name,
                        argument: &argument.name,
                        input: &definition.name,
                    });
                }
            }
        }
        usages
    }

    pub fn input_type(&self, name: &str) -> Option<&'s InputObjectType> {
        self.input_types.get(name).copied()
    }

    pub fn input_types(&self) -> impl Iterator<Item = &'s InputObjectType> + '_ {
        self.input_types.values().copied()
    }

    /// Input-typed arguments of an object or interface type, in field then argument order.
    pub fn input_usages(&self, type_name: &str) -> &[InputUsage<'s>] {
        self.input_usages
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Object types implementing an interface, in declaration order.
    pub fn implementers(&self, interface: &str) -> impl Iterator<Item = &'s str> + '_ {
        self.implementers.get(interface).into_iter().flatten().copied()
    }

    pub fn union_members(&self, union_: &str) -> impl Iterator<Item = &'s str> + '_ {
        self.union_members.get(union_).into_iter().flatten().copied()
    }

    /// Unions an object type is a member of, in declaration order.
    pub fn unions_containing<'a>(&'a self, object: &'a str) -> impl Iterator<Item = &'s str> + 'a {
        self.union_members
            .iter()
            .filter(move |(_, members)| members.contains(object))
            .map(|(union_, _)| *union_)
    }

    /// Concrete object types an interface or union value can be at runtime.
    pub fn possible_types(&self, abstract_type: &str) -> Vec<&'s str> {
        match self.union_members.get(abstract_type) {
            Some(members) => members.iter().copied().collect(),
            None => self.implementers(abstract_type).collect(),
        }
    }
}

fn expect_object(schema: &Schema, name: &str, referrer: &str) -> Result<(), GenerateError> {
    match lookup(schema, name, referrer)? {
        TypeDefinition::Object(_) => Ok(()),
        other => Err(unexpected(name, referrer, "an object type", other)),
    }
}

fn expect_interface(schema: &Schema, name: &str, referrer: &str) -> Result<(), GenerateError> {
    match lookup(schema, name, referrer)? {
        TypeDefinition::Interface(_) => Ok(()),
        other => Err(unexpected(name, referrer, "an interface type", other)),
    }
}

pub(crate) fn lookup<'s>(
    schema: &'s Schema,
    name: &str,
    referrer: &str,
) -> Result<&'s TypeDefinition, GenerateError> {
    schema.get(name).ok_or_else(|| GenerateError::UnknownType {
        name: name.to_owned(),
        referrer: referrer.to_owned(),
    })
}

pub(crate) fn unexpected(
    name: &str,
    referrer: &str,
    expected: &'static str,
    found: &TypeDefinition,
) -> GenerateError {
    GenerateError::UnexpectedKind {
        name: name.to_owned(),
        referrer: referrer.to_owned(),
        expected,
        found: found.describe(),
    }
}
