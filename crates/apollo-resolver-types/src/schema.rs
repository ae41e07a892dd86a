//! The schema type graph that resolver declarations are projected from.
//!
//! This is a deliberately small, owned model: every definition is stored once
//! in [`Schema::types`] and definitions refer to each other by name only.
//! It is usually built from an [`apollo_compiler::Schema`] with
//! [`Schema::from_compiler`], but can also be assembled by hand.

use indexmap::IndexMap;
use indexmap::IndexSet;
use std::fmt;

/// Names of the scalars every GraphQL schema defines.
pub const BUILT_IN_SCALARS: [&str; 5] = ["ID", "String", "Int", "Float", "Boolean"];

/// A GraphQL schema reduced to what resolver signatures need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    /// Type definitions in declaration order.
    pub types: IndexMap<String, TypeDefinition>,

    /// Name of the object type for the `query` root operation
    pub query: Option<String>,

    /// Name of the object type for the `mutation` root operation
    pub mutation: Option<String>,

    /// Name of the object type for the `subscription` root operation
    pub subscription: Option<String>,
}

/// A named type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefinition {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarType {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub name: String,
    pub implements_interfaces: IndexSet<String>,
    pub fields: IndexMap<String, FieldDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceType {
    pub name: String,
    pub implements_interfaces: IndexSet<String>,
    pub fields: IndexMap<String, FieldDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    pub name: String,
    /// Names of the member object types, in declared order.
    pub members: IndexSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub values: IndexSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputObjectType {
    pub name: String,
    pub fields: IndexMap<String, InputValueDefinition>,
}

/// A field of an object or interface type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub arguments: Vec<InputValueDefinition>,
    pub ty: Type,
}

/// A field argument or an input object field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputValueDefinition {
    pub name: String,
    pub ty: Type,
}

/// A reference to a named type, with any list and non-null wrappers.
///
/// ```rust
/// use apollo_resolver_types::schema::Type;
///
/// let ty = Type::named("Post").non_null().list().non_null();
/// assert_eq!(ty.to_string(), "[Post!]!");
/// assert_eq!(ty.inner_named_type(), "Post");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Named(String),
    NonNullNamed(String),
    List(Box<Type>),
    NonNullList(Box<Type>),
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type definition, returning the one it replaced if the name was already taken.
    pub fn insert(&mut self, definition: impl Into<TypeDefinition>) -> Option<TypeDefinition> {
        let definition = definition.into();
        self.types.insert(definition.name().to_owned(), definition)
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectType> {
        self.types.values().filter_map(|def| match def {
            TypeDefinition::Object(object) => Some(object),
            _ => None,
        })
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceType> {
        self.types.values().filter_map(|def| match def {
            TypeDefinition::Interface(interface) => Some(interface),
            _ => None,
        })
    }

    pub fn unions(&self) -> impl Iterator<Item = &UnionType> {
        self.types.values().filter_map(|def| match def {
            TypeDefinition::Union(union_) => Some(union_),
            _ => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumType> {
        self.types.values().filter_map(|def| match def {
            TypeDefinition::Enum(enum_) => Some(enum_),
            _ => None,
        })
    }

    pub fn input_objects(&self) -> impl Iterator<Item = &InputObjectType> {
        self.types.values().filter_map(|def| match def {
            TypeDefinition::InputObject(input) => Some(input),
            _ => None,
        })
    }

    /// Name of the `query` root type: explicit, or an object type named `Query`.
    pub fn query_root(&self) -> Option<&str> {
        self.root(self.query.as_deref(), "Query")
    }

    /// Name of the `mutation` root type: explicit, or an object type named `Mutation`.
    pub fn mutation_root(&self) -> Option<&str> {
        self.root(self.mutation.as_deref(), "Mutation")
    }

    /// Name of the `subscription` root type: explicit, or an object type named `Subscription`.
    pub fn subscription_root(&self) -> Option<&str> {
        self.root(self.subscription.as_deref(), "Subscription")
    }

    fn root<'a>(&'a self, explicit: Option<&'a str>, default: &'a str) -> Option<&'a str> {
        match explicit {
            Some(name) => Some(name),
            None => matches!(self.get(default), Some(TypeDefinition::Object(_))).then_some(default),
        }
    }

    pub fn is_root_operation(&self, name: &str) -> bool {
        [self.query_root(), self.mutation_root(), self.subscription_root()].contains(&Some(name))
    }

    /// Fields an object type must resolve: its own fields, followed by fields
    /// of the interfaces it implements that it does not redeclare.
    pub fn effective_fields<'a>(&'a self, object: &'a ObjectType) -> Vec<&'a FieldDefinition> {
        let mut fields: IndexMap<&str, &FieldDefinition> = object
            .fields
            .values()
            .map(|field| (field.name.as_str(), field))
            .collect();
        for interface in &object.implements_interfaces {
            if let Some(TypeDefinition::Interface(interface)) = self.get(interface) {
                for field in interface.fields.values() {
                    fields.entry(field.name.as_str()).or_insert(field);
                }
            }
        }
        fields.into_values().collect()
    }
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Scalar(def) => &def.name,
            TypeDefinition::Object(def) => &def.name,
            TypeDefinition::Interface(def) => &def.name,
            TypeDefinition::Union(def) => &def.name,
            TypeDefinition::Enum(def) => &def.name,
            TypeDefinition::InputObject(def) => &def.name,
        }
    }

    /// Describe the kind of definition, for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TypeDefinition::Scalar(_) => "a scalar type",
            TypeDefinition::Object(_) => "an object type",
            TypeDefinition::Interface(_) => "an interface type",
            TypeDefinition::Union(_) => "a union type",
            TypeDefinition::Enum(_) => "an enum type",
            TypeDefinition::InputObject(_) => "an input object type",
        }
    }
}

macro_rules! impl_from_definition {
    ($($variant: ident($ty: ty)),+ $(,)?) => {
        $(
            impl From<$ty> for TypeDefinition {
                fn from(def: $ty) -> Self {
                    TypeDefinition::$variant(def)
                }
            }
        )+
    };
}

impl_from_definition!(
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
);

impl ScalarType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }
}

impl ObjectType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            implements_interfaces: IndexSet::new(),
            fields: IndexMap::new(),
        }
    }

    /// Add an interface this object implements.
    pub fn interface(mut self, interface: &str) -> Self {
        self.implements_interfaces.insert(interface.to_owned());
        self
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }
}

impl InterfaceType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            implements_interfaces: IndexSet::new(),
            fields: IndexMap::new(),
        }
    }

    pub fn interface(mut self, interface: &str) -> Self {
        self.implements_interfaces.insert(interface.to_owned());
        self
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }
}

impl UnionType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            members: IndexSet::new(),
        }
    }

    pub fn member(mut self, member: &str) -> Self {
        self.members.insert(member.to_owned());
        self
    }
}

impl EnumType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            values: IndexSet::new(),
        }
    }

    pub fn value(mut self, value: &str) -> Self {
        self.values.insert(value.to_owned());
        self
    }
}

impl InputObjectType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            fields: IndexMap::new(),
        }
    }

    pub fn field(mut self, field: InputValueDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }
}

impl FieldDefinition {
    pub fn new(name: &str, ty: Type) -> Self {
        Self {
            name: name.to_owned(),
            arguments: Vec::new(),
            ty,
        }
    }

    pub fn argument(mut self, argument: InputValueDefinition) -> Self {
        self.arguments.push(argument);
        self
    }
}

impl InputValueDefinition {
    pub fn new(name: &str, ty: Type) -> Self {
        Self {
            name: name.to_owned(),
            ty,
        }
    }
}

impl Type {
    /// Returns a nullable reference to the named type.
    pub fn named(name: &str) -> Self {
        Type::Named(name.to_owned())
    }

    /// Returns this type made non-null, if it isn’t already.
    pub fn non_null(self) -> Self {
        match self {
            Type::Named(name) => Type::NonNullNamed(name),
            Type::List(inner) => Type::NonNullList(inner),
            Type::NonNullNamed(_) | Type::NonNullList(_) => self,
        }
    }

    /// Returns a nullable list type whose items are this type.
    pub fn list(self) -> Self {
        Type::List(Box::new(self))
    }

    /// Returns the inner named type, after unwrapping any non-null or list markers.
    pub fn inner_named_type(&self) -> &str {
        match self {
            Type::Named(name) | Type::NonNullNamed(name) => name,
            Type::List(inner) | Type::NonNullList(inner) => inner.inner_named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNullNamed(_) | Type::NonNullList(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Named(name) => write!(f, "{name}"),
            Type::NonNullNamed(name) => write!(f, "{name}!"),
            Type::List(inner) => write!(f, "[{inner}]"),
            Type::NonNullList(inner) => write!(f, "[{inner}]!"),
        }
    }
}
