//! Resolution of schema type references to dialect neutral type expressions.

use crate::config::Model;
use crate::config::ModelMap;
use crate::index::lookup;
use crate::index::unexpected;
use crate::index::SchemaIndex;
use crate::schema::Schema;
use crate::schema::Type;
use crate::schema::TypeDefinition;
use crate::GenerateError;
use indexmap::IndexMap;
use indexmap::IndexSet;
use std::collections::BTreeMap;

/// A type in the generated source, independent of the target dialect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    String,
    Number,
    Boolean,
    /// A value of a type nothing is known about.
    Unknown,
    /// Opts out of type checking.
    Any,
    /// A type name declared at the top level of the output or imported.
    Named(String),
    /// A declaration scoped to the block of an owning schema type.
    Scoped { owner: String, name: String },
    /// The values of an object used as an enum.
    ValuesOf(String),
    /// The type of one property of another type.
    Property { of: Box<TypeExpr>, name: String },
    /// A string literal type.
    Literal(String),
    Nullable(Box<TypeExpr>),
    List(Box<TypeExpr>),
    /// A union of types. The empty union is the bottom type.
    Union(Vec<TypeExpr>),
    /// An object type with known properties.
    Record(Vec<Property>),
    /// A generic helper declared in the output header.
    Generic { name: String, arguments: Vec<TypeExpr> },
}

/// A property of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Property {
    pub name: String,
    pub ty: TypeExpr,
    pub optional: bool,
}

impl TypeExpr {
    pub fn named(name: &str) -> Self {
        TypeExpr::Named(name.to_owned())
    }

    pub fn scoped(owner: &str, name: &str) -> Self {
        TypeExpr::Scoped {
            owner: owner.to_owned(),
            name: name.to_owned(),
        }
    }

    pub fn nullable(self) -> Self {
        match self {
            TypeExpr::Nullable(_) => self,
            ty => TypeExpr::Nullable(Box::new(ty)),
        }
    }

    pub fn list(self) -> Self {
        TypeExpr::List(Box::new(self))
    }

    pub fn property(self, name: &str) -> Self {
        TypeExpr::Property {
            of: Box::new(self),
            name: name.to_owned(),
        }
    }

    /// A union of `members`, flattened, deduplicated, and collapsed when it
    /// has a single member.
    pub fn union(members: impl IntoIterator<Item = TypeExpr>) -> Self {
        let mut flat = IndexSet::new();
        for member in members {
            match member {
                TypeExpr::Union(nested) => flat.extend(nested),
                member => {
                    flat.insert(member);
                }
            }
        }
        if flat.len() == 1 {
            flat.pop().unwrap_or(TypeExpr::Unknown)
        } else {
            TypeExpr::Union(flat.into_iter().collect())
        }
    }

    pub fn generic(name: &str, arguments: Vec<TypeExpr>) -> Self {
        TypeExpr::Generic {
            name: name.to_owned(),
            arguments,
        }
    }
}

impl Property {
    pub fn new(name: &str, ty: TypeExpr) -> Self {
        Self {
            name: name.to_owned(),
            ty,
            optional: false,
        }
    }

    pub fn optional(name: &str, ty: TypeExpr) -> Self {
        Self {
            name: name.to_owned(),
            ty,
            optional: true,
        }
    }
}

/// How an imported name is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportKind {
    /// Only used in type positions.
    Type,
    /// Also used as a value, e.g. with `typeof`.
    Value,
}

/// One name imported from a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub kind: ImportKind,
    /// Local binding, when the exported name is taken in the generated source.
    pub alias: Option<String>,
}

impl Import {
    /// The name the import is referred to by.
    pub fn local_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.alias.as_deref().unwrap_or(name)
    }
}

/// Names imported by the generated source, grouped by module path.
///
/// Paths and the names imported from each path are kept sorted so the
/// header is identical between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Imports {
    by_path: BTreeMap<String, BTreeMap<String, Import>>,
}

impl Imports {
    /// Import `name` from `path`, bound to `local`.
    pub fn add(&mut self, path: &str, name: &str, local: &str, kind: ImportKind) {
        let names = self.by_path.entry(path.to_owned()).or_default();
        let import = names.entry(name.to_owned()).or_insert_with(|| Import {
            kind,
            alias: (local != name).then(|| local.to_owned()),
        });
        import.kind = import.kind.max(kind);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, Import>)> {
        self.by_path.iter().map(|(path, names)| (path.as_str(), names))
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// Every local binding, across paths.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_path.values().flat_map(|names| {
            names
                .iter()
                .map(|(name, import)| import.local_name(name))
        })
    }
}

/// Resolves schema type references against the model map.
///
/// Every bound model that ends up in the output is recorded, so the header
/// can import exactly what the declarations use.
#[derive(Debug)]
pub struct TypeResolver<'s> {
    schema: &'s Schema,
    models: &'s ModelMap,
    /// Local name of the `Parent` declaration of each object, interface and union.
    parents: IndexMap<&'s str, String>,
    /// Owner of the block being projected, and the local names of its input declarations.
    owner: &'s str,
    inputs: IndexMap<&'s str, String>,
    /// Local binding of each imported `(path, name)` that had to be renamed.
    bindings: IndexMap<(String, String), String>,
    /// Declared name of each unbound enum.
    enums: IndexMap<String, String>,
    imports: Imports,
    unbound_scalars: IndexSet<&'s str>,
}

impl<'s> TypeResolver<'s> {
    pub fn new(schema: &'s Schema, models: &'s ModelMap) -> Self {
        Self {
            schema,
            models,
            parents: IndexMap::new(),
            owner: "",
            inputs: IndexMap::new(),
            bindings: IndexMap::new(),
            enums: IndexMap::new(),
            imports: Imports::default(),
            unbound_scalars: IndexSet::new(),
        }
    }

    /// Record the local name under which `owner` declares its parent type.
    pub fn declare_parent(&mut self, owner: &'s str, local_name: String) {
        self.parents.insert(owner, local_name);
    }

    /// Bind the import of `name` from `path` to `local` in the generated source.
    pub fn bind_import(&mut self, path: &str, name: &str, local: String) {
        self.bindings.insert((path.to_owned(), name.to_owned()), local);
    }

    pub fn is_bound(&self, path: &str, name: &str) -> bool {
        self.bindings
            .contains_key(&(path.to_owned(), name.to_owned()))
    }

    /// Record the name under which the unbound enum `type_name` is declared.
    pub fn declare_enum(&mut self, type_name: &str, declared_name: String) {
        self.enums.insert(type_name.to_owned(), declared_name);
    }

    /// Resolve input object references inside `owner`'s block using `inputs`.
    pub fn enter_scope(&mut self, owner: &'s str, inputs: IndexMap<&'s str, String>) {
        self.owner = owner;
        self.inputs = inputs;
    }

    pub fn resolve(&mut self, ty: &Type) -> Result<TypeExpr, GenerateError> {
        Ok(match ty {
            Type::Named(name) => self.resolve_named(name)?.nullable(),
            Type::NonNullNamed(name) => self.resolve_named(name)?,
            Type::List(inner) => self.resolve(inner)?.list().nullable(),
            Type::NonNullList(inner) => self.resolve(inner)?.list(),
        })
    }

    /// Resolve a named type, as a non-null value.
    pub fn resolve_named(&mut self, name: &str) -> Result<TypeExpr, GenerateError> {
        if let Some(primitive) = built_in_scalar(name) {
            return Ok(primitive);
        }
        let (schema, models) = (self.schema, self.models);
        let definition = lookup(schema, name, self.owner)?;
        Ok(match definition {
            TypeDefinition::Scalar(scalar) => match models.get(name) {
                Some(model) => self.model(model, ImportKind::Type),
                None => {
                    if self.unbound_scalars.insert(&scalar.name) {
                        log::warn!("no model is bound to scalar `{name}`");
                    }
                    TypeExpr::Unknown
                }
            },
            TypeDefinition::Enum(_) => match models.get(name) {
                Some(model) if model.enum_alias => self.model(model, ImportKind::Type),
                Some(model) => TypeExpr::ValuesOf(self.import(model, ImportKind::Value)),
                None => TypeExpr::named(self.enums.get(name).map_or(name, String::as_str)),
            },
            TypeDefinition::Object(_) | TypeDefinition::Interface(_) | TypeDefinition::Union(_) => {
                match models.get(name) {
                    Some(model) => self.model(model, ImportKind::Type),
                    None => self.parent_reference(definition.name()),
                }
            }
            TypeDefinition::InputObject(input) => match self.inputs.get(input.name.as_str()) {
                Some(local_name) => TypeExpr::scoped(self.owner, local_name),
                None => {
                    return Err(GenerateError::UnknownType {
                        name: name.to_owned(),
                        referrer: self.owner.to_owned(),
                    })
                }
            },
        })
    }

    /// The value resolvers of `type_name` receive as their parent.
    ///
    /// The parent of an interface or union field is one of its possible
    /// object types, never a model bound to the abstract type itself.
    pub fn parent_of(
        &mut self,
        type_name: &str,
        index: &SchemaIndex<'s>,
    ) -> Result<TypeExpr, GenerateError> {
        let (schema, models) = (self.schema, self.models);
        match lookup(schema, type_name, self.owner)? {
            TypeDefinition::Object(object) => Ok(match models.get(type_name) {
                Some(model) => self.model(model, ImportKind::Type),
                None => self.parent_reference(&object.name),
            }),
            TypeDefinition::Interface(_) | TypeDefinition::Union(_) => {
                let mut members = Vec::new();
                for object in index.possible_types(type_name) {
                    members.push(self.parent_of(object, index)?);
                }
                Ok(TypeExpr::union(members))
            }
            other => Err(unexpected(
                type_name,
                self.owner,
                "an object, interface or union type",
                other,
            )),
        }
    }

    /// Refer to a bound model, importing it.
    pub fn model(&mut self, model: &Model, kind: ImportKind) -> TypeExpr {
        TypeExpr::Named(self.import(model, kind))
    }

    /// Import `model` and return its name as spelled through the local binding.
    fn import(&mut self, model: &Model, kind: ImportKind) -> String {
        let binding = model.import_binding();
        let local = self
            .bindings
            .get(&(model.path.clone(), binding.to_owned()))
            .map_or(binding, String::as_str)
            .to_owned();
        self.imports.add(&model.path, binding, &local, kind);
        format!("{local}{}", &model.name[binding.len()..])
    }

    /// Local name of the parent declaration in the block of `type_name`.
    pub fn parent_name(&self, type_name: &str) -> &str {
        self.parents
            .get(type_name)
            .map_or("Parent", String::as_str)
    }

    /// Reference to the parent declared in the block of `type_name`.
    pub fn parent_reference(&self, type_name: &str) -> TypeExpr {
        TypeExpr::scoped(type_name, self.parent_name(type_name))
    }

    pub fn unbound_scalars(&self) -> impl Iterator<Item = &'s str> + '_ {
        self.unbound_scalars.iter().copied()
    }

    pub fn into_imports(self) -> Imports {
        self.imports
    }
}

fn built_in_scalar(name: &str) -> Option<TypeExpr> {
    match name {
        "ID" | "String" => Some(TypeExpr::String),
        "Int" | "Float" => Some(TypeExpr::Number),
        "Boolean" => Some(TypeExpr::Boolean),
        _ => None,
    }
}
