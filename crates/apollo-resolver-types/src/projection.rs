//! Projection of a schema onto dialect neutral resolver declarations.

use crate::config::Config;
use crate::config::Model;
use crate::defaults::default_resolvers;
use crate::defaults::reads_parent_property;
use crate::diagnostics::Warning;
use crate::dialect::Dialect;
use crate::dialect::Rendered;
use crate::index::SchemaIndex;
use crate::inputs::distinct_input_types;
use crate::resolve::ImportKind;
use crate::resolve::Imports;
use crate::resolve::Property;
use crate::resolve::TypeExpr;
use crate::resolve::TypeResolver;
use crate::schema::FieldDefinition;
use crate::schema::InterfaceType;
use crate::schema::ObjectType;
use crate::schema::Schema;
use crate::schema::TypeDefinition;
use crate::schema::UnionType;
use crate::GenerateError;
use indexmap::IndexMap;
use indexmap::IndexSet;
use std::collections::HashSet;

/// Helper types every dialect declares in the output header.
pub mod helpers {
    pub const MAYBE_PROMISE: &str = "MaybePromise";
    pub const NO_ARGS: &str = "NoArgs";
    pub const RESOLVER: &str = "Resolver";
    pub const SUBSCRIPTION_RESOLVER: &str = "SubscriptionResolver";
    pub const RESOLVE_TYPE_FN: &str = "ResolveTypeFn";
    pub const IS_TYPE_OF_FN: &str = "IsTypeOfFn";
    pub const RESOLVERS: &str = "Resolvers";
    pub const RESOLVE_INFO: &str = "GraphQLResolveInfo";

    pub(crate) const ALL: [&str; 8] = [
        MAYBE_PROMISE,
        NO_ARGS,
        RESOLVER,
        SUBSCRIPTION_RESOLVER,
        RESOLVE_TYPE_FN,
        IS_TYPE_OF_FN,
        RESOLVERS,
        RESOLVE_INFO,
    ];

    /// Global types the dialects refer to, which no declaration may shadow.
    pub(crate) const GLOBALS: [&str; 7] = [
        "Promise",
        "AsyncIterator",
        "Record",
        "ReadonlyArray",
        "$ReadOnlyArray",
        "$Values",
        "$PropertyType",
    ];
}

/// Everything the output declares, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub imports: Imports,
    /// Type of the `context` argument of every resolver.
    pub context: TypeExpr,
    pub enums: Vec<EnumDeclaration>,
    /// Object types, then interfaces, then unions.
    pub blocks: Vec<TypeBlock>,
    pub resolver_map: Vec<ResolverMapEntry>,
    pub warnings: Vec<Warning>,
}

/// A schema enum without a model, declared as a union of its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDeclaration {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Object,
    Interface,
    Union,
}

/// The declarations owned by one object, interface or union type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBlock {
    pub owner: String,
    pub kind: BlockKind,
    pub declarations: Vec<Declaration>,
    /// Members of the resolver shape an implementation of the type must satisfy.
    pub shape: Vec<Property>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    /// Called once per request.
    Request,
    /// Produces a stream of payloads, each optionally mapped to a result.
    Subscription,
}

/// A declaration scoped to its owning type. Names are local to the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// The value resolvers of the type receive as their parent.
    Parent { name: String, ty: TypeExpr },
    /// Pass-through resolvers reading properties of the parent.
    Defaults {
        name: String,
        parent: TypeExpr,
        fields: Vec<String>,
    },
    Input { input: String, name: String, ty: TypeExpr },
    Arguments { field: String, name: String, ty: TypeExpr },
    Resolver {
        field: String,
        name: String,
        kind: ResolverKind,
        ty: TypeExpr,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverMapEntry {
    pub type_name: String,
    pub optional: bool,
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Parent { name, .. }
            | Declaration::Defaults { name, .. }
            | Declaration::Input { name, .. }
            | Declaration::Arguments { name, .. }
            | Declaration::Resolver { name, .. } => name,
        }
    }

    /// The declared type, for everything but the default resolver bundle.
    pub fn ty(&self) -> Option<&TypeExpr> {
        match self {
            Declaration::Parent { ty, .. }
            | Declaration::Input { ty, .. }
            | Declaration::Arguments { ty, .. }
            | Declaration::Resolver { ty, .. } => Some(ty),
            Declaration::Defaults { .. } => None,
        }
    }
}

impl TypeBlock {
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|decl| decl.name() == name)
    }

    pub fn shape_member(&self, name: &str) -> Option<&Property> {
        self.shape.iter().find(|member| member.name == name)
    }
}

impl Projection {
    pub fn block(&self, owner: &str) -> Option<&TypeBlock> {
        self.blocks.iter().find(|block| block.owner == owner)
    }

    /// Render the projection as source text in `dialect`.
    pub fn render<'a>(&'a self, dialect: &'a dyn Dialect) -> Rendered<'a> {
        Rendered::new(self, dialect)
    }
}

/// Allocates top-level and block-local declaration names.
///
/// Top-level names are pairwise distinct. A local name never equals a
/// top-level name, so it cannot shadow one inside a namespace, and
/// `<owner>_<local>` is neither a top-level name nor claimed twice, so
/// flattening blocks cannot collide.
#[derive(Debug, Default)]
struct Names {
    top_level: HashSet<String>,
    flattened: HashSet<String>,
}

impl Names {
    fn reserve(&mut self, name: &str) {
        self.top_level.insert(name.to_owned());
    }

    /// Reserve `base` at the top level, or `<base><suffix>`, `<base><suffix>2`, ...
    /// when it is taken.
    fn reserve_distinct(&mut self, base: &str, suffix: &str) -> String {
        if self.top_level.insert(base.to_owned()) {
            return base.to_owned();
        }
        let mut counter = 1;
        loop {
            let name = match counter {
                1 => format!("{base}{suffix}"),
                n => format!("{base}{suffix}{n}"),
            };
            if self.top_level.insert(name.clone()) {
                return name;
            }
            counter += 1;
        }
    }

    fn claim(&mut self, owner: &str, base: &str) -> String {
        let mut local = base.to_owned();
        let mut suffix = 1;
        loop {
            let flattened = format!("{owner}_{local}");
            if !self.top_level.contains(&local)
                && !self.top_level.contains(&flattened)
                && self.flattened.insert(flattened)
            {
                return local;
            }
            suffix += 1;
            local = format!("{base}{suffix}");
        }
    }
}

/// Walks a schema once and collects every declaration the output needs.
#[derive(Debug)]
pub struct Projector<'s> {
    schema: &'s Schema,
    index: SchemaIndex<'s>,
    config: &'s Config,
    resolver: TypeResolver<'s>,
    names: Names,
    warnings: IndexSet<Warning>,
}

impl<'s> Projector<'s> {
    pub fn new(schema: &'s Schema, index: SchemaIndex<'s>, config: &'s Config) -> Self {
        Self {
            schema,
            index,
            config,
            resolver: TypeResolver::new(schema, &config.models),
            names: Names::default(),
            warnings: IndexSet::new(),
        }
    }

    pub fn project(mut self) -> Result<Projection, GenerateError> {
        let schema = self.schema;

        let mut enums = self.project_enums();
        self.reserve_top_level_names(&mut enums);
        self.claim_parent_names();

        self.resolver
            .model(&Model::new(helpers::RESOLVE_INFO, "graphql"), ImportKind::Type);
        let context = match &self.config.context {
            Some(context) => self
                .resolver
                .model(&Model::new(&context.name, &context.path), ImportKind::Type),
            None => TypeExpr::Any,
        };

        let mut blocks = Vec::new();
        for object in schema.objects() {
            blocks.push(self.project_object(object)?);
        }
        for interface in schema.interfaces() {
            blocks.push(self.project_interface(interface)?);
        }
        for union_ in schema.unions() {
            blocks.push(self.project_union(union_)?);
        }

        let resolver_map = blocks
            .iter()
            .map(|block| ResolverMapEntry {
                type_name: block.owner.clone(),
                optional: block.kind != BlockKind::Object,
            })
            .collect();

        let unbound_scalars: Vec<_> = self.resolver.unbound_scalars().collect();
        for type_name in unbound_scalars {
            self.warnings.insert(Warning::UnboundScalar {
                type_name: type_name.to_owned(),
            });
        }

        Ok(Projection {
            imports: self.resolver.into_imports(),
            context,
            enums,
            blocks,
            resolver_map,
            warnings: self.warnings.into_iter().collect(),
        })
    }

    fn project_enums(&self) -> Vec<EnumDeclaration> {
        self.schema
            .enums()
            .filter(|enum_| self.config.models.get(&enum_.name).is_none())
            .map(|enum_| EnumDeclaration {
                name: enum_.name.clone(),
                values: enum_.values.iter().cloned().collect(),
            })
            .collect()
    }

    /// Settle every name declared or imported at the top level of the output.
    ///
    /// Helpers and resolver shapes keep their names. Imports whose binding is
    /// taken are aliased to `<name>_Model`, and enums whose name is taken are
    /// declared as `<name>_Enum`.
    fn reserve_top_level_names(&mut self, enums: &mut [EnumDeclaration]) {
        let (schema, config) = (self.schema, self.config);
        for name in helpers::ALL.into_iter().chain(helpers::GLOBALS) {
            self.names.reserve(name);
        }
        for definition in schema.types.values() {
            if let TypeDefinition::Object(_) | TypeDefinition::Interface(_) | TypeDefinition::Union(_) =
                definition
            {
                self.names.reserve(&shape_name(definition.name()));
            }
        }

        self.resolver
            .bind_import("graphql", helpers::RESOLVE_INFO, helpers::RESOLVE_INFO.to_owned());
        let context = config
            .context
            .as_ref()
            .map(|context| Model::new(&context.name, &context.path));
        let models = context
            .iter()
            .chain(config.models.iter().map(|(_, model)| model));
        for model in models {
            let binding = model.import_binding();
            if self.resolver.is_bound(&model.path, binding) {
                continue;
            }
            let local = self.names.reserve_distinct(binding, "_Model");
            if local != binding {
                log::debug!("importing `{binding}` from `{}` as `{local}`", model.path);
            }
            self.resolver.bind_import(&model.path, binding, local);
        }

        for enum_ in enums {
            let declared_name = self.names.reserve_distinct(&enum_.name, "_Enum");
            if declared_name != enum_.name {
                log::debug!("declaring enum `{}` as `{declared_name}`", enum_.name);
            }
            self.resolver.declare_enum(&enum_.name, declared_name.clone());
            enum_.name = declared_name;
        }
    }

    /// Parent declarations are referenced across blocks, so they are named up front.
    fn claim_parent_names(&mut self) {
        let schema = self.schema;
        for definition in schema.types.values() {
            if let TypeDefinition::Object(_) | TypeDefinition::Interface(_) | TypeDefinition::Union(_) =
                definition
            {
                let local_name = self.names.claim(definition.name(), "Parent");
                self.resolver.declare_parent(definition.name(), local_name);
            }
        }
    }

    fn warn(&mut self, warning: Warning) {
        if !self.warnings.contains(&warning) {
            log::warn!("{warning}");
            self.warnings.insert(warning);
        }
    }

    /// Claim local names for the input types `owner` declares and resolve
    /// input references to them while projecting its block.
    fn enter_scope(&mut self, owner: &'s str) -> IndexMap<&'s str, String> {
        let mut inputs = IndexMap::new();
        for input in distinct_input_types(owner, &self.index) {
            let local_name = self.names.claim(owner, input);
            inputs.insert(input, local_name);
        }
        self.resolver.enter_scope(owner, inputs.clone());
        inputs
    }

    fn project_object(&mut self, object: &'s ObjectType) -> Result<TypeBlock, GenerateError> {
        let (schema, config) = (self.schema, self.config);
        let owner = object.name.as_str();
        let model = config.models.get(owner);
        let is_root = schema.is_root_operation(owner);
        let fields = schema.effective_fields(object);
        log::debug!("projecting object type `{owner}`");

        let inputs = self.enter_scope(owner);
        let parent = self.resolver.parent_reference(owner);
        let parent_ty = match model {
            Some(model) => self.resolver.model(model, ImportKind::Type),
            None if is_root => TypeExpr::Record(Vec::new()),
            None => {
                self.warn(Warning::MissingModel {
                    type_name: owner.to_owned(),
                });
                self.fallback_record(&fields)?
            }
        };
        let mut declarations = vec![Declaration::Parent {
            name: self.resolver.parent_name(owner).to_owned(),
            ty: parent_ty,
        }];

        let kind = if schema.subscription_root() == Some(owner) {
            ResolverKind::Subscription
        } else {
            ResolverKind::Request
        };
        if config.default_resolvers {
            let defaulted = default_resolvers(&fields, model, is_root, kind);
            if !defaulted.is_empty() {
                declarations.push(Declaration::Defaults {
                    name: self.names.claim(owner, "defaults"),
                    parent: parent.clone(),
                    fields: defaulted.iter().map(|field| field.name.clone()).collect(),
                });
            }
        }

        self.declare_inputs(&inputs, &mut declarations)?;
        let mut shape =
            self.declare_fields(owner, &parent, &fields, kind, false, &mut declarations)?;

        let abstract_parents: Vec<_> = object
            .implements_interfaces
            .iter()
            .map(String::as_str)
            .chain(self.index.unions_containing(owner))
            .map(|abstract_type| self.resolver.parent_reference(abstract_type))
            .collect();
        if !abstract_parents.is_empty() {
            shape.push(Property::optional(
                "__isTypeOf",
                TypeExpr::generic(helpers::IS_TYPE_OF_FN, vec![TypeExpr::union(abstract_parents)]),
            ));
        }

        Ok(TypeBlock {
            owner: owner.to_owned(),
            kind: BlockKind::Object,
            declarations,
            shape,
        })
    }

    fn project_interface(
        &mut self,
        interface: &'s InterfaceType,
    ) -> Result<TypeBlock, GenerateError> {
        let owner = interface.name.as_str();
        log::debug!("projecting interface type `{owner}`");

        let inputs = self.enter_scope(owner);
        let parent = self.resolver.parent_reference(owner);
        let mut declarations = vec![Declaration::Parent {
            name: self.resolver.parent_name(owner).to_owned(),
            ty: self.resolver.parent_of(owner, &self.index)?,
        }];
        self.declare_inputs(&inputs, &mut declarations)?;

        let fields: Vec<_> = interface.fields.values().collect();
        let members = self.declare_fields(
            owner,
            &parent,
            &fields,
            ResolverKind::Request,
            true,
            &mut declarations,
        )?;
        let mut shape = vec![self.discriminator(owner, &parent)];
        shape.extend(members);

        Ok(TypeBlock {
            owner: owner.to_owned(),
            kind: BlockKind::Interface,
            declarations,
            shape,
        })
    }

    fn project_union(&mut self, union_: &'s UnionType) -> Result<TypeBlock, GenerateError> {
        let owner = union_.name.as_str();
        log::debug!("projecting union type `{owner}`");

        self.enter_scope(owner);
        let parent = self.resolver.parent_reference(owner);
        let declarations = vec![Declaration::Parent {
            name: self.resolver.parent_name(owner).to_owned(),
            ty: self.resolver.parent_of(owner, &self.index)?,
        }];

        Ok(TypeBlock {
            owner: owner.to_owned(),
            kind: BlockKind::Union,
            declarations,
            shape: vec![self.discriminator(owner, &parent)],
        })
    }

    /// `__resolveType`, returning the name of the concrete type of an abstract value.
    /// Only optional when there is a single possible type.
    fn discriminator(&self, owner: &str, parent: &TypeExpr) -> Property {
        let possible_types = self.index.possible_types(owner);
        let type_names = TypeExpr::union(
            possible_types
                .iter()
                .map(|name| TypeExpr::Literal((*name).to_owned())),
        );
        Property {
            name: "__resolveType".to_owned(),
            ty: TypeExpr::generic(helpers::RESOLVE_TYPE_FN, vec![parent.clone(), type_names]),
            optional: possible_types.len() == 1,
        }
    }

    /// The parent of an unbound object type: its fields that read a parent property.
    fn fallback_record(&mut self, fields: &[&'s FieldDefinition]) -> Result<TypeExpr, GenerateError> {
        let mut properties = Vec::new();
        for field in fields.iter().filter(|field| reads_parent_property(field)) {
            properties.push(Property::new(&field.name, self.resolver.resolve(&field.ty)?));
        }
        Ok(TypeExpr::Record(properties))
    }

    fn declare_inputs(
        &mut self,
        inputs: &IndexMap<&'s str, String>,
        declarations: &mut Vec<Declaration>,
    ) -> Result<(), GenerateError> {
        for (input, local_name) in inputs {
            let Some(definition) = self.index.input_type(input) else {
                continue;
            };
            let mut properties = Vec::with_capacity(definition.fields.len());
            for field in definition.fields.values() {
                properties.push(Property::new(&field.name, self.resolver.resolve(&field.ty)?));
            }
            declarations.push(Declaration::Input {
                input: (*input).to_owned(),
                name: local_name.clone(),
                ty: TypeExpr::Record(properties),
            });
        }
        Ok(())
    }

    /// Declare argument bags, then resolver types, and return the shape members.
    fn declare_fields(
        &mut self,
        owner: &str,
        parent: &TypeExpr,
        fields: &[&'s FieldDefinition],
        kind: ResolverKind,
        optional: bool,
        declarations: &mut Vec<Declaration>,
    ) -> Result<Vec<Property>, GenerateError> {
        let mut arguments = Vec::with_capacity(fields.len());
        for field in fields {
            if field.arguments.is_empty() {
                arguments.push(TypeExpr::named(helpers::NO_ARGS));
                continue;
            }
            let name = self
                .names
                .claim(owner, &format!("{}Args", upper_first(&field.name)));
            let mut properties = Vec::with_capacity(field.arguments.len());
            for argument in &field.arguments {
                properties.push(Property::new(
                    &argument.name,
                    self.resolver.resolve(&argument.ty)?,
                ));
            }
            arguments.push(TypeExpr::scoped(owner, &name));
            declarations.push(Declaration::Arguments {
                field: field.name.clone(),
                name,
                ty: TypeExpr::Record(properties),
            });
        }

        let helper = match kind {
            ResolverKind::Request => helpers::RESOLVER,
            ResolverKind::Subscription => helpers::SUBSCRIPTION_RESOLVER,
        };
        let mut shape = Vec::with_capacity(fields.len());
        for (field, arguments) in fields.iter().zip(arguments) {
            let result = self.resolver.resolve(&field.ty)?;
            let name = self.names.claim(owner, &upper_first(&field.name));
            shape.push(Property {
                name: field.name.clone(),
                ty: TypeExpr::scoped(owner, &name),
                optional,
            });
            declarations.push(Declaration::Resolver {
                field: field.name.clone(),
                name,
                kind,
                ty: TypeExpr::generic(helper, vec![result, parent.clone(), arguments]),
            });
        }
        Ok(shape)
    }
}

/// Name of the resolver shape of an object, interface or union type.
pub fn shape_name(type_name: &str) -> String {
    format!("{type_name}{}", helpers::RESOLVERS)
}

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
