use super::quote;
use super::Dialect;
use super::Printer;
use super::GENERATED_NOTICE;
use crate::resolve::TypeExpr;
use std::fmt;
use std::fmt::Write as _;

/// Flow declarations.
///
/// Flow has no namespaces for types, so the declarations of each schema type
/// are flattened to `<Type>_<name>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flow;

impl Flow {
    /// Maybe types inside a union are parenthesized so `?` applies to one member.
    fn write_union(&self, p: &mut Printer<'_, '_>, members: &[TypeExpr]) -> fmt::Result {
        for (i, member) in members.iter().enumerate() {
            if i > 0 {
                p.write(" | ")?;
            }
            if let TypeExpr::Nullable(_) = member {
                p.write("(")?;
                self.write_type(p, member)?;
                p.write(")")?;
            } else {
                self.write_type(p, member)?;
            }
        }
        Ok(())
    }
}

impl Dialect for Flow {
    fn write_preamble(&self, p: &mut Printer<'_, '_>) -> fmt::Result {
        p.write("// @flow")?;
        p.new_line()?;
        p.write(GENERATED_NOTICE)
    }

    fn declared_name(&self, owner: &str, name: &str) -> String {
        format!("{owner}_{name}")
    }

    fn scoped_name(&self, owner: &str, name: &str) -> String {
        self.declared_name(owner, name)
    }

    fn open_block(&self, _p: &mut Printer<'_, '_>, _owner: &str) -> fmt::Result {
        Ok(())
    }

    fn close_block(&self, _p: &mut Printer<'_, '_>, _owner: &str) -> fmt::Result {
        Ok(())
    }

    fn write_type(&self, p: &mut Printer<'_, '_>, ty: &TypeExpr) -> fmt::Result {
        match ty {
            TypeExpr::String => p.write("string"),
            TypeExpr::Number => p.write("number"),
            TypeExpr::Boolean => p.write("boolean"),
            TypeExpr::Unknown => p.write("mixed"),
            TypeExpr::Any => p.write("any"),
            TypeExpr::Named(name) => p.write(name),
            TypeExpr::Scoped { owner, name } => p.write(&self.scoped_name(owner, name)),
            TypeExpr::ValuesOf(model) => write!(p, "$Values<typeof {model}>"),
            TypeExpr::Property { of, name } => {
                p.write("$PropertyType<")?;
                self.write_type(p, of)?;
                write!(p, ", {}>", quote(name))
            }
            TypeExpr::Literal(value) => p.write(&quote(value)),
            TypeExpr::Nullable(inner) => match &**inner {
                TypeExpr::Union(members) if members.len() > 1 => {
                    p.write("?(")?;
                    self.write_union(p, members)?;
                    p.write(")")
                }
                inner => {
                    p.write("?")?;
                    self.write_type(p, inner)
                }
            },
            TypeExpr::List(inner) => {
                p.write("$ReadOnlyArray<")?;
                self.write_type(p, inner)?;
                p.write(">")
            }
            TypeExpr::Union(members) if members.is_empty() => p.write("empty"),
            TypeExpr::Union(members) => self.write_union(p, members),
            TypeExpr::Record(properties) => self.write_record(p, properties),
            TypeExpr::Generic { name, arguments } => {
                write!(p, "{name}<")?;
                self.write_joined(p, arguments, ", ")?;
                p.write(">")
            }
        }
    }

    fn no_args(&self) -> &'static str {
        "{||}"
    }

    fn property_separator(&self) -> &'static str {
        ","
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::config::Model;
    use crate::schema::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    struct Spelled(TypeExpr);

    impl fmt::Display for Spelled {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Flow.write_type(&mut Printer::new(f), &self.0)
        }
    }

    fn spell(ty: TypeExpr) -> String {
        Spelled(ty).to_string()
    }

    #[test]
    fn it_spells_type_expressions() {
        assert_eq!(spell(TypeExpr::String.nullable().list()), "$ReadOnlyArray<?string>");
        assert_eq!(spell(TypeExpr::Unknown), "mixed");
        assert_eq!(spell(TypeExpr::ValuesOf("Roles".to_owned())), "$Values<typeof Roles>");
        assert_eq!(
            spell(TypeExpr::scoped("User", "Parent").property("id")),
            "$PropertyType<User_Parent, 'id'>"
        );
        assert_eq!(
            spell(TypeExpr::union([TypeExpr::named("A"), TypeExpr::named("B")]).nullable()),
            "?(A | B)"
        );
        assert_eq!(
            spell(TypeExpr::Union(vec![
                TypeExpr::named("A").nullable(),
                TypeExpr::named("B")
            ])),
            "(?A) | B"
        );
        assert_eq!(spell(TypeExpr::union(Vec::<TypeExpr>::new())), "empty");
    }

    #[test]
    fn it_renders_flattened_declarations() {
        let mut schema = Schema::new();
        schema.insert(EnumType::new("Role").value("ADMIN").value("USER"));
        schema.insert(
            ObjectType::new("User")
                .field(FieldDefinition::new("id", Type::named("ID").non_null()))
                .field(FieldDefinition::new("role", Type::named("Role").non_null())),
        );
        schema.insert(
            ObjectType::new("Subscription").field(
                FieldDefinition::new("userJoined", Type::named("User").non_null())
                    .argument(InputValueDefinition::new("room", Type::named("String"))),
            ),
        );
        let config = Config::default().model("Role", Model::new("Roles", "./roles"));

        let generated = crate::generate(&schema, &config, &Flow).unwrap();
        assert_eq!(
            generated.source,
            indoc! { r#"
                // @flow
                // This file was generated by apollo-resolver-types. Do not edit it manually.

                import { Roles } from './roles';
                import type { GraphQLResolveInfo } from 'graphql';

                export type MaybePromise<T> = T | Promise<T>;
                export type NoArgs = {||};
                export type Resolver<Result, Parent, Args> = (parent: Parent, args: Args, context: any, info: GraphQLResolveInfo) => MaybePromise<Result>;
                export type SubscriptionResolver<Result, Parent, Args> = {
                  subscribe: (parent: Parent, args: Args, context: any, info: GraphQLResolveInfo) => MaybePromise<AsyncIterator<Result>>,
                  resolve?: (payload: Result, args: Args, context: any, info: GraphQLResolveInfo) => MaybePromise<Result>,
                };
                export type ResolveTypeFn<Parent, TypeName> = (parent: Parent, context: any, info: GraphQLResolveInfo) => MaybePromise<TypeName>;
                export type IsTypeOfFn<Parent> = (parent: Parent, context: any, info: GraphQLResolveInfo) => MaybePromise<boolean>;

                export type User_Parent = {
                  id: string,
                  role: $Values<typeof Roles>,
                };

                export const User_defaults = {
                  id: (parent: User_Parent): $PropertyType<User_Parent, 'id'> => parent.id,
                  role: (parent: User_Parent): $PropertyType<User_Parent, 'role'> => parent.role,
                };

                export type User_Id = Resolver<string, User_Parent, NoArgs>;

                export type User_Role = Resolver<$Values<typeof Roles>, User_Parent, NoArgs>;

                export type UserResolvers = {
                  id: User_Id,
                  role: User_Role,
                };

                export type Subscription_Parent = {};

                export type Subscription_UserJoinedArgs = {
                  room: ?string,
                };

                export type Subscription_UserJoined = SubscriptionResolver<User_Parent, Subscription_Parent, Subscription_UserJoinedArgs>;

                export type SubscriptionResolvers = {
                  userJoined: Subscription_UserJoined,
                };

                export type Resolvers = {
                  User: UserResolvers,
                  Subscription: SubscriptionResolvers,
                };
            "# }
        );
        assert_eq!(
            generated.warnings,
            [crate::Warning::MissingModel {
                type_name: "User".to_owned()
            }]
        );
    }
}
