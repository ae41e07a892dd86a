use crate::parse;
use apollo_resolver_types::generate;
use apollo_resolver_types::Config;
use apollo_resolver_types::Flow;
use apollo_resolver_types::Model;
use apollo_resolver_types::TypeScript;
use apollo_resolver_types::Warning;
use expect_test::expect;

#[test]
fn field_arguments_get_their_own_bag() {
    let schema = parse(
        r#"
        type Query { user(id: ID!): User }
        type User { id: ID! posts(limit: Int): [Post!]! }
        type Post { title: String }
        "#,
    );
    let generated = generate(&schema, &Config::default(), &TypeScript).unwrap();
    let source = &generated.source;

    assert!(
        source.contains("  export type PostsArgs = {\n    limit: number | null;\n  };"),
        "{source}"
    );
    assert!(
        source.contains(
            "  export type Posts = Resolver<ReadonlyArray<PostResolvers.Parent>, UserResolvers.Parent, UserResolvers.PostsArgs>;"
        ),
        "{source}"
    );
    assert!(
        source.contains(
            "export namespace PostResolvers {\n  export type Parent = {\n    title: string | null;\n  };"
        ),
        "{source}"
    );
    assert_eq!(
        generated.warnings,
        [
            Warning::MissingModel {
                type_name: "User".to_owned()
            },
            Warning::MissingModel {
                type_name: "Post".to_owned()
            },
        ]
    );
}

#[test]
fn shared_input_types_are_declared_per_owner() {
    let schema = parse(
        r#"
        input Filter { term: String }
        type A { items(filter: Filter): [String!]! }
        type B { items(filter: Filter): [String!]! }
        type Query { a: A b: B }
        "#,
    );
    let generated = generate(&schema, &Config::default(), &TypeScript).unwrap();

    let expected = expect![[r#"
        /* eslint-disable */
        // This file was generated by apollo-resolver-types. Do not edit it manually.

        import type { GraphQLResolveInfo } from 'graphql';

        export type MaybePromise<T> = T | Promise<T>;
        export type NoArgs = Record<string, never>;
        export type Resolver<Result, Parent, Args> = (parent: Parent, args: Args, context: any, info: GraphQLResolveInfo) => MaybePromise<Result>;
        export type SubscriptionResolver<Result, Parent, Args> = {
          subscribe: (parent: Parent, args: Args, context: any, info: GraphQLResolveInfo) => MaybePromise<AsyncIterator<Result>>;
          resolve?: (payload: Result, args: Args, context: any, info: GraphQLResolveInfo) => MaybePromise<Result>;
        };
        export type ResolveTypeFn<Parent, TypeName> = (parent: Parent, context: any, info: GraphQLResolveInfo) => MaybePromise<TypeName>;
        export type IsTypeOfFn<Parent> = (parent: Parent, context: any, info: GraphQLResolveInfo) => MaybePromise<boolean>;

        export namespace AResolvers {
          export type Parent = {};

          export type Filter = {
            term: string | null;
          };

          export type ItemsArgs = {
            filter: AResolvers.Filter | null;
          };

          export type Items = Resolver<ReadonlyArray<string>, AResolvers.Parent, AResolvers.ItemsArgs>;
        }

        export type AResolvers = {
          items: AResolvers.Items;
        };

        export namespace BResolvers {
          export type Parent = {};

          export type Filter = {
            term: string | null;
          };

          export type ItemsArgs = {
            filter: BResolvers.Filter | null;
          };

          export type Items = Resolver<ReadonlyArray<string>, BResolvers.Parent, BResolvers.ItemsArgs>;
        }

        export type BResolvers = {
          items: BResolvers.Items;
        };

        export namespace QueryResolvers {
          export type Parent = {};

          export type A = Resolver<AResolvers.Parent | null, QueryResolvers.Parent, NoArgs>;

          export type B = Resolver<BResolvers.Parent | null, QueryResolvers.Parent, NoArgs>;
        }

        export type QueryResolvers = {
          a: QueryResolvers.A;
          b: QueryResolvers.B;
        };

        export type Resolvers = {
          A: AResolvers;
          B: BResolvers;
          Query: QueryResolvers;
        };
    "#]];
    expected.assert_eq(&generated.source);
}

#[test]
fn shared_input_types_are_flattened_per_owner_in_flow() {
    let schema = parse(
        r#"
        input Filter { term: String }
        type A { items(filter: Filter): [String!]! }
        type B { items(filter: Filter): [String!]! }
        type Query { a: A b: B }
        "#,
    );
    let source = generate(&schema, &Config::default(), &Flow).unwrap().source;

    assert!(source.starts_with("// @flow\n"), "{source}");
    for owner in ["A", "B"] {
        assert_eq!(
            source.matches(&format!("export type {owner}_Filter = ")).count(),
            1,
            "{source}"
        );
        assert!(
            source.contains(&format!("  filter: ?{owner}_Filter,\n")),
            "{source}"
        );
    }
}

#[test]
fn unions_dispatch_to_their_members() {
    let schema = parse(
        r#"
        type Post { id: ID! }
        type Comment { id: ID! }
        union SearchResult = Post | Comment
        type Query { search(term: String!): [SearchResult!]! }
        "#,
    );
    let source = generate(&schema, &Config::default(), &TypeScript)
        .unwrap()
        .source;

    assert!(
        source.contains(
            "export namespace SearchResultResolvers {\n  export type Parent = PostResolvers.Parent | CommentResolvers.Parent;\n}"
        ),
        "{source}"
    );
    assert!(
        source.contains(
            "export type SearchResultResolvers = {\n  __resolveType: ResolveTypeFn<SearchResultResolvers.Parent, 'Post' | 'Comment'>;\n};"
        ),
        "{source}"
    );
    assert!(
        source.contains("  __isTypeOf?: IsTypeOfFn<SearchResultResolvers.Parent>;\n"),
        "{source}"
    );
    assert!(
        source.contains(
            "  export type Search = Resolver<ReadonlyArray<SearchResultResolvers.Parent>, QueryResolvers.Parent, QueryResolvers.SearchArgs>;"
        ),
        "{source}"
    );
    assert!(
        source.contains("  SearchResult?: SearchResultResolvers;\n"),
        "{source}"
    );
}

#[test]
fn enums_named_like_helpers_are_renamed() {
    let schema = parse(
        r#"
        enum Resolver { A B }
        type Query { r: Resolver }
        "#,
    );
    let source = generate(&schema, &Config::default(), &TypeScript)
        .unwrap()
        .source;

    assert_eq!(source.matches("export type Resolver<").count(), 1, "{source}");
    assert!(!source.contains("export type Resolver ="), "{source}");
    assert!(source.contains("export type Resolver_Enum = 'A' | 'B';"), "{source}");
    assert!(
        source.contains(
            "  export type R = Resolver<Resolver_Enum | null, QueryResolvers.Parent, NoArgs>;"
        ),
        "{source}"
    );
}

#[test]
fn imported_models_and_enums_get_distinct_bindings() {
    let schema = parse(
        r#"
        enum Role { A }
        type Query { user: User post: Post }
        type User { id: ID! role: Role }
        type Post { id: ID! }
        "#,
    );
    let config = Config::default()
        .model("User", Model::new("Role", "./models"))
        .model("Post", Model::new("Resolver", "./models"));
    let source = generate(&schema, &config, &TypeScript).unwrap().source;

    assert!(
        source.contains("import type { Resolver as Resolver_Model, Role } from './models';"),
        "{source}"
    );
    assert!(!source.contains("export type Role ="), "{source}");
    assert!(source.contains("export type Role_Enum = 'A';"), "{source}");
    assert!(
        source.contains("export namespace UserResolvers {\n  export type Parent = Role;"),
        "{source}"
    );
    assert!(
        source.contains("  export type Role2 = Resolver<Role_Enum | null, UserResolvers.Parent, NoArgs>;"),
        "{source}"
    );
    assert!(
        source.contains("export namespace PostResolvers {\n  export type Parent = Resolver_Model;"),
        "{source}"
    );
}

#[test]
fn flattened_names_never_redeclare_enums() {
    let schema = parse(
        r#"
        enum Post_Parent { A }
        type Query { post: Post }
        type Post { id: String! k: Post_Parent }
        "#,
    );
    let source = generate(&schema, &Config::default(), &Flow).unwrap().source;

    assert_eq!(source.matches("export type Post_Parent =").count(), 1, "{source}");
    assert!(source.contains("export type Post_Parent = 'A';"), "{source}");
    assert!(
        source.contains("export type Post_Parent2 = {\n  id: string,\n  k: ?Post_Parent,\n};"),
        "{source}"
    );
    assert!(
        source.contains("export type Query_Post = Resolver<?Post_Parent2, Query_Parent, NoArgs>;"),
        "{source}"
    );
}

#[test]
fn bound_subscription_roots_get_no_default_resolvers() {
    let schema = parse(
        r#"
        type Query { ok: Boolean }
        type Subscription { tick: Int! }
        "#,
    );
    let config = Config::default().model("Subscription", Model::new("Root", "./root"));
    let source = generate(&schema, &config, &TypeScript).unwrap().source;

    assert!(!source.contains("export const defaults"), "{source}");
    assert!(
        source.contains("export namespace SubscriptionResolvers {\n  export type Parent = Root;"),
        "{source}"
    );
    assert!(
        source.contains(
            "  export type Tick = SubscriptionResolver<number, SubscriptionResolvers.Parent, NoArgs>;"
        ),
        "{source}"
    );
}
