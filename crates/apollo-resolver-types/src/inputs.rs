use crate::index::SchemaIndex;
use indexmap::IndexSet;

/// Input object types an object or interface type must declare, each exactly once.
///
/// Input types are listed in the order they are first reached: arguments in
/// field order, then input fields of each input type depth first, so nested
/// input types are declared alongside the arguments that use them.
pub fn distinct_input_types<'s>(type_name: &str, index: &SchemaIndex<'s>) -> Vec<&'s str> {
    let mut seen = IndexSet::new();
    for usage in index.input_usages(type_name) {
        visit(usage.input, index, &mut seen);
    }
    seen.into_iter().collect()
}

fn visit<'s>(input: &'s str, index: &SchemaIndex<'s>, seen: &mut IndexSet<&'s str>) {
    if !seen.insert(input) {
        return;
    }
    let Some(definition) = index.input_type(input) else {
        return;
    };
    for field in definition.fields.values() {
        if let Some(nested) = index.input_type(field.ty.inner_named_type()) {
            visit(&nested.name, index, seen);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_declares_shared_and_nested_inputs_once() {
        let mut schema = Schema::new();
        schema.insert(
            InputObjectType::new("Range")
                .field(InputValueDefinition::new("from", Type::named("Int")))
                .field(InputValueDefinition::new("to", Type::named("Int"))),
        );
        schema.insert(
            InputObjectType::new("Filter")
                .field(InputValueDefinition::new("published", Type::named("Range")))
                .field(InputValueDefinition::new("or", Type::named("Filter").non_null().list())),
        );
        schema.insert(
            InputObjectType::new("Order")
                .field(InputValueDefinition::new("field", Type::named("String").non_null())),
        );
        schema.insert(
            ObjectType::new("Query")
                .field(
                    FieldDefinition::new("posts", Type::named("String").list())
                        .argument(InputValueDefinition::new("where", Type::named("Filter")))
                        .argument(InputValueDefinition::new("orderBy", Type::named("Order"))),
                )
                .field(
                    FieldDefinition::new("count", Type::named("Int"))
                        .argument(InputValueDefinition::new("where", Type::named("Filter"))),
                )
                .field(
                    FieldDefinition::new("span", Type::named("Int"))
                        .argument(InputValueDefinition::new("range", Type::named("Range"))),
                ),
        );
        schema.insert(ObjectType::new("Unused"));

        let index = SchemaIndex::build(&schema).unwrap();
        assert_eq!(
            distinct_input_types("Query", &index),
            ["Filter", "Range", "Order"]
        );
        assert!(distinct_input_types("Unused", &index).is_empty());
    }
}
