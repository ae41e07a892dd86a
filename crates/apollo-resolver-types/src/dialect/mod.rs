//! Rendering a [`Projection`] as TypeScript or Flow source text.
//!
//! Both dialects share one walk over the projection, implemented by the
//! provided methods of [`Dialect`]. A dialect only decides how names are
//! scoped, how type expressions are spelled, and what the file header says.

use crate::projection::helpers;
use crate::projection::shape_name;
use crate::projection::Declaration;
use crate::projection::EnumDeclaration;
use crate::projection::Projection;
use crate::projection::ResolverMapEntry;
use crate::projection::TypeBlock;
use crate::resolve::Import;
use crate::resolve::ImportKind;
use crate::resolve::Property;
use crate::resolve::TypeExpr;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

pub mod flow;
pub mod typescript;

pub use flow::Flow;
pub use typescript::TypeScript;

/// First line of the provenance comment of every generated file.
pub const GENERATED_NOTICE: &str =
    "// This file was generated by apollo-resolver-types. Do not edit it manually.";

const INDENT: &str = "  ";

/// Line oriented writer over a [`fmt::Formatter`], tracking indentation.
pub struct Printer<'fmt, 'out> {
    indent_level: usize,
    output: &'fmt mut fmt::Formatter<'out>,
}

impl<'fmt, 'out> Printer<'fmt, 'out> {
    pub fn new(output: &'fmt mut fmt::Formatter<'out>) -> Self {
        Self {
            indent_level: 0,
            output,
        }
    }

    pub fn write(&mut self, str: &str) -> fmt::Result {
        self.output.write_str(str)
    }

    pub fn indent(&mut self) -> fmt::Result {
        self.indent_level += 1;
        self.new_line()
    }

    pub fn dedent(&mut self) -> fmt::Result {
        self.indent_level -= 1; // checked underflow in debug mode
        self.new_line()
    }

    pub fn new_line(&mut self) -> fmt::Result {
        self.write("\n")?;
        for _ in 0..self.indent_level {
            self.write(INDENT)?;
        }
        Ok(())
    }

    /// Leave one empty line, without trailing whitespace.
    pub fn blank_line(&mut self) -> fmt::Result {
        self.write("\n")?;
        self.new_line()
    }
}

impl fmt::Write for Printer<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s)
    }
}

impl fmt::Debug for Printer<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Printer")
            .field("indent_level", &self.indent_level)
            .finish_non_exhaustive()
    }
}

/// A target language for generated declarations.
pub trait Dialect {
    /// Lines opening the file, before imports.
    fn write_preamble(&self, p: &mut Printer<'_, '_>) -> fmt::Result;

    /// Spell a declaration of `owner`'s block where it is declared.
    fn declared_name(&self, owner: &str, name: &str) -> String;

    /// Spell a reference to a declaration of `owner`'s block from anywhere in the file.
    fn scoped_name(&self, owner: &str, name: &str) -> String;

    fn open_block(&self, p: &mut Printer<'_, '_>, owner: &str) -> fmt::Result;

    fn close_block(&self, p: &mut Printer<'_, '_>, owner: &str) -> fmt::Result;

    fn write_type(&self, p: &mut Printer<'_, '_>, ty: &TypeExpr) -> fmt::Result;

    /// The type of the arguments of a field that takes none.
    fn no_args(&self) -> &'static str;

    /// Terminates each property of a multi-line object type.
    fn property_separator(&self) -> &'static str;

    fn write_import(
        &self,
        p: &mut Printer<'_, '_>,
        path: &str,
        names: &BTreeMap<String, Import>,
    ) -> fmt::Result {
        let type_only = names.values().all(|import| import.kind == ImportKind::Type);
        p.write(if type_only { "import type { " } else { "import { " })?;
        for (i, (name, import)) in names.iter().enumerate() {
            if i > 0 {
                p.write(", ")?;
            }
            if !type_only && import.kind == ImportKind::Type {
                p.write("type ")?;
            }
            p.write(name)?;
            if let Some(alias) = &import.alias {
                write!(p, " as {alias}")?;
            }
        }
        write!(p, " }} from {};", quote(path))
    }

    fn write_helpers(&self, p: &mut Printer<'_, '_>, context: &TypeExpr) -> fmt::Result {
        write!(p, "export type {}<T> = T | Promise<T>;", helpers::MAYBE_PROMISE)?;
        p.new_line()?;
        write!(p, "export type {} = {};", helpers::NO_ARGS, self.no_args())?;
        p.new_line()?;

        write!(
            p,
            "export type {}<Result, Parent, Args> = (parent: Parent, args: Args, ",
            helpers::RESOLVER
        )?;
        context_and_info(self, p, context)?;
        write!(p, " => {}<Result>;", helpers::MAYBE_PROMISE)?;
        p.new_line()?;

        let separator = self.property_separator();
        write!(
            p,
            "export type {}<Result, Parent, Args> = {{",
            helpers::SUBSCRIPTION_RESOLVER
        )?;
        p.indent()?;
        p.write("subscribe: (parent: Parent, args: Args, ")?;
        context_and_info(self, p, context)?;
        write!(
            p,
            " => {}<AsyncIterator<Result>>{separator}",
            helpers::MAYBE_PROMISE
        )?;
        p.new_line()?;
        p.write("resolve?: (payload: Result, args: Args, ")?;
        context_and_info(self, p, context)?;
        write!(p, " => {}<Result>{separator}", helpers::MAYBE_PROMISE)?;
        p.dedent()?;
        p.write("};")?;
        p.new_line()?;

        write!(
            p,
            "export type {}<Parent, TypeName> = (parent: Parent, ",
            helpers::RESOLVE_TYPE_FN
        )?;
        context_and_info(self, p, context)?;
        write!(p, " => {}<TypeName>;", helpers::MAYBE_PROMISE)?;
        p.new_line()?;

        write!(
            p,
            "export type {}<Parent> = (parent: Parent, ",
            helpers::IS_TYPE_OF_FN
        )?;
        context_and_info(self, p, context)?;
        write!(p, " => {}<boolean>;", helpers::MAYBE_PROMISE)
    }

    fn write_enum(&self, p: &mut Printer<'_, '_>, enum_: &EnumDeclaration) -> fmt::Result {
        let values = TypeExpr::union(enum_.values.iter().cloned().map(TypeExpr::Literal));
        write!(p, "export type {} = ", enum_.name)?;
        self.write_type(p, &values)?;
        p.write(";")
    }

    fn write_block(&self, p: &mut Printer<'_, '_>, block: &TypeBlock) -> fmt::Result {
        self.open_block(p, &block.owner)?;
        for (i, declaration) in block.declarations.iter().enumerate() {
            if i > 0 {
                p.blank_line()?;
            }
            self.write_declaration(p, &block.owner, declaration)?;
        }
        self.close_block(p, &block.owner)?;
        p.blank_line()?;
        write!(p, "export type {} = ", shape_name(&block.owner))?;
        self.write_record(p, &block.shape)?;
        p.write(";")
    }

    fn write_declaration(
        &self,
        p: &mut Printer<'_, '_>,
        owner: &str,
        declaration: &Declaration,
    ) -> fmt::Result {
        let name = self.declared_name(owner, declaration.name());
        let Declaration::Defaults { parent, fields, .. } = declaration else {
            write!(p, "export type {name} = ")?;
            if let Some(ty) = declaration.ty() {
                self.write_type(p, ty)?;
            }
            return p.write(";");
        };

        write!(p, "export const {name} = {{")?;
        p.indent()?;
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                p.new_line()?;
            }
            write!(p, "{field}: (parent: ")?;
            self.write_type(p, parent)?;
            p.write("): ")?;
            self.write_type(p, &parent.clone().property(field))?;
            write!(p, " => parent.{field},")?;
        }
        p.dedent()?;
        p.write("};")
    }

    /// An object type with one property per line.
    fn write_record(&self, p: &mut Printer<'_, '_>, properties: &[Property]) -> fmt::Result {
        if properties.is_empty() {
            return p.write("{}");
        }
        p.write("{")?;
        p.indent()?;
        for (i, property) in properties.iter().enumerate() {
            if i > 0 {
                p.new_line()?;
            }
            p.write(&property.name)?;
            p.write(if property.optional { "?: " } else { ": " })?;
            self.write_type(p, &property.ty)?;
            p.write(self.property_separator())?;
        }
        p.dedent()?;
        p.write("}")
    }

    fn write_resolver_map(
        &self,
        p: &mut Printer<'_, '_>,
        entries: &[ResolverMapEntry],
    ) -> fmt::Result {
        let properties: Vec<_> = entries
            .iter()
            .map(|entry| Property {
                name: entry.type_name.clone(),
                ty: TypeExpr::Named(shape_name(&entry.type_name)),
                optional: entry.optional,
            })
            .collect();
        write!(p, "export type {} = ", helpers::RESOLVERS)?;
        self.write_record(p, &properties)?;
        p.write(";")
    }

    /// Write `types` separated by `separator`.
    fn write_joined(
        &self,
        p: &mut Printer<'_, '_>,
        types: &[TypeExpr],
        separator: &str,
    ) -> fmt::Result {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                p.write(separator)?;
            }
            self.write_type(p, ty)?;
        }
        Ok(())
    }
}

/// The trailing parameters every resolver function receives.
fn context_and_info<D: Dialect + ?Sized>(
    dialect: &D,
    p: &mut Printer<'_, '_>,
    context: &TypeExpr,
) -> fmt::Result {
    p.write("context: ")?;
    dialect.write_type(p, context)?;
    write!(p, ", info: {})", helpers::RESOLVE_INFO)
}

/// A projection rendered in a dialect, through [`fmt::Display`].
pub struct Rendered<'a> {
    projection: &'a Projection,
    dialect: &'a dyn Dialect,
}

impl<'a> Rendered<'a> {
    pub fn new(projection: &'a Projection, dialect: &'a dyn Dialect) -> Self {
        Self {
            projection,
            dialect,
        }
    }
}

impl fmt::Debug for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rendered")
            .field("blocks", &self.projection.blocks.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (projection, dialect) = (self.projection, self.dialect);
        let p = &mut Printer::new(f);

        dialect.write_preamble(p)?;
        if !projection.imports.is_empty() {
            p.new_line()?;
            for (path, names) in projection.imports.iter() {
                p.new_line()?;
                dialect.write_import(p, path, names)?;
            }
        }
        p.blank_line()?;
        dialect.write_helpers(p, &projection.context)?;

        for enum_ in &projection.enums {
            p.blank_line()?;
            dialect.write_enum(p, enum_)?;
        }
        for block in &projection.blocks {
            p.blank_line()?;
            dialect.write_block(p, block)?;
        }
        p.blank_line()?;
        dialect.write_resolver_map(p, &projection.resolver_map)?;
        p.write("\n")
    }
}

/// A single quoted string literal.
pub(crate) fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\'' => quoted.push_str("\\'"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::schema::Schema;
    use pretty_assertions::assert_eq;

    struct Record<'a>(&'a [Property]);

    impl fmt::Display for Record<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let p = &mut Printer::new(f);
            p.write("type T = ")?;
            TypeScript.write_record(p, self.0)
        }
    }

    #[test]
    fn it_indents_records() {
        let properties = [
            Property::new("id", TypeExpr::String),
            Property::optional("name", TypeExpr::String.nullable()),
        ];
        assert_eq!(
            Record(&properties).to_string(),
            "type T = {\n  id: string;\n  name?: string | null;\n}"
        );
        assert_eq!(Record(&[]).to_string(), "type T = {}");
    }

    #[test]
    fn it_debugs_rendered_output_without_the_text() {
        let projection = crate::project(&Schema::new(), &Config::default()).unwrap();
        let rendered = projection.render(&TypeScript);
        assert_eq!(format!("{rendered:?}"), "Rendered { blocks: 0, .. }");
        assert!(rendered.to_string().ends_with("export type Resolvers = {};\n"));
    }

    #[test]
    fn it_quotes_strings() {
        assert_eq!(quote("./models"), "'./models'");
        assert_eq!(quote("it's"), r"'it\'s'");
        assert_eq!(quote(r"C:\models"), r"'C:\\models'");
    }
}
