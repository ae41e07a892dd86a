use super::quote;
use super::Dialect;
use super::Printer;
use super::GENERATED_NOTICE;
use crate::projection::shape_name;
use crate::resolve::TypeExpr;
use std::fmt;
use std::fmt::Write as _;

/// TypeScript declarations.
///
/// The declarations of each schema type live in a namespace that shares its
/// name with the type's resolver shape, so they are referred to as
/// `UserResolvers.Parent`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScript;

impl TypeScript {
    fn write_operand(&self, p: &mut Printer<'_, '_>, ty: &TypeExpr) -> fmt::Result {
        match ty {
            TypeExpr::Nullable(_) => {
                p.write("(")?;
                self.write_type(p, ty)?;
                p.write(")")
            }
            TypeExpr::Union(members) if members.len() > 1 => {
                p.write("(")?;
                self.write_type(p, ty)?;
                p.write(")")
            }
            _ => self.write_type(p, ty),
        }
    }
}

impl Dialect for TypeScript {
    fn write_preamble(&self, p: &mut Printer<'_, '_>) -> fmt::Result {
        p.write("/* eslint-disable */")?;
        p.new_line()?;
        p.write(GENERATED_NOTICE)
    }

    fn declared_name(&self, _owner: &str, name: &str) -> String {
        name.to_owned()
    }

    fn scoped_name(&self, owner: &str, name: &str) -> String {
        format!("{}.{name}", shape_name(owner))
    }

    fn open_block(&self, p: &mut Printer<'_, '_>, owner: &str) -> fmt::Result {
        write!(p, "export namespace {} {{", shape_name(owner))?;
        p.indent()
    }

    fn close_block(&self, p: &mut Printer<'_, '_>, _owner: &str) -> fmt::Result {
        p.dedent()?;
        p.write("}")
    }

    fn write_type(&self, p: &mut Printer<'_, '_>, ty: &TypeExpr) -> fmt::Result {
        match ty {
            TypeExpr::String => p.write("string"),
            TypeExpr::Number => p.write("number"),
            TypeExpr::Boolean => p.write("boolean"),
            TypeExpr::Unknown => p.write("unknown"),
            TypeExpr::Any => p.write("any"),
            TypeExpr::Named(name) => p.write(name),
            TypeExpr::Scoped { owner, name } => p.write(&self.scoped_name(owner, name)),
            TypeExpr::ValuesOf(model) => write!(p, "(typeof {model})[keyof typeof {model}]"),
            TypeExpr::Property { of, name } => {
                self.write_operand(p, of)?;
                write!(p, "[{}]", quote(name))
            }
            TypeExpr::Literal(value) => p.write(&quote(value)),
            TypeExpr::Nullable(inner) => {
                self.write_type(p, inner)?;
                p.write(" | null")
            }
            TypeExpr::List(inner) => {
                p.write("ReadonlyArray<")?;
                self.write_type(p, inner)?;
                p.write(">")
            }
            TypeExpr::Union(members) if members.is_empty() => p.write("never"),
            TypeExpr::Union(members) => self.write_joined(p, members, " | "),
            TypeExpr::Record(properties) => self.write_record(p, properties),
            TypeExpr::Generic { name, arguments } => {
                write!(p, "{name}<")?;
                self.write_joined(p, arguments, ", ")?;
                p.write(">")
            }
        }
    }

    fn no_args(&self) -> &'static str {
        "Record<string, never>"
    }

    fn property_separator(&self) -> &'static str {
        ";"
    }
}
