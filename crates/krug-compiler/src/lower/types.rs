//! Type lowering.

use super::IrBuilder;
use crate::ir::{Field, Name, Param, Primitive, Type};
use indexmap::IndexMap;
use krug_core::CompilationError;
use krug_parser::ast::{Ident, Prototype, StructType, TypeExpr};

impl IrBuilder {
    pub(crate) fn lower_type(&mut self, ty: &TypeExpr<'_>) -> Type {
        match ty {
            TypeExpr::Named(ident) => named_type(*ident),
            TypeExpr::Pointer(pointer) => Type::Pointer(Box::new(self.lower_type(pointer.base))),
            TypeExpr::Array(array) => Type::Array {
                base: Box::new(self.lower_type(array.base)),
                size: Box::new(self.lower_expr(array.size)),
            },
            TypeExpr::Tuple(tuple) => {
                Type::Tuple(tuple.elements.iter().map(|t| self.lower_type(t)).collect())
            }
            TypeExpr::Structure(structure) => {
                // Only `type Name = struct {...}` declares a structure.
                self.report(CompilationError::Unimplemented {
                    feature: "anonymous structure type".to_string(),
                    span: structure.span,
                });
                Type::VOID
            }
        }
    }

    pub(crate) fn lower_fields(&mut self, body: &StructType<'_>) -> IndexMap<String, Field> {
        let mut fields = IndexMap::with_capacity(body.fields.len());
        for field in body.fields {
            let ty = self.lower_type(&field.ty);
            fields.insert(
                field.name.name.to_string(),
                Field {
                    name: Name::from(field.name),
                    owned: field.owned,
                    ty,
                },
            );
        }
        fields
    }

    /// Parameters and return type of a prototype. A missing return type is `void`.
    pub(crate) fn lower_signature(&mut self, proto: &Prototype<'_>) -> (IndexMap<String, Param>, Type) {
        let mut params = IndexMap::with_capacity(proto.params.len());
        for param in proto.params {
            let name = Name::from(param.name);
            if params.contains_key(name.as_str()) {
                self.duplicate("parameter", &name);
                continue;
            }
            let ty = self.lower_type(&param.ty);
            params.insert(
                name.value.clone(),
                Param {
                    name,
                    owned: param.owned,
                    mutable: param.mutable,
                    ty,
                },
            );
        }
        let return_type = match &proto.return_type {
            Some(ty) => self.lower_type(ty),
            None => Type::VOID,
        };
        (params, return_type)
    }
}

/// A primitive if the name is one, otherwise a reference to be bound later.
pub(crate) fn named_type(ident: Ident<'_>) -> Type {
    match Primitive::from_name(ident.name) {
        Some(primitive) => Type::Primitive(primitive),
        None => Type::Reference(Name::from(ident)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Value;
    use bumpalo::Bump;
    use krug_core::DiagnosticKind;
    use krug_parser::Parser;

    fn lower_return_type(source: &str) -> (Type, IrBuilder) {
        let arena = Bump::new();
        let script = Parser::parse(source, &arena).expect("source should parse");
        let mut builder = IrBuilder::new();
        builder.build_unit(0, &script);
        let ty = builder.module.functions["f"].return_type.clone();
        (ty, builder)
    }

    #[test]
    fn primitives_and_references() {
        let (ty, _) = lower_return_type("fn f() int { }");
        assert_eq!(ty, Type::Primitive(Primitive::Int));

        let (ty, _) = lower_return_type("fn f() Node { }");
        assert!(matches!(ty, Type::Reference(name) if name.value == "Node"));
    }

    #[test]
    fn compound_types() {
        let (ty, _) = lower_return_type("fn f() [*u8; 16] { }");
        let Type::Array { base, size } = ty else {
            panic!("expected array");
        };
        assert_eq!(*base, Type::Pointer(Box::new(Type::Primitive(Primitive::U8))));
        assert_eq!(*size, Value::Integer(16));

        let (ty, _) = lower_return_type("fn f() (int, string) { }");
        assert_eq!(ty.to_string(), "(int, string)");
    }

    #[test]
    fn anonymous_structure_is_unimplemented() {
        let (ty, builder) = lower_return_type("fn f() struct { x int, } { }");
        assert_eq!(ty, Type::VOID);
        assert_eq!(builder.diagnostics().count_of(DiagnosticKind::Unimplemented), 1);
    }

    #[test]
    fn repeated_parameter_keeps_first() {
        let (_, builder) = lower_return_type("fn f(a int, b u8, a string) { }");
        assert_eq!(builder.diagnostics().count_of(DiagnosticKind::DuplicateDeclaration), 1);

        let params = &builder.module.functions["f"].params;
        let names: Vec<_> = params.keys().map(String::as_str).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(params["a"].ty, Type::Primitive(Primitive::Int));
    }
}
