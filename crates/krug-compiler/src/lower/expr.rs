//! Expression lowering and path normalization.

use super::types::named_type;
use super::IrBuilder;
use crate::ir::{Name, Value};
use krug_core::CompilationError;
use krug_parser::ast::{BuiltinExpr, Expr, LiteralKind, PathExpr};

impl IrBuilder {
    pub(crate) fn lower_expr(&mut self, expr: &Expr<'_>) -> Value {
        match expr {
            Expr::Literal(literal) => match literal.kind {
                LiteralKind::Int(value) => Value::Integer(value),
                LiteralKind::Float(value) => Value::Float(value),
                LiteralKind::String(value) => Value::String(value.to_string()),
                LiteralKind::Char(value) => Value::Char(value),
            },
            Expr::Ident(ident) => Value::Identifier(Name::from(*ident)),
            Expr::Binary(binary) => {
                let lhs = self.lower_expr(&binary.left);
                let rhs = self.lower_expr(&binary.right);
                Value::binary(lhs, binary.op, rhs)
            }
            Expr::Unary(unary) => Value::Unary {
                op: unary.op,
                operand: Box::new(self.lower_expr(&unary.operand)),
            },
            Expr::Assign(assign) => Value::Assign {
                lhs: Box::new(self.lower_expr(&assign.target)),
                op: assign.op,
                rhs: Box::new(self.lower_expr(&assign.value)),
            },
            Expr::Call(call) => Value::Call {
                callee: Box::new(self.lower_expr(&call.callee)),
                args: self.lower_exprs(call.args),
            },
            Expr::Index(index) => Value::Index {
                base: Box::new(self.lower_expr(&index.object)),
                subscript: Box::new(self.lower_expr(&index.index)),
            },
            Expr::Path(path) => self.lower_path(path),
            Expr::Grouping(paren) => Value::Grouping(Box::new(self.lower_expr(&paren.expr))),
            Expr::List(list) => Value::List(self.lower_exprs(list.elements)),
            Expr::Init(init) => Value::Init {
                kind: init.kind,
                name: init.name.map(Name::from),
                values: self.lower_exprs(init.values),
            },
            Expr::Builtin(builtin) => self.lower_builtin(builtin),
            Expr::Lambda(lambda) => {
                self.report(CompilationError::Unimplemented {
                    feature: "lambda".to_string(),
                    span: lambda.span,
                });
                Value::Placeholder
            }
            Expr::Type(ty) => Value::Type(Box::new(self.lower_type(ty))),
        }
    }

    fn lower_exprs(&mut self, exprs: &[Expr<'_>]) -> Vec<Value> {
        exprs.iter().map(|e| self.lower_expr(e)).collect()
    }

    /// Lower a member chain into a flat path.
    ///
    /// An operator that ended up in the last element is hoisted above the
    /// path, so `a.b + 1` becomes `Binary(Path(a, b), +, 1)`.
    fn lower_path(&mut self, path: &PathExpr<'_>) -> Value {
        let mut elements = Vec::with_capacity(path.elements.len());
        for element in path.elements {
            match self.lower_expr(element) {
                Value::Path(inner) => elements.extend(inner),
                value => elements.push(value),
            }
        }
        match elements.pop() {
            Some(last) => attach_to_path(elements, last),
            None => Value::Path(elements),
        }
    }

    fn lower_builtin(&mut self, builtin: &BuiltinExpr<'_>) -> Value {
        let rest = self.lower_exprs(builtin.args);
        if builtin.builtin.takes_type() {
            Value::Builtin {
                builtin: builtin.builtin,
                ty: Some(named_type(builtin.operand)),
                args: rest,
            }
        } else {
            let mut args = Vec::with_capacity(rest.len() + 1);
            args.push(Value::Identifier(Name::from(builtin.operand)));
            args.extend(rest);
            Value::Builtin {
                builtin: builtin.builtin,
                ty: None,
                args,
            }
        }
    }
}

/// Append `last` to `prefix`, descending through the left operand of
/// binaries and assignments so the path stays the innermost operand.
fn attach_to_path(mut prefix: Vec<Value>, last: Value) -> Value {
    match last {
        Value::Binary { op, lhs, rhs } => Value::Binary {
            op,
            lhs: Box::new(attach_to_path(prefix, *lhs)),
            rhs,
        },
        Value::Assign { lhs, op, rhs } => Value::Assign {
            lhs: Box::new(attach_to_path(prefix, *lhs)),
            op,
            rhs,
        },
        Value::Path(inner) => {
            prefix.extend(inner);
            Value::Path(prefix)
        }
        value => {
            prefix.push(value);
            Value::Path(prefix)
        }
    }
}

/// Splice nested paths into their parent. Already-flat values are unchanged.
pub fn flatten(value: Value) -> Value {
    match value {
        Value::Path(elements) => {
            let mut flat = Vec::with_capacity(elements.len());
            for element in elements {
                match flatten(element) {
                    Value::Path(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            Value::Path(flat)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Instruction, Type};
    use bumpalo::Bump;
    use krug_core::{DiagnosticKind, Span};
    use krug_parser::ast::{AssignOp, BinaryOp, Builtin, InitKind};
    use krug_parser::Parser;

    fn lower(source: &str) -> (Value, IrBuilder) {
        let arena = Bump::new();
        let expr = Parser::expression(source, &arena).expect("expression should parse");
        let mut builder = IrBuilder::new();
        let value = builder.lower_expr(&expr);
        (value, builder)
    }

    fn ident(name: &str) -> Value {
        Value::Identifier(Name::new(name, Span::default()))
    }

    /// Strip spans so values can be compared structurally.
    fn names(value: &Value) -> Vec<String> {
        match value {
            Value::Path(elements) => elements
                .iter()
                .map(|e| match e {
                    Value::Identifier(name) => name.value.clone(),
                    other => other.kind_name().to_string(),
                })
                .collect(),
            other => vec![other.kind_name().to_string()],
        }
    }

    #[test]
    fn precedence_is_preserved() {
        let (value, _) = lower("1 + 2 * 3");
        assert_eq!(
            value,
            Value::binary(
                Value::Integer(1),
                BinaryOp::Add,
                Value::binary(Value::Integer(2), BinaryOp::Mul, Value::Integer(3)),
            )
        );
    }

    #[test]
    fn path_is_flat() {
        let (value, _) = lower("a.b.c");
        assert_eq!(names(&value), ["a", "b", "c"]);
        assert_eq!(flatten(value.clone()), value);
    }

    #[test]
    fn flatten_splices_nested_paths() {
        let nested = Value::Path(vec![
            ident("a"),
            Value::Path(vec![ident("b"), Value::Path(vec![ident("c")])]),
        ]);
        assert_eq!(names(&flatten(nested)), ["a", "b", "c"]);
    }

    #[test]
    fn operator_is_hoisted_out_of_path() {
        let (value, _) = lower("a.b + 1");
        let Value::Binary { op, lhs, rhs } = value else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Add);
        assert_eq!(names(&lhs), ["a", "b"]);
        assert_eq!(*rhs, Value::Integer(1));
    }

    #[test]
    fn hoisting_follows_left_operand() {
        let (value, _) = lower("a.b * 2 + 1");
        let Value::Binary { op: BinaryOp::Add, lhs, .. } = value else {
            panic!("expected addition at the root");
        };
        let Value::Binary { op: BinaryOp::Mul, lhs, .. } = *lhs else {
            panic!("expected multiplication on the left");
        };
        assert_eq!(names(&lhs), ["a", "b"]);
    }

    #[test]
    fn member_assignment() {
        let (value, _) = lower("p.x += 2");
        let Value::Assign { lhs, op, rhs } = value else {
            panic!("expected assignment");
        };
        assert_eq!(op, AssignOp::AddAssign);
        assert_eq!(names(&lhs), ["p", "x"]);
        assert_eq!(*rhs, Value::Integer(2));
    }

    #[test]
    fn calls_inside_paths() {
        let (value, _) = lower("list.get(0).value");
        let Value::Path(elements) = value else {
            panic!("expected path");
        };
        assert_eq!(elements.len(), 3);
        assert!(matches!(&elements[1], Value::Call { args, .. } if args.len() == 1));
    }

    #[test]
    fn builtins() {
        let (value, _) = lower("sizeof!Node");
        let Value::Builtin { builtin, ty, args } = value else {
            panic!("expected builtin");
        };
        assert_eq!(builtin, Builtin::Sizeof);
        assert!(matches!(ty, Some(Type::Reference(name)) if name.value == "Node"));
        assert!(args.is_empty());

        let (value, _) = lower("len!(items, 1)");
        let Value::Builtin { builtin, ty, args } = value else {
            panic!("expected builtin");
        };
        assert_eq!(builtin, Builtin::Len);
        assert_eq!(ty, None);
        assert_eq!(args.len(), 2);
        assert!(matches!(&args[0], Value::Identifier(name) if name.value == "items"));
    }

    #[test]
    fn initializer_and_literals() {
        let (value, _) = lower(":Point{1, 'c', \"s\"}");
        let Value::Init { kind, name, values } = value else {
            panic!("expected initializer");
        };
        assert_eq!(kind, InitKind::Structure);
        assert_eq!(name.map(|n| n.value), Some("Point".to_string()));
        assert_eq!(
            values,
            [Value::Integer(1), Value::Char('c'), Value::String("s".to_string())]
        );
    }

    #[test]
    fn lambda_is_placeholder() {
        let (value, builder) = lower("fn(x int) int { return x; }");
        assert_eq!(value, Value::Placeholder);
        assert_eq!(builder.diagnostics().count_of(DiagnosticKind::Unimplemented), 1);
    }

    #[test]
    fn lowered_statement_paths() {
        let arena = Bump::new();
        let script = Parser::parse("fn f() { a.b.c; }", &arena).unwrap();
        let (module, _) = IrBuilder::build(&[script]);

        let Instruction::Expression { value, .. } = &module.functions["f"].body.instructions[0] else {
            panic!("expected expression statement");
        };
        assert_eq!(names(value), ["a", "b", "c"]);
    }
}
