//! Function, block and statement lowering.

use super::IrBuilder;
use crate::ir::instr::{Block, Defer, ElseIf, IfStatement, Instruction, Local, LocalFlags, Loop, Return, WhileLoop};
use crate::ir::{Function, Name};
use crate::symbols::ScopeId;
use krug_core::CompilationError;
use krug_parser::ast::{self, DeferBody, FunctionDecl, Stmt, VarDecl};

impl IrBuilder {
    /// Lower a named function. Its scope hangs off the module root.
    pub(crate) fn lower_function(&mut self, decl: &FunctionDecl<'_>) -> Result<Function, CompilationError> {
        let name = decl.name().map(Name::from).ok_or_else(|| CompilationError::Internal {
            message: "function without a name".to_string(),
            span: decl.span,
        })?;
        let (params, return_type) = self.lower_signature(&decl.proto);
        let scope = self.module.new_scope(self.module.root);
        let body = self.lower_block(&decl.body, scope);

        Ok(Function {
            name,
            params,
            return_type,
            body,
            scope,
            unit: self.unit,
            span: decl.span,
        })
    }

    /// `None` if the binding cannot be lowered yet.
    pub(crate) fn lower_local(&mut self, decl: &VarDecl<'_>) -> Option<Local> {
        if decl.ty.is_none() && decl.value.is_none() {
            self.report(CompilationError::Unimplemented {
                feature: "type inference".to_string(),
                span: decl.span,
            });
            return None;
        }

        let mut flags = LocalFlags::empty();
        flags.set(LocalFlags::OWNED, decl.owned);
        flags.set(LocalFlags::MUTABLE, decl.mutable);

        Some(Local {
            name: Name::from(decl.name),
            ty: decl.ty.as_ref().map(|ty| self.lower_type(ty)),
            flags,
            value: decl.value.map(|value| self.lower_expr(value)),
        })
    }

    /// Lower a block into a fresh scope under `outer`.
    ///
    /// `defer`s are collected separately and the last `return` becomes the
    /// trailing return.
    pub(crate) fn lower_block(&mut self, block: &ast::Block<'_>, outer: ScopeId) -> Block {
        let scope = self.module.new_scope(outer);
        let mut lowered = Block::new(scope, block.span);

        for stmt in block.stmts {
            match self.lower_stmt(stmt, scope) {
                Some(Instruction::Defer(defer)) => lowered.deferred.push(defer),
                Some(Instruction::Return(ret)) => lowered.ret = Some(ret),
                Some(instruction) => lowered.instructions.push(instruction),
                None => {}
            }
        }
        lowered
    }

    fn lower_stmt(&mut self, stmt: &Stmt<'_>, scope: ScopeId) -> Option<Instruction> {
        let instruction = match stmt {
            Stmt::Let(decl) | Stmt::Mut(decl) => Instruction::Local(self.lower_local(decl)?),
            Stmt::TypeAlias(alias) => {
                self.report(CompilationError::Unimplemented {
                    feature: "local type alias".to_string(),
                    span: alias.span,
                });
                return None;
            }
            Stmt::Return(ret) => Instruction::Return(Return {
                value: ret.value.map(|value| self.lower_expr(value)),
                span: ret.span,
            }),
            Stmt::Break(span) => Instruction::Break(*span),
            Stmt::Next(span) => Instruction::Next(*span),
            Stmt::Label(label) => Instruction::Label(Name::from(*label)),
            Stmt::Jump(jump) => Instruction::Jump(Name::from(jump.label)),
            Stmt::If(stmt) => {
                let cond = self.lower_expr(&stmt.condition);
                let then_block = self.lower_block(&stmt.then_block, scope);
                let else_ifs = stmt
                    .else_ifs
                    .iter()
                    .map(|branch| ElseIf {
                        cond: self.lower_expr(&branch.condition),
                        block: self.lower_block(&branch.block, scope),
                    })
                    .collect();
                let else_block = stmt.else_block.as_ref().map(|b| self.lower_block(b, scope));
                Instruction::If(IfStatement {
                    cond,
                    then_block,
                    else_ifs,
                    else_block,
                })
            }
            Stmt::While(stmt) => {
                let cond = self.lower_expr(&stmt.condition);
                let post = stmt.post.as_ref().map(|post| self.lower_expr(post));
                Instruction::While(WhileLoop {
                    cond,
                    post,
                    body: self.lower_block(&stmt.body, scope),
                })
            }
            Stmt::Loop(stmt) => Instruction::Loop(Loop {
                body: self.lower_block(&stmt.body, scope),
            }),
            Stmt::Defer(stmt) => Instruction::Defer(match &stmt.body {
                DeferBody::Stmt(inner) => Defer::Statement(Box::new(self.lower_stmt(inner, scope)?)),
                DeferBody::Block(block) => Defer::Block(self.lower_block(block, scope)),
            }),
            Stmt::Block(block) => Instruction::Block(self.lower_block(block, scope)),
            Stmt::Expr(stmt) => Instruction::Expression {
                value: self.lower_expr(&stmt.expr),
                span: stmt.span,
            },
        };
        Some(instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Module, Primitive, Type, Value};
    use bumpalo::Bump;
    use krug_core::{DiagnosticKind, Diagnostics};
    use krug_parser::Parser;

    fn lower(source: &str) -> (Module, Diagnostics) {
        let arena = Bump::new();
        let script = Parser::parse(source, &arena).expect("source should parse");
        super::IrBuilder::build(&[script])
    }

    #[test]
    fn locals_carry_flags() {
        let (module, diagnostics) = lower("fn f() { let a int = 1; mut ~b = a; }");
        assert!(diagnostics.is_empty());

        let body = &module.functions["f"].body;
        let [Instruction::Local(a), Instruction::Local(b)] = body.instructions.as_slice() else {
            panic!("expected two locals");
        };
        assert!(!a.is_mutable() && a.is_owned());
        assert_eq!(a.ty, Some(Type::Primitive(Primitive::Int)));
        assert!(b.is_mutable() && !b.is_owned());
        assert_eq!(b.ty, None);
    }

    #[test]
    fn local_without_type_or_value() {
        let (module, diagnostics) = lower("fn f() { let x; return; }");

        assert_eq!(diagnostics.count_of(DiagnosticKind::Unimplemented), 1);
        assert!(module.functions["f"].body.instructions.is_empty());
    }

    #[test]
    fn defers_and_trailing_return() {
        let (module, _) = lower(
            "fn f() int {
                defer free!p;
                defer { close(); }
                return 1;
                work();
                return 2;
            }",
        );
        let body = &module.functions["f"].body;

        assert_eq!(body.deferred.len(), 2);
        assert!(matches!(&body.deferred[0], Defer::Statement(inner) if matches!(**inner, Instruction::Expression { .. })));
        assert!(matches!(&body.deferred[1], Defer::Block(_)));
        assert_eq!(body.instructions.len(), 1);
        assert_eq!(body.ret.as_ref().and_then(|r| r.value.clone()), Some(Value::Integer(2)));
    }

    #[test]
    fn control_flow() {
        let (module, diagnostics) = lower(
            "fn f(n int) {
                mut i = 0;
                while i < n; i += 1 {
                    if i == 2 { next; } else if i == 5 { break; } else { i; }
                }
                loop { jump done; }
                $done;
            }",
        );
        assert!(diagnostics.is_empty());

        let body = &module.functions["f"].body;
        let Instruction::While(w) = &body.instructions[1] else {
            panic!("expected while");
        };
        assert!(matches!(w.post, Some(Value::Assign { .. })));
        let Instruction::If(branch) = &w.body.instructions[0] else {
            panic!("expected if");
        };
        assert_eq!(branch.else_ifs.len(), 1);
        assert!(branch.else_block.is_some());
        assert!(matches!(branch.then_block.instructions[0], Instruction::Next(_)));

        assert!(matches!(&body.instructions[2], Instruction::Loop(l) if matches!(&l.body.instructions[0], Instruction::Jump(label) if label.value == "done")));
        assert!(matches!(&body.instructions[3], Instruction::Label(label) if label.value == "done"));
    }

    #[test]
    fn local_type_alias_is_unimplemented() {
        let (_, diagnostics) = lower("fn f() { type N = int; }");
        assert_eq!(diagnostics.count_of(DiagnosticKind::Unimplemented), 1);
    }

    #[test]
    fn params_keep_order_and_flags() {
        let (module, _) = lower("fn f(mut a int, ~b *Node, c string) { }");
        let f = &module.functions["f"];

        let names: Vec<_> = f.params.keys().map(String::as_str).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(f.mutability().collect::<Vec<_>>(), [true, false, false]);
        assert!(!f.params["b"].owned);
        assert_eq!(f.return_type, Type::VOID);
    }
}
