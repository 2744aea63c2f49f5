//! The syntax tree consumed by the checker.
//!
//! Produced by an external parser. Only the constructs that carry type
//! references (or contain constructs that do) get their own variant; every
//! other statement or expression is a `Compound` whose children are walked
//! in source order.

use smol_str::SmolStr;

use super::name::Name;

// ============================================================================
// STATEMENTS
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Namespace(NamespaceDecl),
    Use(UseStmt),
    Function(FunctionDecl),
    ClassMethod(FunctionDecl),
    Class(ClassDecl),
    TryCatch(TryCatch),
    Expr(Expr),
    Compound(CompoundStmt),
}

/// `namespace Foo\Bar { ... }` or the unbraced form, with the following
/// statements as its body. `name` is `None` for the global `namespace { }` block.
#[derive(Clone, Debug, PartialEq)]
pub struct NamespaceDecl {
    pub name: Option<Name>,
    pub body: Vec<Stmt>,
    pub line: Option<u32>,
}

/// `use A\B, C\D as E;`
#[derive(Clone, Debug, PartialEq)]
pub struct UseStmt {
    pub items: Vec<UseItem>,
    pub line: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UseItem {
    Alias(UseAlias),
    /// A binding the parser could not shape into `name [as alias]`.
    Malformed { line: Option<u32> },
}

/// One binding of a use statement.
#[derive(Clone, Debug, PartialEq)]
pub struct UseAlias {
    pub name: Name,
    pub alias: Option<SmolStr>,
    pub line: Option<u32>,
}

impl UseAlias {
    /// The alias this binding introduces: the explicit one, or the last
    /// segment of the imported name.
    pub fn alias(&self) -> SmolStr {
        self.alias.clone().unwrap_or_else(|| self.name.last().clone())
    }
}

/// A function, method or closure.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: Option<SmolStr>,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub line: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: SmolStr,
    pub ty: Option<TypeHint>,
    pub default: Option<Expr>,
}

/// A parameter type annotation.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeHint {
    /// A class or interface name.
    Class(Name),
    /// A built-in type such as `int`, `array` or `callable`.
    Builtin(SmolStr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassDecl {
    pub name: SmolStr,
    pub extends: Option<Name>,
    pub implements: Vec<Name>,
    pub body: Vec<Stmt>,
    pub line: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TryCatch {
    pub body: Vec<Stmt>,
    pub catches: Vec<Catch>,
    pub finally: Vec<Stmt>,
    pub line: Option<u32>,
}

/// `catch (A | B $e) { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct Catch {
    pub types: Vec<Name>,
    pub var: Option<SmolStr>,
    pub body: Vec<Stmt>,
    pub line: Option<u32>,
}

/// Any other statement (`if`, `foreach`, `return`, `echo`, properties, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct CompoundStmt {
    pub kind: SmolStr,
    pub exprs: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub line: Option<u32>,
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    FuncCall(FuncCall),
    StaticCall(StaticCall),
    MethodCall(MethodCall),
    ClassConstFetch(ClassConstFetch),
    New(New),
    Assign(Assign),
    Closure(FunctionDecl),
    Variable(SmolStr),
    Literal(SmolStr),
    Compound(CompoundExpr),
}

/// A class (or callee) position that may be written as a name or computed.
#[derive(Clone, Debug, PartialEq)]
pub enum NameOrExpr {
    Name(Name),
    Expr(Box<Expr>),
}

/// `foo($a)` or `$fn($a)`
#[derive(Clone, Debug, PartialEq)]
pub struct FuncCall {
    pub callee: NameOrExpr,
    pub args: Vec<Expr>,
    pub line: Option<u32>,
}

/// `Foo::bar($a)`
#[derive(Clone, Debug, PartialEq)]
pub struct StaticCall {
    pub class: NameOrExpr,
    pub method: SmolStr,
    pub args: Vec<Expr>,
    pub line: Option<u32>,
}

/// `$foo->bar($a)`
#[derive(Clone, Debug, PartialEq)]
pub struct MethodCall {
    pub receiver: Box<Expr>,
    pub method: SmolStr,
    pub args: Vec<Expr>,
    pub line: Option<u32>,
}

/// `Foo::BAR`
#[derive(Clone, Debug, PartialEq)]
pub struct ClassConstFetch {
    pub class: NameOrExpr,
    pub constant: SmolStr,
    pub line: Option<u32>,
}

/// `new Foo($a)`
#[derive(Clone, Debug, PartialEq)]
pub struct New {
    pub class: NameOrExpr,
    pub args: Vec<Expr>,
    pub line: Option<u32>,
}

/// `$target = $value`
#[derive(Clone, Debug, PartialEq)]
pub struct Assign {
    pub target: Box<Expr>,
    pub value: Box<Expr>,
    pub line: Option<u32>,
}

/// Any other expression (operators, array literals, `isset`, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct CompoundExpr {
    pub kind: SmolStr,
    pub children: Vec<Expr>,
    pub line: Option<u32>,
}

// ============================================================================
// CONSTRUCTION HELPERS
// ============================================================================

impl Stmt {
    pub fn namespace(name: Name, body: Vec<Stmt>) -> Self {
        let line = name.line;
        Stmt::Namespace(NamespaceDecl {
            name: Some(name),
            body,
            line,
        })
    }

    pub fn uses(items: Vec<UseItem>) -> Self {
        let line = items.iter().find_map(UseItem::line);
        Stmt::Use(UseStmt { items, line })
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }

    pub fn class(name: &str, extends: Option<Name>, implements: Vec<Name>, body: Vec<Stmt>) -> Self {
        Stmt::Class(ClassDecl {
            name: name.into(),
            extends,
            implements,
            body,
            line: None,
        })
    }

    pub fn compound(kind: &str, exprs: Vec<Expr>, body: Vec<Stmt>) -> Self {
        Stmt::Compound(CompoundStmt {
            kind: kind.into(),
            exprs,
            body,
            line: None,
        })
    }

    /// Set the statement's line. Bare variables and literals have none.
    pub fn at_line(mut self, line: u32) -> Self {
        if let Some(slot) = self.line_mut() {
            *slot = Some(line);
        }
        self
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            Stmt::Namespace(ns) => ns.line,
            Stmt::Use(stmt) => stmt.line,
            Stmt::Function(f) | Stmt::ClassMethod(f) => f.line,
            Stmt::Class(class) => class.line,
            Stmt::TryCatch(tc) => tc.line,
            Stmt::Expr(expr) => expr.line(),
            Stmt::Compound(stmt) => stmt.line,
        }
    }

    fn line_mut(&mut self) -> Option<&mut Option<u32>> {
        Some(match self {
            Stmt::Namespace(ns) => &mut ns.line,
            Stmt::Use(stmt) => &mut stmt.line,
            Stmt::Function(f) | Stmt::ClassMethod(f) => &mut f.line,
            Stmt::Class(class) => &mut class.line,
            Stmt::TryCatch(tc) => &mut tc.line,
            Stmt::Expr(expr) => return expr.line_mut(),
            Stmt::Compound(stmt) => &mut stmt.line,
        })
    }
}

impl UseItem {
    pub fn alias(name: Name, alias: Option<&str>) -> Self {
        let line = name.line;
        UseItem::Alias(UseAlias {
            name,
            alias: alias.map(SmolStr::new),
            line,
        })
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            UseItem::Alias(alias) => alias.line,
            UseItem::Malformed { line } => *line,
        }
    }
}

impl Expr {
    pub fn var(name: &str) -> Self {
        Expr::Variable(name.into())
    }

    pub fn lit(text: &str) -> Self {
        Expr::Literal(text.into())
    }

    pub fn func_call(callee: Name, args: Vec<Expr>) -> Self {
        let line = callee.line;
        Expr::FuncCall(FuncCall {
            callee: NameOrExpr::Name(callee),
            args,
            line,
        })
    }

    pub fn static_call(class: Name, method: &str, args: Vec<Expr>) -> Self {
        let line = class.line;
        Expr::StaticCall(StaticCall {
            class: NameOrExpr::Name(class),
            method: method.into(),
            args,
            line,
        })
    }

    pub fn method_call(receiver: Expr, method: &str, args: Vec<Expr>) -> Self {
        let line = receiver.line();
        Expr::MethodCall(MethodCall {
            receiver: Box::new(receiver),
            method: method.into(),
            args,
            line,
        })
    }

    pub fn class_const(class: Name, constant: &str) -> Self {
        let line = class.line;
        Expr::ClassConstFetch(ClassConstFetch {
            class: NameOrExpr::Name(class),
            constant: constant.into(),
            line,
        })
    }

    pub fn new_object(class: Name, args: Vec<Expr>) -> Self {
        let line = class.line;
        Expr::New(New {
            class: NameOrExpr::Name(class),
            args,
            line,
        })
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        let line = target.line().or_else(|| value.line());
        Expr::Assign(Assign {
            target: Box::new(target),
            value: Box::new(value),
            line,
        })
    }

    pub fn compound(kind: &str, children: Vec<Expr>) -> Self {
        let line = children.iter().find_map(Expr::line);
        Expr::Compound(CompoundExpr {
            kind: kind.into(),
            children,
            line,
        })
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            Expr::FuncCall(call) => call.line,
            Expr::StaticCall(call) => call.line,
            Expr::MethodCall(call) => call.line,
            Expr::ClassConstFetch(fetch) => fetch.line,
            Expr::New(new) => new.line,
            Expr::Assign(assign) => assign.line,
            Expr::Closure(f) => f.line,
            Expr::Compound(expr) => expr.line,
            Expr::Variable(_) | Expr::Literal(_) => None,
        }
    }

    /// `None` for leaves, which carry no line.
    fn line_mut(&mut self) -> Option<&mut Option<u32>> {
        Some(match self {
            Expr::FuncCall(call) => &mut call.line,
            Expr::StaticCall(call) => &mut call.line,
            Expr::MethodCall(call) => &mut call.line,
            Expr::ClassConstFetch(fetch) => &mut fetch.line,
            Expr::New(new) => &mut new.line,
            Expr::Assign(assign) => &mut assign.line,
            Expr::Closure(f) => &mut f.line,
            Expr::Compound(expr) => &mut expr.line,
            Expr::Variable(_) | Expr::Literal(_) => return None,
        })
    }
}

impl FunctionDecl {
    pub fn new(name: Option<&str>, params: Vec<Param>, body: Vec<Stmt>) -> Self {
        Self {
            name: name.map(SmolStr::new),
            params,
            body,
            line: None,
        }
    }
}

impl Param {
    pub fn new(name: &str, ty: Option<TypeHint>, default: Option<Expr>) -> Self {
        Self {
            name: name.into(),
            ty,
            default,
        }
    }
}
