//! Syntax tree types consumed by the checker.
//!
//! Parsing PHP source is the job of an external front end; it hands the
//! checker a [`SourceUnit`](crate::hir::SourceUnit) built from these nodes.

pub mod ast;
pub mod name;

pub use ast::{
    Assign, Catch, ClassConstFetch, ClassDecl, CompoundExpr, CompoundStmt, Expr, FuncCall,
    FunctionDecl, MethodCall, NameOrExpr, NamespaceDecl, New, Param, StaticCall, Stmt, TryCatch,
    TypeHint, UseAlias, UseItem, UseStmt,
};
pub use name::{Name, NameKind};
