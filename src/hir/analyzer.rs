//! The analyzer: walks one source unit and checks every name it references.
//!
//! The walk is a pre-order, left-to-right, depth-first traversal, so findings
//! come out in source order. State lives only as long as one run:
//!
//! - the current namespace, set by a namespace declaration for its body
//! - the [`ImportTable`], filled by `use` statements
//!
//! At every type-reference site the written name is qualified, style-checked
//! and handed to the [`NameResolver`]. After the walk the unit's shape is
//! checked (exactly one top-level namespace) and unused aliases are reported.
//!
//! Findings never stop the walk. The only way a run fails is a
//! [`PolicyError`]: a finding whose category the policy has no level for.

use rayon::prelude::*;

use super::diagnostics::{AnalysisResult, DiagnosticCollector, PolicyError, SeverityPolicy};
use super::imports::ImportTable;
use super::input::{SourceSet, SourceUnit};
use super::resolve::{NameResolver, ResolveResult, resolve_reference};
use crate::base::QualifiedName;
use crate::syntax::{
    ClassDecl, Expr, FunctionDecl, Name, NameKind, NameOrExpr, NamespaceDecl, Stmt, TryCatch,
    TypeHint, UseAlias, UseItem, UseStmt,
};

/// Checks the names referenced by one source unit.
pub struct Analyzer<'a, R: ?Sized> {
    unit: &'a SourceUnit,
    resolver: &'a R,
    policy: &'a SeverityPolicy,
    namespace: QualifiedName,
    imports: ImportTable,
    diagnostics: DiagnosticCollector<'a>,
}

impl<'a, R> Analyzer<'a, R>
where
    R: NameResolver + ?Sized,
{
    /// Create an analyzer for a unit.
    pub fn new(unit: &'a SourceUnit, resolver: &'a R, policy: &'a SeverityPolicy) -> Self {
        Self {
            unit,
            resolver,
            policy,
            namespace: QualifiedName::root(),
            imports: ImportTable::new(),
            diagnostics: DiagnosticCollector::new(unit.name_arc(), policy),
        }
    }

    /// Walk the unit and collect diagnostics.
    ///
    /// Starts from a clean state every time, so checking twice gives the same
    /// result as checking once.
    pub fn check(&mut self) -> Result<(), PolicyError> {
        self.namespace = QualifiedName::root();
        self.imports = ImportTable::new();
        self.diagnostics = DiagnosticCollector::new(self.unit.name_arc(), self.policy);

        tracing::debug!("checking {}", self.unit.name());

        let unit = self.unit;
        self.visit_block(unit.stmts())?;

        if !is_single_namespace(unit.stmts()) {
            self.diagnostics.missing_namespace()?;
        }

        for entry in self.imports.unused() {
            self.diagnostics.unused_use(entry.alias())?;
        }

        tracing::debug!(
            "checked {}: {} errors, {} warnings",
            self.unit.name(),
            self.diagnostics.result().error_count(),
            self.diagnostics.result().warning_count()
        );
        Ok(())
    }

    /// The import table as the last run left it.
    pub fn imports(&self) -> &ImportTable {
        &self.imports
    }

    /// Diagnostics collected so far.
    pub fn result(&self) -> &AnalysisResult {
        self.diagnostics.result()
    }

    /// Consume the analyzer and return its result.
    pub fn finish(self) -> AnalysisResult {
        self.diagnostics.finish()
    }

    // ========================================================================
    // STATEMENTS
    // ========================================================================

    fn visit_block(&mut self, stmts: &[Stmt]) -> Result<(), PolicyError> {
        for stmt in stmts {
            self.visit_stmt(stmt)?;
        }
        Ok(())
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> Result<(), PolicyError> {
        match stmt {
            Stmt::Namespace(ns) => self.visit_namespace(ns),
            Stmt::Use(stmt) => self.visit_use(stmt),
            Stmt::Function(f) | Stmt::ClassMethod(f) => self.visit_function(f),
            Stmt::Class(class) => self.visit_class(class),
            Stmt::TryCatch(tc) => self.visit_try(tc),
            Stmt::Expr(expr) => self.visit_expr(expr),
            Stmt::Compound(stmt) => {
                self.visit_exprs(&stmt.exprs)?;
                self.visit_block(&stmt.body)
            }
        }
    }

    fn visit_namespace(&mut self, ns: &NamespaceDecl) -> Result<(), PolicyError> {
        let declared = ns
            .name
            .as_ref()
            .map(Name::to_absolute)
            .unwrap_or_default();
        tracing::debug!("entering namespace {}", declared);

        let outer = std::mem::replace(&mut self.namespace, declared);
        self.visit_block(&ns.body)?;
        self.namespace = outer;
        Ok(())
    }

    /// Register each binding. A malformed binding ends the statement.
    fn visit_use(&mut self, stmt: &UseStmt) -> Result<(), PolicyError> {
        let mut bindings = 0;
        for item in &stmt.items {
            match item {
                UseItem::Alias(binding) => self.register_import(binding, stmt.line)?,
                UseItem::Malformed { line } => {
                    let line = line.or(stmt.line);
                    tracing::warn!(
                        "malformed use statement in {} at line {:?}",
                        self.unit.name(),
                        line
                    );
                    return self.diagnostics.malformed_import(line);
                }
            }
            bindings += 1;
        }

        if bindings > 1 {
            self.diagnostics.multiple_uses(stmt.line)?;
        }
        Ok(())
    }

    /// An unresolvable target is reported and never becomes an alias.
    fn register_import(&mut self, binding: &UseAlias, line: Option<u32>) -> Result<(), PolicyError> {
        let target = binding.name.to_absolute();
        let line = binding.line.or(line);

        if !self.resolver.is_valid(&target.to_string()) {
            return self.diagnostics.unresolved_use(line, &target);
        }

        let alias = binding.alias();
        tracing::debug!("use {} as {}", target, alias);
        self.imports.register(alias, target);
        Ok(())
    }

    fn visit_function(&mut self, f: &FunctionDecl) -> Result<(), PolicyError> {
        for param in &f.params {
            if let Some(TypeHint::Class(ty)) = &param.ty {
                self.resolve_class(ty, f.line)?;
            }
            if let Some(default) = &param.default {
                self.visit_expr(default)?;
            }
        }
        self.visit_block(&f.body)
    }

    fn visit_class(&mut self, class: &ClassDecl) -> Result<(), PolicyError> {
        for interface in &class.implements {
            self.resolve_class(interface, class.line)?;
        }
        if let Some(parent) = &class.extends {
            self.resolve_class(parent, class.line)?;
        }
        self.visit_block(&class.body)
    }

    fn visit_try(&mut self, tc: &TryCatch) -> Result<(), PolicyError> {
        self.visit_block(&tc.body)?;
        for catch in &tc.catches {
            for ty in &catch.types {
                self.resolve_class(ty, catch.line.or(tc.line))?;
            }
            self.visit_block(&catch.body)?;
        }
        self.visit_block(&tc.finally)
    }

    // ========================================================================
    // EXPRESSIONS
    // ========================================================================

    fn visit_exprs(&mut self, exprs: &[Expr]) -> Result<(), PolicyError> {
        for expr in exprs {
            self.visit_expr(expr)?;
        }
        Ok(())
    }

    fn visit_expr(&mut self, expr: &Expr) -> Result<(), PolicyError> {
        match expr {
            Expr::FuncCall(call) => {
                if let NameOrExpr::Expr(callee) = &call.callee {
                    self.visit_expr(callee)?;
                }
                self.visit_exprs(&call.args)
            }
            Expr::StaticCall(call) => {
                self.visit_class_ref(&call.class, call.line)?;
                self.visit_exprs(&call.args)
            }
            Expr::MethodCall(call) => {
                self.visit_expr(&call.receiver)?;
                self.visit_exprs(&call.args)
            }
            Expr::ClassConstFetch(fetch) => self.visit_class_ref(&fetch.class, fetch.line),
            Expr::New(new) => {
                self.visit_class_ref(&new.class, new.line)?;
                self.visit_exprs(&new.args)
            }
            Expr::Assign(assign) => {
                self.visit_expr(&assign.value)?;
                self.visit_expr(&assign.target)
            }
            Expr::Closure(f) => self.visit_function(f),
            Expr::Compound(expr) => self.visit_exprs(&expr.children),
            Expr::Variable(_) | Expr::Literal(_) => Ok(()),
        }
    }

    fn visit_class_ref(&mut self, class: &NameOrExpr, line: Option<u32>) -> Result<(), PolicyError> {
        match class {
            NameOrExpr::Name(name) => self.resolve_class(name, line),
            NameOrExpr::Expr(expr) => self.visit_expr(expr),
        }
    }

    // ========================================================================
    // REFERENCE SITES
    // ========================================================================

    /// Check one type reference. `context_line` locates the finding when the
    /// name carries no line of its own.
    fn resolve_class(&mut self, name: &Name, context_line: Option<u32>) -> Result<(), PolicyError> {
        if name.is_special_class() {
            return Ok(());
        }
        let line = name.line.or(context_line);

        if name.kind() == NameKind::Qualified {
            self.diagnostics.qualified_name(line)?;
        }

        match resolve_reference(name, &self.namespace, &mut self.imports, self.resolver) {
            ResolveResult::Found(_) => Ok(()),
            ResolveResult::NotFound(qualified) => {
                self.diagnostics.unresolved_type(line, &qualified)
            }
        }
    }
}

/// Is the unit exactly one named namespace declaration wrapping everything?
fn is_single_namespace(stmts: &[Stmt]) -> bool {
    matches!(
        stmts,
        [Stmt::Namespace(NamespaceDecl { name: Some(_), .. })]
    )
}

/// Check a unit and return its diagnostics.
pub fn check_unit<R>(
    unit: &SourceUnit,
    resolver: &R,
    policy: &SeverityPolicy,
) -> Result<AnalysisResult, PolicyError>
where
    R: NameResolver + ?Sized,
{
    let mut analyzer = Analyzer::new(unit, resolver, policy);
    analyzer.check()?;
    Ok(analyzer.finish())
}

/// Check every unit of a set in parallel, one independent analyzer per unit.
///
/// Results are in the set's order.
pub fn check_units<R>(
    units: &SourceSet,
    resolver: &R,
    policy: &SeverityPolicy,
) -> Vec<Result<AnalysisResult, PolicyError>>
where
    R: NameResolver + Sync + ?Sized,
{
    units
        .par_iter()
        .map(|unit| check_unit(unit, resolver, policy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::diagnostics::{Category, Level};
    use crate::hir::resolve::KnownNames;
    use crate::syntax::{Catch, ClassConstFetch, FuncCall, New, Param};

    fn name(text: &str) -> Name {
        Name::parse(text).unwrap()
    }

    fn known(names: &[&str]) -> KnownNames {
        names.iter().copied().collect()
    }

    fn in_namespace(ns: &str, body: Vec<Stmt>) -> SourceUnit {
        SourceUnit::new("test.php", vec![Stmt::namespace(name(ns).at_line(1), body)])
    }

    #[test]
    fn test_clean_unit() {
        let unit = in_namespace(
            "App",
            vec![
                Stmt::uses(vec![UseItem::alias(name("Foo\\Bar").at_line(2), None)]),
                Stmt::expr(Expr::static_call(name("Bar").at_line(4), "baz", vec![])),
            ],
        );
        let resolver = known(&["\\App", "\\Foo\\Bar"]);
        let policy = SeverityPolicy::default();

        let mut analyzer = Analyzer::new(&unit, &resolver, &policy);
        analyzer.check().unwrap();

        assert_eq!(analyzer.imports().get("Bar").unwrap().uses(), 1);
        assert!(analyzer.finish().is_clean());
    }

    #[test]
    fn test_function_params_and_defaults() {
        let f = FunctionDecl::new(
            Some("run"),
            vec![
                Param::new("a", Some(TypeHint::Class(name("Missing").at_line(5))), None),
                Param::new("b", Some(TypeHint::Builtin("array".into())), None),
                Param::new("c", None, Some(Expr::class_const(name("Config").at_line(5), "X"))),
            ],
            vec![],
        );
        let unit = in_namespace("App", vec![Stmt::Function(f)]);
        let resolver = known(&["\\App\\Config"]);

        let result = check_unit(&unit, &resolver, &SeverityPolicy::default()).unwrap();
        assert_eq!(
            result.errors(),
            ["test.php:5 Type '\\App\\Missing' could not be resolved."]
        );
    }

    #[test]
    fn test_class_implements_before_extends() {
        let class = Stmt::class(
            "Widget",
            Some(name("Base").at_line(3)),
            vec![name("Countable").at_line(3)],
            vec![],
        );
        let unit = in_namespace("App", vec![class]);

        let result = check_unit(&unit, &known(&[]), &SeverityPolicy::default()).unwrap();
        assert_eq!(
            result.errors(),
            [
                "test.php:3 Type '\\App\\Countable' could not be resolved.",
                "test.php:3 Type '\\App\\Base' could not be resolved.",
            ]
        );
    }

    #[test]
    fn test_catch_types_and_bodies() {
        let tc = Stmt::TryCatch(TryCatch {
            body: vec![Stmt::expr(Expr::new_object(name("Job").at_line(2), vec![]))],
            catches: vec![Catch {
                types: vec![name("\\RuntimeException"), name("\\LogicException")],
                var: Some("e".into()),
                body: vec![],
                line: Some(3),
            }],
            finally: vec![],
            line: Some(1),
        });
        let unit = in_namespace("App", vec![tc]);
        let resolver = known(&["\\App\\Job", "\\RuntimeException"]);

        let result = check_unit(&unit, &resolver, &SeverityPolicy::default()).unwrap();
        assert_eq!(
            result.errors(),
            ["test.php:3 Type '\\LogicException' could not be resolved."]
        );
    }

    #[test]
    fn test_special_class_names_are_skipped() {
        let unit = in_namespace(
            "App",
            vec![
                Stmt::expr(Expr::static_call(name("self"), "make", vec![])),
                Stmt::expr(Expr::class_const(name("static"), "FOO")),
                Stmt::expr(Expr::new_object(name("parent"), vec![])),
            ],
        );

        let result = check_unit(&unit, &known(&[]), &SeverityPolicy::default()).unwrap();
        assert!(result.is_clean());
    }

    #[test]
    fn test_assignment_walks_value_then_target() {
        let assign = Expr::assign(
            Expr::static_call(name("Target").at_line(8), "slot", vec![]),
            Expr::new_object(name("Value").at_line(8), vec![]),
        );
        let unit = in_namespace("App", vec![Stmt::expr(assign)]);

        let result = check_unit(&unit, &known(&[]), &SeverityPolicy::default()).unwrap();
        assert_eq!(
            result.errors(),
            [
                "test.php:8 Type '\\App\\Value' could not be resolved.",
                "test.php:8 Type '\\App\\Target' could not be resolved.",
            ]
        );
    }

    #[test]
    fn test_method_call_receiver_and_args() {
        let call = Expr::method_call(
            Expr::new_object(name("Client").at_line(6), vec![]),
            "send",
            vec![Expr::class_const(name("Verb").at_line(6), "GET")],
        );
        let unit = in_namespace("App", vec![Stmt::compound("return", vec![call], vec![])]);

        let result = check_unit(&unit, &known(&["\\App\\Client"]), &SeverityPolicy::default())
            .unwrap();
        assert_eq!(
            result.errors(),
            ["test.php:6 Type '\\App\\Verb' could not be resolved."]
        );
    }

    #[test]
    fn test_malformed_use_stops_statement() {
        let unit = in_namespace(
            "App",
            vec![Stmt::uses(vec![
                UseItem::alias(name("Foo\\A").at_line(2), None),
                UseItem::Malformed { line: Some(2) },
                UseItem::alias(name("Foo\\B").at_line(2), None),
            ])],
        );
        let resolver = known(&["\\Foo\\A", "\\Foo\\B"]);
        let policy = SeverityPolicy::default();

        let mut analyzer = Analyzer::new(&unit, &resolver, &policy);
        analyzer.check().unwrap();

        assert!(analyzer.imports().contains("A"));
        assert!(!analyzer.imports().contains("B"));

        let result = analyzer.finish();
        assert_eq!(result.errors(), ["test.php:2 Malformed use statement"]);
        assert_eq!(result.warnings(), ["test.php Use 'A' is not being used"]);
    }

    #[test]
    fn test_malformed_use_can_be_suppressed() {
        let unit = in_namespace(
            "App",
            vec![Stmt::uses(vec![UseItem::Malformed { line: Some(2) }])],
        );
        let policy = SeverityPolicy::default().with(Category::MalformedImport, Level::Suppress);

        let result = check_unit(&unit, &known(&[]), &policy).unwrap();
        assert!(result.is_clean());
    }

    #[test]
    fn test_closures_dynamic_sites_and_finally() {
        let closure = FunctionDecl {
            line: Some(2),
            ..FunctionDecl::new(
                None,
                vec![Param::new(
                    "x",
                    Some(TypeHint::Class(name("InClosure").at_line(2))),
                    None,
                )],
                vec![Stmt::expr(Expr::new_object(name("InClosureBody").at_line(3), vec![]))],
            )
        };
        // new (Factory::cls())
        let dynamic_new = Expr::New(New {
            class: NameOrExpr::Expr(Box::new(Expr::static_call(
                name("Factory").at_line(5),
                "cls",
                vec![],
            ))),
            args: vec![],
            line: Some(5),
        });
        // (Fn::X)()
        let dynamic_callee = Expr::FuncCall(FuncCall {
            callee: NameOrExpr::Expr(Box::new(Expr::class_const(name("Fn").at_line(6), "X"))),
            args: vec![],
            line: Some(6),
        });
        // $cls::KIND
        let dynamic_fetch = Expr::ClassConstFetch(ClassConstFetch {
            class: NameOrExpr::Expr(Box::new(Expr::var("cls"))),
            constant: "KIND".into(),
            line: Some(8),
        });
        let tc = Stmt::TryCatch(TryCatch {
            body: vec![],
            catches: vec![],
            finally: vec![Stmt::expr(Expr::new_object(name("InFinally").at_line(10), vec![]))],
            line: Some(9),
        });
        let unit = in_namespace(
            "App",
            vec![
                Stmt::expr(Expr::assign(Expr::var("f"), Expr::Closure(closure))),
                Stmt::expr(dynamic_new),
                Stmt::expr(dynamic_callee),
                Stmt::expr(Expr::func_call(name("strlen").at_line(7), vec![Expr::var("s")])),
                Stmt::expr(dynamic_fetch),
                tc,
            ],
        );

        let result = check_unit(&unit, &known(&[]), &SeverityPolicy::default()).unwrap();
        assert_eq!(
            result.errors(),
            [
                "test.php:2 Type '\\App\\InClosure' could not be resolved.",
                "test.php:3 Type '\\App\\InClosureBody' could not be resolved.",
                "test.php:5 Type '\\App\\Factory' could not be resolved.",
                "test.php:6 Type '\\App\\Fn' could not be resolved.",
                "test.php:10 Type '\\App\\InFinally' could not be resolved.",
            ]
        );
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn test_each_namespace_scopes_its_body() {
        let unit = SourceUnit::new(
            "test.php",
            vec![
                Stmt::namespace(name("One"), vec![Stmt::expr(Expr::new_object(name("A"), vec![]))]),
                Stmt::namespace(name("Two"), vec![Stmt::expr(Expr::new_object(name("A"), vec![]))]),
                Stmt::expr(Expr::new_object(name("A"), vec![])),
            ],
        );
        let resolver = known(&["\\One\\A", "\\Two\\A", "\\A"]);

        let result = check_unit(&unit, &resolver, &SeverityPolicy::default()).unwrap();
        assert_eq!(
            result.errors(),
            ["test.php Every source file should have a namespace"]
        );
    }

    #[test]
    fn test_check_is_repeatable() {
        let unit = in_namespace(
            "App",
            vec![
                Stmt::uses(vec![UseItem::alias(name("Foo\\Bar").at_line(2), None)]),
                Stmt::expr(Expr::new_object(name("Nope\\Thing").at_line(3), vec![])),
            ],
        );
        let resolver = known(&["\\Foo\\Bar"]);
        let policy = SeverityPolicy::default();

        let mut analyzer = Analyzer::new(&unit, &resolver, &policy);
        analyzer.check().unwrap();
        let first = analyzer.result().clone();
        analyzer.check().unwrap();

        assert_eq!(analyzer.finish(), first);
    }

    #[test]
    fn test_unconfigured_category_fails_run() {
        let unit = SourceUnit::new("test.php", vec![]);
        let policy = SeverityPolicy::empty().with(Category::UnusedUse, Level::Warning);

        let err = check_unit(&unit, &known(&[]), &policy).unwrap_err();
        assert_eq!(err, PolicyError::Unconfigured(Category::MissingNamespace));
    }

    #[test]
    fn test_check_units_keeps_order() {
        let units: SourceSet = ["b.php", "a.php", "c.php"]
            .into_iter()
            .map(|n| SourceUnit::new(n, vec![]))
            .collect();

        let results = check_units(&units, &known(&[]), &SeverityPolicy::default());
        let names: Vec<&str> = results
            .iter()
            .map(|r| r.as_ref().unwrap().unit())
            .collect();
        assert_eq!(names, vec!["b.php", "a.php", "c.php"]);
    }
}
