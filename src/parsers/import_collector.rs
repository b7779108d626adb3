//! Import record extraction from JavaScript/TypeScript ASTs

use super::ParsedSource;
use crate::models::{ImportRecord, ImportSyntax, NamespaceUsage, Span};
use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_syntax::scope::{ScopeFlags, ScopeId};
use std::cell::Cell;
use std::collections::HashSet;

/// A lexical scope seen during the walk
struct Scope {
    parent: Option<usize>,
    function: bool,
    names: HashSet<String>,
}

/// Visitor collecting import records and namespace member reads
pub struct ImportCollector<'s> {
    source: &'s str,
    records: Vec<ImportRecord>,
    namespaces: HashSet<String>,
    scopes: Vec<Scope>,
    current: Option<usize>,
    member_reads: Vec<(NamespaceUsage, Option<usize>)>,
}

impl<'s> ImportCollector<'s> {
    /// Walk `program` and return what it references
    pub fn collect(program: &Program<'_>, source: &'s str) -> ParsedSource {
        let mut collector = Self {
            source,
            records: Vec::new(),
            namespaces: HashSet::new(),
            scopes: Vec::new(),
            current: None,
            member_reads: Vec::new(),
        };
        collector.visit_program(program);

        // Imports and declarations are hoisted, so reads are filtered once
        // every namespace and every local binding is known
        let member_reads = std::mem::take(&mut collector.member_reads);
        let namespace_usages = member_reads
            .into_iter()
            .filter(|(usage, scope)| {
                collector.namespaces.contains(&usage.namespace)
                    && !collector.is_shadowed(&usage.namespace, *scope)
            })
            .map(|(usage, _)| usage)
            .collect();

        ParsedSource {
            records: collector.records,
            charsets: Vec::new(),
            namespace_usages,
        }
    }

    /// Whether a scope between `scope` and the module top declares `name`
    fn is_shadowed(&self, name: &str, mut scope: Option<usize>) -> bool {
        while let Some(index) = scope {
            let entry = &self.scopes[index];
            // Module-level bindings are the imports themselves
            if entry.parent.is_none() {
                return false;
            }
            if entry.names.contains(name) {
                return true;
            }
            scope = entry.parent;
        }
        false
    }

    fn declare(&mut self, scope: Option<usize>, name: &str) {
        if let Some(index) = scope {
            self.scopes[index].names.insert(name.to_string());
        }
    }

    /// Nearest enclosing function scope, where `var` bindings land
    fn function_scope(&self) -> Option<usize> {
        let mut scope = self.current;
        while let Some(index) = scope {
            if self.scopes[index].function {
                return Some(index);
            }
            scope = self.scopes[index].parent;
        }
        None
    }

    fn read(&mut self, namespace: &str, member: &str, span: oxc_span::Span) {
        let usage = NamespaceUsage {
            namespace: namespace.to_string(),
            member: member.to_string(),
            span: self.span(span),
        };
        self.member_reads.push((usage, self.current));
    }

    fn span(&self, span: oxc_span::Span) -> Span {
        Span::locate(self.source, span.start as usize, span.end as usize)
    }

    fn push(&mut self, specifier: &str, syntax: ImportSyntax, span: oxc_span::Span) -> &mut ImportRecord {
        let span = self.span(span);
        self.records.push(ImportRecord::new(specifier, syntax, span));
        let last = self.records.len() - 1;
        &mut self.records[last]
    }
}

impl<'a, 's> Visit<'a> for ImportCollector<'s> {
    fn enter_scope(&mut self, flags: ScopeFlags, _scope_id: &Cell<Option<ScopeId>>) {
        self.scopes.push(Scope {
            parent: self.current,
            function: flags.intersects(ScopeFlags::Top | ScopeFlags::Function),
            names: HashSet::new(),
        });
        self.current = Some(self.scopes.len() - 1);
    }

    fn leave_scope(&mut self) {
        self.current = self.current.and_then(|index| self.scopes[index].parent);
    }

    fn visit_binding_identifier(&mut self, ident: &BindingIdentifier<'a>) {
        self.declare(self.current, ident.name.as_str());
    }

    fn visit_function(&mut self, func: &Function<'a>, flags: ScopeFlags) {
        // A declaration's name binds in the enclosing scope, not its own
        if func.is_declaration() {
            if let Some(id) = &func.id {
                self.declare(self.current, id.name.as_str());
            }
        }
        walk::walk_function(self, func, flags);
    }

    fn visit_variable_declaration(&mut self, decl: &VariableDeclaration<'a>) {
        if decl.kind.is_var() {
            let mut names = BindingNames::default();
            for declarator in &decl.declarations {
                names.visit_binding_pattern(&declarator.id);
            }
            let scope = self.function_scope();
            for name in &names.0 {
                self.declare(scope, name);
            }
        }
        walk::walk_variable_declaration(self, decl);
    }

    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        if decl.import_kind.is_type() {
            return;
        }
        let specifier = decl.source.value.as_str();

        let Some(specifiers) = &decl.specifiers else {
            self.push(specifier, ImportSyntax::ImportStatement, decl.source.span);
            return;
        };
        if specifiers.is_empty() {
            self.push(specifier, ImportSyntax::ImportStatement, decl.source.span);
            return;
        }

        let mut names = Vec::new();
        let mut namespace = None;
        for spec in specifiers {
            match spec {
                ImportDeclarationSpecifier::ImportSpecifier(spec) => {
                    if !spec.import_kind.is_type() {
                        names.push(spec.imported.name().to_string());
                    }
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(_) => {
                    names.push("default".to_string());
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => {
                    namespace = Some(spec.local.name.to_string());
                }
            }
        }

        // `import d, * as ns from "x"` yields one record per binding form
        if !names.is_empty() {
            self.push(specifier, ImportSyntax::NamedImport, decl.source.span)
                .imported_names = names;
        }
        if let Some(namespace) = namespace {
            self.namespaces.insert(namespace.clone());
            self.push(specifier, ImportSyntax::StarImport, decl.source.span)
                .namespace = Some(namespace);
        }
    }

    fn visit_export_all_declaration(&mut self, decl: &ExportAllDeclaration<'a>) {
        if decl.export_kind.is_type() {
            return;
        }
        self.push(decl.source.value.as_str(), ImportSyntax::StarImport, decl.source.span);
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        let Some(source) = &decl.source else {
            walk::walk_export_named_declaration(self, decl);
            return;
        };
        if decl.export_kind.is_type() {
            return;
        }

        let names: Vec<String> = decl
            .specifiers
            .iter()
            .filter(|spec| !spec.export_kind.is_type())
            .map(|spec| spec.local.name().to_string())
            .collect();

        if names.is_empty() {
            self.push(source.value.as_str(), ImportSyntax::ImportStatement, source.span);
        } else {
            self.push(source.value.as_str(), ImportSyntax::NamedImport, source.span)
                .imported_names = names;
        }
    }

    fn visit_import_expression(&mut self, expr: &ImportExpression<'a>) {
        if let Expression::StringLiteral(lit) = &expr.source {
            self.push(lit.value.as_str(), ImportSyntax::ImportStatement, lit.span);
        }
        walk::walk_import_expression(self, expr);
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if let Expression::Identifier(callee) = &call.callee {
            if callee.name == "require" && call.arguments.len() == 1 {
                if let Argument::StringLiteral(lit) = &call.arguments[0] {
                    self.push(lit.value.as_str(), ImportSyntax::ImportStatement, lit.span);
                }
            }
        }
        walk::walk_call_expression(self, call);
    }

    fn visit_static_member_expression(&mut self, expr: &StaticMemberExpression<'a>) {
        if let Expression::Identifier(object) = &expr.object {
            self.read(object.name.as_str(), expr.property.name.as_str(), expr.span);
        }
        walk::walk_static_member_expression(self, expr);
    }

    fn visit_computed_member_expression(&mut self, expr: &ComputedMemberExpression<'a>) {
        if let (Expression::Identifier(object), Expression::StringLiteral(member)) =
            (&expr.object, &expr.expression)
        {
            self.read(object.name.as_str(), member.value.as_str(), expr.span);
        }
        walk::walk_computed_member_expression(self, expr);
    }
}

/// Names bound by a single binding pattern
#[derive(Default)]
struct BindingNames(Vec<String>);

impl<'a> Visit<'a> for BindingNames {
    fn visit_binding_identifier(&mut self, ident: &BindingIdentifier<'a>) {
        self.0.push(ident.name.to_string());
    }
}
