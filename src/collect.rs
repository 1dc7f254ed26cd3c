//! Single traversal of the AST that builds the scope tree, extracts the
//! bindings of every scope and records each identifier occurrence with the
//! scope it appears in. Occurrences are resolved afterwards, once the tree
//! is complete, see [`crate::usage::classify`].

use rowan::{TextRange, TextSize};
use swc_core::{common::Spanned, ecma::ast::*};

use crate::{
    binding::{Binding, BindingId, BindingKind, DeclaratorItem, GroupId, GroupShape, RemovalUnit},
    parse::text_range,
    scope::{ScopeId, ScopeKind, ScopeTree},
    usage::{Occurrence, Role},
};

/// A bodiless function signature that may be followed by more signatures
/// or the implementation
struct PendingOverload {
    name: String,
    scope: ScopeId,
    binding: BindingId,
}

struct Collector {
    tree: ScopeTree,
    occurrences: Vec<Occurrence>,
    scope: ScopeId,
    /// Names passed through `export { ... }`, resolved after the walk
    exports: Vec<(String, ScopeId)>,
    overload: Option<PendingOverload>,
    /// Inside a declaration file or a `declare` block, where every
    /// declaration is visible outside the unit
    ambient: bool,
}

pub fn collect(module: &Module, source_len: usize, ambient: bool) -> (ScopeTree, Vec<Occurrence>) {
    let range = TextRange::up_to(TextSize::from(source_len as u32));
    let mut collector = Collector {
        tree: ScopeTree::new(range),
        occurrences: Vec::new(),
        scope: ScopeId::ROOT,
        exports: Vec::new(),
        overload: None,
        ambient,
    };
    collector.visit_module_items(&module.body);
    collector.finish()
}

fn removal(unit: Option<TextRange>) -> RemovalUnit {
    unit.map_or(RemovalUnit::None, RemovalUnit::Statement)
}

fn is_intrinsic_tag(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase()) || name.contains('-')
}

/// The identifiers a binding pattern introduces, in source order
fn pattern_names<'a>(pat: &'a Pat, names: &mut Vec<&'a Ident>) {
    match pat {
        Pat::Ident(binding) => names.push(&binding.id),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                pattern_names(elem, names);
            }
        }
        Pat::Rest(rest) => pattern_names(&rest.arg, names),
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => pattern_names(&kv.value, names),
                    ObjectPatProp::Assign(assign) => names.push(&assign.key.id),
                    ObjectPatProp::Rest(rest) => pattern_names(&rest.arg, names),
                }
            }
        }
        Pat::Assign(assign) => pattern_names(&assign.left, names),
        Pat::Invalid(_) | Pat::Expr(_) => {}
    }
}

impl Collector {
    fn finish(mut self) -> (ScopeTree, Vec<Occurrence>) {
        let mut exported = Vec::new();
        for (name, scope) in &self.exports {
            if let Some(targets) = self.tree.resolve(*scope, name) {
                exported.extend_from_slice(targets);
            }
        }
        for id in exported {
            self.tree.binding_mut(id).exported = true;
        }
        (self.tree, self.occurrences)
    }

    fn enter(&mut self, kind: ScopeKind, span: swc_core::common::Span) -> ScopeId {
        let parent = self.scope;
        self.scope = self.tree.push_scope(parent, kind, text_range(span));
        parent
    }

    fn leave(&mut self, parent: ScopeId) {
        self.scope = parent;
    }

    fn reference(&mut self, ident: &Ident, role: Role) {
        self.occurrences.push(Occurrence {
            name: ident.sym.to_string(),
            range: text_range(ident.span),
            scope: self.scope,
            role,
        });
    }

    fn declare(
        &mut self,
        ident: &Ident,
        kind: BindingKind,
        scope: ScopeId,
        removal: RemovalUnit,
        group: GroupId,
        exported: bool,
    ) -> BindingId {
        self.tree.add_binding(Binding {
            id: BindingId(0),
            name: ident.sym.to_string(),
            kind,
            scope,
            range: text_range(ident.span),
            removal,
            group,
            exported: exported || self.ambient,
        })
    }

    fn declare_single(
        &mut self,
        ident: &Ident,
        kind: BindingKind,
        removal: RemovalUnit,
        exported: bool,
    ) -> BindingId {
        let group = self.tree.new_group(GroupShape::Single);
        self.declare(ident, kind, self.scope, removal, group, exported)
    }

    /// Bind every name of a parameter-like pattern and walk the
    /// expressions nested in it
    fn declare_params(&mut self, pat: &Pat) {
        let mut names = Vec::new();
        pattern_names(pat, &mut names);
        for name in names {
            self.declare_single(name, BindingKind::Parameter, RemovalUnit::None, false);
        }
        self.visit_pat_exprs(pat);
    }

    fn declare_type_params(&mut self, params: &Option<Box<TsTypeParamDecl>>) {
        if let Some(params) = params {
            for param in &params.params {
                self.declare_type_param(param);
            }
        }
    }

    fn declare_type_param(&mut self, param: &TsTypeParam) {
        self.declare_single(&param.name, BindingKind::TypeParameter, RemovalUnit::None, false);
        if let Some(constraint) = &param.constraint {
            self.visit_type(constraint);
        }
        if let Some(default) = &param.default {
            self.visit_type(default);
        }
    }

    // statement lists

    fn visit_module_items(&mut self, items: &[ModuleItem]) {
        let outer = self.overload.take();
        for item in items {
            let continues_overload = matches!(
                item,
                ModuleItem::Stmt(Stmt::Decl(Decl::Fn(_)))
                    | ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                        decl: Decl::Fn(_),
                        ..
                    }))
            );
            if !continues_overload {
                self.overload = None;
            }
            match item {
                ModuleItem::Stmt(stmt) => self.visit_stmt(stmt, true),
                ModuleItem::ModuleDecl(decl) => self.visit_module_decl(decl),
            }
        }
        self.overload = outer;
    }

    fn visit_stmts(&mut self, stmts: &[Stmt]) {
        let outer = self.overload.take();
        for stmt in stmts {
            if !matches!(stmt, Stmt::Decl(Decl::Fn(_))) {
                self.overload = None;
            }
            self.visit_stmt(stmt, true);
        }
        self.overload = outer;
    }

    fn visit_block(&mut self, block: &BlockStmt) {
        let parent = self.enter(ScopeKind::Block, block.span);
        self.visit_stmts(&block.stmts);
        self.leave(parent);
    }

    fn visit_module_decl(&mut self, decl: &ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => {
                let group = self.tree.new_group(GroupShape::Import);
                for specifier in &import.specifiers {
                    let local = match specifier {
                        ImportSpecifier::Named(named) => &named.local,
                        ImportSpecifier::Default(default) => &default.local,
                        ImportSpecifier::Namespace(namespace) => &namespace.local,
                    };
                    self.declare(local, BindingKind::Import, self.scope, RemovalUnit::None, group, false);
                }
            }
            ModuleDecl::ExportDecl(export) => {
                self.visit_decl(&export.decl, None, true);
            }
            ModuleDecl::ExportNamed(named) => {
                // re-exports from another module bind nothing locally
                if named.src.is_none() {
                    for specifier in &named.specifiers {
                        if let ExportSpecifier::Named(ExportNamedSpecifier {
                            orig: ModuleExportName::Ident(orig),
                            ..
                        }) = specifier
                        {
                            self.exports.push((orig.sym.to_string(), self.scope));
                        }
                    }
                }
            }
            ModuleDecl::ExportDefaultDecl(export) => match &export.decl {
                DefaultDecl::Class(class) => {
                    if let Some(ident) = &class.ident {
                        self.declare_single(ident, BindingKind::Class, RemovalUnit::None, true);
                    }
                    self.visit_class(&class.class, None);
                }
                DefaultDecl::Fn(function) => {
                    if let Some(ident) = &function.ident {
                        self.declare_single(ident, BindingKind::Function, RemovalUnit::None, true);
                    }
                    self.visit_function(&function.function, None);
                }
                DefaultDecl::TsInterfaceDecl(interface) => {
                    self.visit_interface(interface, None, true);
                }
            },
            ModuleDecl::ExportDefaultExpr(export) => self.visit_expr(&export.expr),
            ModuleDecl::TsImportEquals(import) => {
                let group = self.tree.new_group(GroupShape::Import);
                self.declare(
                    &import.id,
                    BindingKind::Import,
                    self.scope,
                    RemovalUnit::None,
                    group,
                    import.is_export,
                );
                if let TsModuleRef::TsEntityName(name) = &import.module_ref {
                    self.visit_entity_name(name, Role::Read);
                }
            }
            ModuleDecl::TsExportAssignment(export) => self.visit_expr(&export.expr),
            ModuleDecl::ExportAll(_) | ModuleDecl::TsNamespaceExport(_) => {}
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt, in_list: bool) {
        match stmt {
            Stmt::Block(block) => self.visit_block(block),
            Stmt::Empty(_) | Stmt::Debugger(_) | Stmt::Break(_) | Stmt::Continue(_) => {}
            Stmt::With(with) => {
                self.visit_expr(&with.obj);
                self.visit_stmt(&with.body, false);
            }
            Stmt::Return(ret) => {
                if let Some(arg) = &ret.arg {
                    self.visit_expr(arg);
                }
            }
            Stmt::Labeled(labeled) => self.visit_stmt(&labeled.body, false),
            Stmt::If(if_stmt) => {
                self.visit_expr(&if_stmt.test);
                self.visit_stmt(&if_stmt.cons, false);
                if let Some(alt) = &if_stmt.alt {
                    self.visit_stmt(alt, false);
                }
            }
            Stmt::Switch(switch) => {
                self.visit_expr(&switch.discriminant);
                let parent = self.enter(ScopeKind::Switch, switch.span);
                for case in &switch.cases {
                    if let Some(test) = &case.test {
                        self.visit_expr(test);
                    }
                    self.visit_stmts(&case.cons);
                }
                self.leave(parent);
            }
            Stmt::Throw(throw) => self.visit_expr(&throw.arg),
            Stmt::Try(try_stmt) => {
                self.visit_block(&try_stmt.block);
                if let Some(handler) = &try_stmt.handler {
                    let parent = self.enter(ScopeKind::Catch, handler.span);
                    if let Some(param) = &handler.param {
                        self.declare_params(param);
                    }
                    self.visit_stmts(&handler.body.stmts);
                    self.leave(parent);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.visit_block(finalizer);
                }
            }
            Stmt::While(while_stmt) => {
                self.visit_expr(&while_stmt.test);
                self.visit_stmt(&while_stmt.body, false);
            }
            Stmt::DoWhile(do_while) => {
                self.visit_stmt(&do_while.body, false);
                self.visit_expr(&do_while.test);
            }
            Stmt::For(for_stmt) => {
                let parent = self.enter(ScopeKind::For, for_stmt.span);
                match &for_stmt.init {
                    Some(VarDeclOrExpr::VarDecl(var)) => self.visit_var_decl(var, None, false),
                    Some(VarDeclOrExpr::Expr(expr)) => self.visit_expr(expr),
                    None => {}
                }
                if let Some(test) = &for_stmt.test {
                    self.visit_expr(test);
                }
                if let Some(update) = &for_stmt.update {
                    self.visit_expr(update);
                }
                self.visit_stmt(&for_stmt.body, false);
                self.leave(parent);
            }
            Stmt::ForIn(for_in) => {
                let parent = self.enter(ScopeKind::For, for_in.span);
                self.visit_for_head(&for_in.left);
                self.visit_expr(&for_in.right);
                self.visit_stmt(&for_in.body, false);
                self.leave(parent);
            }
            Stmt::ForOf(for_of) => {
                let parent = self.enter(ScopeKind::For, for_of.span);
                self.visit_for_head(&for_of.left);
                self.visit_expr(&for_of.right);
                self.visit_stmt(&for_of.body, false);
                self.leave(parent);
            }
            Stmt::Decl(decl) => {
                let unit = in_list.then(|| text_range(stmt.span()));
                self.visit_decl(decl, unit, false);
            }
            Stmt::Expr(expr) => self.visit_expr(&expr.expr),
        }
    }

    fn visit_for_head(&mut self, head: &ForHead) {
        match head {
            ForHead::VarDecl(var) => self.visit_var_decl(var, None, false),
            ForHead::UsingDecl(using) => self.visit_declarators(&using.decls, false, None, false),
            ForHead::Pat(pat) => self.visit_target_pat(pat),
        }
    }

    // declarations

    /// `unit` is the statement range when the declaration sits directly in
    /// a statement list and may therefore be deleted as a whole
    fn visit_decl(&mut self, decl: &Decl, unit: Option<TextRange>, exported: bool) {
        match decl {
            Decl::Class(class) => {
                self.declare_single(&class.ident, BindingKind::Class, removal(unit), exported);
                self.visit_class(&class.class, None);
            }
            Decl::Fn(function) => self.visit_fn_decl(function, unit, exported),
            Decl::Var(var) => self.visit_var_decl(var, unit, exported),
            Decl::Using(using) => self.visit_declarators(&using.decls, false, None, exported),
            Decl::TsInterface(interface) => self.visit_interface(interface, unit, exported),
            Decl::TsTypeAlias(alias) => {
                self.declare_single(&alias.id, BindingKind::TypeAlias, removal(unit), exported);
                let parent = self.enter(ScopeKind::Type, alias.span);
                self.declare_type_params(&alias.type_params);
                self.visit_type(&alias.type_ann);
                self.leave(parent);
            }
            Decl::TsEnum(ts_enum) => {
                self.declare_single(&ts_enum.id, BindingKind::Enum, removal(unit), exported);
                for member in &ts_enum.members {
                    if let Some(init) = &member.init {
                        self.visit_expr(init);
                    }
                }
            }
            Decl::TsModule(module) => {
                if let TsModuleName::Ident(ident) = &module.id {
                    if !module.global {
                        self.declare_single(ident, BindingKind::Namespace, RemovalUnit::None, exported);
                    }
                }
                if let Some(body) = &module.body {
                    let outer = self.ambient;
                    self.ambient |= module.declare;
                    let parent = self.enter(ScopeKind::Namespace, module.span);
                    self.visit_namespace_body(body);
                    self.leave(parent);
                    self.ambient = outer;
                }
            }
        }
    }

    fn visit_namespace_body(&mut self, body: &TsNamespaceBody) {
        match body {
            TsNamespaceBody::TsModuleBlock(block) => self.visit_module_items(&block.body),
            TsNamespaceBody::TsNamespaceDecl(decl) => {
                let parent = self.enter(ScopeKind::Namespace, decl.span);
                self.visit_namespace_body(&decl.body);
                self.leave(parent);
            }
        }
    }

    fn visit_fn_decl(&mut self, function: &FnDecl, unit: Option<TextRange>, exported: bool) {
        let name = &*function.ident.sym;
        let pending = self
            .overload
            .take()
            .filter(|pending| pending.name == name && pending.scope == self.scope);

        let id = match pending {
            Some(pending) => {
                // another signature, or the implementation, of an overload set
                let id = pending.binding;
                let previous = self.tree.binding(id).range;
                let group = self.tree.binding(id).group;
                match &mut self.tree.group_mut(group).shape {
                    GroupShape::Overloads { signatures } => signatures.push(previous),
                    shape => {
                        *shape = GroupShape::Overloads {
                            signatures: vec![previous],
                        }
                    }
                }
                let binding = self.tree.binding_mut(id);
                binding.range = text_range(function.ident.span);
                binding.exported |= exported;
                binding.removal = match (binding.removal, unit) {
                    (RemovalUnit::Statement(first), Some(unit)) => {
                        RemovalUnit::Statement(first.cover(unit))
                    }
                    _ => RemovalUnit::None,
                };
                id
            }
            None => self.declare_single(&function.ident, BindingKind::Function, removal(unit), exported),
        };

        if function.function.body.is_none() {
            self.overload = Some(PendingOverload {
                name: name.to_string(),
                scope: self.scope,
                binding: id,
            });
        }
        self.visit_function(&function.function, None);
    }

    fn visit_var_decl(&mut self, var: &VarDecl, unit: Option<TextRange>, exported: bool) {
        self.visit_declarators(&var.decls, var.kind == VarDeclKind::Var, unit, exported);
    }

    fn visit_declarators(
        &mut self,
        decls: &[VarDeclarator],
        hoisted: bool,
        unit: Option<TextRange>,
        exported: bool,
    ) {
        let scope = if hoisted {
            self.tree.var_scope(self.scope)
        } else {
            self.scope
        };

        let list_group = match (unit, decls.len()) {
            (Some(statement), n) if n > 1 => Some(self.tree.new_group(GroupShape::Declarators {
                statement,
                items: Vec::new(),
            })),
            _ => None,
        };

        for (index, decl) in decls.iter().enumerate() {
            let item = match &decl.name {
                Pat::Ident(binding) => {
                    let (group, removal) = match list_group {
                        Some(group) => (group, RemovalUnit::Declarator { index }),
                        None => (self.tree.new_group(GroupShape::Single), removal(unit)),
                    };
                    let id = self.declare(&binding.id, BindingKind::Variable, scope, removal, group, exported);
                    Some(id)
                }
                pat => {
                    let group = self.tree.new_group(GroupShape::Pattern);
                    let mut names = Vec::new();
                    pattern_names(pat, &mut names);
                    for name in names {
                        self.declare(name, BindingKind::Destructured, scope, RemovalUnit::None, group, exported);
                    }
                    None
                }
            };
            if let Some(group) = list_group {
                if let GroupShape::Declarators { items, .. } = &mut self.tree.group_mut(group).shape {
                    items.push(DeclaratorItem {
                        range: text_range(decl.span),
                        binding: item,
                    });
                }
            }

            self.visit_pat_exprs(&decl.name);
            if let Some(init) = &decl.init {
                self.visit_expr(init);
            }
        }
    }

    fn visit_interface(&mut self, interface: &TsInterfaceDecl, unit: Option<TextRange>, exported: bool) {
        self.declare_single(&interface.id, BindingKind::Interface, removal(unit), exported);
        let parent = self.enter(ScopeKind::Type, interface.span);
        self.declare_type_params(&interface.type_params);
        for extends in &interface.extends {
            self.visit_type_expr(&extends.expr);
            self.visit_type_args(&extends.type_args);
        }
        for element in &interface.body.body {
            self.visit_type_element(element);
        }
        self.leave(parent);
    }

    // functions and classes

    fn visit_function(&mut self, function: &Function, expression_name: Option<&Ident>) {
        for decorator in &function.decorators {
            self.visit_expr(&decorator.expr);
        }
        let parent = self.enter(ScopeKind::Function, function.span);
        if let Some(name) = expression_name {
            self.declare_single(name, BindingKind::ExpressionName, RemovalUnit::None, false);
        }
        self.declare_type_params(&function.type_params);
        for param in &function.params {
            for decorator in &param.decorators {
                self.visit_expr(&decorator.expr);
            }
            self.declare_params(&param.pat);
        }
        self.visit_type_ann(&function.return_type);
        // parameter defaults must not see the body's declarations
        if let Some(body) = &function.body {
            self.visit_block(body);
        }
        self.leave(parent);
    }

    fn visit_arrow(&mut self, arrow: &ArrowExpr) {
        let parent = self.enter(ScopeKind::Function, arrow.span);
        self.declare_type_params(&arrow.type_params);
        for param in &arrow.params {
            self.declare_params(param);
        }
        self.visit_type_ann(&arrow.return_type);
        match &*arrow.body {
            BlockStmtOrExpr::BlockStmt(block) => self.visit_block(block),
            BlockStmtOrExpr::Expr(expr) => self.visit_expr(expr),
        }
        self.leave(parent);
    }

    fn visit_class(&mut self, class: &Class, expression_name: Option<&Ident>) {
        for decorator in &class.decorators {
            self.visit_expr(&decorator.expr);
        }
        let parent = self.enter(ScopeKind::Class, class.span);
        if let Some(name) = expression_name {
            self.declare_single(name, BindingKind::ExpressionName, RemovalUnit::None, false);
        }
        self.declare_type_params(&class.type_params);
        if let Some(super_class) = &class.super_class {
            self.visit_expr(super_class);
        }
        self.visit_type_args(&class.super_type_params);
        for implements in &class.implements {
            self.visit_type_expr(&implements.expr);
            self.visit_type_args(&implements.type_args);
        }

        for member in &class.body {
            match member {
                ClassMember::Constructor(constructor) => {
                    self.visit_prop_name(&constructor.key);
                    let ctor_parent = self.enter(ScopeKind::Function, constructor.span);
                    for param in &constructor.params {
                        match param {
                            ParamOrTsParamProp::Param(param) => {
                                for decorator in &param.decorators {
                                    self.visit_expr(&decorator.expr);
                                }
                                self.declare_params(&param.pat);
                            }
                            ParamOrTsParamProp::TsParamProp(prop) => {
                                for decorator in &prop.decorators {
                                    self.visit_expr(&decorator.expr);
                                }
                                match &prop.param {
                                    TsParamPropParam::Ident(binding) => {
                                        self.declare_single(
                                            &binding.id,
                                            BindingKind::Parameter,
                                            RemovalUnit::None,
                                            false,
                                        );
                                        self.visit_type_ann(&binding.type_ann);
                                    }
                                    TsParamPropParam::Assign(assign) => {
                                        self.declare_params(&assign.left);
                                        self.visit_expr(&assign.right);
                                    }
                                }
                            }
                        }
                    }
                    if let Some(body) = &constructor.body {
                        self.visit_block(body);
                    }
                    self.leave(ctor_parent);
                }
                ClassMember::Method(method) => {
                    self.visit_prop_name(&method.key);
                    self.visit_function(&method.function, None);
                }
                ClassMember::PrivateMethod(method) => {
                    self.visit_function(&method.function, None);
                }
                ClassMember::ClassProp(prop) => {
                    for decorator in &prop.decorators {
                        self.visit_expr(&decorator.expr);
                    }
                    self.visit_prop_name(&prop.key);
                    self.visit_type_ann(&prop.type_ann);
                    if let Some(value) = &prop.value {
                        self.visit_expr(value);
                    }
                }
                ClassMember::PrivateProp(prop) => {
                    for decorator in &prop.decorators {
                        self.visit_expr(&decorator.expr);
                    }
                    self.visit_type_ann(&prop.type_ann);
                    if let Some(value) = &prop.value {
                        self.visit_expr(value);
                    }
                }
                ClassMember::TsIndexSignature(signature) => {
                    for param in &signature.params {
                        self.visit_fn_param_type(param);
                    }
                    self.visit_type_ann(&signature.type_ann);
                }
                ClassMember::StaticBlock(block) => {
                    let block_parent = self.enter(ScopeKind::Function, block.span);
                    self.visit_stmts(&block.body.stmts);
                    self.leave(block_parent);
                }
                ClassMember::AutoAccessor(accessor) => {
                    for decorator in &accessor.decorators {
                        self.visit_expr(&decorator.expr);
                    }
                    if let Key::Public(key) = &accessor.key {
                        self.visit_prop_name(key);
                    }
                    self.visit_type_ann(&accessor.type_ann);
                    if let Some(value) = &accessor.value {
                        self.visit_expr(value);
                    }
                }
                _ => {}
            }
        }
        self.leave(parent);
    }

    // patterns

    /// Expressions nested in a binding pattern: defaults, computed keys
    /// and type annotations
    fn visit_pat_exprs(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(binding) => self.visit_type_ann(&binding.type_ann),
            Pat::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.visit_pat_exprs(elem);
                }
                self.visit_type_ann(&array.type_ann);
            }
            Pat::Rest(rest) => {
                self.visit_pat_exprs(&rest.arg);
                self.visit_type_ann(&rest.type_ann);
            }
            Pat::Object(object) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            self.visit_prop_name(&kv.key);
                            self.visit_pat_exprs(&kv.value);
                        }
                        ObjectPatProp::Assign(assign) => {
                            if let Some(value) = &assign.value {
                                self.visit_expr(value);
                            }
                        }
                        ObjectPatProp::Rest(rest) => self.visit_pat_exprs(&rest.arg),
                    }
                }
                self.visit_type_ann(&object.type_ann);
            }
            Pat::Assign(assign) => {
                self.visit_pat_exprs(&assign.left);
                self.visit_expr(&assign.right);
            }
            Pat::Expr(expr) => self.visit_expr(expr),
            Pat::Invalid(_) => {}
        }
    }

    /// Left-hand side of a plain assignment: bare names are write-only
    fn visit_target_pat(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(binding) => self.reference(&binding.id, Role::WriteOnly),
            Pat::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.visit_target_pat(elem);
                }
            }
            Pat::Rest(rest) => self.visit_target_pat(&rest.arg),
            Pat::Object(object) => self.visit_target_object(object),
            Pat::Assign(assign) => {
                self.visit_target_pat(&assign.left);
                self.visit_expr(&assign.right);
            }
            Pat::Expr(expr) => self.visit_target_expr(expr),
            Pat::Invalid(_) => {}
        }
    }

    fn visit_target_object(&mut self, object: &ObjectPat) {
        for prop in &object.props {
            match prop {
                ObjectPatProp::KeyValue(kv) => {
                    self.visit_prop_name(&kv.key);
                    self.visit_target_pat(&kv.value);
                }
                ObjectPatProp::Assign(assign) => {
                    self.reference(&assign.key.id, Role::WriteOnly);
                    if let Some(value) = &assign.value {
                        self.visit_expr(value);
                    }
                }
                ObjectPatProp::Rest(rest) => self.visit_target_pat(&rest.arg),
            }
        }
    }

    fn visit_target_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.reference(ident, Role::WriteOnly),
            Expr::Paren(paren) => self.visit_target_expr(&paren.expr),
            Expr::TsAs(ts_as) => {
                self.visit_target_expr(&ts_as.expr);
                self.visit_type(&ts_as.type_ann);
            }
            Expr::TsSatisfies(satisfies) => {
                self.visit_target_expr(&satisfies.expr);
                self.visit_type(&satisfies.type_ann);
            }
            Expr::TsTypeAssertion(assertion) => {
                self.visit_target_expr(&assertion.expr);
                self.visit_type(&assertion.type_ann);
            }
            Expr::TsNonNull(non_null) => self.visit_target_expr(&non_null.expr),
            expr => self.visit_expr(expr),
        }
    }

    fn visit_assign(&mut self, assign: &AssignExpr) {
        let plain = assign.op == AssignOp::Assign;
        match &assign.left {
            AssignTarget::Simple(target) => match target {
                SimpleAssignTarget::Ident(binding) => {
                    let role = if plain { Role::WriteOnly } else { Role::Read };
                    self.reference(&binding.id, role);
                }
                SimpleAssignTarget::Member(member) => self.visit_member(member),
                SimpleAssignTarget::SuperProp(super_prop) => self.visit_super_prop(super_prop),
                SimpleAssignTarget::Paren(paren) if plain => self.visit_target_expr(&paren.expr),
                SimpleAssignTarget::Paren(paren) => self.visit_expr(&paren.expr),
                SimpleAssignTarget::OptChain(opt_chain) => self.visit_opt_chain(opt_chain),
                SimpleAssignTarget::TsAs(ts_as) => {
                    self.visit_assign_operand(&ts_as.expr, plain);
                    self.visit_type(&ts_as.type_ann);
                }
                SimpleAssignTarget::TsSatisfies(satisfies) => {
                    self.visit_assign_operand(&satisfies.expr, plain);
                    self.visit_type(&satisfies.type_ann);
                }
                SimpleAssignTarget::TsNonNull(non_null) => {
                    self.visit_assign_operand(&non_null.expr, plain);
                }
                SimpleAssignTarget::TsTypeAssertion(assertion) => {
                    self.visit_assign_operand(&assertion.expr, plain);
                    self.visit_type(&assertion.type_ann);
                }
                SimpleAssignTarget::TsInstantiation(instantiation) => {
                    self.visit_expr(&instantiation.expr);
                    self.visit_type_args_inst(&instantiation.type_args);
                }
                _ => {}
            },
            AssignTarget::Pat(target) => match target {
                AssignTargetPat::Array(array) => {
                    for elem in array.elems.iter().flatten() {
                        self.visit_target_pat(elem);
                    }
                }
                AssignTargetPat::Object(object) => self.visit_target_object(object),
                _ => {}
            },
        }
        self.visit_expr(&assign.right);
    }

    fn visit_assign_operand(&mut self, expr: &Expr, plain: bool) {
        if plain {
            self.visit_target_expr(expr);
        } else {
            self.visit_expr(expr);
        }
    }

    // expressions

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.reference(ident, Role::Read),
            Expr::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.visit_expr(&elem.expr);
                }
            }
            Expr::Object(object) => self.visit_object(object),
            Expr::Fn(function) => self.visit_function(&function.function, function.ident.as_ref()),
            Expr::Unary(unary) => self.visit_expr(&unary.arg),
            Expr::Update(update) => self.visit_expr(&update.arg),
            Expr::Bin(bin) => {
                self.visit_expr(&bin.left);
                self.visit_expr(&bin.right);
            }
            Expr::Assign(assign) => self.visit_assign(assign),
            Expr::Member(member) => self.visit_member(member),
            Expr::SuperProp(super_prop) => self.visit_super_prop(super_prop),
            Expr::Cond(cond) => {
                self.visit_expr(&cond.test);
                self.visit_expr(&cond.cons);
                self.visit_expr(&cond.alt);
            }
            Expr::Call(call) => {
                if let Callee::Expr(callee) = &call.callee {
                    self.visit_expr(callee);
                }
                self.visit_args(&call.args);
                self.visit_type_args(&call.type_args);
            }
            Expr::New(new) => {
                self.visit_expr(&new.callee);
                if let Some(args) = &new.args {
                    self.visit_args(args);
                }
                self.visit_type_args(&new.type_args);
            }
            Expr::Seq(seq) => {
                for expr in &seq.exprs {
                    self.visit_expr(expr);
                }
            }
            Expr::Tpl(tpl) => {
                for expr in &tpl.exprs {
                    self.visit_expr(expr);
                }
            }
            Expr::TaggedTpl(tagged) => {
                self.visit_expr(&tagged.tag);
                for expr in &tagged.tpl.exprs {
                    self.visit_expr(expr);
                }
                self.visit_type_args(&tagged.type_params);
            }
            Expr::Arrow(arrow) => self.visit_arrow(arrow),
            Expr::Class(class) => self.visit_class(&class.class, class.ident.as_ref()),
            Expr::Yield(yield_expr) => {
                if let Some(arg) = &yield_expr.arg {
                    self.visit_expr(arg);
                }
            }
            Expr::Await(await_expr) => self.visit_expr(&await_expr.arg),
            Expr::Paren(paren) => self.visit_expr(&paren.expr),
            Expr::JSXMember(member) => self.visit_jsx_object(&member.obj),
            Expr::JSXElement(element) => self.visit_jsx_element(element),
            Expr::JSXFragment(fragment) => self.visit_jsx_children(&fragment.children),
            Expr::TsTypeAssertion(assertion) => {
                self.visit_expr(&assertion.expr);
                self.visit_type(&assertion.type_ann);
            }
            Expr::TsConstAssertion(assertion) => self.visit_expr(&assertion.expr),
            Expr::TsNonNull(non_null) => self.visit_expr(&non_null.expr),
            Expr::TsAs(ts_as) => {
                self.visit_expr(&ts_as.expr);
                self.visit_type(&ts_as.type_ann);
            }
            Expr::TsInstantiation(instantiation) => {
                self.visit_expr(&instantiation.expr);
                self.visit_type_args_inst(&instantiation.type_args);
            }
            Expr::TsSatisfies(satisfies) => {
                self.visit_expr(&satisfies.expr);
                self.visit_type(&satisfies.type_ann);
            }
            Expr::OptChain(opt_chain) => self.visit_opt_chain(opt_chain),
            _ => {}
        }
    }

    fn visit_args(&mut self, args: &[ExprOrSpread]) {
        for arg in args {
            self.visit_expr(&arg.expr);
        }
    }

    fn visit_member(&mut self, member: &MemberExpr) {
        self.visit_expr(&member.obj);
        if let MemberProp::Computed(computed) = &member.prop {
            self.visit_expr(&computed.expr);
        }
    }

    fn visit_super_prop(&mut self, super_prop: &SuperPropExpr) {
        if let SuperProp::Computed(computed) = &super_prop.prop {
            self.visit_expr(&computed.expr);
        }
    }

    fn visit_opt_chain(&mut self, opt_chain: &OptChainExpr) {
        match &*opt_chain.base {
            OptChainBase::Member(member) => self.visit_member(member),
            OptChainBase::Call(call) => {
                self.visit_expr(&call.callee);
                self.visit_args(&call.args);
                self.visit_type_args(&call.type_args);
            }
        }
    }

    fn visit_object(&mut self, object: &ObjectLit) {
        for prop in &object.props {
            let prop = match prop {
                PropOrSpread::Spread(spread) => {
                    self.visit_expr(&spread.expr);
                    continue;
                }
                PropOrSpread::Prop(prop) => prop,
            };
            match &**prop {
                // `{ a }` reads `a`
                Prop::Shorthand(ident) => self.reference(ident, Role::Read),
                Prop::KeyValue(kv) => {
                    self.visit_prop_name(&kv.key);
                    self.visit_expr(&kv.value);
                }
                Prop::Assign(assign) => self.visit_expr(&assign.value),
                Prop::Getter(getter) => {
                    self.visit_prop_name(&getter.key);
                    let parent = self.enter(ScopeKind::Function, getter.span);
                    self.visit_type_ann(&getter.type_ann);
                    if let Some(body) = &getter.body {
                        self.visit_stmts(&body.stmts);
                    }
                    self.leave(parent);
                }
                Prop::Setter(setter) => {
                    self.visit_prop_name(&setter.key);
                    let parent = self.enter(ScopeKind::Function, setter.span);
                    self.declare_params(&setter.param);
                    if let Some(body) = &setter.body {
                        self.visit_stmts(&body.stmts);
                    }
                    self.leave(parent);
                }
                Prop::Method(method) => {
                    self.visit_prop_name(&method.key);
                    self.visit_function(&method.function, None);
                }
            }
        }
    }

    fn visit_prop_name(&mut self, name: &PropName) {
        if let PropName::Computed(computed) = name {
            self.visit_expr(&computed.expr);
        }
    }

    // JSX

    fn visit_jsx_element(&mut self, element: &JSXElement) {
        match &element.opening.name {
            JSXElementName::Ident(ident) => {
                if !is_intrinsic_tag(&ident.sym) {
                    self.reference(ident, Role::Read);
                }
            }
            JSXElementName::JSXMemberExpr(member) => self.visit_jsx_object(&member.obj),
            JSXElementName::JSXNamespacedName(_) => {}
        }
        for attr in &element.opening.attrs {
            match attr {
                JSXAttrOrSpread::JSXAttr(attr) => match &attr.value {
                    Some(JSXAttrValue::JSXExprContainer(container)) => self.visit_jsx_expr(&container.expr),
                    Some(JSXAttrValue::JSXElement(element)) => self.visit_jsx_element(element),
                    Some(JSXAttrValue::JSXFragment(fragment)) => self.visit_jsx_children(&fragment.children),
                    _ => {}
                },
                JSXAttrOrSpread::SpreadElement(spread) => self.visit_expr(&spread.expr),
            }
        }
        self.visit_type_args(&element.opening.type_args);
        self.visit_jsx_children(&element.children);
    }

    fn visit_jsx_object(&mut self, object: &JSXObject) {
        match object {
            JSXObject::Ident(ident) => self.reference(ident, Role::Read),
            JSXObject::JSXMemberExpr(member) => self.visit_jsx_object(&member.obj),
        }
    }

    fn visit_jsx_children(&mut self, children: &[JSXElementChild]) {
        for child in children {
            match child {
                JSXElementChild::JSXExprContainer(container) => self.visit_jsx_expr(&container.expr),
                JSXElementChild::JSXSpreadChild(spread) => self.visit_expr(&spread.expr),
                JSXElementChild::JSXElement(element) => self.visit_jsx_element(element),
                JSXElementChild::JSXFragment(fragment) => self.visit_jsx_children(&fragment.children),
                JSXElementChild::JSXText(_) => {}
            }
        }
    }

    fn visit_jsx_expr(&mut self, expr: &JSXExpr) {
        if let JSXExpr::Expr(expr) = expr {
            self.visit_expr(expr);
        }
    }

    // types

    fn visit_type_ann(&mut self, ann: &Option<Box<TsTypeAnn>>) {
        if let Some(ann) = ann {
            self.visit_type(&ann.type_ann);
        }
    }

    fn visit_type_args(&mut self, args: &Option<Box<TsTypeParamInstantiation>>) {
        if let Some(args) = args {
            self.visit_type_args_inst(args);
        }
    }

    fn visit_type_args_inst(&mut self, args: &TsTypeParamInstantiation) {
        for param in &args.params {
            self.visit_type(param);
        }
    }

    fn visit_entity_name(&mut self, name: &TsEntityName, role: Role) {
        match name {
            TsEntityName::Ident(ident) => self.reference(ident, role),
            // `Thing.Name` refers to `Thing`
            TsEntityName::TsQualifiedName(qualified) => self.visit_entity_name(&qualified.left, role),
        }
    }

    /// Expression in `extends`/`implements` clauses of interfaces and classes
    fn visit_type_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.reference(ident, Role::Type),
            Expr::Member(member) => self.visit_type_expr(&member.obj),
            expr => self.visit_expr(expr),
        }
    }

    fn visit_fn_param_type(&mut self, param: &TsFnParam) {
        match param {
            TsFnParam::Ident(binding) => self.visit_type_ann(&binding.type_ann),
            TsFnParam::Array(array) => self.visit_type_ann(&array.type_ann),
            TsFnParam::Rest(rest) => self.visit_type_ann(&rest.type_ann),
            TsFnParam::Object(object) => self.visit_type_ann(&object.type_ann),
        }
    }

    fn visit_signature(
        &mut self,
        span: swc_core::common::Span,
        type_params: &Option<Box<TsTypeParamDecl>>,
        params: &[TsFnParam],
        type_ann: Option<&TsTypeAnn>,
    ) {
        let parent = self.enter(ScopeKind::Type, span);
        self.declare_type_params(type_params);
        for param in params {
            self.visit_fn_param_type(param);
        }
        if let Some(type_ann) = type_ann {
            self.visit_type(&type_ann.type_ann);
        }
        self.leave(parent);
    }

    fn visit_type_element(&mut self, element: &TsTypeElement) {
        match element {
            TsTypeElement::TsCallSignatureDecl(call) => {
                self.visit_signature(call.span, &call.type_params, &call.params, call.type_ann.as_deref());
            }
            TsTypeElement::TsConstructSignatureDecl(construct) => {
                self.visit_signature(
                    construct.span,
                    &construct.type_params,
                    &construct.params,
                    construct.type_ann.as_deref(),
                );
            }
            TsTypeElement::TsPropertySignature(property) => {
                if property.computed {
                    self.visit_expr(&property.key);
                }
                self.visit_type_ann(&property.type_ann);
            }
            TsTypeElement::TsGetterSignature(getter) => {
                if getter.computed {
                    self.visit_expr(&getter.key);
                }
                self.visit_type_ann(&getter.type_ann);
            }
            TsTypeElement::TsSetterSignature(setter) => {
                if setter.computed {
                    self.visit_expr(&setter.key);
                }
                self.visit_fn_param_type(&setter.param);
            }
            TsTypeElement::TsMethodSignature(method) => {
                if method.computed {
                    self.visit_expr(&method.key);
                }
                self.visit_signature(method.span, &method.type_params, &method.params, method.type_ann.as_deref());
            }
            TsTypeElement::TsIndexSignature(index) => {
                for param in &index.params {
                    self.visit_fn_param_type(param);
                }
                self.visit_type_ann(&index.type_ann);
            }
        }
    }

    fn visit_type(&mut self, ty: &TsType) {
        match ty {
            TsType::TsTypeRef(type_ref) => {
                self.visit_entity_name(&type_ref.type_name, Role::Type);
                self.visit_type_args(&type_ref.type_params);
            }
            TsType::TsTypeQuery(query) => {
                if let TsTypeQueryExpr::TsEntityName(name) = &query.expr_name {
                    self.visit_entity_name(name, Role::Type);
                }
                self.visit_type_args(&query.type_args);
            }
            TsType::TsFnOrConstructorType(TsFnOrConstructorType::TsFnType(function)) => {
                self.visit_signature(function.span, &function.type_params, &function.params, Some(&function.type_ann));
            }
            TsType::TsFnOrConstructorType(TsFnOrConstructorType::TsConstructorType(constructor)) => {
                self.visit_signature(
                    constructor.span,
                    &constructor.type_params,
                    &constructor.params,
                    Some(&constructor.type_ann),
                );
            }
            TsType::TsTypeLit(literal) => {
                for member in &literal.members {
                    self.visit_type_element(member);
                }
            }
            TsType::TsArrayType(array) => self.visit_type(&array.elem_type),
            TsType::TsTupleType(tuple) => {
                for elem in &tuple.elem_types {
                    self.visit_type(&elem.ty);
                }
            }
            TsType::TsOptionalType(optional) => self.visit_type(&optional.type_ann),
            TsType::TsRestType(rest) => self.visit_type(&rest.type_ann),
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
                for ty in &union.types {
                    self.visit_type(ty);
                }
            }
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsIntersectionType(intersection)) => {
                for ty in &intersection.types {
                    self.visit_type(ty);
                }
            }
            TsType::TsConditionalType(conditional) => {
                self.visit_type(&conditional.check_type);
                // `infer X` in the extends clause is visible in the true branch
                let parent = self.enter(ScopeKind::Type, conditional.span);
                self.visit_type(&conditional.extends_type);
                self.visit_type(&conditional.true_type);
                self.leave(parent);
                self.visit_type(&conditional.false_type);
            }
            TsType::TsInferType(infer) => self.declare_type_param(&infer.type_param),
            TsType::TsParenthesizedType(paren) => self.visit_type(&paren.type_ann),
            TsType::TsTypeOperator(operator) => self.visit_type(&operator.type_ann),
            TsType::TsIndexedAccessType(access) => {
                self.visit_type(&access.obj_type);
                self.visit_type(&access.index_type);
            }
            TsType::TsMappedType(mapped) => {
                let parent = self.enter(ScopeKind::Type, mapped.span);
                self.declare_type_param(&mapped.type_param);
                if let Some(name_type) = &mapped.name_type {
                    self.visit_type(name_type);
                }
                if let Some(type_ann) = &mapped.type_ann {
                    self.visit_type(type_ann);
                }
                self.leave(parent);
            }
            TsType::TsTypePredicate(predicate) => self.visit_type_ann(&predicate.type_ann),
            TsType::TsImportType(import) => self.visit_type_args(&import.type_args),
            TsType::TsLitType(TsLitType {
                lit: TsLit::Tpl(tpl),
                ..
            }) => {
                for ty in &tpl.types {
                    self.visit_type(ty);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse, Dialect};

    fn run(content: &str) -> (ScopeTree, Vec<Occurrence>) {
        let module = parse(content, Dialect::Tsx).expect("parse");
        collect(&module, content.len(), false)
    }

    fn names(tree: &ScopeTree) -> Vec<(&str, BindingKind)> {
        tree.bindings()
            .iter()
            .map(|binding| (binding.name.as_str(), binding.kind))
            .collect()
    }

    #[test]
    fn one_binding_per_declarator() {
        let (tree, _) = run("let a = 1, b = 2;");
        assert_eq!(names(&tree), vec![("a", BindingKind::Variable), ("b", BindingKind::Variable)]);
        let a = &tree.bindings()[0];
        assert_eq!(a.removal, RemovalUnit::Declarator { index: 0 });
        assert_eq!(a.group, tree.bindings()[1].group);
    }

    #[test]
    fn single_declarator_removes_statement() {
        let content = "const x = \"x\";";
        let (tree, _) = run(content);
        match tree.bindings()[0].removal {
            RemovalUnit::Statement(range) => {
                assert_eq!(usize::from(range.start()), 0);
                assert!(content[range].starts_with("const x = \"x\""));
            }
            removal => panic!("unexpected removal {:?}", removal),
        }
    }

    #[test]
    fn destructuring_has_no_removal_unit() {
        let (tree, _) = run("const { a, b: [c], ...rest } = o;");
        assert_eq!(
            names(&tree),
            vec![
                ("a", BindingKind::Destructured),
                ("c", BindingKind::Destructured),
                ("rest", BindingKind::Destructured),
            ]
        );
        assert!(tree.bindings().iter().all(|binding| binding.removal == RemovalUnit::None));
    }

    #[test]
    fn imports_share_a_group() {
        let (tree, _) = run("import L, { e, f as g } from \"./letters\"; import * as ns from \"./ns\";");
        assert_eq!(
            names(&tree),
            vec![
                ("L", BindingKind::Import),
                ("e", BindingKind::Import),
                ("g", BindingKind::Import),
                ("ns", BindingKind::Import),
            ]
        );
        let groups: Vec<_> = tree.bindings().iter().map(|binding| binding.group).collect();
        assert_eq!(groups[0], groups[2]);
        assert_ne!(groups[0], groups[3]);
    }

    #[test]
    fn overloads_merge_into_implementation() {
        let content = "function b(x: string): void;\nfunction b(x: number): void;\nfunction b(...args: any[]): void {}";
        let (tree, _) = run(content);
        assert_eq!(names(&tree)[0], ("b", BindingKind::Function));
        let b = &tree.bindings()[0];
        assert_eq!(&content[b.range], "b");
        assert_eq!(usize::from(b.range.start()), content.rfind("b(").expect("impl"));
        assert_eq!(
            b.removal,
            RemovalUnit::Statement(TextRange::up_to(TextSize::from(content.len() as u32)))
        );
        match &tree.group(b.group).shape {
            GroupShape::Overloads { signatures } => assert_eq!(signatures.len(), 2),
            shape => panic!("unexpected shape {:?}", shape),
        }
    }

    #[test]
    fn var_hoists_out_of_blocks() {
        let (tree, _) = run("function f() { if (x) { var v = 1; let l = 2; } }");
        let v = tree.bindings().iter().find(|binding| binding.name == "v").expect("v");
        let l = tree.bindings().iter().find(|binding| binding.name == "l").expect("l");
        assert_eq!(tree.scope(v.scope).kind, ScopeKind::Function);
        assert_eq!(tree.scope(l.scope).kind, ScopeKind::Block);
    }

    #[test]
    fn export_clause_marks_exported() {
        let (tree, _) = run("const another = 1; export { another };");
        assert!(tree.bindings()[0].exported);
    }

    #[test]
    fn jsx_intrinsic_tags_are_not_references() {
        let (_, occurrences) = run("const x = <div><Thing.Part/></div>;");
        let names: Vec<_> = occurrences.iter().map(|occurrence| occurrence.name.as_str()).collect();
        assert_eq!(names, vec!["Thing"]);
    }

    #[test]
    fn parameters_shadow_but_are_not_reportable() {
        let (tree, _) = run("function f(a: string, { b }: T) {}");
        let kinds: Vec<_> = tree.bindings().iter().map(|binding| binding.kind).collect();
        assert_eq!(
            kinds,
            vec![BindingKind::Function, BindingKind::Parameter, BindingKind::Parameter]
        );
    }
}
