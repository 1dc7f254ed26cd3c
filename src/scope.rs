use std::{collections::HashMap, fmt};

use rowan::TextRange;

use crate::binding::{Binding, BindingId, GroupId, GroupShape, SiblingGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Syntax that opens a lexical scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Block,
    For,
    Catch,
    Switch,
    Class,
    /// Generic parameters of a type-level declaration
    Type,
    Namespace,
}

impl ScopeKind {
    /// `var` declarations hoist up to scopes of these kinds
    pub fn is_var_target(self) -> bool {
        matches!(self, ScopeKind::Module | ScopeKind::Function | ScopeKind::Namespace)
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ScopeKind::Module => "module",
            ScopeKind::Function => "function",
            ScopeKind::Block => "block",
            ScopeKind::For => "for",
            ScopeKind::Catch => "catch",
            ScopeKind::Switch => "switch",
            ScopeKind::Class => "class",
            ScopeKind::Type => "type",
            ScopeKind::Namespace => "namespace",
        };
        fmt.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    pub range: TextRange,
    /// Bindings introduced directly in this scope, in source order
    pub bindings: Vec<BindingId>,
    names: HashMap<String, Vec<BindingId>>,
}

impl Scope {
    /// All bindings of `name` in this scope; more than one for redeclared
    /// `var`s and merged declarations
    pub fn lookup(&self, name: &str) -> Option<&[BindingId]> {
        self.names.get(name).map(Vec::as_slice)
    }
}

/// Arena of scopes together with the bindings and sibling groups they own
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    bindings: Vec<Binding>,
    groups: Vec<SiblingGroup>,
}

impl ScopeTree {
    pub fn new(range: TextRange) -> Self {
        ScopeTree {
            scopes: vec![Scope {
                id: ScopeId::ROOT,
                parent: None,
                kind: ScopeKind::Module,
                range,
                bindings: Vec::new(),
                names: HashMap::new(),
            }],
            bindings: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn push_scope(&mut self, parent: ScopeId, kind: ScopeKind, range: TextRange) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            id,
            parent: Some(parent),
            kind,
            range,
            bindings: Vec::new(),
            names: HashMap::new(),
        });
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.index()]
    }

    pub fn binding_mut(&mut self, id: BindingId) -> &mut Binding {
        &mut self.bindings[id.index()]
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn group(&self, id: GroupId) -> &SiblingGroup {
        &self.groups[id.index()]
    }

    pub fn group_mut(&mut self, id: GroupId) -> &mut SiblingGroup {
        &mut self.groups[id.index()]
    }

    pub fn groups(&self) -> &[SiblingGroup] {
        &self.groups
    }

    pub fn new_group(&mut self, shape: GroupShape) -> GroupId {
        let id = GroupId(self.groups.len() as u32);
        self.groups.push(SiblingGroup {
            id,
            shape,
            members: Vec::new(),
        });
        id
    }

    /// Register `binding` in its scope and group. Its `id` is assigned here.
    pub fn add_binding(&mut self, mut binding: Binding) -> BindingId {
        let id = BindingId(self.bindings.len() as u32);
        binding.id = id;
        let scope = &mut self.scopes[binding.scope.index()];
        scope.bindings.push(id);
        scope.names.entry(binding.name.clone()).or_default().push(id);
        self.groups[binding.group.index()].members.push(id);
        self.bindings.push(binding);
        id
    }

    /// Nearest enclosing scope of `scope` (itself included) that `var`
    /// declarations hoist into
    pub fn var_scope(&self, mut scope: ScopeId) -> ScopeId {
        loop {
            let current = self.scope(scope);
            match current.parent {
                Some(parent) if !current.kind.is_var_target() => scope = parent,
                _ => return scope,
            }
        }
    }

    /// Resolve `name` as seen from `scope`: the bindings of the nearest
    /// enclosing scope that declares it
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<&[BindingId]> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(found) = scope.lookup(name) {
                return Some(found);
            }
            current = scope.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{BindingKind, RemovalUnit};
    use rowan::TextSize;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(TextSize::from(start), TextSize::from(end))
    }

    fn declare(tree: &mut ScopeTree, scope: ScopeId, name: &str) -> BindingId {
        let group = tree.new_group(GroupShape::Single);
        tree.add_binding(Binding {
            id: BindingId(0),
            name: name.to_string(),
            kind: BindingKind::Variable,
            scope,
            range: range(0, 1),
            removal: RemovalUnit::None,
            group,
            exported: false,
        })
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let mut tree = ScopeTree::new(range(0, 100));
        let outer = declare(&mut tree, ScopeId::ROOT, "a");
        let function = tree.push_scope(ScopeId::ROOT, ScopeKind::Function, range(10, 90));
        let block = tree.push_scope(function, ScopeKind::Block, range(20, 80));
        let inner = declare(&mut tree, function, "a");

        assert_eq!(tree.resolve(block, "a"), Some(&[inner][..]));
        assert_eq!(tree.resolve(ScopeId::ROOT, "a"), Some(&[outer][..]));
        assert_eq!(tree.resolve(block, "console"), None);
    }

    #[test]
    fn var_hoists_past_blocks() {
        let mut tree = ScopeTree::new(range(0, 100));
        let function = tree.push_scope(ScopeId::ROOT, ScopeKind::Function, range(10, 90));
        let block = tree.push_scope(function, ScopeKind::Block, range(20, 80));
        let for_head = tree.push_scope(block, ScopeKind::For, range(30, 70));
        assert_eq!(tree.var_scope(for_head), function);
        assert_eq!(tree.var_scope(ScopeId::ROOT), ScopeId::ROOT);
    }

    #[test]
    fn redeclarations_resolve_together() {
        let mut tree = ScopeTree::new(range(0, 100));
        let first = declare(&mut tree, ScopeId::ROOT, "v");
        let second = declare(&mut tree, ScopeId::ROOT, "v");
        assert_eq!(tree.resolve(ScopeId::ROOT, "v"), Some(&[first, second][..]));
    }
}
