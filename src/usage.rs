use std::collections::BTreeMap;

use rowan::TextRange;

use crate::{
    binding::{BindingId, GroupShape},
    scope::{ScopeId, ScopeTree},
};

/// How an identifier occurrence relates to the binding it names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The binding's own name token
    Declaring,
    /// The value is consumed
    Read,
    /// Reference from a type position
    Type,
    /// Sole target of a plain assignment
    WriteOnly,
    /// The name is on the ignore list
    Ignored,
}

impl Role {
    pub fn is_use(self) -> bool {
        matches!(self, Role::Read | Role::Type | Role::Ignored)
    }
}

/// One identifier mention, with the scope it appears in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub name: String,
    pub range: TextRange,
    pub scope: ScopeId,
    pub role: Role,
}

/// Verdict for one binding
#[derive(Debug, Clone)]
pub struct Usage {
    pub binding: BindingId,
    pub used: bool,
    pub occurrences: Vec<Occurrence>,
}

pub fn is_ignored(ignored: &BTreeMap<String, bool>, name: &str) -> bool {
    ignored.get(name).copied().unwrap_or(false)
}

/// Resolve every occurrence against the finished scope tree and collect,
/// per binding, its declaring occurrences followed by its references.
/// Occurrences of global or undeclared names are dropped.
pub fn classify(
    tree: &ScopeTree,
    occurrences: Vec<Occurrence>,
    ignored: &BTreeMap<String, bool>,
) -> Vec<Vec<Occurrence>> {
    let mut resolved: Vec<Vec<Occurrence>> = tree
        .bindings()
        .iter()
        .map(|binding| {
            let mut declaring = vec![Occurrence {
                name: binding.name.clone(),
                range: binding.range,
                scope: binding.scope,
                role: Role::Declaring,
            }];
            if let GroupShape::Overloads { signatures } = &tree.group(binding.group).shape {
                declaring.extend(signatures.iter().map(|&range| Occurrence {
                    name: binding.name.clone(),
                    range,
                    scope: binding.scope,
                    role: Role::Declaring,
                }));
            }
            declaring
        })
        .collect();

    for mut occurrence in occurrences {
        let Some(targets) = tree.resolve(occurrence.scope, &occurrence.name) else {
            continue;
        };
        if is_ignored(ignored, &occurrence.name) {
            occurrence.role = Role::Ignored;
        }
        for target in targets {
            resolved[target.index()].push(occurrence.clone());
        }
    }

    resolved
}

/// Reduce classified occurrences plus export status and ignore list into
/// one verdict per binding
pub fn aggregate(
    tree: &ScopeTree,
    resolved: Vec<Vec<Occurrence>>,
    ignored: &BTreeMap<String, bool>,
) -> Vec<Usage> {
    tree.bindings()
        .iter()
        .zip(resolved)
        .map(|(binding, occurrences)| {
            let used = binding.exported
                || is_ignored(ignored, &binding.name)
                || occurrences.iter().any(|occurrence| occurrence.role.is_use());
            Usage {
                binding: binding.id,
                used,
                occurrences,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::collect;
    use crate::parse::{parse, Dialect};

    fn usages(content: &str, ignored: &BTreeMap<String, bool>) -> (ScopeTree, Vec<Usage>) {
        let module = parse(content, Dialect::Tsx).expect("parse");
        let (tree, occurrences) = collect(&module, content.len(), false);
        let resolved = classify(&tree, occurrences, ignored);
        let usages = aggregate(&tree, resolved, ignored);
        (tree, usages)
    }

    fn roles(tree: &ScopeTree, usages: &[Usage], name: &str) -> Vec<Role> {
        let usage = usages
            .iter()
            .find(|usage| tree.binding(usage.binding).name == name)
            .expect("binding");
        usage.occurrences.iter().map(|occurrence| occurrence.role).collect()
    }

    #[test]
    fn plain_assignment_is_write_only() {
        let (tree, usages) = usages("let b = 1; b = 2; b += 3;", &BTreeMap::new());
        assert_eq!(
            roles(&tree, &usages, "b"),
            vec![Role::Declaring, Role::WriteOnly, Role::Read]
        );
    }

    #[test]
    fn type_positions_are_type_uses() {
        let (tree, usages) = usages(
            "interface I {} const t: I | null = null; console.log(t);",
            &BTreeMap::new(),
        );
        assert_eq!(roles(&tree, &usages, "I"), vec![Role::Declaring, Role::Type]);
        assert!(usages.iter().all(|usage| usage.used));
    }

    #[test]
    fn ignored_names_are_used() {
        let ignored = BTreeMap::from([("jsx".to_string(), true), ("h".to_string(), false)]);
        let (tree, usages) = usages("import { jsx } from \"x\"; import { h } from \"y\";", &ignored);
        for usage in &usages {
            let name = &tree.binding(usage.binding).name;
            assert_eq!(usage.used, name == "jsx", "{}", name);
        }
    }

    #[test]
    fn unresolved_names_are_dropped() {
        let (tree, usages) = usages("const a = 1; console.log(undeclared, a);", &BTreeMap::new());
        assert_eq!(tree.bindings().len(), 1);
        assert_eq!(usages[0].occurrences.len(), 2);
    }
}
