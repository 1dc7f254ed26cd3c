use std::{collections::BTreeMap, fmt, fs, ops::Range, path::Path};

use rowan::TextRange;
use serde::Deserialize;
use swc_core::ecma::ast::Module;
use tracing::debug;

use crate::{
    binding::BindingKind,
    collect::collect,
    edit::{synthesize_fixes, Edit},
    error::{Error, Result},
    parse::{parse, Dialect},
    scope::ScopeTree,
    usage::{aggregate, classify},
};

/// One unused declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadCode {
    pub name: String,
    pub kind: BindingKind,
    /// The binding's identifier
    pub range: TextRange,
    /// Deletion that removes the declaration, if one is safe
    pub fix: Option<Edit>,
}

impl fmt::Display for DeadCode {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{} {}", self.kind, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Report declarations other than imports
    pub declarations: bool,
    /// Report import bindings
    pub imports: bool,
    /// Names that always count as used
    pub ignored: BTreeMap<String, bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            declarations: true,
            imports: true,
            ignored: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load an options object from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        serde_json::from_str(&content).map_err(|err| Error::config(path, err.to_string()))
    }

    fn reports(&self, kind: BindingKind) -> bool {
        kind.is_reportable()
            && if kind.is_import() {
                self.imports
            } else {
                self.declarations
            }
    }

    /// Parse `source` and find its unused declarations
    pub fn analyze(&self, source: &str, dialect: Dialect) -> Result<Vec<DeadCode>> {
        let module = parse(source, dialect)?;
        self.find_dead_code(&module, source, dialect)
    }

    /// Find unused declarations in an already parsed `module` of `source`,
    /// ordered by position
    pub fn find_dead_code(&self, module: &Module, source: &str, dialect: Dialect) -> Result<Vec<DeadCode>> {
        let _span = tracing::debug_span!("find_dead_code", len = source.len(), ?dialect).entered();

        let ambient = dialect == Dialect::Declarations;
        let (tree, occurrences) = collect(module, source.len(), ambient);
        check_ranges(&tree, source)?;
        debug!(
            scopes = tree.scopes().len(),
            bindings = tree.bindings().len(),
            occurrences = occurrences.len(),
            "indexed"
        );

        let resolved = classify(&tree, occurrences, &self.ignored);
        let usages = aggregate(&tree, resolved, &self.ignored);
        let mut fixes = synthesize_fixes(&tree, &usages, source);

        let mut results = tree
            .bindings()
            .iter()
            .zip(&usages)
            .filter(|(binding, usage)| !usage.used && self.reports(binding.kind))
            .map(|(binding, _)| DeadCode {
                name: binding.name.clone(),
                kind: binding.kind,
                range: binding.range,
                fix: fixes[binding.id.index()].take(),
            })
            .collect::<Vec<_>>();
        results.sort_unstable_by_key(|result| result.range.start());
        debug!(dead = results.len(), "analyzed");
        Ok(results)
    }
}

/// Every binding must point at a name inside the source text, otherwise
/// shadowing cannot be trusted
fn check_ranges(tree: &ScopeTree, source: &str) -> Result<()> {
    for binding in tree.bindings() {
        let range: Range<usize> = binding.range.into();
        if source.get(range).map_or(true, str::is_empty) {
            return Err(Error::Malformed {
                message: format!("binding {} has no name at {:?}", binding.name, binding.range),
            });
        }
    }
    Ok(())
}
