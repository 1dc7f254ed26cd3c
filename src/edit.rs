use rowan::{TextRange, TextSize};

use crate::{
    binding::{Binding, DeclaratorItem, GroupShape, RemovalUnit},
    dead_code::DeadCode,
    scope::ScopeTree,
    usage::Usage,
};

/// Replace `range` of the source with `replacement`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edit {
    pub range: TextRange,
    pub replacement: String,
}

impl Edit {
    fn delete(start: usize, end: usize) -> Self {
        Edit {
            range: TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32)),
            replacement: String::new(),
        }
    }
}

/// Applies edits sorted by position. Duplicates are applied once and edits
/// overlapping an earlier one are skipped.
pub fn apply_edits<'a>(src: &str, edits: impl Iterator<Item = &'a Edit>) -> String {
    let mut pos = 0;
    let mut result = String::with_capacity(src.len());
    for edit in edits {
        let start = usize::from(edit.range.start());
        let end = usize::from(edit.range.end());
        if pos <= start {
            result.push_str(&src[pos..start]);
            result.push_str(&edit.replacement);
            pos = end;
        }
    }
    result.push_str(&src[pos..]);
    result
}

/// Deletes all fixable `dead` declarations from `original`
pub fn edit_dead_code(original: &str, dead: impl Iterator<Item = DeadCode>) -> String {
    let mut edits = dead.filter_map(|dead_code| dead_code.fix).collect::<Vec<_>>();
    edits.sort_unstable_by_key(|edit| (edit.range.start(), edit.range.end()));
    edits.dedup();
    apply_edits(original, edits.iter())
}

/// Computes the fix of every unused binding, indexed by binding id
pub fn synthesize_fixes(tree: &ScopeTree, usages: &[Usage], source: &str) -> Vec<Option<Edit>> {
    tree.bindings()
        .iter()
        .zip(usages)
        .map(|(binding, usage)| {
            if usage.used {
                None
            } else {
                fix(tree, usages, binding, source)
            }
        })
        .collect()
}

fn fix(tree: &ScopeTree, usages: &[Usage], binding: &Binding, source: &str) -> Option<Edit> {
    match binding.removal {
        RemovalUnit::None => None,
        RemovalUnit::Statement(range) => Some(statement_edit(source, range)),
        RemovalUnit::Declarator { index } => {
            let GroupShape::Declarators { statement, items } = &tree.group(binding.group).shape else {
                return None;
            };
            let unused = |item: &DeclaratorItem| {
                item.binding
                    .map_or(false, |id| !usages[id.index()].used)
            };

            if items.iter().all(unused) {
                // every declarator goes, so does the statement
                return Some(statement_edit(source, *statement));
            }

            let item = items.get(index)?;
            if items[index + 1..].iter().any(|item| !unused(item)) {
                // up to the next declarator, taking the following comma
                let next = items[index + 1];
                Some(Edit::delete(
                    usize::from(item.range.start()),
                    usize::from(next.range.start()),
                ))
            } else {
                // from the previous declarator, taking the preceding comma
                let prev = items.get(index.checked_sub(1)?)?;
                Some(Edit::delete(
                    usize::from(prev.range.end()),
                    usize::from(item.range.end()),
                ))
            }
        }
    }
}

/// Deletes a whole statement. A statement alone on its lines is removed
/// together with its indentation and line break.
fn statement_edit(source: &str, range: TextRange) -> Edit {
    let mut start = usize::from(range.start());
    let mut end = usize::from(range.end());
    if source[end..].starts_with(';') {
        end += 1;
    }

    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[end..].find('\n').map_or(source.len(), |i| end + i + 1);
    if source[line_start..start].trim().is_empty() && source[end..line_end].trim().is_empty() {
        start = line_start;
        end = line_end;
    }

    Edit::delete(start, end)
}
