//! Scan TypeScript and JavaScript files for unused declarations.

mod binding;
mod collect;
mod dead_code;
mod edit;
mod edit_tests;
pub mod error;
pub mod parse;
pub mod report;
mod scope;
mod usage;

pub use binding::{
    Binding, BindingId, BindingKind, DeclaratorItem, GroupId, GroupShape, RemovalUnit, SiblingGroup,
};
pub use collect::collect;
pub use dead_code::{DeadCode, Settings};
pub use edit::{apply_edits, edit_dead_code, Edit};
pub use error::{Error, Result};
pub use parse::Dialect;
pub use scope::{Scope, ScopeId, ScopeKind, ScopeTree};
pub use usage::{aggregate, classify, Occurrence, Role, Usage};
