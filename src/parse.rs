//! Glue to the swc parser: source text in, `Module` with byte spans out.

use std::path::Path;

use rowan::{TextRange, TextSize};
use swc_core::{
    common::{BytePos, Span, Spanned},
    ecma::{
        ast::Module,
        parser::{error::Error as SyntaxError, Parser, StringInput, Syntax, TsSyntax},
    },
};

use crate::error::{Error, Result};

// swc reserves `BytePos(0)` for dummy spans
const BASE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    TypeScript,
    /// TypeScript with JSX, also used for plain JavaScript
    Tsx,
    /// Declaration files; every top-level declaration is visible to importers
    Declarations,
}

impl Dialect {
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let ext = path.extension()?.to_str()?;
        match ext {
            "ts" | "mts" | "cts" if stem.ends_with(".d") => Some(Dialect::Declarations),
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" | "js" | "jsx" | "mjs" | "cjs" => Some(Dialect::Tsx),
            _ => None,
        }
    }

    /// Like [`Dialect::from_path`], for files the user named explicitly
    pub fn for_file(path: &Path) -> Result<Self> {
        Self::from_path(path).ok_or_else(|| Error::UnsupportedFile {
            path: path.to_path_buf(),
        })
    }
}

pub fn parse(source: &str, dialect: Dialect) -> Result<Module> {
    let syntax = Syntax::Typescript(TsSyntax {
        tsx: dialect == Dialect::Tsx,
        dts: dialect == Dialect::Declarations,
        decorators: true,
        ..Default::default()
    });
    let end = BASE + source.len() as u32;
    let input = StringInput::new(source, BytePos(BASE), BytePos(end));
    let mut parser = Parser::new(syntax, input, None);

    let module = parser.parse_module().map_err(|err| syntax_error(&err))?;
    if let Some(err) = parser.take_errors().first() {
        return Err(syntax_error(err));
    }
    Ok(module)
}

fn syntax_error(err: &SyntaxError) -> Error {
    Error::Parse {
        message: err.kind().msg().to_string(),
        offset: usize::from(text_range(err.span()).start()),
    }
}

/// Zero-based byte range of a span produced by [`parse`]
pub fn text_range(span: Span) -> TextRange {
    let start = span.lo.0.saturating_sub(BASE);
    let end = span.hi.0.saturating_sub(BASE).max(start);
    TextRange::new(TextSize::from(start), TextSize::from(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_by_extension() {
        assert_eq!(Dialect::from_path(Path::new("a/b.ts")), Some(Dialect::TypeScript));
        assert_eq!(Dialect::from_path(Path::new("b.d.ts")), Some(Dialect::Declarations));
        assert_eq!(Dialect::from_path(Path::new("b.d.mts")), Some(Dialect::Declarations));
        assert_eq!(Dialect::from_path(Path::new("App.tsx")), Some(Dialect::Tsx));
        assert_eq!(Dialect::from_path(Path::new("index.mjs")), Some(Dialect::Tsx));
        assert_eq!(Dialect::from_path(Path::new("README.md")), None);
    }

    #[test]
    fn unsupported_file() {
        let err = Dialect::for_file(Path::new("notes.txt")).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file type: notes.txt");
    }

    #[test]
    fn spans_are_zero_based() {
        let module = parse("const a = 1;", Dialect::TypeScript).expect("parse");
        let range = text_range(module.span);
        assert_eq!(usize::from(range.start()), 0);
        assert_eq!(usize::from(range.end()), 12);
    }

    #[test]
    fn syntax_errors_are_fatal() {
        let err = parse("const = ;", Dialect::TypeScript).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
