use std::io;

use ariadne::{sources, Color, Config, Label, Report, ReportKind};
use rowan::TextSize;
use serde::Serialize;

use crate::{binding::BindingKind, dead_code::DeadCode};

fn color(kind: BindingKind) -> Color {
    match kind {
        BindingKind::Import => Color::Magenta,
        BindingKind::Variable | BindingKind::Destructured => Color::Yellow,
        BindingKind::Function | BindingKind::Class => Color::Cyan,
        _ => Color::Blue,
    }
}

/// Converts sorted byte offsets into char offsets in one pass over `content`
struct CharOffsets<'a> {
    chars: std::str::Chars<'a>,
    bytes: usize,
    count: usize,
}

impl<'a> CharOffsets<'a> {
    fn new(content: &'a str) -> Self {
        CharOffsets {
            chars: content.chars(),
            bytes: 0,
            count: 0,
        }
    }

    fn advance_to(&mut self, byte: usize) -> usize {
        while self.bytes < byte {
            match self.chars.next() {
                Some(c) => {
                    self.bytes += usize::from(TextSize::of(c));
                    self.count += 1;
                }
                None => break,
            }
        }
        self.count
    }
}

// assumes results to be sorted by occurrence in file
pub fn print(file: String, content: &str, results: &[DeadCode]) -> io::Result<()> {
    let Some(first) = results.first() else {
        return Ok(());
    };
    let mut offsets = CharOffsets::new(content);
    let first_start = CharOffsets::new(content).advance_to(usize::from(first.range.start()));
    let mut builder = Report::build(ReportKind::Warning, file.clone(), first_start)
        .with_config(Config::default().with_compact(true))
        .with_message("Unused declarations were found.");

    // reverse order to avoid overlapping lanes
    let mut order = results.len();
    for result in results {
        order -= 1;

        let start_char = offsets.advance_to(usize::from(result.range.start()));
        let end_char = offsets.advance_to(usize::from(result.range.end()));

        builder = builder.with_label(
            Label::new((file.clone(), start_char..end_char))
                .with_message(format!("{}", result))
                .with_color(color(result.kind))
                .with_order(order as i32),
        );
    }

    builder.finish().print(sources(vec![(file, content)]))
}

#[derive(Debug, Serialize)]
pub struct JsonFix {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonResult<'a> {
    pub name: &'a str,
    pub kind: &'static str,
    pub line: usize,
    pub column: usize,
    pub end_column: usize,
    pub fix: Option<JsonFix>,
}

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub file: &'a str,
    pub results: Vec<JsonResult<'a>>,
}

/// 1-based line and char column of a byte offset
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

pub fn json_report<'a>(file: &'a str, content: &str, results: &'a [DeadCode]) -> JsonReport<'a> {
    let results = results
        .iter()
        .map(|result| {
            let (line, column) = line_column(content, usize::from(result.range.start()));
            let (_, end_column) = line_column(content, usize::from(result.range.end()));
            JsonResult {
                name: &result.name,
                kind: result.kind.as_str(),
                line,
                column,
                end_column,
                fix: result.fix.as_ref().map(|fix| JsonFix {
                    start: usize::from(fix.range.start()),
                    end: usize::from(fix.range.end()),
                }),
            }
        })
        .collect();
    JsonReport { file, results }
}

pub fn print_json(file: &str, content: &str, results: &[DeadCode]) -> serde_json::Result<()> {
    let report = json_report(file, content, results);
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse::Dialect, Settings};

    #[test]
    fn json_positions() {
        let content = "// ünused\nconst a = 1;\nlet b = 2;\nconsole.log(a);";
        let results = Settings::default()
            .analyze(content, Dialect::TypeScript)
            .expect("analyze");
        let report = json_report("test.ts", content, &results);
        let json = serde_json::to_value(&report).expect("json");
        assert_eq!(json["file"], "test.ts");
        assert_eq!(json["results"][0]["name"], "b");
        assert_eq!(json["results"][0]["kind"], "variable");
        assert_eq!(json["results"][0]["line"], 3);
        assert_eq!(json["results"][0]["column"], 5);
        assert_eq!(json["results"][0]["endColumn"], 6);
        assert!(json["results"][0]["fix"].is_object());
    }

    #[test]
    fn char_offsets_skip_multibyte() {
        let mut offsets = CharOffsets::new("ä = x");
        assert_eq!(offsets.advance_to(2), 1);
        assert_eq!(offsets.advance_to(6), 5);
    }
}
