#![cfg(test)]

use crate::{dead_code::Settings, parse::Dialect};

fn run(content: &str) -> String {
    let results = Settings::default()
        .analyze(content, Dialect::Tsx)
        .expect("analyze");
    crate::edit::edit_dead_code(content, results.into_iter())
}

macro_rules! no_edits {
    ($s: expr) => {
        let s = $s.to_string();
        assert_eq!(run(&s), s);
    };
}

#[test]
fn const_alive() {
    no_edits!("const alive = 23;\nconsole.log(alive);");
}

#[test]
fn const_dead() {
    let results = run("const dead = 23;\nconsole.log(42);");
    assert_eq!(results, "console.log(42);");
}

#[test]
fn const_dead_same_line() {
    let results = run("const dead = 23; console.log(42);");
    assert_eq!(results, " console.log(42);");
}

#[test]
fn unused_variables() {
    let results = run("// unused variables\nconst a = \"a\";\nlet b = \"b\";\nvar c = \"c\";\n");
    assert_eq!(results, "// unused variables\n");
}

#[test]
fn reassigned() {
    let results = run("const a = \"a\";\nlet b = \"b\";\nvar c = \"c\";\n\nb = a;\nc = a;\n");
    assert_eq!(results, "const a = \"a\";\n\nb = a;\nc = a;\n");
}

#[test]
fn declarator_dead_middle() {
    let results = run("let a = 1, dead = 2, b = 3;\nconsole.log(a, b);");
    assert_eq!(results, "let a = 1, b = 3;\nconsole.log(a, b);");
}

#[test]
fn declarator_dead_first() {
    let results = run("let dead = 1, alive = 2;\nconsole.log(alive);");
    assert_eq!(results, "let alive = 2;\nconsole.log(alive);");
}

#[test]
fn declarator_dead_last() {
    let results = run("let alive = 1, dead = 2;\nconsole.log(alive);");
    assert_eq!(results, "let alive = 1;\nconsole.log(alive);");
}

#[test]
fn declarator_dead_trailing_pair() {
    let results = run("let alive = 1, dead1 = 2, dead2 = 3;\nconsole.log(alive);");
    assert_eq!(results, "let alive = 1;\nconsole.log(alive);");
}

#[test]
fn declarator_all_dead() {
    let results = run("let dead1 = 1, dead2 = 2;\nconsole.log(0);");
    assert_eq!(results, "console.log(0);");
}

#[test]
fn declarator_with_destructuring_sibling() {
    let results = run("const { a } = o, dead = 1;\nconsole.log(a);");
    assert_eq!(results, "const { a } = o;\nconsole.log(a);");
}

#[test]
fn function_dead() {
    let results = run("function dead(): void {}\nconsole.log(1);");
    assert_eq!(results, "console.log(1);");
}

#[test]
fn function_dead_nested() {
    let results = run("function dead() {\n  const inner = 1;\n}\nconsole.log(1);");
    assert_eq!(results, "console.log(1);");
}

#[test]
fn function_alive_inner_dead() {
    let results = run("export function alive() {\n  const inner = 1;\n  return 2;\n}");
    assert_eq!(results, "export function alive() {\n  return 2;\n}");
}

#[test]
fn overloads_dead() {
    let results = run(
        "function dead(x: string): void;\nfunction dead(x: number): void;\nfunction dead(x: any): void {}\nconsole.log(1);",
    );
    assert_eq!(results, "console.log(1);");
}

#[test]
fn overloads_alive() {
    no_edits!("function alive(x: string): void;\nfunction alive(x: any): void {}\nalive(\"a\");");
}

#[test]
fn class_dead_indented() {
    let results = run("{\n  class Dead {}\n  console.log(1);\n}");
    assert_eq!(results, "{\n  console.log(1);\n}");
}

#[test]
fn types_dead() {
    let results = run("interface Dead {}\ntype AlsoDead = {};\nenum Gone { A }\nconsole.log(1);");
    assert_eq!(results, "console.log(1);");
}

#[test]
fn destructuring_dead() {
    no_edits!("const { dead } = o;\nconst [gone] = list;");
}

#[test]
fn imports_dead() {
    no_edits!("import { dead } from \"./x\";\nimport gone, { also } from \"./y\";");
}

#[test]
fn exported_dead() {
    no_edits!("export const dead = 1;\nexport function gone() {}");
}

#[test]
fn namespace_dead() {
    no_edits!("namespace Dead { const inner = 1; export const a = inner; }");
}

#[test]
fn for_head() {
    no_edits!("for (let i = 0; ; ) { break; }");
}

#[test]
fn nested_statement() {
    no_edits!("if (Math.random()) var dead = 1;");
}

#[test]
fn template_literal_type() {
    no_edits!("type Name = \"a\" | \"b\";\nexport type Key = `prefix-${Name}`;\n");
}

#[test]
fn accessor_computed_key() {
    no_edits!("const key = \"k\";\nexport class A {\n  accessor [key] = 1;\n}\n");
}

#[test]
fn ambient_module() {
    no_edits!("declare module \"foo\" {\n  interface Options {}\n}\n");
}

#[test]
fn parameter_default_outer() {
    let results = run("const y = 1;\nconst dead = 2;\nexport function f(a = y) {\n  const y = 2;\n  return a + y;\n}");
    assert_eq!(results, "const y = 1;\nexport function f(a = y) {\n  const y = 2;\n  return a + y;\n}");
}

#[test]
fn idempotent() {
    let content = r#"
import { a } from "./letters";
let alive = 1, dead = 2;
function gone(): void {}
class Old {}
const { part } = alive as any;
console.log(alive);
"#;
    let once = run(content);
    assert_eq!(run(&once), once);
    let results = Settings::default()
        .analyze(&once, Dialect::Tsx)
        .expect("analyze");
    assert!(results.iter().all(|result| result.fix.is_none()));
    assert_eq!(
        results.iter().map(|result| result.name.as_str()).collect::<Vec<_>>(),
        vec!["a", "part"]
    );
}
