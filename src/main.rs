use std::{
    fs,
    path::{Path, PathBuf},
    process::exit,
};

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use deadts::{edit_dead_code, report, Dialect, Error, Settings};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| {
            (name.starts_with('.') && name != "." && name != "..") || name == "node_modules"
        })
}

/// Source files below `path`, or `path` itself if it is a file
fn source_files(path: &Path, hidden: bool) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    WalkDir::new(path)
        .into_iter()
        .filter_entry(|entry| hidden || entry.depth() == 0 || !is_hidden(entry.path()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(%err, "cannot walk");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && Dialect::from_path(entry.path()).is_some())
        .map(|entry| entry.into_path())
        .collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("deadts")
        .about("Find unused declarations in TypeScript and JavaScript files")
        .arg(
            Arg::new("NO_DECLARATIONS")
                .long("no-declarations")
                .action(ArgAction::SetTrue)
                .help("Don't report variables, functions, classes and types"),
        )
        .arg(
            Arg::new("NO_IMPORTS")
                .long("no-imports")
                .action(ArgAction::SetTrue)
                .help("Don't report import bindings"),
        )
        .arg(
            Arg::new("IGNORE")
                .short('i')
                .long("ignore")
                .value_name("NAME")
                .action(ArgAction::Append)
                .help("Treat NAME as used, e.g. an implicitly used JSX factory"),
        )
        .arg(
            Arg::new("CONFIG")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("JSON options file with `declarations`, `imports` and `ignored`"),
        )
        .arg(
            Arg::new("HIDDEN")
                .short('H')
                .long("hidden")
                .action(ArgAction::SetTrue)
                .help("Recurse into hidden subdirectories and node_modules"),
        )
        .arg(
            Arg::new("EDIT")
                .short('e')
                .long("edit")
                .action(ArgAction::SetTrue)
                .help("Remove unused declarations where a safe deletion exists"),
        )
        .arg(
            Arg::new("QUIET")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Don't print dead code report"),
        )
        .arg(
            Arg::new("FAIL_ON_REPORTS")
                .short('f')
                .long("fail")
                .action(ArgAction::SetTrue)
                .help("Exit with 1 if unused declarations were found"),
        )
        .arg(
            Arg::new("OUTPUT_FORMAT")
                .short('o')
                .long("output-format")
                .value_parser(["human-readable", "json"])
                .default_value("human-readable")
                .help("Report format"),
        )
        .arg(
            Arg::new("FILE_PATHS")
                .num_args(1..)
                .default_value(".")
                .help("Files or directories to scan"),
        )
        .get_matches();

    let mut settings = match matches.get_one::<String>("CONFIG") {
        Some(path) => Settings::load(Path::new(path))?,
        None => Settings::default(),
    };
    if matches.get_flag("NO_DECLARATIONS") {
        settings.declarations = false;
    }
    if matches.get_flag("NO_IMPORTS") {
        settings.imports = false;
    }
    for name in matches.get_many::<String>("IGNORE").into_iter().flatten() {
        settings.ignored.insert(name.clone(), true);
    }
    debug!(?settings, "settings");

    let hidden = matches.get_flag("HIDDEN");
    let edit = matches.get_flag("EDIT");
    let quiet = matches.get_flag("QUIET");
    let json = matches
        .get_one::<String>("OUTPUT_FORMAT")
        .map_or(false, |format| format == "json");

    let mut dead_found = false;
    for file_path in matches.get_many::<String>("FILE_PATHS").into_iter().flatten() {
        for file in source_files(Path::new(file_path), hidden) {
            let dialect = match Dialect::for_file(&file) {
                Ok(dialect) => dialect,
                Err(err) => {
                    warn!(%err, "skipping file");
                    continue;
                }
            };
            let content = match fs::read_to_string(&file) {
                Ok(content) => content,
                Err(err) => {
                    let err = Error::io(&file, err);
                    warn!(%err, "skipping file");
                    continue;
                }
            };
            let results = match settings.analyze(&content, dialect) {
                Ok(results) => results,
                Err(err) => {
                    warn!(file = %file.display(), %err, "skipping file");
                    continue;
                }
            };
            if results.is_empty() {
                continue;
            }
            dead_found = true;

            let file_name = file.display().to_string();
            if !quiet {
                if json {
                    report::print_json(&file_name, &content, &results)?;
                } else {
                    report::print(file_name.clone(), &content, &results)?;
                }
            }
            if edit {
                let new_content = edit_dead_code(&content, results.into_iter());
                fs::write(&file, new_content)
                    .with_context(|| format!("writing {}", file_name))?;
            }
        }
    }

    if dead_found && matches.get_flag("FAIL_ON_REPORTS") {
        exit(1);
    }
    Ok(())
}
