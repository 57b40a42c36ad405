use std::path::{Component, Path, PathBuf};

use crate::error::{Result, SnippetError};
use crate::parser::names::split_identifier_list;
use crate::store::SnippetStore;

/// Directory snippets are kept in when none is configured.
pub const DEFAULT_SNIPPETS_DIR: &str = "snipsql-snippets";

/// File extension of snippet files.
pub const SNIPPET_EXTENSION: &str = "sql";

/// Leading comment that declares a snippet's dependencies in its file.
pub const WITH_HEADER: &str = "-- with:";

/// Path of the file holding snippet `name` inside `dir`.
pub fn snippet_path(dir: &Path, name: &str) -> Result<PathBuf> {
    validate_file_name(name)?;
    Ok(dir.join(format!("{name}.{SNIPPET_EXTENSION}")))
}

/// Write one snippet to `<dir>/<name>.sql`.
///
/// With `Some(with)` the body is preceded by a `-- with: a, b` line so the
/// declared dependencies survive a reload; with `None` only the body is
/// written and dependencies are inferred again on load.
pub fn save_snippet(
    dir: &Path,
    name: &str,
    body: &str,
    with: Option<&[String]>,
) -> Result<PathBuf> {
    let path = snippet_path(dir, name)?;
    std::fs::create_dir_all(dir).map_err(|e| SnippetError::io(dir, e))?;
    let contents = match with {
        Some(with) => format!("{WITH_HEADER} {}\n{body}", with.join(", ")),
        None => body.to_string(),
    };
    std::fs::write(&path, contents).map_err(|e| SnippetError::io(&path, e))?;

    tracing::warn!(
        path = %path.display(),
        "manual edits to snippet files are only picked up on the next load; \
         prefer editing snippets through snipsql"
    );
    Ok(path)
}

/// Write every snippet in `store` to `dir`, in store order. Non-empty
/// dependency lists are written as a `-- with:` line.
pub fn save_store(dir: &Path, store: &SnippetStore) -> Result<Vec<PathBuf>> {
    store
        .iter()
        .map(|(name, query)| {
            let with = Some(query.with()).filter(|with| !with.is_empty());
            save_snippet(dir, name, query.body(), with)
        })
        .collect()
}

/// Remove the file for `name`. Returns `false` when there was none.
pub fn delete_snippet(dir: &Path, name: &str) -> Result<bool> {
    let path = snippet_path(dir, name)?;
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(SnippetError::io(&path, e)),
    }
}

/// Load every `*.sql` file in `dir` into `store`.
///
/// Files are read in file-name order. A leading `-- with:` line declares the
/// snippet's dependencies; without one they are inferred from the body once
/// every body is registered, so a snippet may reference one whose file sorts
/// after it. Files whose name is not a valid snippet identifier are skipped
/// with a warning. A missing directory loads nothing. Returns the loaded names.
pub fn load_snippets(dir: &Path, store: &mut SnippetStore) -> Result<Vec<String>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "no snippets directory");
            return Ok(Vec::new());
        }
        Err(e) => return Err(SnippetError::io(dir, e)),
    };

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SnippetError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == SNIPPET_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut loaded = Vec::with_capacity(paths.len());
    for path in &paths {
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            tracing::warn!(path = %path.display(), "skipping snippet file with non UTF-8 name");
            continue;
        };
        if let Err(error) = validate_file_name(name) {
            tracing::warn!(path = %path.display(), %error, "skipping snippet file");
            continue;
        }
        let contents = std::fs::read_to_string(path).map_err(|e| SnippetError::io(path, e))?;
        let (declared, body) = split_declared(&contents);
        store.store(name, body, None)?;
        loaded.push((name.to_string(), body.to_string(), declared));
    }

    for (name, body, declared) in &loaded {
        let with = match declared {
            Some(with) => with.clone(),
            None => store.infer_dependencies(body, Some(name.as_str())),
        };
        if let Err(error) = store.store(name, body.as_str(), Some(with)) {
            tracing::warn!(snippet = %name, %error, "ignoring declared dependencies");
        }
    }

    tracing::debug!(dir = %dir.display(), count = loaded.len(), "loaded snippets");
    Ok(loaded.into_iter().map(|(name, _, _)| name).collect())
}

/// Split an optional leading `-- with: a, b` line off a snippet file.
fn split_declared(contents: &str) -> (Option<Vec<String>>, &str) {
    let Some(rest) = contents.strip_prefix(WITH_HEADER) else {
        return (None, contents);
    };
    let (line, body) = rest.split_once('\n').unwrap_or((rest, ""));
    (Some(split_identifier_list(line.trim_end_matches('\r'))), body)
}

fn validate_file_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| -> Result<()> {
        Err(SnippetError::InvalidFileName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.trim().is_empty() {
        return invalid("name must not be empty");
    }
    let candidate = Path::new(name);
    if candidate.is_absolute() {
        return invalid("absolute paths are not allowed");
    }
    if candidate.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    }) {
        return invalid("traversal segments are not allowed");
    }
    if name.contains('/') || name.contains('\\') {
        return invalid("path separators are not allowed");
    }
    crate::store::names::validate_snippet_name(name)
}
