use std::collections::{HashMap, HashSet};

use crate::error::{Result, SnippetError};
use crate::store::SnippetStore;

/// Every name `key` transitively depends on, dependencies first, each once.
///
/// For each declared dependency its own dependencies come before it, so a
/// chain `a -> b -> c` yields `[c, b]`.
pub fn dependencies_for(store: &SnippetStore, key: &str) -> Result<Vec<String>> {
    Closures::new(store).of(key)
}

/// Dependency closures computed during one resolution, keyed by snippet name.
struct Closures<'s> {
    store: &'s SnippetStore,
    done: HashMap<String, Vec<String>>,
    path: Vec<String>,
}

impl<'s> Closures<'s> {
    fn new(store: &'s SnippetStore) -> Self {
        Self {
            store,
            done: HashMap::new(),
            path: Vec::new(),
        }
    }

    fn of(&mut self, key: &str) -> Result<Vec<String>> {
        if let Some(closure) = self.done.get(key) {
            return Ok(closure.clone());
        }
        if let Some(start) = self.path.iter().position(|seen| seen == key) {
            let mut cycle = self.path[start..].to_vec();
            cycle.push(key.to_string());
            return Err(SnippetError::CyclicDependency { path: cycle });
        }

        let store = self.store;
        let declared = store.get(key)?.with();
        self.path.push(key.to_string());
        let nested = declared
            .iter()
            .map(|dep| self.of(dep))
            .collect::<Result<Vec<_>>>();
        self.path.pop();

        let mut deps = flatten(nested?);
        deps.extend(declared.iter().cloned());
        let deps = dedup_stable(deps);
        self.done.insert(key.to_string(), deps.clone());
        Ok(deps)
    }
}

/// The dependency closure of `keys`: every name needed to define them, each
/// exactly once, ordered so that a name precedes everything that uses it.
/// The requested keys themselves come last unless something else needs them
/// earlier.
pub fn resolve_dependencies(store: &SnippetStore, keys: &[String]) -> Result<Vec<String>> {
    let mut closures = Closures::new(store);
    let nested = keys
        .iter()
        .map(|key| closures.of(key))
        .collect::<Result<Vec<_>>>()?;

    let mut all = flatten(nested);
    all.extend(keys.iter().cloned());

    let all = dedup_stable(all);
    tracing::debug!(requested = ?keys, resolved = ?all, "resolved snippet dependencies");
    Ok(all)
}

/// Every stored name whose dependency closure includes `key`, in store order.
///
/// Fails if any stored snippet has a cyclic or missing dependency.
pub fn dependents_for(store: &SnippetStore, key: &str) -> Result<Vec<String>> {
    let mut closures = Closures::new(store);
    let mut dependents = Vec::new();
    for name in store.keys() {
        if closures.of(name)?.iter().any(|dep| dep == key) {
            dependents.push(name.to_string());
        }
    }
    Ok(dependents)
}

/// Stored names other than `key` from which `key` can be reached through
/// declared dependencies, in store order.
///
/// Unlike [`dependents_for`] this never fails: cycles are walked once and
/// dependencies that are not stored are skipped.
pub fn reachable_dependents(store: &SnippetStore, key: &str) -> Vec<String> {
    let mut users: HashMap<&str, Vec<&str>> = HashMap::new();
    for (name, query) in store.iter() {
        for dep in query.with() {
            users.entry(dep.as_str()).or_default().push(name);
        }
    }

    let mut seen = HashSet::new();
    let mut pending = vec![key];
    while let Some(current) = pending.pop() {
        for &user in users.get(current).into_iter().flatten() {
            if seen.insert(user) {
                pending.push(user);
            }
        }
    }

    store
        .keys()
        .filter(|name| *name != key && seen.contains(name))
        .map(str::to_string)
        .collect()
}

fn dedup_stable(mut names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names.retain(|name| seen.insert(name.clone()));
    names
}

/// Concatenate a sequence of lists.
pub fn flatten<T>(elements: impl IntoIterator<Item = Vec<T>>) -> Vec<T> {
    elements.into_iter().flatten().collect()
}

/// Drop one trailing semicolon, ignoring trailing whitespace.
///
/// Only the final character is considered: `"SELECT 1;;"` becomes
/// `"SELECT 1;"`. Queries without a trailing semicolon come back untouched.
pub fn remove_trailing_semicolon(query: &str) -> &str {
    query.trim_end().strip_suffix(';').unwrap_or(query)
}
