//! Alias table: maps input words to a registration.
//!
//! Entries live in three buckets:
//!
//! - `literals`: paths with no grammar (`spawn`, `warp list`);
//! - `children`: paths followed by a grammar (`tp <player>`, `warp set <name>`);
//! - `parents`: bare class aliases that fall through to a parent runner.
//!
//! Resolution is longest-prefix: the most words that match a literal or child
//! path win, and a parent entry is only used when no deeper path matches.

use super::registration::{ClassCommandRegistration, CommandRegistration};
use cmdgate_usage::Usage;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Which bucket an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Literal,
    Child,
    Parent,
}

/// One resolvable path.
pub struct TableEntry {
    kind: EntryKind,
    alias: String,
    usage: Usage,
    registration: Arc<CommandRegistration>,
}

impl TableEntry {
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Literal path as registered, e.g. `warp list`.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Grammar reachable under this path.
    pub fn usage(&self) -> &Usage {
        &self.usage
    }

    pub fn registration(&self) -> &Arc<CommandRegistration> {
        &self.registration
    }

    /// Table key, e.g. `warp set <name>` or `*warp`.
    pub fn key(&self) -> String {
        match self.kind {
            EntryKind::Parent => format!("*{}", self.usage),
            _ => self.usage.to_string(),
        }
    }
}

/// Outcome of a successful lookup.
pub struct Resolution {
    pub entry: Arc<TableEntry>,
    /// Number of input words consumed by the path.
    pub consumed: usize,
}

/// Immutable alias lookup structure, rebuilt on every reload.
pub struct AliasTable {
    literals: HashMap<String, Arc<TableEntry>>,
    children: HashMap<String, Arc<TableEntry>>,
    parents: HashMap<String, Arc<TableEntry>>,
    depth: usize,
    case_sensitive: bool,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::new(false)
    }
}

impl AliasTable {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            literals: HashMap::new(),
            children: HashMap::new(),
            parents: HashMap::new(),
            depth: 0,
            case_sensitive,
        }
    }

    fn normalize(&self, word: &str) -> String {
        if self.case_sensitive {
            word.to_string()
        } else {
            word.to_lowercase()
        }
    }

    fn path_key<'a, I>(&self, words: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        words
            .into_iter()
            .map(|w| self.normalize(w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Add every alias of a single-method command.
    pub fn insert_single(&mut self, registration: &Arc<CommandRegistration>) {
        for alias in registration.aliases() {
            let usage = registration.usage().with_path(alias.split_whitespace());
            let kind = if usage.is_literal() {
                EntryKind::Literal
            } else {
                EntryKind::Child
            };
            self.insert(kind, alias.clone(), usage, Arc::clone(registration));
        }
    }

    /// Add a class command: `A S` for every top alias and subcommand alias,
    /// plus a parent entry per top alias.
    pub fn insert_class(&mut self, class: &Arc<ClassCommandRegistration>) {
        let runner = class.parent_runner();
        for top in class.root().aliases() {
            for sub in class.subcommands() {
                for sub_alias in sub.aliases().iter().filter(|a| !a.is_empty()) {
                    let alias = format!("{top} {sub_alias}");
                    let usage = sub.usage().with_path(alias.split_whitespace());
                    self.insert(EntryKind::Child, alias, usage, Arc::clone(sub));
                }
            }
            let usage = runner.usage().with_path(top.split_whitespace());
            self.insert(EntryKind::Parent, top.clone(), usage, Arc::clone(runner));
        }
    }

    fn insert(
        &mut self,
        kind: EntryKind,
        alias: String,
        usage: Usage,
        registration: Arc<CommandRegistration>,
    ) {
        let key = self.path_key(alias.split_whitespace());
        self.depth = self.depth.max(usage.path().len());
        let entry = Arc::new(TableEntry {
            kind,
            alias,
            usage,
            registration,
        });

        let replaced = match kind {
            EntryKind::Parent => self.parents.insert(key.clone(), entry),
            EntryKind::Literal => {
                let old = self.children.remove(&key);
                self.literals.insert(key.clone(), entry).or(old)
            }
            EntryKind::Child => {
                let old = self.literals.remove(&key);
                self.children.insert(key.clone(), entry).or(old)
            }
        };
        if let Some(old) = replaced {
            warn!(
                alias = %key,
                previous = %old.registration.template(),
                "duplicate alias path; last registration wins"
            );
        }

        let shadow = match kind {
            EntryKind::Parent => self.literals.get(&key).or_else(|| self.children.get(&key)),
            EntryKind::Literal | EntryKind::Child => self.parents.get(&key),
        };
        if let Some(other) = shadow {
            warn!(
                alias = %key,
                other = %other.registration.template(),
                "alias path hides a class parent runner"
            );
        }
    }

    /// Find the entry for `words`, preferring the longest matching path.
    pub fn resolve(&self, words: &[&str]) -> Option<Resolution> {
        let max = words.len().min(self.depth);
        for n in (1..=max).rev() {
            let key = self.path_key(words[..n].iter().copied());
            let hit = self
                .literals
                .get(&key)
                .or_else(|| self.children.get(&key))
                .or_else(|| self.parents.get(&key));
            if let Some(entry) = hit {
                return Some(Resolution {
                    entry: Arc::clone(entry),
                    consumed: n,
                });
            }
        }
        None
    }

    /// Total number of resolvable paths.
    pub fn len(&self) -> usize {
        self.literals.len() + self.children.len() + self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Class parent paths that a literal or child path also claims.
    ///
    /// Resolution prefers the literal or child, so the parent runner is
    /// unreachable under these keys.
    pub fn shadowed_parents(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .parents
            .keys()
            .filter(|k| self.literals.contains_key(*k) || self.children.contains_key(*k))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Every entry, sorted by key.
    pub fn entries(&self) -> Vec<Arc<TableEntry>> {
        let mut all: Vec<_> = self
            .literals
            .values()
            .chain(self.children.values())
            .chain(self.parents.values())
            .cloned()
            .collect();
        all.sort_by_key(|e| e.key());
        all
    }
}
