//! Prefix-scoped flat store of environment-style key/value pairs.
//!
//! Keys are held upper-case and without the application prefix. The prefix
//! is reattached only when rendering the external `PREFIX_KEY=value` view, so
//! traversal code never has to know which application it runs for.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{trace, warn};
use uncased::{Uncased, UncasedStr};

/// Normalize an application prefix.
///
/// Dashes become underscores, ASCII letters are upper-cased, and a trailing
/// `_` separator is appended to non-empty prefixes. Normalizing twice yields
/// the same result.
///
/// # Examples
///
/// ```
/// use envmate::normalize_prefix;
///
/// assert_eq!(normalize_prefix("my-app"), "MY_APP_");
/// assert_eq!(normalize_prefix("MY_APP_"), "MY_APP_");
/// assert_eq!(normalize_prefix(""), "");
/// ```
#[must_use]
pub fn normalize_prefix(prefix: &str) -> String {
    let mut normalized = prefix.replace('-', "_").to_ascii_uppercase();
    if !normalized.is_empty() && !normalized.ends_with('_') {
        normalized.push('_');
    }
    normalized
}

/// A single stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    key: String,
    value: String,
}

impl EnvEntry {
    /// Normalized key without the application prefix.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw stored text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Flat, case-insensitive key/value store scoped to one prefix.
///
/// # Examples
///
/// ```
/// use envmate::EnvStore;
///
/// let store = EnvStore::from_environ("app", ["APP_PORT=8080", "HOME=/root"]);
/// assert_eq!(store.get("port").map(|entry| entry.value()), Some("8080"));
/// assert_eq!(store.render(), "APP_PORT=8080\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvStore {
    prefix: String,
    entries: BTreeMap<Uncased<'static>, EnvEntry>,
}

impl EnvStore {
    /// Creates an empty store for `prefix` (normalized with
    /// [`normalize_prefix`]).
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: normalize_prefix(prefix),
            entries: BTreeMap::new(),
        }
    }

    /// Builds a store from `KEY=VALUE` strings such as those of a process
    /// environment.
    ///
    /// The first `=` separates key from value and items without one are
    /// skipped. Only keys starting with the prefix (in any casing) are kept,
    /// with the prefix stripped.
    pub fn from_environ<I, S>(prefix: &str, environ: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new(prefix);
        for item in environ {
            let Some((key, value)) = item.as_ref().split_once('=') else {
                continue;
            };
            store.insert_prefixed(key, value);
        }
        store
    }

    /// Builds a store from already split `(key, value)` pairs, applying the
    /// same prefix filtering as [`EnvStore::from_environ`].
    pub fn from_pairs<I, K, V>(prefix: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut store = Self::new(prefix);
        for (key, value) in pairs {
            store.insert_prefixed(key.as_ref(), value);
        }
        store
    }

    /// Snapshots the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped with a
    /// warning.
    #[must_use]
    pub fn from_process_env(prefix: &str) -> Self {
        let mut store = Self::new(prefix);
        for (key, value) in std::env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => store.insert_prefixed(&key, value),
                (key, _) => warn!(
                    key = ?key,
                    "skipping environment variable that is not valid UTF-8"
                ),
            }
        }
        store
    }

    fn insert_prefixed(&mut self, key: &str, value: impl Into<String>) {
        if !UncasedStr::new(key).starts_with(&self.prefix) {
            return;
        }
        if let Some(rest) = key.get(self.prefix.len()..) {
            self.set(rest, value);
        }
    }

    /// Normalized application prefix, including its trailing `_`.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Stores `value` under `key`, replacing any entry with the same key in
    /// any casing.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let normalized = key.to_ascii_uppercase();
        trace!(key = %normalized, "storing entry");
        self.entries.insert(
            Uncased::from(normalized.clone()),
            EnvEntry {
                key: normalized,
                value: value.into(),
            },
        );
    }

    /// Looks up `key` in any casing. Absence is a normal outcome.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&EnvEntry> {
        self.entries.get(UncasedStr::new(key))
    }

    /// Infers the length of the sequence stored at `path`.
    ///
    /// Every key of the form `PATH_<index>` or `PATH_<index>_...` counts,
    /// where `<index>` is a run of ASCII digits. At the root (`path` empty)
    /// the index is the first token of the key. Returns the highest index
    /// plus one, or `0` when no key matched.
    ///
    /// # Examples
    ///
    /// ```
    /// use envmate::EnvStore;
    ///
    /// let store = EnvStore::from_pairs("", [("ITEMS_0", "a"), ("ITEMS_2", "c")]);
    /// assert_eq!(store.infer_len("ITEMS"), 3);
    /// assert_eq!(store.infer_len("OTHER"), 0);
    /// ```
    #[must_use]
    pub fn infer_len(&self, path: &str) -> usize {
        let normalized = path.to_ascii_uppercase();
        self.entries
            .values()
            .filter_map(|entry| index_under(&entry.key, &normalized))
            .filter_map(|index| index.checked_add(1))
            .max()
            .unwrap_or(0)
    }

    /// Full external key of `entry`, prefix included.
    #[must_use]
    pub fn full_key(&self, entry: &EnvEntry) -> String {
        format!("{}{}", self.prefix, entry.key)
    }

    /// Renders one `PREFIX_KEY=value` line per entry, sorted by full key.
    #[must_use]
    pub fn render(&self) -> String {
        self.iter().fold(String::new(), |mut out, entry| {
            out.push_str(&self.prefix);
            out.push_str(&entry.key);
            out.push('=');
            out.push_str(&entry.value);
            out.push('\n');
            out
        })
    }

    /// Iterates over entries in byte order of their keys, the order
    /// [`render`](Self::render) writes them in.
    ///
    /// The map itself orders keys case-insensitively, which differs from
    /// byte order around `_` (`A_B` folds before `AB`).
    pub fn iter(&self) -> impl Iterator<Item = &EnvEntry> + '_ {
        let mut entries: Vec<&EnvEntry> = self.entries.values().collect();
        entries.sort_unstable_by(|left, right| left.key.cmp(&right.key));
        entries.into_iter()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extracts the sequence index of `key` directly below `path`.
fn index_under(key: &str, path: &str) -> Option<usize> {
    let rest = if path.is_empty() {
        key
    } else {
        key.strip_prefix(path)?.strip_prefix('_')?
    };
    let token = rest.split('_').next()?;
    if token.is_empty() || !token.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

impl fmt::Display for EnvStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<K, V> Extend<(K, V)> for EnvStore
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key.as_ref(), value);
        }
    }
}
