/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Key resolution.
//!
//! The rewriter looks up the first segment of each key path through a
//! [`KeyResolver`]. Every container shape the formatter accepts (maps, pair
//! lists, positional arguments, a single context value) is adapted to this one
//! trait here, so the state machine exists exactly once.

use std::collections::{BTreeMap, HashMap};

use crate::member::{MemberReader, ReflectMemberReader};
use crate::value::FormatValue;

/// Looks up a value by key.
///
/// Returning `None` means "not found"; the rewriter then tries the fallback
/// resolver, if any, before failing with
/// [`FormatError::KeyNotFound`](crate::FormatError::KeyNotFound).
pub trait KeyResolver {
    /// Resolve a key to a value.
    fn resolve(&self, key: &str) -> Option<FormatValue>;
}

impl<F> KeyResolver for F
where
    F: Fn(&str) -> Option<FormatValue>,
{
    fn resolve(&self, key: &str) -> Option<FormatValue> {
        self(key)
    }
}

/// Resolver backed by an in-memory map with exact key matching.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    entries: HashMap<String, FormatValue>,
}

impl MapResolver {
    /// Create a new empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing any existing value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FormatValue>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Create a resolver from key/value pairs.
    ///
    /// When a key appears more than once, the first pair wins.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<FormatValue>,
    {
        let mut entries = HashMap::new();
        for (key, value) in pairs {
            entries.entry(key.into()).or_insert_with(|| value.into());
        }
        Self { entries }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Into<FormatValue>, S> From<HashMap<String, V, S>> for MapResolver {
    fn from(map: HashMap<String, V, S>) -> Self {
        Self {
            entries: map.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

impl<V: Into<FormatValue>> From<BTreeMap<String, V>> for MapResolver {
    fn from(map: BTreeMap<String, V>) -> Self {
        Self {
            entries: map.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<FormatValue>> FromIterator<(K, V)> for MapResolver {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl KeyResolver for MapResolver {
    fn resolve(&self, key: &str) -> Option<FormatValue> {
        self.entries.get(key).cloned()
    }
}

/// Resolver that matches keys ignoring ASCII case.
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveResolver {
    entries: HashMap<String, FormatValue>,
}

impl CaseInsensitiveResolver {
    /// Create a resolver from key/value pairs.
    ///
    /// Keys that differ only in case collide; the first pair wins.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<FormatValue>,
    {
        let mut entries = HashMap::new();
        for (key, value) in pairs {
            entries
                .entry(key.as_ref().to_ascii_lowercase())
                .or_insert_with(|| value.into());
        }
        Self { entries }
    }
}

impl KeyResolver for CaseInsensitiveResolver {
    fn resolve(&self, key: &str) -> Option<FormatValue> {
        self.entries.get(&key.to_ascii_lowercase()).cloned()
    }
}

/// Resolver over positional arguments, addressed as `{0}`, `{1}`, ...
#[derive(Debug, Clone, Default)]
pub struct ArgsResolver(Vec<FormatValue>);

impl ArgsResolver {
    /// Create a resolver over the given arguments.
    pub fn new<V: Into<FormatValue>>(args: impl IntoIterator<Item = V>) -> Self {
        Self(args.into_iter().map(Into::into).collect())
    }
}

impl KeyResolver for ArgsResolver {
    fn resolve(&self, key: &str) -> Option<FormatValue> {
        let index: usize = key.parse().ok()?;
        self.0.get(index).cloned()
    }
}

/// Resolver over a single context value.
///
/// The empty key (`{}`) is the value itself; any other key is read as a
/// member of the value through the [`MemberReader`].
#[derive(Debug, Clone)]
pub struct ValueResolver<R = ReflectMemberReader> {
    value: FormatValue,
    reader: R,
}

impl ValueResolver {
    /// Resolve keys against `value` with the default member reader.
    pub fn new(value: impl Into<FormatValue>) -> Self {
        Self::with_reader(value, ReflectMemberReader)
    }
}

impl<R: MemberReader> ValueResolver<R> {
    /// Resolve keys against `value` with a custom member reader.
    pub fn with_reader(value: impl Into<FormatValue>, reader: R) -> Self {
        Self {
            value: value.into(),
            reader,
        }
    }
}

impl<R: MemberReader> KeyResolver for ValueResolver<R> {
    fn resolve(&self, key: &str) -> Option<FormatValue> {
        if key.is_empty() {
            Some(self.value.clone())
        } else {
            self.reader.read_member(&self.value, key)
        }
    }
}

/// Resolver that tries each inner resolver in order.
#[derive(Default)]
pub struct ChainResolver<'a> {
    resolvers: Vec<Box<dyn KeyResolver + 'a>>,
}

impl<'a> ChainResolver<'a> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Append a resolver to the chain.
    pub fn with(mut self, resolver: impl KeyResolver + 'a) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }
}

impl KeyResolver for ChainResolver<'_> {
    fn resolve(&self, key: &str) -> Option<FormatValue> {
        self.resolvers.iter().find_map(|r| r.resolve(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Reflect;

    #[test]
    fn test_closure_resolver() {
        let resolver = |key: &str| (key == "a").then(|| FormatValue::Int(1));
        assert_eq!(resolver.resolve("a"), Some(FormatValue::Int(1)));
        assert_eq!(resolver.resolve("b"), None);
    }

    #[test]
    fn test_map_resolver() {
        let mut resolver = MapResolver::new();
        resolver.insert("name", "Ada").insert("age", 36);

        assert_eq!(resolver.len(), 2);
        assert_eq!(resolver.resolve("name"), Some(FormatValue::from("Ada")));
        assert_eq!(resolver.resolve("Name"), None);
        assert_eq!(resolver.resolve(""), None);
    }

    #[test]
    fn test_map_resolver_first_pair_wins() {
        let resolver = MapResolver::from_pairs([("k", 1), ("k", 2)]);
        assert_eq!(resolver.resolve("k"), Some(FormatValue::Int(1)));

        let resolver: MapResolver = vec![("x", "first"), ("x", "second")].into_iter().collect();
        assert_eq!(resolver.resolve("x"), Some(FormatValue::from("first")));
    }

    #[test]
    fn test_map_resolver_from_hashmap() {
        let mut map = HashMap::new();
        map.insert("".to_string(), "anonymous");
        let resolver = MapResolver::from(map);
        assert_eq!(resolver.resolve(""), Some(FormatValue::from("anonymous")));
    }

    #[test]
    fn test_case_insensitive_resolver() {
        let resolver = CaseInsensitiveResolver::from_pairs([("UserName", "ada"), ("username", "x")]);
        assert_eq!(resolver.resolve("USERNAME"), Some(FormatValue::from("ada")));
        assert_eq!(resolver.resolve("username"), Some(FormatValue::from("ada")));
    }

    #[test]
    fn test_args_resolver() {
        let resolver = ArgsResolver::new(["zero", "one"]);
        assert_eq!(resolver.resolve("1"), Some(FormatValue::from("one")));
        assert_eq!(resolver.resolve("2"), None);
        assert_eq!(resolver.resolve("x"), None);
    }

    #[derive(Debug)]
    struct Point {
        x: i64,
        y: i64,
    }

    impl Reflect for Point {
        fn type_name(&self) -> &str {
            "Point"
        }

        fn field(&self, name: &str) -> Option<FormatValue> {
            match name {
                "x" => Some(FormatValue::Int(self.x)),
                "y" => Some(FormatValue::Int(self.y)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_value_resolver() {
        let point = FormatValue::object(Point { x: 3, y: 4 });
        let resolver = ValueResolver::new(point.clone());

        assert_eq!(resolver.resolve(""), Some(point));
        assert_eq!(resolver.resolve("y"), Some(FormatValue::Int(4)));
        assert_eq!(resolver.resolve("z"), None);
    }

    #[test]
    fn test_chain_resolver() {
        let primary = MapResolver::from_pairs([("a", "primary")]);
        let secondary = MapResolver::from_pairs([("a", "ignored"), ("b", "secondary")]);
        let chain = ChainResolver::new().with(primary).with(secondary);

        assert_eq!(chain.resolve("a"), Some(FormatValue::from("primary")));
        assert_eq!(chain.resolve("b"), Some(FormatValue::from("secondary")));
        assert_eq!(chain.resolve("c"), None);
    }
}
