use std::collections::HashMap;

use super::arena::Handle;

/// Lower-cased alias → handle map, filled once at registration time.
pub struct AliasIndex<T> {
    entries: HashMap<String, Handle<T>>,
}

impl<T> Default for AliasIndex<T> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<T> AliasIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every alias for `handle`. The first registration of an alias
    /// wins; returns the aliases that were already taken.
    pub fn register<I, S>(&mut self, handle: Handle<T>, aliases: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut taken = Vec::new();
        for alias in aliases {
            let key = normalize(alias.as_ref());
            if key.is_empty() {
                continue;
            }
            match self.entries.get(&key) {
                Some(existing) if *existing != handle => taken.push(key),
                Some(_) => {}
                None => {
                    self.entries.insert(key, handle);
                }
            }
        }
        taken
    }

    pub fn find(&self, query: &str) -> Option<Handle<T>> {
        self.entries.get(&normalize(query)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

fn normalize(alias: &str) -> String {
    alias.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::arena::{Arena, SessionId};

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut arena = Arena::new(SessionId::fresh());
        let h = arena.insert("England");
        let mut index = AliasIndex::new();
        index.register(h, ["England", "ENG", "1"]);

        assert_eq!(index.find("england"), Some(h));
        assert_eq!(index.find(" eng "), Some(h));
        assert_eq!(index.find("1"), Some(h));
        assert_eq!(index.find("France"), None);
    }

    #[test]
    fn test_first_registration_wins() {
        let mut arena = Arena::new(SessionId::fresh());
        let a = arena.insert("a");
        let b = arena.insert("b");
        let mut index = AliasIndex::new();
        assert!(index.register(a, ["United"]).is_empty());
        let taken = index.register(b, ["united", "City"]);

        assert_eq!(taken, vec!["united".to_string()]);
        assert_eq!(index.find("United"), Some(a));
        assert_eq!(index.find("city"), Some(b));
    }
}
