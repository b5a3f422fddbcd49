use std::collections::HashMap;

/// Watched filename -> number of lines already examined
#[derive(Debug, Default, Clone)]
pub struct WatchTable {
    entries: HashMap<String, usize>,
}

impl WatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Start tracking `name` from line 0. Returns false if already tracked.
    pub fn insert_new(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.insert(name.to_string(), 0);
        true
    }

    /// Store the watermark returned by a scan
    pub fn advance(&mut self, name: &str, last_line: usize) {
        if let Some(entry) = self.entries.get_mut(name) {
            *entry = last_line;
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<usize> {
        self.entries.remove(name)
    }

    /// Tracked names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_advance_remove() {
        let mut table = WatchTable::new();
        assert!(table.insert_new("a.txt"));
        assert!(!table.insert_new("a.txt"));
        assert_eq!(table.get("a.txt"), Some(0));

        table.advance("a.txt", 7);
        assert_eq!(table.get("a.txt"), Some(7));
        assert!(!table.insert_new("a.txt"));
        assert_eq!(table.get("a.txt"), Some(7));

        assert_eq!(table.remove("a.txt"), Some(7));
        assert!(table.is_empty());
    }

    #[test]
    fn test_advance_untracked_is_ignored() {
        let mut table = WatchTable::new();
        table.advance("ghost.txt", 3);
        assert!(!table.contains("ghost.txt"));
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_names_sorted() {
        let mut table = WatchTable::new();
        table.insert_new("b.txt");
        table.insert_new("a.txt");
        assert_eq!(table.names(), vec!["a.txt", "b.txt"]);
        assert_eq!(table.len(), 2);
    }
}
