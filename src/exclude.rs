use std::collections::HashSet;

/// Built-in exclusion names used when the caller supplies none.
pub const DEFAULT_EXCLUDES: &[&str] = &[".DS_Store"];

/// Names (file or directory basenames) that suppress walk descent or task
/// emission. Exact string membership, no globbing, no case-folding.
#[derive(Debug, Clone)]
pub struct ExcludeSet {
    names: HashSet<String>,
}

impl Default for ExcludeSet {
    fn default() -> Self {
        Self { names: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect() }
    }
}

impl ExcludeSet {
    /// Build the set from caller-supplied names. Any supplied name fully
    /// replaces the built-in default set (no merging).
    pub fn from_names(names: Vec<String>) -> Self {
        if names.is_empty() {
            Self::default()
        } else {
            Self { names: names.into_iter().collect() }
        }
    }

    pub fn excludes(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_contains_ds_store() {
        let ex = ExcludeSet::default();
        assert!(ex.excludes(".DS_Store"));
        assert!(!ex.excludes("photo.jpg"));
    }

    #[test]
    fn empty_input_falls_back_to_default() {
        let ex = ExcludeSet::from_names(Vec::new());
        assert!(ex.excludes(".DS_Store"));
    }

    #[test]
    fn supplied_names_replace_the_default() {
        // supplying [".git"] means .DS_Store is no longer excluded
        let ex = ExcludeSet::from_names(vec![".git".to_string()]);
        assert!(ex.excludes(".git"));
        assert!(!ex.excludes(".DS_Store"));
    }

    #[test]
    fn membership_is_exact() {
        let ex = ExcludeSet::from_names(vec!["Thumbs.db".to_string()]);
        assert!(ex.excludes("Thumbs.db"));
        assert!(!ex.excludes("thumbs.db"));
        assert!(!ex.excludes("Thumbs"));
    }
}
