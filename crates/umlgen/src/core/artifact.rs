//! Generated text files
//!
//! Emitters never touch the filesystem; they return an [`ArtifactSet`] of
//! relative, `/`-separated paths and their contents.

use std::collections::BTreeMap;

/// What an artifact is, for logging and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    Entity,
    Dto,
    Mapper,
    Repository,
    Service,
    Controller,
    Model,
    ClientService,
    Screen,
    BuildConfig,
    Documentation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: String,
    pub kind: ArtifactKind,
    pub content: String,
}

impl Artifact {
    pub fn new(path: impl Into<String>, kind: ArtifactKind, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            content: content.into(),
        }
    }
}

/// Path-keyed collection of artifacts; iteration is in path order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    files: BTreeMap<String, Artifact>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an artifact, replacing any earlier one at the same path
    pub fn push(&mut self, artifact: Artifact) {
        self.files.insert(artifact.path.clone(), artifact);
    }

    pub fn add(&mut self, path: impl Into<String>, kind: ArtifactKind, content: impl Into<String>) {
        self.push(Artifact::new(path, kind, content));
    }

    /// Move every artifact of `other` under `prefix/`
    pub fn merge_under(&mut self, prefix: &str, other: ArtifactSet) {
        let prefix = prefix.trim_end_matches('/');
        for (_, mut artifact) in other.files {
            artifact.path = format!("{}/{}", prefix, artifact.path);
            self.push(artifact);
        }
    }

    pub fn get(&self, path: &str) -> Option<&Artifact> {
        self.files.get(path)
    }

    pub fn content(&self, path: &str) -> Option<&str> {
        self.get(path).map(|a| a.content.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.files.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn of_kind(&self, kind: ArtifactKind) -> impl Iterator<Item = &Artifact> {
        self.files.values().filter(move |a| a.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.files.values().map(|a| a.content.len()).sum()
    }
}

impl IntoIterator for ArtifactSet {
    type Item = Artifact;
    type IntoIter = std::collections::btree_map::IntoValues<String, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_under_prefix() {
        let mut server = ArtifactSet::new();
        server.add("pom.xml", ArtifactKind::BuildConfig, "<project/>");
        let mut combined = ArtifactSet::new();
        combined.add("README.md", ArtifactKind::Documentation, "# App");
        combined.merge_under("backend/", server);
        let paths: Vec<_> = combined.paths().collect();
        assert_eq!(paths, vec!["README.md", "backend/pom.xml"]);
    }

    #[test]
    fn test_push_replaces_same_path() {
        let mut set = ArtifactSet::new();
        set.add("a.txt", ArtifactKind::Documentation, "one");
        set.add("a.txt", ArtifactKind::Documentation, "two");
        assert_eq!(set.len(), 1);
        assert_eq!(set.content("a.txt"), Some("two"));
    }
}
