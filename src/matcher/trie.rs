//! Arena-backed character trie.
//!
//! Nodes live in a single `Vec` and refer to their children by index, so the
//! structure is a tree by construction: a child index is only ever created by
//! its parent during insertion and never re-linked. Edges are labelled with
//! Unicode scalar values, never bytes.

use std::collections::HashMap;

/// Index of a node inside the trie arena
pub type NodeId = usize;

/// Index of a keyword inside the trie's keyword table
pub type KeywordId = usize;

/// Single trie node
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    children: HashMap<char, NodeId>,
    /// Set iff the root path to this node spells a complete keyword
    keyword: Option<KeywordId>,
}

impl TrieNode {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.keyword.is_some()
    }
}

/// Character trie holding a keyword table
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    keywords: Vec<String>,
}

impl Trie {
    /// Root node index
    pub const ROOT: NodeId = 0;

    /// Create a root-only trie
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            keywords: Vec::new(),
        }
    }

    /// Create a root-only trie with room for `nodes` nodes
    pub fn with_capacity(nodes: usize) -> Self {
        let mut arena = Vec::with_capacity(nodes.max(1));
        arena.push(TrieNode::default());
        Self {
            nodes: arena,
            keywords: Vec::new(),
        }
    }

    /// Insert a keyword, creating any missing nodes along its path.
    ///
    /// Returns `false` if the keyword was already present or is empty.
    pub fn insert(&mut self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }

        let mut node = Self::ROOT;
        for ch in word.chars() {
            node = match self.nodes[node].children.get(&ch) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(ch, child);
                    child
                }
            };
        }

        if self.nodes[node].keyword.is_some() {
            return false;
        }
        self.nodes[node].keyword = Some(self.keywords.len());
        self.keywords.push(word.to_string());
        true
    }

    /// Follow the edge labelled `ch` out of `node`
    #[inline]
    pub fn child(&self, node: NodeId, ch: char) -> Option<NodeId> {
        self.nodes[node].children.get(&ch).copied()
    }

    /// Keyword completed at `node`, if any
    #[inline]
    pub fn keyword_at(&self, node: NodeId) -> Option<KeywordId> {
        self.nodes[node].keyword
    }

    pub fn node(&self, node: NodeId) -> &TrieNode {
        &self.nodes[node]
    }

    pub fn keyword(&self, id: KeywordId) -> &str {
        &self.keywords[id]
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    /// Exact membership test
    pub fn contains(&self, word: &str) -> bool {
        let mut node = Self::ROOT;
        for ch in word.chars() {
            match self.child(node, ch) {
                Some(next) => node = next,
                None => return false,
            }
        }
        self.nodes[node].is_terminal()
    }

    /// True if the root has no children, i.e. nothing can ever match
    pub fn is_empty(&self) -> bool {
        self.nodes[Self::ROOT].children.is_empty()
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_trie() {
        let trie = Trie::new();
        assert!(trie.is_empty());
        assert_eq!(trie.node_count(), 1);
        assert_eq!(trie.keyword_count(), 0);
        assert!(!trie.contains(""));
        assert!(!trie.contains("a"));
    }

    #[test]
    fn test_insert_rejects_empty() {
        let mut trie = Trie::new();
        assert!(!trie.insert(""));
        assert!(!trie.node(Trie::ROOT).is_terminal());
    }

    #[test]
    fn test_shared_prefix_nodes() {
        let mut trie = Trie::new();
        assert!(trie.insert("ab"));
        assert!(trie.insert("abc"));
        // root + a + b + c
        assert_eq!(trie.node_count(), 4);
        assert!(trie.contains("ab"));
        assert!(trie.contains("abc"));
        assert!(!trie.contains("a"));
    }

    #[test]
    fn test_duplicate_insert() {
        let mut trie = Trie::new();
        assert!(trie.insert("spam"));
        assert!(!trie.insert("spam"));
        assert_eq!(trie.keyword_count(), 1);
    }

    #[test]
    fn test_edges_are_scalars_not_bytes() {
        let mut trie = Trie::new();
        trie.insert("去你妈的");
        // one node per scalar value, plus root
        assert_eq!(trie.node_count(), 5);
        let first = trie.child(Trie::ROOT, '去').unwrap();
        assert!(trie.child(first, '你').is_some());
    }

    #[test]
    fn test_keyword_back_reference() {
        let mut trie = Trie::new();
        trie.insert("坏话");
        let a = trie.child(Trie::ROOT, '坏').unwrap();
        let b = trie.child(a, '话').unwrap();
        let id = trie.keyword_at(b).unwrap();
        assert_eq!(trie.keyword(id), "坏话");
        assert!(trie.keyword_at(a).is_none());
    }

    #[test]
    fn test_with_capacity_has_root() {
        let trie = Trie::with_capacity(0);
        assert_eq!(trie.node_count(), 1);
    }
}
