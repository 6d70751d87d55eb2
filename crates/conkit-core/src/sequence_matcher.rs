//! Trie-based sequence matcher for key sequence decoding.
//!
//! Maps raw byte sequences to keys and tells the decoder whether a partial
//! sequence could still become a longer valid one, so it knows whether to
//! wait for more bytes or emit what it has.

use crate::key::Key;
use std::collections::BTreeMap;

/// A node in the Trie structure for sequence matching.
#[derive(Debug, Clone, Default)]
struct TrieNode {
    /// The key associated with this node if it represents a complete sequence
    key: Option<Key>,
    /// Child nodes indexed by the next byte in the sequence
    children: BTreeMap<u8, TrieNode>,
}

/// Result of matching a byte sequence against the Trie
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// Found an exact match for the sequence
    Exact(Key),
    /// The sequence is a prefix of one or more longer sequences
    Prefix,
    /// No match possible
    NoMatch,
}

/// Result of finding the longest valid sequence from the start of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongestMatchResult {
    /// The key that was matched
    pub key: Key,
    /// Number of bytes consumed from the input
    pub consumed_bytes: usize,
}

/// Trie-based sequence matcher
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    root: TrieNode,
}

impl SequenceMatcher {
    /// Create a new SequenceMatcher with all standard key sequences
    pub fn new() -> Self {
        let mut matcher = Self {
            root: TrieNode::default(),
        };
        matcher.build_standard_sequences();
        matcher
    }

    /// Whether the given bytes are an exact match, a prefix, or no match.
    /// An exact match that is also a prefix (lone ESC) reports `Exact`.
    pub fn match_sequence(&self, bytes: &[u8]) -> MatchResult {
        if bytes.is_empty() {
            return MatchResult::NoMatch;
        }

        match self.find_node(bytes) {
            Some(TrieNode { key: Some(key), .. }) => MatchResult::Exact(*key),
            Some(_) => MatchResult::Prefix,
            None => MatchResult::NoMatch,
        }
    }

    /// Whether `bytes` can be extended into a longer known sequence
    pub fn has_extension(&self, bytes: &[u8]) -> bool {
        self.find_node(bytes)
            .map(|node| !node.children.is_empty())
            .unwrap_or(false)
    }

    /// Find the longest valid sequence from the start of bytes
    pub fn find_longest_match(&self, bytes: &[u8]) -> Option<LongestMatchResult> {
        let mut longest_match = None;
        let mut current_node = &self.root;

        for (i, byte) in bytes.iter().enumerate() {
            let Some(child) = current_node.children.get(byte) else {
                break;
            };
            current_node = child;
            if let Some(key) = current_node.key {
                longest_match = Some(LongestMatchResult {
                    key,
                    consumed_bytes: i + 1,
                });
            }
        }

        longest_match
    }

    fn find_node(&self, bytes: &[u8]) -> Option<&TrieNode> {
        let mut current = &self.root;
        for byte in bytes {
            current = current.children.get(byte)?;
        }
        Some(current)
    }

    /// Register a custom sequence mapping
    pub fn insert(&mut self, bytes: &[u8], key: Key) {
        let mut current = &mut self.root;
        for &byte in bytes {
            current = current.children.entry(byte).or_default();
        }
        current.key = Some(key);
    }

    fn build_standard_sequences(&mut self) {
        // Control characters (single byte)
        self.insert(&[0x1b], Key::Escape);
        self.insert(&[0x01], Key::ControlA);
        self.insert(&[0x02], Key::ControlB);
        self.insert(&[0x03], Key::ControlC);
        self.insert(&[0x04], Key::ControlD);
        self.insert(&[0x05], Key::ControlE);
        self.insert(&[0x06], Key::ControlF);
        self.insert(&[0x07], Key::ControlG);
        self.insert(&[0x08], Key::Backspace);
        self.insert(&[0x09], Key::Tab);
        self.insert(&[0x0a], Key::Enter);
        self.insert(&[0x0b], Key::ControlK);
        self.insert(&[0x0c], Key::ControlL);
        self.insert(&[0x0d], Key::Enter);
        self.insert(&[0x0e], Key::ControlN);
        self.insert(&[0x0f], Key::ControlO);
        self.insert(&[0x10], Key::ControlP);
        self.insert(&[0x11], Key::ControlQ);
        self.insert(&[0x12], Key::ControlR);
        self.insert(&[0x13], Key::ControlS);
        self.insert(&[0x14], Key::ControlT);
        self.insert(&[0x15], Key::ControlU);
        self.insert(&[0x16], Key::ControlV);
        self.insert(&[0x17], Key::ControlW);
        self.insert(&[0x18], Key::ControlX);
        self.insert(&[0x19], Key::ControlY);
        self.insert(&[0x1a], Key::ControlZ);
        self.insert(&[0x7f], Key::Backspace);

        // Arrow keys (standard VT100 and application mode)
        self.insert(b"\x1b[A", Key::Up);
        self.insert(b"\x1b[B", Key::Down);
        self.insert(b"\x1b[C", Key::Right);
        self.insert(b"\x1b[D", Key::Left);
        self.insert(b"\x1bOA", Key::Up);
        self.insert(b"\x1bOB", Key::Down);
        self.insert(b"\x1bOC", Key::Right);
        self.insert(b"\x1bOD", Key::Left);

        // Home and End keys (multiple variants)
        self.insert(b"\x1b[H", Key::Home);
        self.insert(b"\x1b[F", Key::End);
        self.insert(b"\x1bOH", Key::Home);
        self.insert(b"\x1bOF", Key::End);
        self.insert(b"\x1b[1~", Key::Home);
        self.insert(b"\x1b[4~", Key::End);
        self.insert(b"\x1b[7~", Key::Home);
        self.insert(b"\x1b[8~", Key::End);

        // Editing block
        self.insert(b"\x1b[2~", Key::Insert);
        self.insert(b"\x1b[3~", Key::Delete);
        self.insert(b"\x1b[5~", Key::PageUp);
        self.insert(b"\x1b[6~", Key::PageDown);

        // Function keys F1-F4 (VT100 and rxvt variants)
        self.insert(b"\x1bOP", Key::F1);
        self.insert(b"\x1bOQ", Key::F2);
        self.insert(b"\x1bOR", Key::F3);
        self.insert(b"\x1bOS", Key::F4);
        self.insert(b"\x1b[11~", Key::F1);
        self.insert(b"\x1b[12~", Key::F2);
        self.insert(b"\x1b[13~", Key::F3);
        self.insert(b"\x1b[14~", Key::F4);

        // Function keys F5-F12
        self.insert(b"\x1b[15~", Key::F5);
        self.insert(b"\x1b[17~", Key::F6);
        self.insert(b"\x1b[18~", Key::F7);
        self.insert(b"\x1b[19~", Key::F8);
        self.insert(b"\x1b[20~", Key::F9);
        self.insert(b"\x1b[21~", Key::F10);
        self.insert(b"\x1b[23~", Key::F11);
        self.insert(b"\x1b[24~", Key::F12);
    }
}

impl Default for SequenceMatcher {
    fn default() -> Self {
        Self::new()
    }
}
