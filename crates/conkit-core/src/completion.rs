//! Tab completion over a fixed vocabulary.

use std::collections::BTreeMap;

/// Result of a completion query.
///
/// `prefix` is the longest unambiguous extension of the input; `matches`
/// holds every vocabulary word starting with the input. Both are empty when
/// nothing matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub prefix: String,
    pub matches: Vec<String>,
}

impl Completion {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Source of completions for the current line
pub trait Completer: Send {
    fn complete(&self, input: &str) -> Completion;
}

impl<F> Completer for F
where
    F: Fn(&str) -> Completion + Send,
{
    fn complete(&self, input: &str) -> Completion {
        self(input)
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    terminal: bool,
    children: BTreeMap<char, Node>,
}

impl Node {
    /// Collect every terminal path below this node, each prefixed by `path`.
    ///
    /// Returns the common-prefix extension: it continues through a child
    /// only while this node has exactly one child and is not itself terminal.
    fn collect(&self, path: &mut String, matches: &mut Vec<String>) -> String {
        if self.terminal {
            matches.push(path.clone());
        }

        let mut extension = path.clone();
        for (ch, child) in &self.children {
            path.push(*ch);
            let child_prefix = child.collect(path, matches);
            path.pop();
            if self.children.len() == 1 && !self.terminal {
                extension = child_prefix;
            }
        }
        extension
    }
}

/// Prefix tree over a static vocabulary
#[derive(Debug, Clone, Default)]
pub struct PrefixCompleter {
    root: Node,
    words: usize,
}

impl PrefixCompleter {
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut completer = Self::default();
        for word in vocabulary {
            completer.insert(word.as_ref());
        }
        completer
    }

    fn insert(&mut self, word: &str) {
        let mut node = &mut self.root;
        for ch in word.chars() {
            node = node.children.entry(ch).or_default();
        }
        if !node.terminal {
            node.terminal = true;
            self.words += 1;
        }
    }

    /// Number of distinct vocabulary words
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    pub fn contains(&self, word: &str) -> bool {
        self.find(word).is_some_and(|node| node.terminal)
    }

    fn find(&self, input: &str) -> Option<&Node> {
        let mut node = &self.root;
        for ch in input.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }
}

impl Completer for PrefixCompleter {
    fn complete(&self, input: &str) -> Completion {
        let Some(node) = self.find(input) else {
            return Completion::empty();
        };

        let mut path = input.to_string();
        let mut matches = Vec::new();
        let prefix = node.collect(&mut path, &mut matches);

        if matches.is_empty() {
            return Completion::empty();
        }
        Completion { prefix, matches }
    }
}
