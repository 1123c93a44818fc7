//! String-edit graph: correct a misspelling by searching over edits.
//!
//! A node is a string; its children are every string one allowed edit
//! away. The goal is any string whose lowercase form is in the lexicon.
//! Inserted letters are uppercase so the edits stay visible in output.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use wayfind_search::contract::release_chain;
use wayfind_search::SearchNode;

use super::lexicon::Lexicon;
use super::WorldError;

/// Which edit kinds generate children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transitions {
    pub insert: bool,
    pub transpose: bool,
    pub delete: bool,
}

impl Transitions {
    pub const ALL: Self = Self {
        insert: true,
        transpose: true,
        delete: true,
    };
}

impl Default for Transitions {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromStr for Transitions {
    type Err = WorldError;

    /// Letters `i`, `t`, `d` in any order. The empty string means all three.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::ALL);
        }
        let mut t = Self {
            insert: false,
            transpose: false,
            delete: false,
        };
        for kind in s.chars() {
            match kind.to_ascii_lowercase() {
                'i' => t.insert = true,
                't' => t.transpose = true,
                'd' => t.delete = true,
                _ => {
                    return Err(WorldError::InvalidTransitions {
                        given: s.to_string(),
                        kind,
                    })
                }
            }
        }
        Ok(t)
    }
}

impl fmt::Display for Transitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (on, c) in [(self.insert, 'i'), (self.transpose, 't'), (self.delete, 'd')] {
            if on {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// One edit, as the edge label from parent to child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Insert { index: usize, letter: char },
    Transpose { index: usize },
    Delete { index: usize },
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Insert { index, letter } => write!(f, "insert({index},{letter})"),
            Self::Transpose { index } => write!(f, "transpose({index},{})", index + 1),
            Self::Delete { index } => write!(f, "delete({index})"),
        }
    }
}

#[derive(Debug)]
struct Rules {
    lexicon: Lexicon,
    transitions: Transitions,
}

/// A misspelled word plus the rules for correcting it.
#[derive(Debug, Clone)]
pub struct AutocorrectSpace {
    text: String,
    rules: Arc<Rules>,
}

impl AutocorrectSpace {
    #[must_use]
    pub fn new(text: impl Into<String>, lexicon: Lexicon, transitions: Transitions) -> Self {
        Self {
            text: text.into(),
            rules: Arc::new(Rules {
                lexicon,
                transitions,
            }),
        }
    }

    #[must_use]
    pub fn transitions(&self) -> Transitions {
        self.rules.transitions
    }

    #[must_use]
    pub fn start_node(&self) -> StringNode {
        StringNode {
            text: self.text.as_str().into(),
            edit: None,
            rules: Arc::clone(&self.rules),
            parent: None,
        }
    }
}

/// A candidate spelling and the edit that produced it.
#[derive(Clone)]
pub struct StringNode {
    text: Arc<str>,
    edit: Option<Edit>,
    rules: Arc<Rules>,
    parent: Option<Arc<StringNode>>,
}

impl StringNode {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The edit from the parent, `None` at the root.
    #[must_use]
    pub fn edit(&self) -> Option<Edit> {
        self.edit
    }

    /// Edits from the root to this node, in application order.
    #[must_use]
    pub fn edits(&self) -> Vec<Edit> {
        self.path().iter().filter_map(StringNode::edit).collect()
    }

    /// `root -edit-> ... -edit-> self`.
    #[must_use]
    pub fn describe_path(&self) -> String {
        let mut out = String::new();
        for node in self.path() {
            if let Some(edit) = node.edit {
                out.push_str(&format!(" -{edit}-> "));
            }
            out.push_str(&node.text);
        }
        out
    }

    fn child(&self, chars: Vec<char>, edit: Edit, parent: &Arc<Self>) -> Self {
        Self {
            text: chars.into_iter().collect::<String>().into(),
            edit: Some(edit),
            rules: Arc::clone(&self.rules),
            parent: Some(Arc::clone(parent)),
        }
    }
}

impl SearchNode for StringNode {
    /// Inserts (every position, `A` to `Z`), then transposes, then deletes.
    fn children(&self) -> Vec<Self> {
        let parent = Arc::new(self.clone());
        let chars: Vec<char> = self.text.chars().collect();
        let rules = self.rules.transitions;
        let mut children = Vec::new();

        if rules.insert {
            for index in 0..=chars.len() {
                for letter in 'A'..='Z' {
                    let mut edited = chars.clone();
                    edited.insert(index, letter);
                    children.push(self.child(edited, Edit::Insert { index, letter }, &parent));
                }
            }
        }
        if rules.transpose {
            for index in 0..chars.len().saturating_sub(1) {
                let mut edited = chars.clone();
                edited.swap(index, index + 1);
                children.push(self.child(edited, Edit::Transpose { index }, &parent));
            }
        }
        if rules.delete {
            for index in 0..chars.len() {
                let mut edited = chars.clone();
                edited.remove(index);
                children.push(self.child(edited, Edit::Delete { index }, &parent));
            }
        }
        children
    }

    fn is_goal(&self) -> bool {
        self.rules.lexicon.contains(&self.text)
    }

    fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }
}

impl Drop for StringNode {
    fn drop(&mut self) {
        release_chain(self.parent.take(), |node| node.parent.take());
    }
}

impl PartialEq for StringNode {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for StringNode {}

impl Hash for StringNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Debug for StringNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringNode({:?})", self.text)
    }
}

impl fmt::Display for StringNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
