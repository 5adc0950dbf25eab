//! Operator lookup graph
//!
//! Operators are at most three characters long. They are stored in a small
//! trie keyed by character so the scanner can take the longest match in one
//! pass.

use crate::lexeme::Lexeme;
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Default)]
struct SymbolNode {
    lexeme: Option<Lexeme>,
    next: HashMap<char, SymbolNode>,
}

/// First char -> second char -> third char
#[derive(Debug, Default)]
pub struct SymbolGraph {
    root: SymbolNode,
}

impl SymbolGraph {
    fn build() -> Self {
        let mut graph = Self::default();
        for (symbol, lexeme) in Lexeme::operators() {
            let mut node = &mut graph.root;
            for ch in symbol.chars() {
                node = node.next.entry(ch).or_default();
            }
            node.lexeme = Some(lexeme);
        }
        graph
    }

    /// The graph shared by every scanner
    pub fn get() -> &'static SymbolGraph {
        static GRAPH: OnceLock<SymbolGraph> = OnceLock::new();
        GRAPH.get_or_init(SymbolGraph::build)
    }

    /// Longest operator at the start of `input`, with its length in chars.
    pub fn longest_match(&self, input: &str) -> Option<(Lexeme, usize)> {
        let mut node = &self.root;
        let mut best = None;
        for (count, ch) in input.chars().enumerate() {
            match node.next.get(&ch) {
                Some(child) => {
                    node = child;
                    if let Some(lexeme) = node.lexeme {
                        best = Some((lexeme, count + 1));
                    }
                }
                None => break,
            }
        }
        best
    }
}
