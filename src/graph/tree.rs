//! Bracketed-tree builder
//!
//! Builds derivation forests from text such as `"(0-2 (0-1 a)(1-2 b))"`:
//! every bracket becomes a fresh nonterminal state labelled with its first
//! token and one arc `head <- children` of weight one; every bare token
//! becomes the canonical lexical leaf for that word.

use crate::errors::{HypergraphError, Result};
use crate::graph::{HyperArc, MutableHypergraph};
use crate::types::StateId;
use crate::weight::Weight;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TreeToken<'a> {
    Open,
    Close,
    Word(&'a str),
}

fn tokenize(text: &str) -> Vec<TreeToken<'_>> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        let is_delim = c == '(' || c == ')' || c.is_whitespace();
        if is_delim {
            if let Some(start) = word_start.take() {
                tokens.push(TreeToken::Word(&text[start..i]));
            }
            match c {
                '(' => tokens.push(TreeToken::Open),
                ')' => tokens.push(TreeToken::Close),
                _ => {}
            }
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(start) = word_start {
        tokens.push(TreeToken::Word(&text[start..]));
    }
    tokens
}

impl<W: Weight> MutableHypergraph<W> {
    /// New graph holding one tree, with the tree's root as final state
    pub fn from_tree(text: &str) -> Result<Self> {
        let mut hg = Self::new();
        let root = hg.add_tree(text)?;
        hg.set_final(root);
        Ok(hg)
    }

    /// Add the states and arcs of a bracketed tree; returns the root.
    ///
    /// Lexical leaves are shared with any already in the graph, so adding
    /// several trees over the same words builds a forest.
    pub fn add_tree(&mut self, text: &str) -> Result<StateId> {
        let tokens = tokenize(text);
        let mut pos = 0;
        let root = self.add_subtree(&tokens, &mut pos)?;
        if pos != tokens.len() {
            return Err(HypergraphError::invalid_input(format!(
                "trailing input after tree in {text:?}"
            )));
        }
        Ok(root)
    }

    fn add_subtree(&mut self, tokens: &[TreeToken<'_>], pos: &mut usize) -> Result<StateId> {
        if tokens.get(*pos) != Some(&TreeToken::Open) {
            return Err(HypergraphError::invalid_input(format!(
                "expected '(' at token {}",
                *pos
            )));
        }
        *pos += 1;
        let Some(&TreeToken::Word(label)) = tokens.get(*pos) else {
            return Err(HypergraphError::invalid_input(format!(
                "expected a label after '(' at token {}",
                *pos
            )));
        };
        *pos += 1;

        let head = self.add_nonterminal_state(label);
        let mut children = Vec::new();
        loop {
            match tokens.get(*pos) {
                Some(TreeToken::Close) => {
                    *pos += 1;
                    break;
                }
                Some(TreeToken::Open) => children.push(self.add_subtree(tokens, pos)?),
                Some(TreeToken::Word(word)) => {
                    children.push(self.add_lexical_state(word));
                    *pos += 1;
                }
                None => {
                    return Err(HypergraphError::invalid_input(format!(
                        "unbalanced brackets: '({label}' is never closed"
                    )))
                }
            }
        }
        if children.is_empty() {
            return Err(HypergraphError::invalid_input(format!(
                "bracket '({label})' has no children"
            )));
        }
        self.add_arc(HyperArc::new(head, children, W::one()));
        Ok(head)
    }
}
