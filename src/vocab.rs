//! Symbol vocabulary
//!
//! Interns label strings into compact [`Sym`] handles. Terminals (lexical
//! symbols) and nonterminals are kept in separate tables so that the same
//! text can name both a word and a category.
//!
//! A vocabulary is shared between graphs and transforms through a
//! [`VocabularyPtr`]; interning takes `&self` so a transform can add symbols
//! to the vocabulary of the graph it is building.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// Shared handle to a vocabulary.
pub type VocabularyPtr = Arc<Vocabulary>;

/// Which table a symbol lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Lexical symbol (a word)
    Terminal,
    /// Category or span label
    Nonterminal,
}

/// Interned symbol: a kind plus an index into that kind's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sym {
    pub kind: SymbolKind,
    pub index: u32,
}

impl Sym {
    pub fn is_lexical(&self) -> bool {
        self.kind == SymbolKind::Terminal
    }
}

// ============================================================================
// Symbol table
// ============================================================================

#[derive(Debug, Default)]
struct SymbolTable {
    string_to_id: FxHashMap<Arc<str>, u32>,
    id_to_string: Vec<Arc<str>>,
}

impl SymbolTable {
    fn intern(&mut self, s: &str) -> u32 {
        if let Some(&id) = self.string_to_id.get(s) {
            return id;
        }

        let id = self.id_to_string.len() as u32;
        let arc: Arc<str> = s.into();
        self.string_to_id.insert(arc.clone(), id);
        self.id_to_string.push(arc);
        id
    }

    fn find(&self, s: &str) -> Option<u32> {
        self.string_to_id.get(s).copied()
    }

    fn get(&self, id: u32) -> Option<Arc<str>> {
        self.id_to_string.get(id as usize).cloned()
    }
}

#[derive(Debug, Default)]
struct Tables {
    terminals: SymbolTable,
    nonterminals: SymbolTable,
}

impl Tables {
    fn table(&self, kind: SymbolKind) -> &SymbolTable {
        match kind {
            SymbolKind::Terminal => &self.terminals,
            SymbolKind::Nonterminal => &self.nonterminals,
        }
    }

    fn table_mut(&mut self, kind: SymbolKind) -> &mut SymbolTable {
        match kind {
            SymbolKind::Terminal => &mut self.terminals,
            SymbolKind::Nonterminal => &mut self.nonterminals,
        }
    }
}

// ============================================================================
// Vocabulary
// ============================================================================

/// Thread-safe symbol table pair.
#[derive(Debug, Default)]
pub struct Vocabulary {
    tables: RwLock<Tables>,
}

impl Vocabulary {
    /// Create a new empty vocabulary
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty vocabulary behind a shared handle
    pub fn shared() -> VocabularyPtr {
        Arc::new(Self::new())
    }

    /// Intern `text` as a symbol of `kind`, returning its handle
    pub fn add(&self, text: &str, kind: SymbolKind) -> Sym {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let index = tables.table_mut(kind).intern(text);
        Sym { kind, index }
    }

    pub fn add_terminal(&self, text: &str) -> Sym {
        self.add(text, SymbolKind::Terminal)
    }

    pub fn add_nonterminal(&self, text: &str) -> Sym {
        self.add(text, SymbolKind::Nonterminal)
    }

    /// Look up an existing symbol without interning
    pub fn find(&self, text: &str, kind: SymbolKind) -> Option<Sym> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.table(kind).find(text).map(|index| Sym { kind, index })
    }

    /// Text of a symbol, if it belongs to this vocabulary
    pub fn text(&self, sym: Sym) -> Option<Arc<str>> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.table(sym.kind).get(sym.index)
    }

    /// Number of symbols of `kind`
    pub fn len_of(&self, kind: SymbolKind) -> usize {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.table(kind).id_to_string.len()
    }

    /// Total number of symbols
    pub fn len(&self) -> usize {
        self.len_of(SymbolKind::Terminal) + self.len_of(SymbolKind::Nonterminal)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
