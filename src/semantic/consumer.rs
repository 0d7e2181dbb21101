//! Consumers of finished function bodies.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::symbol_table::{SymbolRef, SymbolTable};
use super::tree::{Node, NodeTag};

/// Receives each function's syntax tree once its body is complete.
///
/// Local symbols referenced from the tree resolve only for the duration of
/// the call; the local scope is cleared right after.
pub trait TreeConsumer {
    fn process(&mut self, symbols: &SymbolTable, function: SymbolRef, body: &Node);
}

impl<F> TreeConsumer for F
where
    F: FnMut(&SymbolTable, SymbolRef, &Node),
{
    fn process(&mut self, symbols: &SymbolTable, function: SymbolRef, body: &Node) {
        self(symbols, function, body)
    }
}

/// Node counts of a single function
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionStats {
    pub name: String,
    pub counts: BTreeMap<NodeTag, usize>,
}

impl FunctionStats {
    pub fn count(&self, tag: NodeTag) -> usize {
        self.counts.get(&tag).copied().unwrap_or(0)
    }
}

/// Counts node kinds per function and across the whole program
#[derive(Debug, Clone, Default)]
pub struct NodeStats {
    functions: Vec<FunctionStats>,
    totals: BTreeMap<NodeTag, usize>,
}

impl NodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn functions(&self) -> &[FunctionStats] {
        &self.functions
    }

    pub fn total(&self, tag: NodeTag) -> usize {
        self.totals.get(&tag).copied().unwrap_or(0)
    }

    /// `@@FUN: name` followed by one `Tag: N` line per non-zero count
    pub fn render(&self) -> String {
        let mut out = String::new();
        for function in &self.functions {
            let _ = writeln!(out, "@@FUN: {}", function.name);
            for tag in NodeTag::ALL {
                let n = function.count(tag);
                if n != 0 {
                    let _ = writeln!(out, "{}: {}", tag, n);
                }
            }
        }
        out
    }
}

impl TreeConsumer for NodeStats {
    fn process(&mut self, symbols: &SymbolTable, function: SymbolRef, body: &Node) {
        let name = symbols
            .get(function)
            .map(|symbol| symbol.name.clone())
            .unwrap_or_default();

        let mut counts = BTreeMap::new();
        body.walk(&mut |node: &Node| {
            *counts.entry(node.tag()).or_insert(0) += 1;
        });
        for (tag, n) in &counts {
            *self.totals.entry(*tag).or_insert(0) += n;
        }

        self.functions.push(FunctionStats { name, counts });
    }
}
