//! Two-scope symbol table for C-- declarations.
//!
//! Names live either in the global scope, for the whole program, or in the
//! local scope of the function currently being parsed. Each scope is a fixed
//! array of hash buckets whose chains link entries stored in an arena; the
//! local arena is emptied whenever a function finishes.

use std::fmt::{self, Write as _};

use index_vec::IndexVec;
use log::{debug, trace};
use thiserror::Error;

use super::context::{FunctionContext, PendingFunction};
use super::types::{BaseType, ScalarType, Type};
use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter, Span};

pub const HASH_TABLE_SIZE: usize = 256;

/// Bucket of a name: the sum of its bytes modulo the table size
pub fn hash(name: &str) -> usize {
    name.bytes()
        .fold(0usize, |acc, b| (acc + b as usize) % HASH_TABLE_SIZE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Local,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Local => write!(f, "local"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolIdx(usize);
impl index_vec::Idx for SymbolIdx {
    fn from_usize(idx: usize) -> Self {
        Self(idx)
    }
    fn index(self) -> usize {
        self.0
    }
}

/// Handle to a symbol table entry.
///
/// The generation ties a local handle to the function it was created in, so
/// it stops resolving once the local scope is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolRef {
    scope: Scope,
    index: SymbolIdx,
    generation: u32,
}

impl SymbolRef {
    pub fn scope(&self) -> Scope {
        self.scope
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymbolError {
    #[error("{scope} symbol handle from generation {handle} used after the scope was cleared (now {current})")]
    Stale {
        scope: Scope,
        handle: u32,
        current: u32,
    },
    #[error("no {scope} symbol at index {index}")]
    Missing { scope: Scope, index: usize },
}

/// Where a function is in its prototype/definition lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProtoState {
    #[default]
    Undeclared,
    PrototypeSeen,
    Defined,
}

/// A formal parameter as stored in a function signature.
///
/// This is a copy of the parameter's local entry, so signatures stay intact
/// after the local scope is cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct Formal {
    pub name: String,
    pub scope: Scope,
    pub is_formal: bool,
    pub ty: Type,
}

impl Formal {
    pub fn is_array(&self) -> bool {
        self.ty.is_array()
    }

    pub fn elt_type(&self) -> Option<ScalarType> {
        self.ty.elt_type()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionInfo {
    pub ret_type: BaseType,
    pub formals: Vec<Formal>,
    pub proto_state: ProtoState,
    pub is_extern: bool,
}

/// A symbol table entry
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub scope: Scope,
    pub ty: Type,
    /// Declared size of a fixed array; `None` for scalars and array formals
    pub num_elts: Option<u32>,
    pub is_formal: bool,
    pub function: Option<FunctionInfo>,
    /// Declaration site
    pub span: Span,
    next: Option<SymbolIdx>,
}

impl Symbol {
    fn new(name: &str, scope: Scope, span: Span, next: Option<SymbolIdx>) -> Self {
        Self {
            name: name.to_string(),
            scope,
            ty: Type::Void,
            num_elts: None,
            is_formal: false,
            function: None,
            span,
            next,
        }
    }

    pub fn elt_type(&self) -> Option<ScalarType> {
        self.ty.elt_type()
    }

    pub fn is_function(&self) -> bool {
        self.ty == Type::Function
    }

    /// Return type of a function entry
    pub fn ret_type(&self) -> Option<BaseType> {
        self.function.as_ref().map(|info| info.ret_type)
    }

    pub fn formals(&self) -> &[Formal] {
        self.function
            .as_ref()
            .map(|info| info.formals.as_slice())
            .unwrap_or_default()
    }

    pub fn proto_state(&self) -> ProtoState {
        self.function
            .as_ref()
            .map(|info| info.proto_state)
            .unwrap_or_default()
    }

    /// Compact signature: `I`, `C[10]`, `(I, C[]) -> void`, `-`
    pub fn type_signature(&self) -> String {
        match (self.ty, &self.function) {
            (Type::Array(elt), _) => match self.num_elts {
                Some(n) => format!("{}[{}]", Type::from(elt).code(), n),
                None => self.ty.code(),
            },
            (Type::Function, Some(info)) => {
                let params = if info.formals.is_empty() {
                    "void".to_string()
                } else {
                    info.formals
                        .iter()
                        .map(|formal| formal.ty.code())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                let ret = match info.ret_type {
                    BaseType::Void => "void".to_string(),
                    other => other.as_type().code(),
                };
                format!("({}) -> {}", params, ret)
            }
            (ty, _) => ty.code(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            ">> {}: scope = {}{}; type: {}",
            self.name,
            match self.scope {
                Scope::Global => 'G',
                Scope::Local => 'L',
            },
            if self.is_formal { "<formal param>" } else { "" },
            self.type_signature()
        )
    }
}

#[derive(Debug)]
struct ScopeTable {
    entries: IndexVec<SymbolIdx, Symbol>,
    buckets: Vec<Option<SymbolIdx>>,
    generation: u32,
}

impl ScopeTable {
    fn new() -> Self {
        Self {
            entries: IndexVec::new(),
            buckets: vec![None; HASH_TABLE_SIZE],
            generation: 0,
        }
    }

    fn clear(&mut self) {
        self.entries = IndexVec::new();
        self.buckets.iter_mut().for_each(|bucket| *bucket = None);
        self.generation = self.generation.wrapping_add(1);
    }

    fn find(&self, name: &str) -> Option<SymbolIdx> {
        let mut cursor = self.buckets[hash(name)];
        while let Some(idx) = cursor {
            let entry = &self.entries[idx];
            if entry.name == name {
                return Some(idx);
            }
            cursor = entry.next;
        }
        None
    }

    /// Entries in bucket order, newest first within a bucket
    fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.buckets.iter().flat_map(move |head| {
            std::iter::successors(head.map(|idx| &self.entries[idx]), move |entry| {
                entry.next.map(|idx| &self.entries[idx])
            })
        })
    }
}

/// Global and local symbol tables
#[derive(Debug)]
pub struct SymbolTable {
    global: ScopeTable,
    local: ScopeTable,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = Self {
            global: ScopeTable::new(),
            local: ScopeTable::new(),
        };
        table.init(Scope::Global);
        table.init(Scope::Local);
        table
    }

    fn table(&self, scope: Scope) -> &ScopeTable {
        match scope {
            Scope::Global => &self.global,
            Scope::Local => &self.local,
        }
    }

    fn table_mut(&mut self, scope: Scope) -> &mut ScopeTable {
        match scope {
            Scope::Global => &mut self.global,
            Scope::Local => &mut self.local,
        }
    }

    fn handle(&self, scope: Scope, index: SymbolIdx) -> SymbolRef {
        SymbolRef {
            scope,
            index,
            generation: self.table(scope).generation,
        }
    }

    /// Empty every bucket of `scope`; handles into it go stale
    pub fn init(&mut self, scope: Scope) {
        debug!("clearing {} symbol table", scope);
        self.table_mut(scope).clear();
    }

    pub fn lookup(&self, name: &str, scope: Scope) -> Option<SymbolRef> {
        let found = self.table(scope).find(name);
        trace!("lookup {} in {}: {:?}", name, scope, found);
        found.map(|idx| self.handle(scope, idx))
    }

    /// Local first, then global
    pub fn lookup_any(&self, name: &str) -> Option<SymbolRef> {
        self.lookup(name, Scope::Local)
            .or_else(|| self.lookup(name, Scope::Global))
    }

    /// Add `name` to `scope`.
    ///
    /// A name already present in that scope is reported and the existing
    /// entry is returned unchanged.
    pub fn insert(
        &mut self,
        name: &str,
        scope: Scope,
        span: Span,
        reporter: &mut DiagnosticReporter,
    ) -> SymbolRef {
        if let Some(existing) = self.table(scope).find(name) {
            let (previous, _) = reporter.locate(self.table(scope).entries[existing].span);
            reporter.report(
                Diagnostic::error(
                    codes::MULTIPLE_DECLARATION,
                    format!("multiple declarations of {}", name),
                )
                .with_note(format!("previous declaration at {}", previous)),
                span,
            );
            return self.handle(scope, existing);
        }

        let table = self.table_mut(scope);
        let bucket = hash(name);
        let idx = table
            .entries
            .push(Symbol::new(name, scope, span, table.buckets[bucket]));
        table.buckets[bucket] = Some(idx);
        debug!("inserted {} into {} bucket {}", name, scope, bucket);

        self.handle(scope, idx)
    }

    pub fn resolve(&self, symbol: SymbolRef) -> Result<&Symbol, SymbolError> {
        let table = self.table(symbol.scope);
        if table.generation != symbol.generation {
            return Err(SymbolError::Stale {
                scope: symbol.scope,
                handle: symbol.generation,
                current: table.generation,
            });
        }
        table.entries.get(symbol.index).ok_or(SymbolError::Missing {
            scope: symbol.scope,
            index: symbol.index.0,
        })
    }

    pub fn get(&self, symbol: SymbolRef) -> Option<&Symbol> {
        self.resolve(symbol).ok()
    }

    pub fn get_mut(&mut self, symbol: SymbolRef) -> Option<&mut Symbol> {
        let table = self.table_mut(symbol.scope);
        if table.generation != symbol.generation {
            return None;
        }
        table.entries.get_mut(symbol.index)
    }

    /// Entries of `scope` in bucket order
    pub fn symbols(&self, scope: Scope) -> impl Iterator<Item = &Symbol> {
        self.table(scope).iter()
    }

    /// Record the function header staged in `ctx` as a prototype or a
    /// definition, reconciling it with any earlier declaration.
    ///
    /// Every staged parameter is inserted into the current scope as a
    /// formal. Returns the function's entry, or `None` when nothing was
    /// staged.
    pub fn record_function_info(
        &mut self,
        ctx: &mut FunctionContext,
        is_proto: bool,
        reporter: &mut DiagnosticReporter,
    ) -> Option<SymbolRef> {
        let pending = ctx.pending.take()?;
        debug!(
            "recording {} {} with {} parameter(s)",
            if is_proto { "prototype" } else { "definition" },
            pending.name,
            pending.params.len()
        );

        let (func, write_signature) = match self.lookup(&pending.name, Scope::Global) {
            None => (
                self.insert(&pending.name, Scope::Global, pending.span, reporter),
                true,
            ),
            Some(func) => {
                let previous = self.get(func).and_then(|symbol| symbol.function.clone());
                match previous {
                    Some(info) if info.proto_state == ProtoState::PrototypeSeen && !is_proto => {
                        check_against_prototype(&info, &pending, reporter);
                        (func, true)
                    }
                    _ => {
                        reporter.report(
                            Diagnostic::error(
                                codes::MULTIPLE_DEFINITIONS,
                                format!("Multiple prototypes/definitions for function {}", pending.name),
                            ),
                            pending.span,
                        );
                        (func, false)
                    }
                }
            }
        };

        let mut formals = Vec::with_capacity(pending.params.len());
        for param in &pending.params {
            if param.ty == BaseType::Void {
                reporter.report(
                    Diagnostic::error(
                        codes::VOID_VARIABLE,
                        format!("Illegal type [void] for identifier {}", param.name),
                    ),
                    param.span,
                );
                continue;
            }

            let entry = self.insert(&param.name, ctx.scope, param.span, reporter);
            if let Some(symbol) = self.get_mut(entry) {
                symbol.is_formal = true;
                symbol.ty = param.param_type();
                formals.push(Formal {
                    name: symbol.name.clone(),
                    scope: symbol.scope,
                    is_formal: true,
                    ty: symbol.ty,
                });
            }
        }

        if write_signature {
            if let Some(symbol) = self.get_mut(func) {
                let state = match symbol.function.as_ref().map(|info| info.proto_state) {
                    Some(ProtoState::Defined) => ProtoState::Defined,
                    _ if is_proto => ProtoState::PrototypeSeen,
                    _ => ProtoState::Defined,
                };
                symbol.ty = Type::Function;
                symbol.function = Some(FunctionInfo {
                    ret_type: pending.ret_type,
                    formals,
                    proto_state: state,
                    is_extern: ctx.is_extern,
                });
            }
        }

        Some(func)
    }

    /// Forget the staged function and clear the local scope
    pub fn cleanup_function_info(&mut self, ctx: &mut FunctionContext) {
        ctx.reset();
        self.init(Scope::Local);
    }

    /// Human-readable listing of one scope, one entry per line
    pub fn dump(&self, scope: Scope) -> String {
        let mut out = String::new();
        for symbol in self.symbols(scope) {
            let _ = writeln!(out, "{}", symbol);
        }
        out
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

fn check_against_prototype(
    proto: &FunctionInfo,
    definition: &PendingFunction,
    reporter: &mut DiagnosticReporter,
) {
    let name = &definition.name;

    for (n, (formal, param)) in proto.formals.iter().zip(&definition.params).enumerate() {
        if formal.ty != param.param_type() {
            reporter.report(
                Diagnostic::error(
                    codes::PROTOTYPE_ARGUMENT_MISMATCH,
                    format!(
                        "function {}: type of argument {} does not match that of prototype",
                        name,
                        n + 1
                    ),
                )
                .with_note(format!(
                    "prototype declares {}, definition has {}",
                    formal.ty,
                    param.param_type()
                )),
                param.span,
            );
        }
    }

    if proto.formals.len() != definition.params.len() {
        reporter.report(
            Diagnostic::error(
                codes::PROTOTYPE_ARITY_MISMATCH,
                format!(
                    "function {}: no of arguments in definition does not match prototype",
                    name
                ),
            )
            .with_note(format!(
                "prototype takes {}, definition takes {}",
                proto.formals.len(),
                definition.params.len()
            )),
            definition.span,
        );
    }

    if proto.ret_type != definition.ret_type {
        reporter.report(
            Diagnostic::error(
                codes::PROTOTYPE_RETURN_MISMATCH,
                format!("function {}: return type does not match that of prototype", name),
            ),
            definition.span,
        );
    }

    if proto.is_extern {
        reporter.report(
            Diagnostic::error(
                codes::EXTERN_REDEFINITION,
                format!("function {} was previously defined as EXTERN", name),
            ),
            definition.span,
        );
    }
}
