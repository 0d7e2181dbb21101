//! The C-- type lattice.

use std::fmt;

/// Element type of an array, or the type of a scalar variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int,
    Char,
}

impl ScalarType {
    fn code(self) -> &'static str {
        match self {
            ScalarType::Int => "I",
            ScalarType::Char => "C",
        }
    }
}

/// The type attached to symbols and syntax tree nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Type {
    /// Statements, void functions, and entries not yet typed
    #[default]
    Void,
    Int,
    Char,
    /// Result of comparisons and logical operators; never declarable
    Bool,
    Array(ScalarType),
    Function,
    /// Sentinel for a subtree that already produced a diagnostic
    Error,
}

impl Type {
    /// Int or Char, the operand types arithmetic accepts
    pub fn is_arith(self) -> bool {
        matches!(self, Type::Int | Type::Char)
    }

    pub fn is_error(self) -> bool {
        self == Type::Error
    }

    pub fn is_array(self) -> bool {
        matches!(self, Type::Array(_))
    }

    /// Element type of an array type
    pub fn elt_type(self) -> Option<ScalarType> {
        match self {
            Type::Array(elt) => Some(elt),
            _ => None,
        }
    }

    /// Compact signature used in symbol table dumps
    pub fn code(self) -> String {
        match self {
            Type::Void => "-".to_string(),
            Type::Int => "I".to_string(),
            Type::Char => "C".to_string(),
            Type::Bool => "B".to_string(),
            Type::Array(elt) => format!("{}[]", elt.code()),
            Type::Function => "F".to_string(),
            Type::Error => "?".to_string(),
        }
    }
}

impl From<ScalarType> for Type {
    fn from(scalar: ScalarType) -> Self {
        match scalar {
            ScalarType::Int => Type::Int,
            ScalarType::Char => Type::Char,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Int => write!(f, "int"),
            Type::Char => write!(f, "char"),
            Type::Bool => write!(f, "bool"),
            Type::Array(ScalarType::Int) => write!(f, "int[]"),
            Type::Array(ScalarType::Char) => write!(f, "char[]"),
            Type::Function => write!(f, "function"),
            Type::Error => write!(f, "<error>"),
        }
    }
}

/// A type keyword as written in a declaration: `int`, `char` or `void`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BaseType {
    Int,
    Char,
    #[default]
    Void,
}

impl BaseType {
    pub fn scalar(self) -> Option<ScalarType> {
        match self {
            BaseType::Int => Some(ScalarType::Int),
            BaseType::Char => Some(ScalarType::Char),
            BaseType::Void => None,
        }
    }

    pub fn as_type(self) -> Type {
        match self {
            BaseType::Int => Type::Int,
            BaseType::Char => Type::Char,
            BaseType::Void => Type::Void,
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_type().fmt(f)
    }
}
