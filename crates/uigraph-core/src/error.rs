//! Error types for uigraph.
//!
//! ## Error Hierarchy
//!
//! ```text
//! Diagnostic         - user-facing, accumulated per unit, never thrown
//! LookupError        - a class-library lookup found nothing or could not decide
//! RegistrationError  - building an in-memory class library
//! CompileError       - fatal: the unit cannot be finished at all
//! ```
//!
//! Type resolution and binding push [`Diagnostic`]s into [`Diagnostics`] and keep
//! going. A unit with any diagnostic is skipped as a whole. [`CompileError`] is
//! reserved for broken internal invariants, such as an ambiguous overload or an
//! unbound property reaching the emitter.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Diagnostics
// ============================================================================

/// Categories of diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Reported by the external parser; the unit is skipped before resolution.
    SyntaxError,
    /// A node's derived lookup name has no class in the library.
    UnresolvedComponentType,
    /// The root, or a constructor-bound nested node, has no zero-argument constructor.
    MissingDefaultConstructor,
    /// No setter, getter or adder overload matches a property.
    UnresolvedProperty,
    /// Two stored members of one node share a qualified name.
    DuplicateField,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::SyntaxError => "syntax error",
            DiagnosticKind::UnresolvedComponentType => "unresolved component type",
            DiagnosticKind::MissingDefaultConstructor => "missing default constructor",
            DiagnosticKind::UnresolvedProperty => "unresolved property",
            DiagnosticKind::DuplicateField => "duplicate field",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single user-facing diagnostic with its location and message arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("at {span}: {message}")]
    Syntax { message: String, span: Span },

    #[error("at {span}: unknown component type '{name}' (no class named '{lookup_name}')")]
    UnresolvedComponentType {
        /// The node name as written.
        name: String,
        /// The class name derived from it by the naming convention.
        lookup_name: String,
        span: Span,
    },

    #[error("at {span}: type '{type_name}' has no zero-argument constructor")]
    MissingDefaultConstructor { type_name: String, span: Span },

    #[error("at {span}: unknown property '{key}' on type '{type_name}'")]
    UnresolvedProperty {
        key: String,
        type_name: String,
        span: Span,
    },

    #[error("at {span}: field '{name}' is already declared")]
    DuplicateField { name: String, span: Span },
}

impl Diagnostic {
    pub fn span(&self) -> Span {
        match self {
            Diagnostic::Syntax { span, .. } => *span,
            Diagnostic::UnresolvedComponentType { span, .. } => *span,
            Diagnostic::MissingDefaultConstructor { span, .. } => *span,
            Diagnostic::UnresolvedProperty { span, .. } => *span,
            Diagnostic::DuplicateField { span, .. } => *span,
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::Syntax { .. } => DiagnosticKind::SyntaxError,
            Diagnostic::UnresolvedComponentType { .. } => DiagnosticKind::UnresolvedComponentType,
            Diagnostic::MissingDefaultConstructor { .. } => {
                DiagnosticKind::MissingDefaultConstructor
            }
            Diagnostic::UnresolvedProperty { .. } => DiagnosticKind::UnresolvedProperty,
            Diagnostic::DuplicateField { .. } => DiagnosticKind::DuplicateField,
        }
    }
}

/// Ordered collection of diagnostics for one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of diagnostics of one kind.
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind() == kind).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, diagnostic) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Lookup Errors
// ============================================================================

/// Failure of a member lookup against the class library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no member '{name}' on '{owner}' accepts ({args})")]
    NotFound {
        owner: String,
        name: String,
        args: String,
    },

    /// Two or more overloads are equally specific for the argument types.
    #[error("ambiguous lookup of '{name}' on '{owner}': could be {candidates}")]
    Ambiguous {
        owner: String,
        name: String,
        candidates: String,
    },
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while populating an in-memory class library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("duplicate class: {0}")]
    DuplicateClass(String),

    #[error("duplicate member '{member}' on class '{class}'")]
    DuplicateMember { class: String, member: String },

    #[error("class '{0}' cannot extend itself")]
    SelfInheritance(String),
}

// ============================================================================
// Fatal Compile Errors
// ============================================================================

/// Fatal failures that abort a unit.
///
/// None of these can be caused by user input once binding reported no
/// diagnostics; they indicate a violated invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("node '{name}' reached emission without a binding")]
    UnboundNode { name: String },

    #[error("property '{name}' reached emission without a binding")]
    UnboundProperty { name: String },

    #[error("no field slot named '{name}'")]
    MissingField { name: String },

    #[error("operand {value} does not fit in {bits} bits")]
    OperandOverflow { value: usize, bits: u32 },
}

impl CompileError {
    pub fn internal(message: impl Into<String>) -> Self {
        CompileError::Internal {
            message: message.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
