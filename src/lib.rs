//! uigraph
//!
//! Compiles declarative component trees into units that rebuild the object
//! graph at runtime, resolving every symbol by naming convention against an
//! external class library.
//!
//! # Example
//!
//! ```
//! use uigraph::{ClassRegistry, CompilerOptions, LiteralExpr, Span, Tree, TypeRef, UnitDriver, UnitSource};
//!
//! let mut registry = ClassRegistry::new();
//! registry
//!     .class("JWindow")
//!     .default_constructor()
//!     .method("setTitle", vec![TypeRef::class("String")], TypeRef::Void)
//!     .register()
//!     .unwrap();
//!
//! let mut tree = Tree::new("window", Span::new(1, 1, 6));
//! let root = tree.root();
//! tree.add_scalar(root, "title", Span::new(2, 5, 5), LiteralExpr::string("Hi", Span::new(2, 13, 4)));
//!
//! let options = CompilerOptions::default();
//! let driver = UnitDriver::new(&registry, &options);
//! let result = driver.compile(UnitSource::new("MainWindow", tree)).unwrap();
//!
//! let unit = result.unit.unwrap();
//! assert!(unit.field("window$title").is_some());
//! ```

mod batch;

pub use batch::compile_batch;

pub use uigraph_core::{
    ClassName, CompileError, ConstructorRef, Diagnostic, DiagnosticKind, Diagnostics,
    LookupError, MethodRef, PrimitiveKind, RegistrationError, Span, TypeHash, TypeRef,
};
pub use uigraph_registry::{ClassBuilder, ClassLibrary, ClassRegistry};
pub use uigraph_compiler::{
    CompilationResult, CompiledUnit, CompilerOptions, Expr, FieldDecl, FieldTable, Literal,
    LiteralExpr, LocalVarInfo, MemberFlags, NodeBinding, NodeId, Procedure, PropertyBinding,
    Tree, UnitDriver, UnitSource, Value,
};

pub mod bytecode {
    pub use uigraph_compiler::bytecode::*;
}
