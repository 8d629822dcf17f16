//! Unit Driver - resolve, bind and emit one tree.
//!
//! Phases run strictly in order and each one finishes before the next starts:
//!
//! 1. syntax errors from the parser: skip the unit if there are any
//! 2. type resolution, then binding (diagnostics accumulate)
//! 3. skip the unit if anything was reported
//! 4. field table, initializer and entry point
//!
//! A skipped unit is not a failure of the driver: [`UnitDriver::compile`]
//! returns `Ok` with no unit and every diagnostic. `Err` means an internal
//! inconsistency or a class library defect.

use tracing::{debug, warn};
use uigraph_core::{CompileError, Diagnostics, TypeHash, TypeRef};
use uigraph_registry::ClassLibrary;

use crate::bytecode::ConstantPool;
use crate::config::CompilerOptions;
use crate::context::ResolveContext;
use crate::field_table::FieldTable;
use crate::graph_emitter::{GraphEmitter, emit_entry_point};
use crate::passes::{BindingPass, TypeResolutionPass};
use crate::tree::Tree;
use crate::unit::{CompiledUnit, FieldDecl, MemberFlags, Procedure};

/// One parsed source: the tree plus whatever the parser reported.
#[derive(Debug)]
pub struct UnitSource {
    /// Simple name of the unit to emit.
    pub name: String,
    pub tree: Tree,
    pub syntax_errors: Diagnostics,
}

impl UnitSource {
    pub fn new(name: impl Into<String>, tree: Tree) -> Self {
        Self {
            name: name.into(),
            tree,
            syntax_errors: Diagnostics::new(),
        }
    }

    pub fn with_syntax_errors(mut self, errors: Diagnostics) -> Self {
        self.syntax_errors = errors;
        self
    }
}

#[derive(Debug)]
pub struct CompilationResult {
    /// `None` when the unit was skipped.
    pub unit: Option<CompiledUnit>,
    pub diagnostics: Diagnostics,
}

impl CompilationResult {
    pub fn is_success(&self) -> bool {
        self.unit.is_some() && self.diagnostics.is_empty()
    }
}

/// Compiles units against one class library and one set of options.
pub struct UnitDriver<'a> {
    library: &'a dyn ClassLibrary,
    options: &'a CompilerOptions,
}

impl<'a> UnitDriver<'a> {
    pub fn new(library: &'a dyn ClassLibrary, options: &'a CompilerOptions) -> Self {
        Self { library, options }
    }

    /// Run type resolution and binding over `tree`, returning what they reported.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(&self, tree: &mut Tree) -> Result<Diagnostics, CompileError> {
        let ctx = ResolveContext::new(self.library, self.options);
        let mut diagnostics = Diagnostics::new();

        let types = TypeResolutionPass::new(ctx).run(tree, &mut diagnostics);
        debug!(
            resolved = types.nodes_resolved,
            unresolved = types.nodes_unresolved,
            "type resolution finished"
        );

        let bindings = BindingPass::new(ctx).run(tree, &mut diagnostics)?;
        debug!(
            constructors = bindings.constructors,
            getters = bindings.getters,
            setters = bindings.setters,
            adders = bindings.adders,
            diagnostics = diagnostics.len(),
            "binding finished"
        );
        Ok(diagnostics)
    }

    /// Emit a unit from a fully bound tree.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn emit(&self, name: &str, tree: &Tree) -> Result<CompiledUnit, CompileError> {
        let class = self.options.unit_class(name);
        let unit_hash = class.type_hash();
        let table = FieldTable::build(tree);
        debug!(unit = %class, fields = table.len(), "field table built");

        let fields = table
            .iter()
            .map(|(name, ty)| FieldDecl {
                name: name.to_string(),
                ty: ty.clone(),
                flags: MemberFlags::PUBLIC | MemberFlags::STATIC,
                hash: TypeHash::from_field(unit_hash, name),
            })
            .collect();

        let mut constants = ConstantPool::new();
        let init = GraphEmitter::new(tree, &table, unit_hash).emit_initializer(&mut constants)?;
        let init_name = self.options.initializer_name.as_str();
        let entry_code = emit_entry_point(&mut constants, unit_hash, init_name)?;
        debug!(unit = %class, init_size = init.code.len(), locals = init.max_locals, "emitted initializer");

        let throws = vec![self.options.failure_type.clone()];
        let initializer = Procedure {
            name: init_name.to_string(),
            hash: TypeHash::from_procedure(unit_hash, init_name),
            flags: MemberFlags::PUBLIC | MemberFlags::STATIC,
            params: Vec::new(),
            return_type: TypeRef::Void,
            throws: throws.clone(),
            code: init.code,
            locals: init.locals,
            max_locals: init.max_locals,
        };
        let entry_name = self.options.entry_point_name.as_str();
        let entry_point = Procedure {
            name: entry_name.to_string(),
            hash: TypeHash::from_procedure(unit_hash, entry_name),
            flags: MemberFlags::PUBLIC | MemberFlags::STATIC,
            params: Vec::new(),
            return_type: TypeRef::Void,
            throws,
            code: entry_code,
            locals: Vec::new(),
            max_locals: 0,
        };

        Ok(CompiledUnit {
            name: class,
            hash: unit_hash,
            fields,
            procedures: vec![initializer, entry_point],
            constants,
        })
    }

    /// Compile one source end to end.
    pub fn compile(&self, source: UnitSource) -> Result<CompilationResult, CompileError> {
        let UnitSource {
            name,
            mut tree,
            syntax_errors,
        } = source;

        if !syntax_errors.is_empty() {
            warn!(unit = %name, count = syntax_errors.len(), "Skipping unit with syntax errors");
            return Ok(CompilationResult {
                unit: None,
                diagnostics: syntax_errors,
            });
        }

        debug!(unit = %name, nodes = tree.len(), "resolving");
        let diagnostics = self.resolve(&mut tree)?;
        if !diagnostics.is_empty() {
            warn!(unit = %name, count = diagnostics.len(), "Skipping unit with unresolved symbols");
            return Ok(CompilationResult {
                unit: None,
                diagnostics,
            });
        }

        let unit = self.emit(&name, &tree)?;
        Ok(CompilationResult {
            unit: Some(unit),
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::OpCode;
    use crate::tree::LiteralExpr;
    use uigraph_core::{ClassName, Diagnostic, Span};
    use uigraph_registry::ClassRegistry;

    fn registry() -> ClassRegistry {
        let mut r = ClassRegistry::new();
        r.class("JWindow")
            .default_constructor()
            .method("setTitle", vec![TypeRef::class("String")], TypeRef::Void)
            .register()
            .unwrap();
        r
    }

    fn window() -> Tree {
        let mut tree = Tree::new("window", Span::new(1, 1, 6));
        let root = tree.root();
        tree.add_scalar(root, "title", Span::new(2, 5, 5), LiteralExpr::string("Hi", Span::new(2, 13, 4)));
        tree
    }

    #[test]
    fn compiles_unit_with_both_procedures() {
        let registry = registry();
        let options = CompilerOptions::default().with_unit_package("app.ui");
        let driver = UnitDriver::new(&registry, &options);

        let result = driver.compile(UnitSource::new("MainWindow", window())).unwrap();
        assert!(result.is_success());
        let unit = result.unit.unwrap();
        assert_eq!(unit.name, ClassName::parse("app.ui.MainWindow"));
        assert_eq!(
            unit.fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["window", "window$title"]
        );
        assert!(unit.fields.iter().all(|f| f.flags == MemberFlags::PUBLIC | MemberFlags::STATIC));

        let init = unit.procedure("init").unwrap();
        assert!(init.params.is_empty());
        assert_eq!(init.throws, vec![ClassName::global("Exception")]);
        assert_eq!(init.max_locals, 1);

        let main = unit.procedure("main").unwrap();
        main.code.assert_opcodes(&[OpCode::Call, OpCode::ReturnVoid]);
    }

    #[test]
    fn syntax_errors_skip_every_phase() {
        let registry = registry();
        let options = CompilerOptions::default();
        let driver = UnitDriver::new(&registry, &options);

        let mut errors = Diagnostics::new();
        errors.push(Diagnostic::Syntax {
            message: "expected '{'".into(),
            span: Span::new(1, 8, 1),
        });
        let source = UnitSource::new("Broken", Tree::new("bogus", Span::ORIGIN)).with_syntax_errors(errors);

        let result = driver.compile(source).unwrap();
        assert!(result.unit.is_none());
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn diagnostics_skip_emission() {
        let registry = registry();
        let options = CompilerOptions::default();
        let driver = UnitDriver::new(&registry, &options);

        let result = driver
            .compile(UnitSource::new("Bad", Tree::new("bogus", Span::ORIGIN)))
            .unwrap();
        assert!(!result.is_success());
        assert!(result.unit.is_none());
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn disassembly_names_fields() {
        let registry = registry();
        let options = CompilerOptions::default();
        let driver = UnitDriver::new(&registry, &options);
        let unit = driver
            .compile(UnitSource::new("Main", window()))
            .unwrap()
            .unit
            .unwrap();

        let text = unit.disassemble(unit.procedure("init").unwrap());
        assert!(text.contains("window$title: String"));
        assert!(text.contains("JWindow.setTitle(String) -> void"));
    }
}
