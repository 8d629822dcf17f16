//! Binding Pass - attach constructors, getters, setters and adders.
//!
//! ## Algorithm
//!
//! Runs after type resolution has finished for the whole tree.
//!
//! 1. The root must have a zero-argument constructor; it is bound
//!    `ViaConstructor`.
//! 2. Walk each node's properties in order:
//!    - `List`: resolve `add<Key>` once per item against the item's type.
//!      Items fail independently.
//!    - `Nested`: bind the child first, then prefer a `get<Key>()` accessor on
//!      the owner whose result is assignable to the child's type. Without one
//!      the child is constructed and needs a zero-argument constructor.
//!    - `Scalar`: resolve `set<Key>` against the value's type.
//!    - `Reference`: left alone.
//! 3. Every selected member's parameter type is pushed back into the value
//!    expression with [`Expr::resolve`](crate::tree::Expr::resolve).
//!
//! Nodes without a resolved type are skipped silently; type resolution
//! already reported them. Lookup failures become diagnostics, ambiguous
//! lookups abort with [`CompileError::Lookup`].
//!
//! The root, constructed nodes and setter properties each claim a static
//! field named by their qualified name. A second claim on the same name is
//! reported as `DuplicateField` and that member stays unbound.

use rustc_hash::FxHashSet;
use tracing::trace;
use uigraph_core::{CompileError, Diagnostic, Diagnostics, LookupError, MethodRef, Span, TypeRef};

use crate::context::ResolveContext;
use crate::naming;
use crate::tree::{NodeBinding, NodeId, PropertyBinding, Tree, Value};

/// Counts of what the binding pass selected.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BindingOutput {
    pub constructors: usize,
    pub getters: usize,
    pub setters: usize,
    pub adders: usize,
}

/// Mutable state threaded through one run.
struct BindState<'d> {
    diagnostics: &'d mut Diagnostics,
    output: BindingOutput,
    fields: FxHashSet<String>,
}

impl BindState<'_> {
    /// Reserve a field name, reporting a duplicate when it is already taken.
    fn claim_field(&mut self, name: &str, span: Span) -> bool {
        if self.fields.insert(name.to_string()) {
            return true;
        }
        self.diagnostics.push(Diagnostic::DuplicateField {
            name: name.to_string(),
            span,
        });
        false
    }
}

pub struct BindingPass<'a> {
    ctx: ResolveContext<'a>,
}

impl<'a> BindingPass<'a> {
    pub fn new(ctx: ResolveContext<'a>) -> Self {
        Self { ctx }
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(
        self,
        tree: &mut Tree,
        diagnostics: &mut Diagnostics,
    ) -> Result<BindingOutput, CompileError> {
        let mut state = BindState {
            diagnostics,
            output: BindingOutput::default(),
            fields: FxHashSet::default(),
        };
        let root = tree.root();

        if let Some(ty) = tree.node(root).resolved_type.clone() {
            let span = tree.node(root).span;
            state.fields.insert(tree.node(root).qualified_name.clone());
            match self.ctx.library.resolve_zero_arg_constructor(&ty) {
                Some(ctor) => {
                    tree.node_mut(root).binding = NodeBinding::ViaConstructor(ctor);
                    state.output.constructors += 1;
                }
                None => state.diagnostics.push(Diagnostic::MissingDefaultConstructor {
                    type_name: ty.to_string(),
                    span,
                }),
            }
        }

        self.bind_node(tree, root, &mut state)?;
        Ok(state.output)
    }

    fn bind_node(
        &self,
        tree: &mut Tree,
        id: NodeId,
        state: &mut BindState<'_>,
    ) -> Result<(), CompileError> {
        let owner = tree.node(id).resolved_type.clone();

        for index in 0..tree.node(id).properties.len() {
            let child = match tree.node(id).properties[index].value {
                Value::Nested(child) => Some(child),
                _ => None,
            };

            if let Some(child) = child {
                self.bind_node(tree, child, state)?;
                if let Some(owner) = &owner {
                    self.bind_nested(tree, id, index, owner, child, state)?;
                }
                continue;
            }

            let Some(owner) = &owner else { continue };
            let property = &mut tree.node_mut(id).properties[index];
            match &mut property.value {
                Value::Scalar(expr) => {
                    let name = naming::setter_name(&property.key);
                    let arg = expr.type_of();
                    trace!(property = %property.qualified_name, %name, %arg, "binding setter");
                    match self.lookup(owner, &name, &[arg])? {
                        Some(method) => {
                            if !state.claim_field(&property.qualified_name, property.span) {
                                property.binding = PropertyBinding::Unbound;
                                continue;
                            }
                            resolve_against(expr.as_mut(), &method, state.diagnostics);
                            property.binding = PropertyBinding::Setter(method);
                            state.output.setters += 1;
                        }
                        None => {
                            state.diagnostics.push(Diagnostic::UnresolvedProperty {
                                key: property.key.clone(),
                                type_name: owner.to_string(),
                                span: property.span,
                            });
                            property.binding = PropertyBinding::Unbound;
                        }
                    }
                }
                Value::List(items) => {
                    let name = naming::adder_name(&property.key);
                    let mut adders = Vec::with_capacity(items.len());
                    for item in items.iter_mut() {
                        let arg = item.type_of();
                        trace!(property = %property.qualified_name, %name, %arg, "binding adder");
                        match self.lookup(owner, &name, &[arg])? {
                            Some(method) => {
                                resolve_against(item.as_mut(), &method, state.diagnostics);
                                adders.push(Some(method));
                                state.output.adders += 1;
                            }
                            None => {
                                state.diagnostics.push(Diagnostic::UnresolvedProperty {
                                    key: property.key.clone(),
                                    type_name: owner.to_string(),
                                    span: item.span(),
                                });
                                adders.push(None);
                            }
                        }
                    }
                    property.binding = PropertyBinding::Adder(adders);
                }
                Value::Nested(_) | Value::Reference(_) => {}
            }
        }
        Ok(())
    }

    fn bind_nested(
        &self,
        tree: &mut Tree,
        owner_id: NodeId,
        index: usize,
        owner: &TypeRef,
        child: NodeId,
        state: &mut BindState<'_>,
    ) -> Result<(), CompileError> {
        let Some(child_ty) = tree.node(child).resolved_type.clone() else {
            return Ok(());
        };
        let key = &tree.node(owner_id).properties[index].key;
        let getter = naming::getter_name(key);
        trace!(node = %tree.node(child).qualified_name, %getter, "binding nested node");

        let getter = self.lookup(owner, &getter, &[])?.filter(|method| {
            method.returns_value() && self.ctx.library.is_assignable(&method.return_type, &child_ty)
        });
        let node = tree.node(child);
        let binding = match getter {
            Some(method) => {
                state.output.getters += 1;
                NodeBinding::ViaGetter(method)
            }
            None => match self.ctx.library.resolve_zero_arg_constructor(&child_ty) {
                Some(ctor) => {
                    if state.claim_field(&node.qualified_name, node.span) {
                        state.output.constructors += 1;
                        NodeBinding::ViaConstructor(ctor)
                    } else {
                        NodeBinding::Unbound
                    }
                }
                None => {
                    state.diagnostics.push(Diagnostic::MissingDefaultConstructor {
                        type_name: child_ty.to_string(),
                        span: node.span,
                    });
                    NodeBinding::Unbound
                }
            },
        };
        tree.node_mut(child).binding = binding;
        Ok(())
    }

    /// `Ok(None)` when nothing applies; ambiguity is fatal.
    fn lookup(
        &self,
        owner: &TypeRef,
        name: &str,
        args: &[TypeRef],
    ) -> Result<Option<MethodRef>, CompileError> {
        match self.ctx.library.resolve_method(owner, name, args) {
            Ok(method) => Ok(Some(method)),
            Err(LookupError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

fn resolve_against(
    expr: &mut dyn crate::tree::Expr,
    method: &MethodRef,
    diagnostics: &mut Diagnostics,
) {
    if let Some(param) = method.params.first() {
        expr.resolve(param, diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompilerOptions;
    use crate::passes::TypeResolutionPass;
    use crate::tree::LiteralExpr;
    use uigraph_core::{ClassName, ConstructorRef, DiagnosticKind, PrimitiveKind, Span};
    use uigraph_registry::ClassRegistry;

    fn int() -> TypeRef {
        PrimitiveKind::Int32.into()
    }

    fn registry() -> ClassRegistry {
        let mut r = ClassRegistry::new();
        r.class("JComponent")
            .method("add", vec![TypeRef::class("JComponent")], TypeRef::class("JComponent"))
            .register()
            .unwrap();
        r.class("JFrame")
            .extends("JComponent")
            .default_constructor()
            .method("setTitle", vec![TypeRef::class("String")], TypeRef::Void)
            .method("getContentPane", vec![], TypeRef::class("JPanel"))
            .method("setWidth", vec![PrimitiveKind::Int64.into()], TypeRef::Void)
            .register()
            .unwrap();
        r.class("JPanel")
            .extends("JComponent")
            .default_constructor()
            .method("addItem", vec![int()], TypeRef::Void)
            .method("addItem", vec![TypeRef::class("String")], TypeRef::Void)
            .register()
            .unwrap();
        r.class("JButton")
            .extends("JComponent")
            .default_constructor()
            .register()
            .unwrap();
        r.class("JBorder").abstract_class().register().unwrap();
        r
    }

    fn resolve_and_bind(
        registry: &ClassRegistry,
        tree: &mut Tree,
    ) -> Result<(BindingOutput, Diagnostics), CompileError> {
        let options = CompilerOptions::default();
        let ctx = ResolveContext::new(registry, &options);
        let mut diagnostics = Diagnostics::new();
        TypeResolutionPass::new(ctx).run(tree, &mut diagnostics);
        let output = BindingPass::new(ctx).run(tree, &mut diagnostics)?;
        Ok((output, diagnostics))
    }

    #[test]
    fn root_is_constructed_and_scalar_uses_setter() {
        let registry = registry();
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        tree.add_scalar(root, "title", Span::ORIGIN, LiteralExpr::string("Hi", Span::ORIGIN));

        let (output, diagnostics) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(output.setters, 1);
        assert_eq!(
            tree.node(root).binding,
            NodeBinding::ViaConstructor(ConstructorRef::default_for(ClassName::global("JFrame")))
        );
        match &tree.node(root).properties[0].binding {
            PropertyBinding::Setter(m) => assert_eq!(m.name, "setTitle"),
            other => panic!("unexpected binding {other:?}"),
        }
    }

    #[test]
    fn setter_argument_is_widened_to_parameter() {
        let registry = registry();
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        tree.add_scalar(root, "width", Span::ORIGIN, LiteralExpr::int(640, Span::ORIGIN));

        let (_, diagnostics) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert!(diagnostics.is_empty());
        match &tree.node(root).properties[0].value {
            Value::Scalar(expr) => assert_eq!(expr.type_of(), PrimitiveKind::Int64.into()),
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn getter_takes_precedence_over_constructor() {
        let registry = registry();
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        let panel = tree.add_node(root, "contentPane", "panel", Span::ORIGIN);

        let (output, diagnostics) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(output.getters, 1);
        match &tree.node(panel).binding {
            NodeBinding::ViaGetter(m) => assert_eq!(m.name, "getContentPane"),
            other => panic!("unexpected binding {other:?}"),
        }
    }

    fn registry_with_getter(return_type: TypeRef) -> ClassRegistry {
        let mut r = ClassRegistry::new();
        r.class("JLabel").default_constructor().register().unwrap();
        r.class("JPanel").default_constructor().register().unwrap();
        r.class("JScrollPanel")
            .extends("JPanel")
            .default_constructor()
            .register()
            .unwrap();
        r.class("JFrame")
            .default_constructor()
            .method("getContentPane", vec![], return_type)
            .register()
            .unwrap();
        r
    }

    #[test]
    fn void_getter_falls_back_to_constructor() {
        let registry = registry_with_getter(TypeRef::Void);
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        let panel = tree.add_node(root, "contentPane", "panel", Span::ORIGIN);

        let (output, diagnostics) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(output.getters, 0);
        assert_eq!(
            tree.node(panel).binding,
            NodeBinding::ViaConstructor(ConstructorRef::default_for(ClassName::global("JPanel")))
        );
    }

    #[test]
    fn getter_with_unrelated_result_falls_back_to_constructor() {
        let registry = registry_with_getter(TypeRef::class("JLabel"));
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        let panel = tree.add_node(root, "contentPane", "panel", Span::ORIGIN);

        let (output, _) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert_eq!(output.getters, 0);
        assert!(matches!(tree.node(panel).binding, NodeBinding::ViaConstructor(_)));
    }

    #[test]
    fn getter_returning_subtype_is_accepted() {
        let registry = registry_with_getter(TypeRef::class("JScrollPanel"));
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        let panel = tree.add_node(root, "contentPane", "panel", Span::ORIGIN);

        let (output, _) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert_eq!(output.getters, 1);
        assert!(matches!(tree.node(panel).binding, NodeBinding::ViaGetter(_)));
    }

    #[test]
    fn nested_without_getter_is_constructed() {
        let registry = registry();
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        let button = tree.add_node(root, "ok", "button", Span::ORIGIN);

        let (_, diagnostics) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(
            tree.node(button).binding,
            NodeBinding::ViaConstructor(ConstructorRef::default_for(ClassName::global("JButton")))
        );
    }

    #[test]
    fn abstract_child_reports_missing_constructor() {
        let registry = registry();
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        let border = tree.add_node(root, "edge", "border", Span::new(3, 2, 6));

        let (_, diagnostics) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert_eq!(
            diagnostics.into_vec(),
            vec![Diagnostic::MissingDefaultConstructor {
                type_name: "JBorder".into(),
                span: Span::new(3, 2, 6),
            }]
        );
        assert_eq!(tree.node(border).binding, NodeBinding::Unbound);
    }

    #[test]
    fn abstract_root_reports_missing_constructor() {
        let registry = registry();
        let mut tree = Tree::new("border", Span::new(1, 1, 6));
        let (_, diagnostics) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert_eq!(diagnostics.count_of(DiagnosticKind::MissingDefaultConstructor), 1);
    }

    #[test]
    fn list_items_bind_independently() {
        let registry = registry();
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        let panel = tree.add_node(root, "center", "panel", Span::ORIGIN);
        tree.add_list(
            panel,
            "item",
            Span::ORIGIN,
            vec![
                LiteralExpr::int(1, Span::new(5, 1, 1)),
                LiteralExpr::double(2.5, Span::new(5, 4, 3)),
                LiteralExpr::string("three", Span::new(5, 9, 7)),
            ],
        );

        let (output, diagnostics) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert_eq!(output.adders, 2);
        assert_eq!(
            diagnostics.into_vec(),
            vec![Diagnostic::UnresolvedProperty {
                key: "item".into(),
                type_name: "JPanel".into(),
                span: Span::new(5, 4, 3),
            }]
        );
        match &tree.node(panel).properties[0].binding {
            PropertyBinding::Adder(adders) => {
                assert!(adders[0].is_some());
                assert!(adders[1].is_none());
                assert_eq!(adders[2].as_ref().map(|m| m.params[0].clone()), Some(TypeRef::class("String")));
            }
            other => panic!("unexpected binding {other:?}"),
        }
    }

    #[test]
    fn unknown_setter_is_reported() {
        let registry = registry();
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        tree.add_scalar(root, "colour", Span::new(2, 2, 6), LiteralExpr::int(1, Span::ORIGIN));

        let (_, diagnostics) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert_eq!(
            diagnostics.into_vec(),
            vec![Diagnostic::UnresolvedProperty {
                key: "colour".into(),
                type_name: "JFrame".into(),
                span: Span::new(2, 2, 6),
            }]
        );
        assert_eq!(tree.node(root).properties[0].binding, PropertyBinding::Unbound);
    }

    #[test]
    fn references_are_inert() {
        let registry = registry();
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        tree.add_reference(root, "defaultButton", "ok", Span::ORIGIN);

        let (_, diagnostics) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(tree.node(root).properties[0].binding, PropertyBinding::Unbound);
    }

    #[test]
    fn unresolved_subtree_is_skipped() {
        let registry = registry();
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        let bogus = tree.add_node(root, "x", "bogus", Span::ORIGIN);
        tree.add_scalar(bogus, "anything", Span::ORIGIN, LiteralExpr::int(1, Span::ORIGIN));

        let (_, diagnostics) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.count_of(DiagnosticKind::UnresolvedComponentType), 1);
        assert_eq!(tree.node(bogus).binding, NodeBinding::Unbound);
    }

    fn registry_with_button_setter() -> ClassRegistry {
        let mut r = ClassRegistry::new();
        r.class("JButton").default_constructor().register().unwrap();
        r.class("JFrame")
            .default_constructor()
            .method("setButton", vec![int()], TypeRef::Void)
            .register()
            .unwrap();
        r
    }

    #[test]
    fn setter_and_constructed_child_cannot_share_a_field() {
        let registry = registry_with_button_setter();
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        tree.add_scalar(root, "button", Span::new(2, 1, 6), LiteralExpr::int(1, Span::ORIGIN));
        let button = tree.add_node(root, "ok", "button", Span::new(3, 1, 2));

        let (output, diagnostics) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert_eq!(output.setters, 1);
        assert_eq!(
            diagnostics.into_vec(),
            vec![Diagnostic::DuplicateField {
                name: "frame$button".into(),
                span: Span::new(3, 1, 2),
            }]
        );
        assert_eq!(tree.node(button).binding, NodeBinding::Unbound);
    }

    #[test]
    fn sibling_nodes_with_the_same_name_collide() {
        let registry = registry_with_button_setter();
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        let first = tree.add_node(root, "ok", "button", Span::new(2, 1, 2));
        let second = tree.add_node(root, "cancel", "button", Span::new(3, 1, 6));

        let (_, diagnostics) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert_eq!(diagnostics.count_of(DiagnosticKind::DuplicateField), 1);
        assert!(matches!(tree.node(first).binding, NodeBinding::ViaConstructor(_)));
        assert_eq!(tree.node(second).binding, NodeBinding::Unbound);
    }

    #[test]
    fn later_setter_on_a_claimed_name_stays_unbound() {
        let registry = registry_with_button_setter();
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        tree.add_node(root, "ok", "button", Span::ORIGIN);
        tree.add_scalar(root, "button", Span::new(4, 1, 6), LiteralExpr::int(1, Span::ORIGIN));

        let (output, diagnostics) = resolve_and_bind(&registry, &mut tree).unwrap();
        assert_eq!(output.setters, 0);
        assert_eq!(diagnostics.count_of(DiagnosticKind::DuplicateField), 1);
        assert_eq!(tree.node(root).properties[1].binding, PropertyBinding::Unbound);
    }

    #[test]
    fn binding_twice_is_idempotent() {
        let registry = registry();
        let mut tree = Tree::new("frame", Span::ORIGIN);
        let root = tree.root();
        tree.add_scalar(root, "width", Span::ORIGIN, LiteralExpr::int(5, Span::ORIGIN));
        let panel = tree.add_node(root, "contentPane", "panel", Span::ORIGIN);
        tree.add_list(panel, "item", Span::ORIGIN, vec![LiteralExpr::int(1, Span::ORIGIN)]);

        resolve_and_bind(&registry, &mut tree).unwrap();
        let first = tree.bindings();

        let options = CompilerOptions::default();
        let mut diagnostics = Diagnostics::new();
        BindingPass::new(ResolveContext::new(&registry, &options))
            .run(&mut tree, &mut diagnostics)
            .unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(tree.bindings(), first);
    }

    #[test]
    fn ambiguous_overload_is_fatal() {
        let mut registry = ClassRegistry::new();
        registry.class("JA").register().unwrap();
        registry.class("JB").register().unwrap();
        registry
            .class("JC")
            .extends("JA")
            .implements("JB")
            .register()
            .unwrap();
        registry
            .class("JHost")
            .default_constructor()
            .method("setThing", vec![TypeRef::class("JA")], TypeRef::Void)
            .method("setThing", vec![TypeRef::class("JB")], TypeRef::Void)
            .register()
            .unwrap();

        #[derive(Debug)]
        struct Typed(TypeRef);
        impl std::fmt::Display for Typed {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "<{}>", self.0)
            }
        }
        impl crate::tree::Expr for Typed {
            fn span(&self) -> Span {
                Span::ORIGIN
            }
            fn type_of(&self) -> TypeRef {
                self.0.clone()
            }
            fn resolve_types(&mut self, _: &ResolveContext<'_>, _: &mut Diagnostics) {}
            fn resolve(&mut self, _: &TypeRef, _: &mut Diagnostics) {}
            fn emit(&self, _: &mut crate::emit::BytecodeEmitter<'_>) -> Result<(), CompileError> {
                Ok(())
            }
        }

        let mut tree = Tree::new("host", Span::ORIGIN);
        let root = tree.root();
        tree.add_scalar(root, "thing", Span::ORIGIN, Box::new(Typed(TypeRef::class("JC"))));

        let err = resolve_and_bind(&registry, &mut tree).unwrap_err();
        assert!(matches!(err, CompileError::Lookup(LookupError::Ambiguous { .. })));
    }
}
