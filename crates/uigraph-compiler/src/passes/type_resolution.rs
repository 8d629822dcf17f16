//! Type Resolution Pass - map every node name onto a library class.
//!
//! ## Algorithm
//!
//! Pre-order over the tree. For each node:
//! 1. Derive the lookup name (`button` becomes `JButton`) and resolve it
//!    in the component package.
//! 2. On success store the type; on failure report
//!    `UnresolvedComponentType`.
//! 3. Ask every scalar and list item expression to resolve its own types,
//!    then descend into nested nodes in property order.
//!
//! A node below a failed node is still looked up, so its own failures are
//! reported, but it never receives a type. Binding skips everything that
//! has none.

use tracing::trace;
use uigraph_core::{Diagnostic, Diagnostics};

use crate::context::ResolveContext;
use crate::tree::{NodeId, Tree, Value};

/// Output of the type resolution pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TypeResolutionOutput {
    pub nodes_resolved: usize,
    pub nodes_unresolved: usize,
}

pub struct TypeResolutionPass<'a> {
    ctx: ResolveContext<'a>,
}

impl<'a> TypeResolutionPass<'a> {
    pub fn new(ctx: ResolveContext<'a>) -> Self {
        Self { ctx }
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(self, tree: &mut Tree, diagnostics: &mut Diagnostics) -> TypeResolutionOutput {
        let mut output = TypeResolutionOutput::default();
        let root = tree.root();
        self.resolve_node(tree, root, false, diagnostics, &mut output);
        output
    }

    fn resolve_node(
        &self,
        tree: &mut Tree,
        id: NodeId,
        ancestor_failed: bool,
        diagnostics: &mut Diagnostics,
        output: &mut TypeResolutionOutput,
    ) {
        let node = tree.node(id);
        let (class, resolved) = self.ctx.resolve_component(&node.name);
        trace!(node = %node.qualified_name, lookup = %class, found = resolved.is_some(), "resolving component type");

        let failed = match resolved {
            Some(ty) if !ancestor_failed => {
                tree.node_mut(id).resolved_type = Some(ty);
                output.nodes_resolved += 1;
                false
            }
            Some(_) => {
                output.nodes_unresolved += 1;
                true
            }
            None => {
                diagnostics.push(Diagnostic::UnresolvedComponentType {
                    name: node.name.clone(),
                    lookup_name: class.simple_name().to_string(),
                    span: node.span,
                });
                output.nodes_unresolved += 1;
                true
            }
        };

        let count = tree.node(id).properties.len();
        for index in 0..count {
            let nested = match &mut tree.node_mut(id).properties[index].value {
                Value::Scalar(expr) => {
                    expr.resolve_types(&self.ctx, diagnostics);
                    None
                }
                Value::List(items) => {
                    for item in items.iter_mut() {
                        item.resolve_types(&self.ctx, diagnostics);
                    }
                    None
                }
                Value::Nested(child) => Some(*child),
                Value::Reference(_) => None,
            };
            if let Some(child) = nested {
                self.resolve_node(tree, child, failed, diagnostics, output);
            }
        }
    }
}
