//! The static storage of an emitted unit.

use std::collections::BTreeMap;

use uigraph_core::TypeRef;

use crate::tree::{NodeBinding, NodeId, PropertyBinding, Tree, Value};

/// Fully qualified name to declared type, sorted by name.
///
/// Entries:
/// - the root node;
/// - every nested node bound `ViaConstructor`;
/// - every property bound to a setter, typed with the value's resolved type.
///
/// Lists, getter-obtained nodes and references get no slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTable {
    fields: BTreeMap<String, TypeRef>,
}

impl FieldTable {
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(tree: &Tree) -> Self {
        let mut table = Self::default();
        table.visit(tree, tree.root());
        table
    }

    fn visit(&mut self, tree: &Tree, id: NodeId) {
        let node = tree.node(id);
        if let Some(ty) = &node.resolved_type {
            let stored = node.is_root() || matches!(node.binding, NodeBinding::ViaConstructor(_));
            if stored {
                self.insert(&node.qualified_name, ty.clone());
            }
        }

        for property in &node.properties {
            match (&property.value, &property.binding) {
                (Value::Scalar(expr), PropertyBinding::Setter(_)) => {
                    self.insert(&property.qualified_name, expr.type_of());
                }
                (Value::Nested(child), _) => self.visit(tree, *child),
                _ => {}
            }
        }
    }

    /// Binding rejects duplicate names, so a bound tree never overwrites a slot.
    fn insert(&mut self, name: &str, ty: TypeRef) {
        let previous = self.fields.insert(name.to_string(), ty);
        debug_assert!(previous.is_none(), "field '{name}' declared twice");
    }

    pub fn get(&self, name: &str) -> Option<&TypeRef> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeRef)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), ty))
    }
}
