//! Tree model of one declarative component graph.
//!
//! Nodes live in an arena owned by [`Tree`] and are addressed by [`NodeId`].
//! A node owns its children only through its properties ([`Value::Nested`]);
//! `Node::parent` is a plain handle back to the owner.
//!
//! ```text
//! window                         Node (root)
//! {
//!     title = "Hi"               Property, Value::Scalar
//!     contentPane = panel        Property, Value::Nested -> Node window$panel
//!     {
//!         component = [a, b]     Property, Value::List
//!     }
//! }
//! ```
//!
//! The parser builds the tree through [`Tree::add_scalar`], [`Tree::add_list`],
//! [`Tree::add_node`] and [`Tree::add_reference`]. After that only the binding
//! passes write to it, filling `resolved_type` and the bindings.

mod display;
mod expr;

pub use expr::{Expr, Literal, LiteralExpr};

use uigraph_core::{ConstructorRef, MethodRef, Span, TypeRef};

use crate::naming;

/// Handle of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a node's object is obtained at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NodeBinding {
    #[default]
    Unbound,
    /// The parent exposes the object through a zero-argument getter.
    ViaGetter(MethodRef),
    /// The object is created with its zero-argument constructor.
    ViaConstructor(ConstructorRef),
}

/// How a property is applied to its owner.
///
/// Nested and reference values stay `Unbound`; nested nodes carry their own
/// [`NodeBinding`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PropertyBinding {
    #[default]
    Unbound,
    Setter(MethodRef),
    /// One adder per list item, `None` where no overload accepts the item.
    Adder(Vec<Option<MethodRef>>),
}

/// A named placeholder for another node. It has no target and emits nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub span: Span,
}

#[derive(Debug)]
pub enum Value {
    Scalar(Box<dyn Expr>),
    List(Vec<Box<dyn Expr>>),
    Nested(NodeId),
    Reference(Reference),
}

#[derive(Debug)]
pub struct Property {
    pub key: String,
    /// `owner$key`; the name of the field slot when bound to a setter.
    pub qualified_name: String,
    pub span: Span,
    pub value: Value,
    pub binding: PropertyBinding,
}

#[derive(Debug)]
pub struct Node {
    pub name: String,
    /// `parent$name`, or just `name` for the root.
    pub qualified_name: String,
    pub span: Span,
    pub parent: Option<NodeId>,
    /// Declaration order is emission order.
    pub properties: Vec<Property>,
    pub resolved_type: Option<TypeRef>,
    pub binding: NodeBinding,
}

impl Node {
    fn new(name: String, qualified_name: String, span: Span, parent: Option<NodeId>) -> Self {
        Self {
            name,
            qualified_name,
            span,
            parent,
            properties: Vec::new(),
            resolved_type: None,
            binding: NodeBinding::Unbound,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena of nodes rooted at [`NodeId::ROOT`].
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(root_name: impl Into<String>, span: Span) -> Self {
        let name = root_name.into();
        Self {
            nodes: vec![Node::new(name.clone(), name, span, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push_property(&mut self, owner: NodeId, key: String, span: Span, value: Value) -> usize {
        let qualified_name = naming::qualify(&self.node(owner).qualified_name, &key);
        let properties = &mut self.node_mut(owner).properties;
        properties.push(Property {
            key,
            qualified_name,
            span,
            value,
            binding: PropertyBinding::Unbound,
        });
        properties.len() - 1
    }

    /// Append `key = expr` to `owner`, returning the property index.
    pub fn add_scalar(
        &mut self,
        owner: NodeId,
        key: impl Into<String>,
        span: Span,
        expr: Box<dyn Expr>,
    ) -> usize {
        self.push_property(owner, key.into(), span, Value::Scalar(expr))
    }

    /// Append `key = [items...]` to `owner`.
    pub fn add_list(
        &mut self,
        owner: NodeId,
        key: impl Into<String>,
        span: Span,
        items: Vec<Box<dyn Expr>>,
    ) -> usize {
        self.push_property(owner, key.into(), span, Value::List(items))
    }

    /// Append `key = name { }` to `owner` and return the new child node.
    pub fn add_node(
        &mut self,
        owner: NodeId,
        key: impl Into<String>,
        name: impl Into<String>,
        span: Span,
    ) -> NodeId {
        let name = name.into();
        let qualified_name = naming::qualify(&self.node(owner).qualified_name, &name);
        let id = NodeId(self.nodes.len() as u32);
        self.nodes
            .push(Node::new(name, qualified_name, span, Some(owner)));
        self.push_property(owner, key.into(), span, Value::Nested(id));
        id
    }

    /// Append `key = name` where `name` refers to another node.
    pub fn add_reference(
        &mut self,
        owner: NodeId,
        key: impl Into<String>,
        name: impl Into<String>,
        span: Span,
    ) -> usize {
        let reference = Reference {
            name: name.into(),
            span,
        };
        self.push_property(owner, key.into(), span, Value::Reference(reference))
    }

    /// Node ids in pre-order: each node before its nested nodes, siblings in property order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            let children = self.children(id);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Nested nodes of `id`, in property order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .properties
            .iter()
            .filter_map(|p| match p.value {
                Value::Nested(child) => Some(child),
                _ => None,
            })
            .collect()
    }

    /// The `(node binding, property bindings)` of every node, in pre-order.
    pub fn bindings(&self) -> Vec<(NodeBinding, Vec<PropertyBinding>)> {
        self.preorder()
            .into_iter()
            .map(|id| {
                let node = self.node(id);
                (
                    node.binding.clone(),
                    node.properties.iter().map(|p| p.binding.clone()).collect(),
                )
            })
            .collect()
    }
}
