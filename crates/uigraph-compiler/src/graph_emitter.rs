//! Graph Emitter - turn a bound tree into the initializer procedure.
//!
//! ## Shape of the initializer
//!
//! Every node gets a fresh local slot and is emitted depth-first:
//!
//! ```text
//! root          NEW T; SET_LOCAL s; GET_LOCAL s; SET_STATIC root
//! constructed   NEW T; DUP; SET_STATIC fqn; SET_LOCAL s
//! via getter    GET_LOCAL parent; CALL_METHOD getX; SET_LOCAL s
//!
//! setter        GET_LOCAL s; <value>; DUP; SET_STATIC owner$key; CALL_METHOD setX [POP]
//! adder item    GET_LOCAL s; <item>; CALL_METHOD addX [POP]
//! nested        <child node, recursively>
//! reference     nothing
//! ```
//!
//! A constructed node is stored to its field before any of its properties
//! run, so the field always holds the object that is being configured.
//!
//! Slots come from a watermark counter and are never reused, so each slot's
//! debug range is just the span of its node's code.
//!
//! The emitter assumes a fully bound tree. Anything unbound is a
//! [`CompileError`], never a diagnostic.

use rustc_hash::FxHashMap;
use tracing::trace;
use uigraph_core::{CompileError, TypeHash};

use crate::bytecode::{BytecodeChunk, ConstantPool};
use crate::emit::BytecodeEmitter;
use crate::field_table::FieldTable;
use crate::tree::{NodeBinding, NodeId, PropertyBinding, Tree, Value};
use crate::unit::LocalVarInfo;

/// Code and debug information of an emitted initializer.
#[derive(Debug)]
pub struct EmittedInitializer {
    pub code: BytecodeChunk,
    pub locals: Vec<LocalVarInfo>,
    pub max_locals: u32,
}

/// Per-emission slot assignment, keyed by node identity.
#[derive(Debug, Default)]
struct EmitState {
    slots: FxHashMap<NodeId, u32>,
    next_slot: u32,
    locals: Vec<LocalVarInfo>,
}

impl EmitState {
    fn allocate(&mut self, id: NodeId) -> u32 {
        let slot = self.next_slot;
        self.next_slot += 1;
        self.slots.insert(id, slot);
        slot
    }

    fn slot(&self, id: NodeId) -> Result<u32, CompileError> {
        self.slots
            .get(&id)
            .copied()
            .ok_or_else(|| CompileError::internal(format!("node {} has no local slot", id.index())))
    }
}

pub struct GraphEmitter<'a> {
    tree: &'a Tree,
    fields: &'a FieldTable,
    unit_hash: TypeHash,
}

impl<'a> GraphEmitter<'a> {
    pub fn new(tree: &'a Tree, fields: &'a FieldTable, unit_hash: TypeHash) -> Self {
        Self {
            tree,
            fields,
            unit_hash,
        }
    }

    /// Emit the initializer body, ending with `RETURN_VOID`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn emit_initializer(
        &self,
        constants: &mut ConstantPool,
    ) -> Result<EmittedInitializer, CompileError> {
        let mut state = EmitState::default();
        let mut emitter = BytecodeEmitter::new(constants);
        emitter.set_line(self.tree.node(self.tree.root()).span.line);

        self.emit_node(self.tree.root(), &mut emitter, &mut state)?;
        emitter.emit_return_void();

        let mut locals = state.locals;
        locals.sort_by_key(|local| local.slot);
        Ok(EmittedInitializer {
            code: emitter.finish(),
            locals,
            max_locals: state.next_slot,
        })
    }

    fn emit_node(
        &self,
        id: NodeId,
        emitter: &mut BytecodeEmitter<'_>,
        state: &mut EmitState,
    ) -> Result<(), CompileError> {
        let node = self.tree.node(id);
        let unbound = || CompileError::UnboundNode {
            name: node.qualified_name.clone(),
        };
        let ty = node.resolved_type.clone().ok_or_else(unbound)?;
        let start = emitter.current_offset();
        let slot = state.allocate(id);
        emitter.set_line(node.span.line);
        trace!(node = %node.qualified_name, slot, "emitting node");

        match (&node.binding, node.parent) {
            (NodeBinding::ViaConstructor(ctor), None) => {
                emitter.emit_new(ctor)?;
                emitter.emit_set_local(slot)?;
                emitter.emit_get_local(slot)?;
                self.store_field(emitter, &node.qualified_name)?;
            }
            (NodeBinding::ViaConstructor(ctor), Some(_)) => {
                emitter.emit_new(ctor)?;
                emitter.emit_dup();
                self.store_field(emitter, &node.qualified_name)?;
                emitter.emit_set_local(slot)?;
            }
            (NodeBinding::ViaGetter(getter), Some(parent)) => {
                emitter.emit_get_local(state.slot(parent)?)?;
                emitter.emit_call_method(getter)?;
                emitter.emit_set_local(slot)?;
            }
            (NodeBinding::ViaGetter(_), None) => {
                return Err(CompileError::internal(format!(
                    "root node '{}' cannot be obtained through a getter",
                    node.qualified_name
                )));
            }
            (NodeBinding::Unbound, _) => return Err(unbound()),
        }

        for property in &node.properties {
            let unbound_property = || CompileError::UnboundProperty {
                name: property.qualified_name.clone(),
            };
            emitter.set_line(property.span.line);
            match (&property.value, &property.binding) {
                (Value::Scalar(expr), PropertyBinding::Setter(setter)) => {
                    emitter.emit_get_local(slot)?;
                    expr.emit(emitter)?;
                    emitter.emit_dup();
                    self.store_field(emitter, &property.qualified_name)?;
                    emitter.emit_call_method(setter)?;
                    if setter.returns_value() {
                        emitter.emit_pop();
                    }
                }
                (Value::List(items), PropertyBinding::Adder(adders)) => {
                    if items.len() != adders.len() {
                        return Err(CompileError::internal(format!(
                            "'{}' has {} items but {} adders",
                            property.qualified_name,
                            items.len(),
                            adders.len()
                        )));
                    }
                    for (item, adder) in items.iter().zip(adders) {
                        let adder = adder.as_ref().ok_or_else(unbound_property)?;
                        emitter.emit_get_local(slot)?;
                        item.emit(emitter)?;
                        emitter.emit_call_method(adder)?;
                        if adder.returns_value() {
                            emitter.emit_pop();
                        }
                    }
                }
                (Value::Scalar(_) | Value::List(_), _) => return Err(unbound_property()),
                (Value::Nested(child), _) => self.emit_node(*child, emitter, state)?,
                (Value::Reference(_), _) => {}
            }
        }

        state.locals.push(LocalVarInfo {
            slot,
            name: node.name.clone(),
            ty,
            start,
            end: emitter.current_offset(),
        });
        Ok(())
    }

    fn store_field(
        &self,
        emitter: &mut BytecodeEmitter<'_>,
        name: &str,
    ) -> Result<(), CompileError> {
        let ty = self.fields.get(name).ok_or_else(|| CompileError::MissingField {
            name: name.to_string(),
        })?;
        let hash = TypeHash::from_field(self.unit_hash, name);
        emitter.emit_set_static(hash, &format!("{name}: {ty}"))
    }
}

/// Emit the entry point body: call the initializer and return.
pub fn emit_entry_point(
    constants: &mut ConstantPool,
    unit_hash: TypeHash,
    initializer_name: &str,
) -> Result<BytecodeChunk, CompileError> {
    let mut emitter = BytecodeEmitter::new(constants);
    emitter.emit_call(
        TypeHash::from_procedure(unit_hash, initializer_name),
        initializer_name,
        0,
    )?;
    emitter.emit_return_void();
    Ok(emitter.finish())
}
