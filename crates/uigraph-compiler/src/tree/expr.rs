//! Property value expressions.
//!
//! The tree treats expressions as opaque: it only needs a static type, a way to
//! resolve against the type a setter or adder declares, and code that leaves
//! one value on the stack. [`LiteralExpr`] covers constant values.

use std::fmt;

use ordered_float::OrderedFloat;
use uigraph_core::{CompileError, Diagnostics, PrimitiveKind, Span, TypeRef};
use uigraph_registry::find_primitive_conversion;

use crate::context::ResolveContext;
use crate::emit::BytecodeEmitter;

/// A value expression attached to a property.
pub trait Expr: fmt::Debug + fmt::Display + Send {
    fn span(&self) -> Span;

    /// Static type of the value this expression produces.
    fn type_of(&self) -> TypeRef;

    /// Resolve names used inside the expression.
    fn resolve_types(&mut self, ctx: &ResolveContext<'_>, diagnostics: &mut Diagnostics);

    /// Adapt the expression to the parameter type of the member it is passed to.
    ///
    /// Must be idempotent: resolving again against the same target changes nothing.
    fn resolve(&mut self, target: &TypeRef, diagnostics: &mut Diagnostics);

    /// Emit code leaving exactly one value of [`type_of`](Self::type_of) on the stack.
    fn emit(&self, emitter: &mut BytecodeEmitter<'_>) -> Result<(), CompileError>;
}

/// Constant values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Bool(bool),
    Char(char),
    Int(i32),
    Long(i64),
    Float(OrderedFloat<f32>),
    Double(OrderedFloat<f64>),
    String(String),
    Null,
}

impl Literal {
    fn natural_type(&self) -> TypeRef {
        match self {
            Literal::Bool(_) => PrimitiveKind::Bool.into(),
            Literal::Char(_) => PrimitiveKind::Char.into(),
            Literal::Int(_) => PrimitiveKind::Int32.into(),
            Literal::Long(_) => PrimitiveKind::Int64.into(),
            Literal::Float(_) => PrimitiveKind::Float.into(),
            Literal::Double(_) => PrimitiveKind::Double.into(),
            Literal::String(_) => TypeRef::class("String"),
            Literal::Null => TypeRef::Null,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Literal::Char(c) => Some(*c as i64),
            Literal::Int(v) => Some(*v as i64),
            Literal::Long(v) => Some(*v),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Float(v) => Some(v.0 as f64),
            Literal::Double(v) => Some(v.0),
            other => other.as_i64().map(|v| v as f64),
        }
    }
}

/// A literal constant with its (possibly widened) static type.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    value: Literal,
    span: Span,
    ty: TypeRef,
}

impl LiteralExpr {
    pub fn new(value: Literal, span: Span) -> Self {
        let ty = value.natural_type();
        Self { value, span, ty }
    }

    pub fn boxed(value: Literal, span: Span) -> Box<dyn Expr> {
        Box::new(Self::new(value, span))
    }

    pub fn bool(value: bool, span: Span) -> Box<dyn Expr> {
        Self::boxed(Literal::Bool(value), span)
    }

    pub fn char(value: char, span: Span) -> Box<dyn Expr> {
        Self::boxed(Literal::Char(value), span)
    }

    pub fn int(value: i32, span: Span) -> Box<dyn Expr> {
        Self::boxed(Literal::Int(value), span)
    }

    pub fn long(value: i64, span: Span) -> Box<dyn Expr> {
        Self::boxed(Literal::Long(value), span)
    }

    pub fn float(value: f32, span: Span) -> Box<dyn Expr> {
        Self::boxed(Literal::Float(OrderedFloat(value)), span)
    }

    pub fn double(value: f64, span: Span) -> Box<dyn Expr> {
        Self::boxed(Literal::Double(OrderedFloat(value)), span)
    }

    pub fn string(value: impl Into<String>, span: Span) -> Box<dyn Expr> {
        Self::boxed(Literal::String(value.into()), span)
    }

    pub fn null(span: Span) -> Box<dyn Expr> {
        Self::boxed(Literal::Null, span)
    }

    pub fn value(&self) -> &Literal {
        &self.value
    }
}

impl Expr for LiteralExpr {
    fn span(&self) -> Span {
        self.span
    }

    fn type_of(&self) -> TypeRef {
        self.ty.clone()
    }

    fn resolve_types(&mut self, ctx: &ResolveContext<'_>, _diagnostics: &mut Diagnostics) {
        if let Literal::String(_) = self.value {
            self.ty = ctx.string_type();
        }
    }

    fn resolve(&mut self, target: &TypeRef, _diagnostics: &mut Diagnostics) {
        match (&self.ty, target) {
            (TypeRef::Primitive(from), TypeRef::Primitive(to)) => {
                if find_primitive_conversion(*from, *to).is_some() {
                    self.ty = target.clone();
                }
            }
            (TypeRef::Null, TypeRef::Class(_)) => self.ty = target.clone(),
            _ => {}
        }
    }

    fn emit(&self, emitter: &mut BytecodeEmitter<'_>) -> Result<(), CompileError> {
        emitter.set_line(self.span.line);
        let mismatch = || {
            CompileError::internal(format!("literal {} cannot be emitted as {}", self, self.ty))
        };
        match (&self.value, &self.ty) {
            (Literal::Bool(b), _) => emitter.emit_bool(*b),
            (Literal::String(s), _) => emitter.emit_string(s)?,
            (Literal::Null, _) => emitter.emit_null(),
            (value, TypeRef::Primitive(PrimitiveKind::Float)) => {
                emitter.emit_f32(value.as_f64().ok_or_else(mismatch)? as f32)?
            }
            (value, TypeRef::Primitive(PrimitiveKind::Double)) => {
                emitter.emit_f64(value.as_f64().ok_or_else(mismatch)?)?
            }
            (value, _) => emitter.emit_int(value.as_i64().ok_or_else(mismatch)?)?,
        }
        Ok(())
    }
}

impl fmt::Display for LiteralExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Char(c) => write!(f, "{c:?}"),
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Long(v) => write!(f, "{v}L"),
            Literal::Float(v) => write!(f, "{v}F"),
            Literal::Double(v) => write!(f, "{v}D"),
            Literal::String(s) => write!(f, "{s:?}"),
            Literal::Null => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{Constant, ConstantPool, OpCode};
    use crate::CompilerOptions;
    use uigraph_registry::ClassRegistry;

    fn widen(expr: &mut dyn Expr, target: PrimitiveKind) {
        expr.resolve(&target.into(), &mut Diagnostics::new());
    }

    #[test]
    fn natural_types() {
        assert_eq!(LiteralExpr::int(3, Span::ORIGIN).type_of(), PrimitiveKind::Int32.into());
        assert_eq!(LiteralExpr::long(3, Span::ORIGIN).type_of(), PrimitiveKind::Int64.into());
        assert_eq!(LiteralExpr::null(Span::ORIGIN).type_of(), TypeRef::Null);
        assert_eq!(LiteralExpr::string("a", Span::ORIGIN).type_of(), TypeRef::class("String"));
    }

    #[test]
    fn string_type_comes_from_library() {
        let registry = ClassRegistry::new().with_string_type(TypeRef::class("java.lang.String"));
        let options = CompilerOptions::default();
        let ctx = ResolveContext::new(&registry, &options);

        let mut expr = LiteralExpr::string("Hi", Span::ORIGIN);
        expr.resolve_types(&ctx, &mut Diagnostics::new());
        assert_eq!(expr.type_of(), TypeRef::class("java.lang.String"));
    }

    #[test]
    fn widening_changes_static_type() {
        let mut expr = LiteralExpr::int(7, Span::ORIGIN);
        widen(expr.as_mut(), PrimitiveKind::Int64);
        assert_eq!(expr.type_of(), PrimitiveKind::Int64.into());

        widen(expr.as_mut(), PrimitiveKind::Int64);
        assert_eq!(expr.type_of(), PrimitiveKind::Int64.into());
    }

    #[test]
    fn narrowing_is_ignored() {
        let mut expr = LiteralExpr::long(7, Span::ORIGIN);
        widen(expr.as_mut(), PrimitiveKind::Int32);
        assert_eq!(expr.type_of(), PrimitiveKind::Int64.into());
    }

    #[test]
    fn null_adopts_class_target() {
        let mut expr = LiteralExpr::null(Span::ORIGIN);
        expr.resolve(&TypeRef::class("Icon"), &mut Diagnostics::new());
        assert_eq!(expr.type_of(), TypeRef::class("Icon"));
    }

    #[test]
    fn widened_int_emits_float_constant() {
        let mut expr = LiteralExpr::int(2, Span::new(3, 1, 1));
        widen(expr.as_mut(), PrimitiveKind::Float);

        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        expr.emit(&mut emitter).unwrap();
        let chunk = emitter.finish();

        chunk.assert_opcodes(&[OpCode::Constant]);
        assert_eq!(chunk.line_at(0), Some(3));
        assert_eq!(constants.get(0), Some(&Constant::Float32(OrderedFloat(2.0))));
    }

    #[test]
    fn char_emits_code_point() {
        let expr = LiteralExpr::char('A', Span::ORIGIN);
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        expr.emit(&mut emitter).unwrap();
        assert_eq!(constants.get(0), Some(&Constant::Int(65)));
    }

    #[test]
    fn display_forms() {
        assert_eq!(LiteralExpr::string("Hi", Span::ORIGIN).to_string(), "\"Hi\"");
        assert_eq!(LiteralExpr::long(5, Span::ORIGIN).to_string(), "5L");
        assert_eq!(LiteralExpr::bool(true, Span::ORIGIN).to_string(), "true");
        assert_eq!(LiteralExpr::null(Span::ORIGIN).to_string(), "null");
    }
}
