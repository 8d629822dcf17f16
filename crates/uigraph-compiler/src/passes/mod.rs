//! Resolution passes run over a parsed [`Tree`](crate::tree::Tree).
//!
//! - [`TypeResolutionPass`] - map node names onto library classes
//! - [`BindingPass`] - select constructors, getters, setters and adders
//!
//! Both accumulate user-facing problems into a
//! [`Diagnostics`](uigraph_core::Diagnostics) and keep going, so one run
//! reports as much as possible. Only a defect in the class library (an
//! ambiguous lookup) stops the binding pass early.

mod binding;
mod type_resolution;

pub use binding::{BindingOutput, BindingPass};
pub use type_resolution::{TypeResolutionOutput, TypeResolutionPass};
