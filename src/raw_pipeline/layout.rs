//! Layout Registry
//!
//! Describes, per supported engine API version, the exact binary layout of
//! every record the decode engine reads or writes, and provides typed,
//! bounds-checked access to those records as plain bytes.

mod api_10;
mod api_11;
mod compiled;
mod record;
mod registry;
pub mod types;

#[cfg(test)]
mod tests;

pub use compiled::{CompiledLayout, FieldLayout, FieldSlot, RecordLayout};
pub use record::{RecordView, RecordViewMut, Scalar};
pub use registry::LayoutSet;
pub use types::{ArrayBounds, FieldDescriptor, FieldType, LayoutProvider, RecordKind};
