// Wire models for the platform gateway, grouped by surface.
//
// The gateway omits unset fields rather than sending nulls, so optional
// scalars use `skip_serializing_if` with the zero-value helpers below.

pub mod enrollment;
pub mod learning;
pub mod offline;
pub mod organization;

pub use enrollment::*;
pub use learning::*;
pub use offline::*;
pub use organization::*;

pub(crate) fn is_zero(n: &i32) -> bool {
    *n == 0
}

pub(crate) fn is_false(b: &bool) -> bool {
    !*b
}
