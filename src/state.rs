pub mod enumerator;
pub mod glob;
pub mod supplier;

pub use enumerator::{EnumerateError, FileEnumerator, ObjectStoreEnumerator, StateEnumerator};
pub use supplier::StateSupplier;
