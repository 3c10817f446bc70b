pub mod state;

pub use state::{StateReadError, StateReader, TerraformStateReader};
