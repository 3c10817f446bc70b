use crate::resource::Resource;

use super::{Middleware, MiddlewareError};

/// Applies each resource's schema-driven normalization on both sides.
#[derive(Debug, Default, Clone, Copy)]
pub struct Normalizer;

impl Middleware for Normalizer {
    fn name(&self) -> &str {
        "normalizer"
    }

    fn execute(
        &self,
        live: &mut Vec<Resource>,
        state: &mut Vec<Resource>,
    ) -> Result<(), MiddlewareError> {
        live.iter_mut()
            .chain(state.iter_mut())
            .for_each(Resource::normalize);
        Ok(())
    }
}
