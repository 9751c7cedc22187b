//! Type-erased registry entries for feature slices.
//!
//! A slice crate builds its state once at startup and hands it to the server
//! as an [`InitializedSlice`]; handlers later downcast it back by type.

use std::any::{Any, TypeId, type_name};
use std::fmt::Debug;

/// Feature state that can be shared across request handlers.
pub trait FeatureSlice: Any + Debug + Send + Sync {
    /// Upcast used for downcasting from the trait object.
    fn as_any(&self) -> &dyn Any;
}

/// A slice ready to be registered, keyed by the concrete state type.
#[derive(Debug)]
pub struct InitializedSlice {
    pub id: TypeId,
    pub name: &'static str,
    pub state: Box<dyn FeatureSlice>,
}

impl InitializedSlice {
    pub fn new<T: FeatureSlice>(state: T) -> Self {
        Self { id: TypeId::of::<T>(), name: type_name::<T>(), state: Box::new(state) }
    }

    /// Borrows the state as `T` if that is the registered type.
    #[must_use]
    pub fn downcast_ref<T: FeatureSlice>(&self) -> Option<&T> {
        self.state.as_any().downcast_ref::<T>()
    }
}
