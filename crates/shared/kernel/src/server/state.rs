use fxhash::FxHashMap;
use geopost_database::Database;
use geopost_domain::config::ApiConfig;
use geopost_domain::registry::{FeatureSlice, InitializedSlice};
use std::any::{TypeId, type_name};
use std::borrow::Cow;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::debug;

#[geopost_derive::geopost_error]
pub enum ApiStateError {
    /// Two slices were registered with the same state type.
    #[error("Feature slice registered twice{}: {name}", format_context(.context))]
    DuplicateSlice { name: &'static str, context: Option<Cow<'static, str>> },

    /// A handler asked for a slice the server never registered.
    #[error("Feature slice not registered{}: {name}", format_context(.context))]
    MissingSlice { name: &'static str, context: Option<Cow<'static, str>> },
}

#[derive(Debug)]
struct Shared {
    config: ApiConfig,
    database: Database,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

/// Router state. Cloning shares the same configuration, database handle and
/// slice registry.
#[derive(Debug, Clone)]
pub struct ApiState {
    shared: Arc<Shared>,
}

impl ApiState {
    /// # Errors
    /// [`ApiStateError::DuplicateSlice`] if two slices share a state type.
    pub fn new(
        config: ApiConfig,
        database: Database,
        slices: impl IntoIterator<Item = InitializedSlice>,
    ) -> Result<Self, ApiStateError> {
        let mut registry = FxHashMap::default();
        for slice in slices {
            match registry.entry(slice.id) {
                Entry::Occupied(_) => {
                    return Err(ApiStateError::DuplicateSlice { name: slice.name, context: None });
                },
                Entry::Vacant(entry) => {
                    debug!(slice = slice.name, "Registering feature slice");
                    entry.insert(slice);
                },
            }
        }

        Ok(Self { shared: Arc::new(Shared { config, database, slices: registry }) })
    }

    /// The registered state of slice `T`.
    ///
    /// # Errors
    /// [`ApiStateError::MissingSlice`] if `T` was never registered.
    pub fn slice<T: FeatureSlice>(&self) -> Result<&T, ApiStateError> {
        self.shared
            .slices
            .get(&TypeId::of::<T>())
            .and_then(InitializedSlice::downcast_ref::<T>)
            .ok_or(ApiStateError::MissingSlice { name: type_name::<T>(), context: None })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.shared.config
    }

    #[must_use]
    pub fn database(&self) -> &Database {
        &self.shared.database
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    #[derive(Debug)]
    struct Gazetteer(u32);

    impl FeatureSlice for Gazetteer {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct Unregistered;

    impl FeatureSlice for Unregistered {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    async fn database() -> Database {
        Database::builder().url("mem://").session("test", "state").init().await.expect("db")
    }

    #[tokio::test]
    async fn registered_slice_is_returned_by_type() {
        let state =
            ApiState::new(ApiConfig::default(), database().await, [InitializedSlice::new(Gazetteer(7))])
                .expect("state");

        assert_eq!(state.slice::<Gazetteer>().expect("registered").0, 7);
        assert_eq!(state.config().server.port, ApiConfig::default().server.port);
        assert_eq!(state.database().database(), "state");
    }

    #[tokio::test]
    async fn unknown_slice_is_reported_by_name() {
        let state = ApiState::new(ApiConfig::default(), database().await, []).expect("state");

        let err = state.slice::<Unregistered>().unwrap_err();
        assert!(err.to_string().contains("Unregistered"), "{err}");
    }

    #[tokio::test]
    async fn registering_a_slice_twice_fails() {
        let slices = [InitializedSlice::new(Gazetteer(1)), InitializedSlice::new(Gazetteer(2))];

        let err = ApiState::new(ApiConfig::default(), database().await, slices).unwrap_err();
        assert!(matches!(err, ApiStateError::DuplicateSlice { .. }));
    }
}
