use std::{ops::Deref, sync::Arc};

use crate::{
    error::{ErrorVerbosity, ErrorVerbosityProvider},
    store::DocumentStore,
    traits::StoreProvider,
};

#[derive(Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    pub fn new(error_verbosity: ErrorVerbosity, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: Arc::new(ApiStateInner {
                error_verbosity,
                store,
            }),
        }
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub struct ApiStateInner {
    error_verbosity: ErrorVerbosity,
    store: Arc<dyn DocumentStore>,
}

impl ErrorVerbosityProvider for ApiState {
    fn error_verbosity(&self) -> ErrorVerbosity {
        self.error_verbosity
    }
}

impl StoreProvider for ApiState {
    fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
