use axum::extract::State;

use crate::{
    error::{ApiError, ErrorVerbosityProvider, ResourceNotFoundError},
    extractor::path::ApiPath,
    route::Deleted,
    state::ApiState,
    store::Collection,
    traits::StoreProvider,
};

/// Removes the author. Referenced books are left alone.
pub async fn delete_author(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Deleted, ApiError> {
    state
        .store()
        .delete_by_id(Collection::Authors, &id)
        .await
        .map_err(|err| ApiError::from_store_read(state.error_verbosity(), err))?
        .ok_or_else(|| ResourceNotFoundError::new(Collection::Authors))?;

    tracing::info!(%id, "Author deleted");

    Ok(Deleted)
}
