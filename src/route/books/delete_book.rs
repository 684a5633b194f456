use axum::extract::State;

use crate::{
    error::{ApiError, ErrorVerbosityProvider, ResourceNotFoundError},
    extractor::path::ApiPath,
    route::Deleted,
    state::ApiState,
    store::Collection,
    traits::StoreProvider,
};

pub async fn delete_book(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Deleted, ApiError> {
    state
        .store()
        .delete_by_id(Collection::Books, &id)
        .await
        .map_err(|err| ApiError::from_store_read(state.error_verbosity(), err))?
        .ok_or_else(|| ResourceNotFoundError::new(Collection::Books))?;

    tracing::info!(%id, "Book deleted");

    Ok(Deleted)
}
