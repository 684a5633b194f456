use axum::extract::State;

use crate::{
    error::{ApiError, ErrorVerbosityProvider},
    extractor::json::ApiJson,
    route::Created,
    state::ApiState,
    store::{Collection, Record},
    traits::StoreProvider,
};

/// Stores the author. The response keeps `books` as references.
pub async fn create_author(
    State(state): State<ApiState>,
    ApiJson(author): ApiJson<Record>,
) -> Result<Created<Record>, ApiError> {
    let author = state
        .store()
        .insert(Collection::Authors, author)
        .await
        .map_err(|err| ApiError::from_store_write(state.error_verbosity(), err))?;

    tracing::info!(id = ?author.get("id"), "Author created");

    Ok(Created(author))
}
