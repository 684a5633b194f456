use axum::extract::State;

use crate::{
    error::{ApiError, ErrorVerbosityProvider},
    route::Found,
    state::ApiState,
    store::{Collection, Record},
    traits::StoreProvider,
};

pub async fn list_books(State(state): State<ApiState>) -> Result<Found<Vec<Record>>, ApiError> {
    let books = state
        .store()
        .find_all(Collection::Books)
        .await
        .map_err(|err| ApiError::from_store_read(state.error_verbosity(), err))?;

    Ok(Found(books))
}
