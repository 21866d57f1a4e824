use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Multipart, Path, Query, State,
        multipart::MultipartRejection,
        rejection::QueryRejection,
    },
};
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use crate::{
    error::AppError::{self, InvalidInput, NotFound, Upstream},
    models::{Entry, ImageSearchResults, RestaurantPage, RestaurantSummary},
    search::{
        DEFAULT_LIMIT, DEFAULT_PAGE, find_by_id, list_page, name_pattern, search_by_location,
        search_by_name,
    },
    state::AppState,
    utils::{LocationParams, NameParams, PageParams, name_fragment, positive_or, search_area},
};

pub async fn restaurants_handler(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<RestaurantPage>, AppError> {
    let params = params.map(|Query(params)| params).unwrap_or_else(|e| {
        debug!("Unreadable paging, using defaults: {}", e.body_text());
        PageParams::default()
    });
    let page = positive_or(params.page.as_deref(), DEFAULT_PAGE);
    let limit = positive_or(params.limit.as_deref(), DEFAULT_LIMIT);

    let chains = state.store.chains().await?;

    Ok(Json(list_page(&chains, page, limit)))
}

pub async fn name_search_handler(
    State(state): State<Arc<AppState>>,
    params: Result<Query<NameParams>, QueryRejection>,
) -> Result<Json<Vec<RestaurantSummary>>, AppError> {
    let Query(params) = params?;
    let fragment = name_fragment(&params)?;
    let pattern = name_pattern(fragment).map_err(|e| InvalidInput(e.to_string()))?;

    let chains = state.store.chains().await?;
    let matches = search_by_name(&chains, &pattern);

    if matches.is_empty() {
        return Err(NotFound("No restaurants found".to_string()));
    }

    Ok(Json(matches))
}

pub async fn location_handler(
    State(state): State<Arc<AppState>>,
    params: Result<Query<LocationParams>, QueryRejection>,
) -> Result<Json<Vec<Entry>>, AppError> {
    let Query(params) = params?;
    let cap = search_area(&params)?;

    let chains = state.store.chains().await?;

    Ok(Json(search_by_location(&chains, &cap)))
}

pub async fn restaurant_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Entry>, AppError> {
    let chains = state.store.chains().await?;

    find_by_id(&chains, &id)
        .map(Json)
        .ok_or_else(|| NotFound(format!("Restaurant {id} not found")))
}

/// Image similarity lives in an external service. Without one configured
/// there is nothing to match against and the result is empty.
pub async fn image_search_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImageSearchResults>, AppError> {
    let mut multipart = multipart?;
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(InvalidInput("Please upload an image file".to_string()));
        }

        let file_name = field.file_name().unwrap_or("image").to_string();
        let bytes = field.bytes().await?;

        image = Some((file_name, content_type, bytes));
        break;
    }

    let Some((file_name, content_type, bytes)) = image else {
        return Err(InvalidInput("An image field is required".to_string()));
    };

    debug!("Image search with {file_name} ({} bytes)", bytes.len());

    let Some(url) = state.config.image_search_url.as_deref() else {
        info!("No image search service configured, returning no matches");
        return Ok(Json(ImageSearchResults::default()));
    };

    let part = Part::bytes(bytes.to_vec())
        .file_name(file_name)
        .mime_str(&content_type)
        .map_err(|e| InvalidInput(e.to_string()))?;

    let results = state
        .http_client
        .post(url)
        .multipart(Form::new().part("image", part))
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| Upstream(e.to_string()))?
        .json::<ImageSearchResults>()
        .await
        .map_err(|e| Upstream(e.to_string()))?;

    Ok(Json(results))
}
