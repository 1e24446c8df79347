use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use gemcart_catalog::{filter_with_attributes, FilterCriteria, ParsedAttributes};
use gemcart_core::{Image, Money};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_storefront_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct DiamondItem {
    id: String,
    handle: String,
    title: String,
    price: Option<Money>,
    available_for_sale: bool,
    featured_image: Option<Image>,
    attributes: ParsedAttributes,
}

/// Lists a collection's products filtered and sorted by gemstone attributes.
///
/// Filters come from the query string; see [`FilterCriteria::from_query`].
/// An unknown collection handle yields an empty list.
pub(super) async fn list_diamonds(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<Vec<DiamondItem>>>, ApiError> {
    let criteria = FilterCriteria::from_query(params);

    let products = state
        .storefront
        .collection_products(&handle, state.config.collection_page_size)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    let data: Vec<DiamondItem> = filter_with_attributes(&products, &criteria)
        .into_iter()
        .map(|m| DiamondItem {
            id: m.product.id.clone(),
            handle: m.product.handle.clone(),
            title: m.product.title.clone(),
            price: m.product.price.clone(),
            available_for_sale: m.product.available_for_sale,
            featured_image: m.product.featured_image.clone(),
            attributes: m.attributes,
        })
        .collect();

    tracing::debug!(
        request_id = %req_id.0,
        %handle,
        fetched = products.len(),
        returned = data.len(),
        "listed collection diamonds"
    );

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
