use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use farmstock_stock::sort_balances;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::FarmContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_stock))
        .route("/:product_id", get(get_product_stock))
}

pub async fn list_stock(
    Extension(services): Extension<Arc<AppServices>>,
    farm: FarmContext,
    Query(query): Query<dto::StockQuery>,
) -> axum::response::Response {
    let ordering = match query.ordering() {
        Ok(o) => o,
        Err(resp) => return resp,
    };

    let report = match services.reports().report(farm.farm_id()).await {
        Ok(r) => r,
        Err(e) => return errors::report_error_to_response(e),
    };

    let mut balances = report.balances;
    if let Some((column, direction)) = ordering {
        sort_balances(&mut balances, column, direction, services.reports().engine().collation());
    }

    (
        StatusCode::OK,
        Json(dto::StockListResponse {
            farm_id: report.farm_id,
            count: balances.len(),
            balances,
            summary: report.summary,
            diagnostics: report.diagnostics,
        }),
    )
        .into_response()
}

pub async fn get_product_stock(
    Extension(services): Extension<Arc<AppServices>>,
    farm: FarmContext,
    Path(params): Path<HashMap<String, String>>,
) -> axum::response::Response {
    let Some(product_id) = params.get("product_id") else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_path", "missing product id");
    };

    let report = match services.reports().report(farm.farm_id()).await {
        Ok(r) => r,
        Err(e) => return errors::report_error_to_response(e),
    };

    match report
        .balances
        .into_iter()
        .find(|b| b.product_id.as_str() == product_id)
    {
        Some(balance) => (StatusCode::OK, Json(balance)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
    }
}
