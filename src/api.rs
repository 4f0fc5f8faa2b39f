//! HTTP shell: axum routes over the storefront operations.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::domain::aggregates::{DrinkItem, Order, PizzaItem};
use crate::domain::payment::Authorization;
use crate::service::{
    CartView, CartWithTotals, DeclinedSummary, Menu, PlaceOrderOutcome, PlaceOrderRequest, RemoveItemRequest,
    Storefront, UpdateQtyRequest,
};
use crate::{ErrorKind, PizzeriaError};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorKind,
    pub message: String,
}

/// Caller-facing failure: a kind plus a readable message, never retried.
#[derive(Debug)]
pub struct ApiError(PizzeriaError);

impl From<PizzeriaError> for ApiError {
    fn from(e: PizzeriaError) -> Self { Self(e) }
}

/// A malformed body (unknown variant, wrong type, missing field) is a validation failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self { Self(PizzeriaError::ValidationFailed(rejection.body_text())) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(ErrorBody { code: kind, message: self.0.to_string() })).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// `Json` extractor whose rejection renders as an [`ErrorBody`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
struct JsonBody<T>(T);

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PlaceOrderResponse {
    Placed { ok: bool, order_summary: Order },
    Declined { ok: bool, message: &'static str, payment: Authorization, order_summary: DeclinedSummary },
}

impl From<PlaceOrderOutcome> for PlaceOrderResponse {
    fn from(outcome: PlaceOrderOutcome) -> Self {
        match outcome {
            PlaceOrderOutcome::Placed(order) => Self::Placed { ok: true, order_summary: order },
            PlaceOrderOutcome::Declined { payment, summary } => {
                Self::Declined { ok: false, message: "Payment declined", payment, order_summary: summary }
            }
        }
    }
}

pub fn router(shop: Storefront) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "pizzeria"})) }))
        .route("/api/menu", get(menu))
        .route("/api/cart", post(create_cart))
        .route("/api/cart/:cart_id", get(get_cart))
        .route("/api/cart/:cart_id/add_pizza", post(add_pizza))
        .route("/api/cart/:cart_id/add_drink", post(add_drink))
        .route("/api/cart/:cart_id/update_qty", post(update_qty))
        .route("/api/cart/:cart_id/remove_item", post(remove_item))
        .route("/api/cart/:cart_id/clear", post(clear_cart))
        .route("/api/orders/place", post(place_order))
        .route("/api/orders/:order_id", get(get_order))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(shop)
}

async fn menu(State(s): State<Storefront>) -> Json<Menu> { Json(s.menu()) }

async fn create_cart(State(s): State<Storefront>) -> ApiResult<CartView> { Ok(Json(s.create_cart().await?)) }

async fn get_cart(State(s): State<Storefront>, Path(cart_id): Path<String>) -> ApiResult<CartWithTotals> {
    Ok(Json(s.get_cart(&cart_id).await?))
}

async fn add_pizza(State(s): State<Storefront>, Path(cart_id): Path<String>, JsonBody(item): JsonBody<PizzaItem>) -> ApiResult<CartWithTotals> {
    Ok(Json(s.add_pizza(&cart_id, item).await?))
}

async fn add_drink(State(s): State<Storefront>, Path(cart_id): Path<String>, JsonBody(item): JsonBody<DrinkItem>) -> ApiResult<CartWithTotals> {
    Ok(Json(s.add_drink(&cart_id, item).await?))
}

async fn update_qty(State(s): State<Storefront>, Path(cart_id): Path<String>, JsonBody(r): JsonBody<UpdateQtyRequest>) -> ApiResult<CartWithTotals> {
    Ok(Json(s.update_quantity(&cart_id, r).await?))
}

async fn remove_item(State(s): State<Storefront>, Path(cart_id): Path<String>, JsonBody(r): JsonBody<RemoveItemRequest>) -> ApiResult<CartWithTotals> {
    Ok(Json(s.remove_item(&cart_id, r).await?))
}

async fn clear_cart(State(s): State<Storefront>, Path(cart_id): Path<String>) -> ApiResult<CartWithTotals> {
    Ok(Json(s.clear_cart(&cart_id).await?))
}

async fn place_order(State(s): State<Storefront>, JsonBody(r): JsonBody<PlaceOrderRequest>) -> ApiResult<PlaceOrderResponse> {
    Ok(Json(s.place_order(r).await?.into()))
}

async fn get_order(State(s): State<Storefront>, Path(order_id): Path<String>) -> ApiResult<Order> {
    Ok(Json(s.get_order(&order_id).await?))
}
