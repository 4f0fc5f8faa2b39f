use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pizzeria::{api, domain::pricing::PriceTable, Storefront};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router { api::router(Storefront::new(PriceTable::default())) }

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder.header("content-type", "application/json").body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

async fn new_cart(app: &Router) -> String {
    let (status, cart) = call(app, Method::POST, "/api/cart", None).await;
    assert_eq!(status, StatusCode::OK);
    cart["cart_id"].as_str().unwrap().to_string()
}

fn small_pizza(qty: u32, toppings: Value) -> Value {
    json!({
        "customization": {"size": "small", "crust": "thin", "sauce": "tomato", "cheese": "normal", "toppings": toppings},
        "qty": qty
    })
}

fn customer() -> Value {
    json!({
        "full_name": "Dana Rivera",
        "email": "dana@example.com",
        "phone": "512-555-0199",
        "address_line1": "100 Congress Ave",
        "city": "Austin",
        "state": "TX",
        "postal_code": "78701"
    })
}

#[tokio::test]
async fn menu_lists_toppings_drinks_and_prices() {
    let (status, menu) = call(&app(), Method::GET, "/api/menu", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(menu["toppings"].as_array().unwrap().len(), 12);
    assert_eq!(menu["drinks"][0], "none");
    assert_eq!(menu["prices"]["size"]["medium"], 13.0);
    assert_eq!(menu["prices"]["tax_rate"], 0.0825);
}

#[tokio::test]
async fn cart_lifecycle_over_http() {
    let app = app();
    let id = new_cart(&app).await;

    let (status, body) = call(&app, Method::POST, &format!("/api/cart/{id}/add_pizza"), Some(small_pizza(2, json!(["bacon", "bacon"])))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"]["items"][0]["customization"]["toppings"], json!(["bacon"]));
    assert_eq!(body["cart"]["items"][0]["unit_price"], 11.25);
    assert_eq!(body["totals"]["subtotal"], 22.5);

    let (status, body) = call(&app, Method::POST, &format!("/api/cart/{id}/add_drink"), Some(json!({"drink": "coke"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"]["items"][1]["kind"], "drink");

    let (status, body) = call(&app, Method::POST, &format!("/api/cart/{id}/update_qty"), Some(json!({"index": 1, "qty": 3}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"]["items"][1]["line_total"], 6.75);

    let (status, body) = call(&app, Method::POST, &format!("/api/cart/{id}/remove_item"), Some(json!({"index": 0}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"]["items"].as_array().unwrap().len(), 1);

    let (status, body) = call(&app, Method::POST, &format!("/api/cart/{id}/clear"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["total"], 0.0);
}

#[tokio::test]
async fn cart_errors_carry_kind_and_status() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/cart/cart_unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let id = new_cart(&app).await;
    let (status, body) = call(&app, Method::POST, &format!("/api/cart/{id}/add_drink"), Some(json!({"drink": "none"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_DRINK_SELECTION");

    let (status, body) = call(&app, Method::POST, &format!("/api/cart/{id}/add_pizza"), Some(small_pizza(1, json!(["anchovies"])))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_TOPPING");

    let (status, body) = call(&app, Method::POST, &format!("/api/cart/{id}/remove_item"), Some(json!({"index": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INDEX");

    let (_, cart) = call(&app, Method::GET, &format!("/api/cart/{id}"), None).await;
    assert!(cart["cart"]["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn approved_order_is_stored_and_empties_cart() {
    let app = app();
    let id = new_cart(&app).await;
    call(&app, Method::POST, &format!("/api/cart/{id}/add_pizza"), Some(small_pizza(2, json!([])))).await;

    let request = json!({"cart_id": id, "customer": customer(), "payment": {"method": "cash"}});
    let (status, body) = call(&app, Method::POST, "/api/orders/place", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    let summary = &body["order_summary"];
    assert_eq!(summary["status"], "placed");
    assert_eq!(summary["payment"]["auth_id"], "cash");
    assert_eq!(summary["totals"], json!({"subtotal": 20.0, "tax": 1.65, "total": 21.65}));

    let order_id = summary["order_id"].as_str().unwrap();
    let (status, order) = call(&app, Method::GET, &format!("/api/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["totals"], summary["totals"]);
    assert_eq!(order["items"][0]["line_total"], 20.0);

    let (_, cart) = call(&app, Method::GET, &format!("/api/cart/{id}"), None).await;
    assert!(cart["cart"]["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn declined_order_leaves_cart_for_retry() {
    let app = app();
    let id = new_cart(&app).await;
    call(&app, Method::POST, &format!("/api/cart/{id}/add_pizza"), Some(small_pizza(1, json!(["ham"])))).await;

    let request = json!({"cart_id": id, "customer": customer(), "payment": {"method": "giftcard", "code": " decline "}});
    let (status, body) = call(&app, Method::POST, "/api/orders/place", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "Payment declined");
    assert_eq!(body["payment"], json!({"status": "declined", "reason": "Mock gift card declined"}));
    assert_eq!(body["order_summary"]["cart"]["items"].as_array().unwrap().len(), 1);

    let (_, cart) = call(&app, Method::GET, &format!("/api/cart/{id}"), None).await;
    assert_eq!(cart["cart"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn order_placement_input_errors() {
    let app = app();
    let id = new_cart(&app).await;

    let request = json!({"cart_id": id, "customer": customer(), "payment": {"method": "cash"}});
    let (status, body) = call(&app, Method::POST, "/api/orders/place", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_CART");

    call(&app, Method::POST, &format!("/api/cart/{id}/add_drink"), Some(json!({"drink": "water", "qty": 2}))).await;
    let request = json!({"cart_id": id, "customer": customer(), "payment": {"method": "card", "card_number": "4111111111111111"}});
    let (status, body) = call(&app, Method::POST, "/api/orders/place", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_PAYMENT_FIELDS");
    assert_eq!(body["message"], "Missing card fields: exp_month, exp_year, cvv, zip_code");

    let (status, body) = call(&app, Method::GET, "/api/orders/order_unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn malformed_bodies_are_structured_validation_failures() {
    let app = app();
    let id = new_cart(&app).await;

    let (status, body) = call(&app, Method::POST, &format!("/api/cart/{id}/add_drink"), Some(json!({"drink": "pepsi"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["message"].as_str().unwrap().contains("pepsi"));

    let (status, body) = call(&app, Method::POST, &format!("/api/cart/{id}/remove_item"), Some(json!({"index": -1}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let (status, body) = call(&app, Method::POST, &format!("/api/cart/{id}/update_qty"), Some(json!({"qty": 2}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let request = json!({"cart_id": id, "customer": customer(), "payment": {"method": "cash", "card_number": "123"}});
    let (status, body) = call(&app, Method::POST, "/api/orders/place", Some(request)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn payment_without_method_is_charged_as_card() {
    let app = app();
    let id = new_cart(&app).await;
    call(&app, Method::POST, &format!("/api/cart/{id}/add_drink"), Some(json!({"drink": "coke"}))).await;

    let payment = json!({"card_number": "4111111111111111", "exp_month": 12, "exp_year": 2099, "cvv": "123", "zip_code": "78701"});
    let request = json!({"cart_id": id, "customer": customer(), "payment": payment});
    let (status, body) = call(&app, Method::POST, "/api/orders/place", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["order_summary"]["payment"]["card_last4"], "1111");
    assert!(body["order_summary"]["payment"]["auth_id"].as_str().unwrap().starts_with("auth_"));
}
