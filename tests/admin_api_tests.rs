//! 管理端接口的授权集成测试

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::TestApp;

#[tokio::test]
async fn test_dashboard_role_matrix() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let customer = app.customer_token("c@x.com").await;

    let (status, _) = app.get("/api/dashboard", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/api/dashboard", Some(&customer)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], 403);

    let (status, body) = app.get("/api/dashboard", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalOrders"], 0);
    assert!(body["inventory"].is_array());
    assert!(body["dailyStats"].is_array());
}

#[tokio::test]
async fn test_sales_report_requires_admin() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let customer = app.customer_token("c@x.com").await;

    let (status, _) = app.get("/api/reports/sales", Some(&customer)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/api/reports/sales", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["dailySales"].is_array());
    assert!(body["monthlySales"].is_array());
    assert!(body["topItems"].is_array());
}

#[tokio::test]
async fn test_product_writes_require_admin() {
    let app = TestApp::new().await;
    let _admin = app.admin_token().await;
    let customer = app.customer_token("c@x.com").await;

    let product = json!({ "name": "Pho", "price": 9.5, "category": "eastern" });

    let (status, _) = app.post("/api/products", None, product.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.post("/api/products", Some(&customer), product).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(app.count("products").await, 0);
}

#[tokio::test]
async fn test_dashboard_reports_orders_and_low_stock() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let customer = app.customer_token("c@x.com").await;
    let ramen = app.seed_product("Ramen", 12.0, 2).await;
    app.seed_product("Burger", 9.0, 50).await;

    let order = json!({
        "items": [{ "productId": ramen, "quantity": 3, "portionSize": "large" }],
        "totalPrice": 36.0
    });
    let (status, _) = app.post("/api/orders", Some(&customer), order).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, dashboard) = app.get("/api/dashboard", Some(&admin)).await;
    assert_eq!(dashboard["totalOrders"], 1);
    assert_eq!(dashboard["totalRevenue"], 36.0);
    assert_eq!(dashboard["inventory"].as_array().unwrap().len(), 2);

    let low_stock = dashboard["lowStockItems"].as_array().unwrap();
    assert_eq!(low_stock.len(), 1);
    assert_eq!(low_stock[0]["name"], "Ramen");

    let daily = dashboard["dailyStats"].as_array().unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0]["totalOrders"], 1);

    let (_, report) = app.get("/api/reports/sales", Some(&admin)).await;
    let top = report["topItems"].as_array().unwrap();
    assert_eq!(top[0]["productId"], ramen);
    assert_eq!(top[0]["quantitySold"], 3);
    assert_eq!(top[0]["totalRevenue"], 36.0);
    assert_eq!(report["monthlySales"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancelled_orders_excluded_from_revenue() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let customer = app.customer_token("c@x.com").await;
    let ramen = app.seed_product("Ramen", 12.0, 20).await;

    for _ in 0..2 {
        let order = json!({
            "items": [{ "productId": ramen, "quantity": 1, "portionSize": "regular" }],
            "totalPrice": 12.0
        });
        app.post("/api/orders", Some(&customer), order).await;
    }

    sqlx::query("UPDATE orders SET status = 'cancelled' WHERE id = (SELECT MIN(id) FROM orders)")
        .execute(&app.pool)
        .await
        .unwrap();

    let (_, dashboard) = app.get("/api/dashboard", Some(&admin)).await;
    assert_eq!(dashboard["totalOrders"], 1);
    assert_eq!(dashboard["totalRevenue"], 12.0);
}
