// src/main.rs

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::{
    common::images::UPLOAD_BODY_LIMIT,
    config::{AppState, Settings},
    docs::ApiDoc,
    middleware::auth::auth_guard,
};

const DEFAULT_LOG_FILTER: &str = "port_logistics=info,sqlx=warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env é opcional (em produção as variáveis vêm do ambiente)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(false)
        .compact()
        .init();

    let settings = Settings::from_env()?;
    let bind_addr = settings.bind_addr.clone();

    let app_state = AppState::new(settings).await?;

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("✅ Database migrations applied");

    let app = app(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    tracing::info!("🚀 Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Axum server error")?;
    Ok(())
}

/// Monta o router completo (também usado pelos testes).
pub fn app(app_state: AppState) -> Router {
    // Rotas públicas
    let public_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/clients", post(handlers::auth::register))
        .route("/clients/login", post(handlers::auth::login))
        .route("/users/login", post(handlers::auth::login));

    // Tudo abaixo passa pelo auth_guard; a role é conferida em cada handler
    let protected_routes = Router::new()
        // Clientes
        .route("/clients", get(handlers::auth::list_clients))
        .route("/clients/me", get(handlers::auth::get_me))
        .route(
            "/clients/{id}",
            get(handlers::auth::get_client)
                .put(handlers::auth::update_client)
                .delete(handlers::auth::delete_client),
        )
        // Portos
        .route(
            "/ports",
            get(handlers::ports::list_ports).post(handlers::ports::create_port),
        )
        .route(
            "/ports/{id}",
            get(handlers::ports::get_port)
                .put(handlers::ports::update_port)
                .delete(handlers::ports::delete_port),
        )
        // Navios
        .route(
            "/ships",
            get(handlers::ships::list_ships).post(handlers::ships::create_ship),
        )
        .route(
            "/ships/{id}",
            get(handlers::ships::get_ship)
                .put(handlers::ships::update_ship)
                .delete(handlers::ships::delete_ship),
        )
        .route(
            "/ships/{id}/image",
            get(handlers::ships::get_ship_image)
                .put(handlers::ships::upload_ship_image)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        // Produtos
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route("/products/port/{id}", get(handlers::products::list_products_by_port))
        .route(
            "/products/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route(
            "/products/{id}/image",
            get(handlers::products::get_product_image)
                .put(handlers::products::upload_product_image)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        // Pedidos
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route("/orders/port/{id}", get(handlers::orders::list_orders_by_port))
        .route("/orders/client/{id}", get(handlers::orders::list_orders_by_client))
        .route(
            "/orders/{id}",
            get(handlers::orders::get_order)
                .put(handlers::orders::update_order)
                .delete(handlers::orders::delete_order),
        )
        // Carrinho
        .route("/cart", post(handlers::cart::add_to_cart))
        .route(
            "/cart/{order_id}",
            get(handlers::cart::get_cart).delete(handlers::cart::clear_cart),
        )
        .route(
            "/cart/{order_id}/{product_id}",
            delete(handlers::cart::remove_from_cart),
        )
        .route("/checkout/{order_id}", post(handlers::cart::checkout))
        // Operações
        .route(
            "/operations",
            get(handlers::operations::list_operations)
                .post(handlers::operations::create_operation),
        )
        .route(
            "/operations/{id}",
            get(handlers::operations::get_operation)
                .put(handlers::operations::update_operation)
                .delete(handlers::operations::delete_operation),
        )
        .route(
            "/operations/{id}/details",
            get(handlers::operations::get_operation_details),
        )
        .route(
            "/operations/port/{id}",
            get(handlers::operations::list_operations_by_port),
        )
        .route(
            "/operations/ship/{id}",
            get(handlers::operations::list_operations_by_ship),
        )
        .route(
            "/operations/order/{id}",
            get(handlers::operations::list_operations_by_order),
        )
        // Linhas de pedido
        .route(
            "/orders_products",
            get(handlers::order_products::list_order_products)
                .post(handlers::order_products::create_order_product),
        )
        .route(
            "/orders_products/order/{id}",
            get(handlers::order_products::list_by_order),
        )
        .route(
            "/orders_products/product/{id}",
            get(handlers::order_products::list_by_product),
        )
        .route(
            "/orders_products/{order_id}/{product_id}",
            get(handlers::order_products::get_order_product)
                .put(handlers::order_products::update_order_product)
                .delete(handlers::order_products::delete_order_product),
        )
        // Histórico
        .route(
            "/order_histories",
            get(handlers::order_histories::list_histories)
                .post(handlers::order_histories::create_history),
        )
        .route(
            "/order_histories/{id}",
            get(handlers::order_histories::get_history)
                .put(handlers::order_histories::update_history)
                .delete(handlers::order_histories::delete_history),
        )
        // Administração
        .route(
            "/admin/email-blocklist",
            get(handlers::admin::get_blocklist).put(handlers::admin::replace_blocklist),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use sqlx::{postgres::PgPoolOptions, PgPool};
    use tower::ServiceExt;

    use crate::services::test_support as fx;

    // Pool que nunca conecta: serve para as rotas que falham antes do banco
    fn offline_app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        app(AppState::from_pool(pool, fx::settings()))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = offline_app();
        let request = Request::get("/api/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_require_a_bearer_token() {
        let app = offline_app();

        let (status, body) = send(&app, Request::get("/api/orders").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Missing, invalid or expired authentication token.");

        let request = Request::get("/api/ports")
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) =
            send(&app, json_request("POST", "/api/checkout/00000000-0000-0000-0000-000000000000", Some("garbage"), Value::Null)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_login_payload_is_rejected_before_the_database() {
        let app = offline_app();
        let (status, body) = send(
            &app,
            json_request("POST", "/api/users/login", None, json!({ "logonName": "", "password": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"]["logon_name"].is_array());
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = offline_app();
        let (status, body) = send(
            &app,
            Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/cart"].is_object());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL server"]
    async fn cart_checkout_scenario_over_http(pool: PgPool) {
        let app = app(AppState::from_pool(pool.clone(), fx::settings()));

        let (status, client) = send(
            &app,
            json_request(
                "POST",
                "/api/clients",
                None,
                json!({
                    "name": "Port Authority",
                    "address": "Quay 1",
                    "email": "ops@harbour.pl",
                    "logonName": "harbour",
                    "password": "s3cret!"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(client["role"], "CLIENT");

        // Um cliente comum não cria portos
        let (_, auth) = send(
            &app,
            json_request("POST", "/api/clients/login", None, json!({ "logonName": "harbour", "password": "s3cret!" })),
        )
        .await;
        let token = auth["token"].as_str().unwrap().to_string();
        let (status, body) = send(
            &app,
            json_request("POST", "/api/ports", Some(&token), json!({ "name": "P1", "location": "Gdańsk", "country": "Poland" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Access denied. User role: CLIENT, Required: [EMPLOYEE, ADMIN]");

        // Promovido a funcionário (o guard relê o cliente a cada requisição)
        sqlx::query("UPDATE clients SET role = 'EMPLOYEE' WHERE logon_name = 'harbour'")
            .execute(&pool)
            .await
            .unwrap();

        let (status, port) = send(
            &app,
            json_request("POST", "/api/ports", Some(&token), json!({ "name": "P1", "location": "Gdańsk", "country": "Poland" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, product) = send(
            &app,
            json_request(
                "POST",
                "/api/products",
                Some(&token),
                json!({ "name": "X", "price": 10.0, "weight": 1.5, "portId": port["id"] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, cart) = send(
            &app,
            json_request("POST", "/api/cart", Some(&token), json!({ "productId": product["id"], "quantity": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cart["order"]["status"], "pending");
        let order_id = cart["order"]["id"].as_str().unwrap().to_string();

        let (_, cart) = send(
            &app,
            json_request(
                "POST",
                "/api/cart",
                Some(&token),
                json!({ "orderId": order_id, "productId": product["id"], "quantity": 3 }),
            ),
        )
        .await;
        assert_eq!(cart["item"]["quantity"], 5);

        let (status, order) = send(
            &app,
            json_request("POST", &format!("/api/checkout/{}", order_id), Some(&token), Value::Null),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(order["status"], "shipped");

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/cart",
                Some(&token),
                json!({ "orderId": order_id, "productId": product["id"], "quantity": 1 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "cannot modify a shipped order");
    }

    // Cadastra um cliente e o promove a funcionário; devolve o token
    async fn employee_token(app: &Router, pool: &PgPool, logon_name: &str) -> String {
        let (status, _) = send(
            app,
            json_request(
                "POST",
                "/api/clients",
                None,
                json!({
                    "name": "Dock Crew",
                    "address": "Quay 2",
                    "email": format!("{}@harbour.pl", logon_name),
                    "logonName": logon_name,
                    "password": "s3cret!"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        sqlx::query("UPDATE clients SET role = 'EMPLOYEE' WHERE logon_name = $1")
            .bind(logon_name)
            .execute(pool)
            .await
            .unwrap();

        let (_, auth) = send(
            app,
            json_request("POST", "/api/clients/login", None, json!({ "logonName": logon_name, "password": "s3cret!" })),
        )
        .await;
        auth["token"].as_str().unwrap().to_string()
    }

    // PNG de ruído: não comprime, então o arquivo fica do tamanho dos pixels
    fn noise_png(side: u32) -> Vec<u8> {
        use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};

        let canvas = RgbImage::from_fn(side, side, |x, y| {
            let mut h = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA6B);
            h ^= h >> 15;
            h = h.wrapping_mul(0x2C1B_3C6D);
            h ^= h >> 12;
            Rgb([h as u8, (h >> 8) as u8, (h >> 16) as u8])
        });
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(canvas)
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .unwrap();
        buffer
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL server"]
    async fn images_larger_than_two_megabytes_can_be_uploaded(pool: PgPool) {
        use base64::{engine::general_purpose::STANDARD, Engine as _};

        let app = app(AppState::from_pool(pool.clone(), fx::settings()));
        let token = employee_token(&app, &pool, "crew").await;

        let (status, ship) = send(
            &app,
            json_request("POST", "/api/ships", Some(&token), json!({ "name": "Ever Given", "capacity": 20000 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let ship_id = ship["id"].as_str().unwrap().to_string();

        let png = noise_png(1100);
        assert!(png.len() > 2 * 1024 * 1024);
        assert!(png.len() < crate::common::images::MAX_IMAGE_BYTES);

        let uri = format!("/api/ships/{}/image", ship_id);
        let (status, _) = send(
            &app,
            json_request("PUT", &uri, Some(&token), json!({ "image": STANDARD.encode(&png) })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let request = Request::get(&uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.len(), png.len());
    }
}
