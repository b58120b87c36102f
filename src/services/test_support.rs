// src/services/test_support.rs
// Fixtures para os testes com banco (#[sqlx::test])

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::{ProductPurgeScope, Settings, TransitionPolicy},
    models::{operations::OperationType, orders::OrderStatus},
};

pub fn settings() -> Settings {
    Settings {
        database_url: "postgres://unused".into(),
        jwt_secret: "test-secret".into(),
        jwt_ttl_hours: 1,
        bind_addr: "127.0.0.1:0".into(),
        db_max_connections: 5,
        default_port_id: None,
        transition_policy: TransitionPolicy::Lenient,
        product_purge_scope: ProductPurgeScope::Legacy,
    }
}

pub async fn port(pool: &PgPool, name: &str) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO ports (name, location, country) VALUES ($1, 'Gdańsk', 'Poland') RETURNING id",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn ship(pool: &PgPool, name: &str) -> Uuid {
    sqlx::query_scalar("INSERT INTO ships (name, capacity) VALUES ($1, 1000) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn product(pool: &PgPool, name: &str, port_id: Option<Uuid>) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO products (name, price, weight, port_id) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(name)
    .bind(Decimal::new(1000, 2))
    .bind(Decimal::new(2500, 3))
    .bind(port_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn client(pool: &PgPool, logon_name: &str) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO clients (name, address, email, logon_name, password_hash)
        VALUES ($1, 'Somewhere 1', $1 || '@example.com', $1, 'not-a-real-hash')
        RETURNING id
        "#,
    )
    .bind(logon_name)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn order(pool: &PgPool, port_id: Uuid, status: OrderStatus) -> Uuid {
    sqlx::query_scalar("INSERT INTO orders (status, port_id) VALUES ($1, $2) RETURNING id")
        .bind(status)
        .bind(port_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn line_item(pool: &PgPool, order_id: Uuid, product_id: Uuid, quantity: i32) {
    sqlx::query("INSERT INTO orders_products (order_id, product_id, quantity) VALUES ($1, $2, $3)")
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn operation(pool: &PgPool, ship_id: Uuid, port_id: Uuid, order_id: Uuid) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO operations (name, operation_type, ship_id, port_id, order_id)
        VALUES ('Unload', $1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(OperationType::CargoDischarge)
    .bind(ship_id)
    .bind(port_id)
    .bind(order_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn history(pool: &PgPool, order_id: Uuid) {
    sqlx::query("INSERT INTO order_histories (description, order_id) VALUES ('Created', $1)")
        .bind(order_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn count(pool: &PgPool, sql: &str, id: Uuid) -> i64 {
    sqlx::query_scalar(sql).bind(id).fetch_one(pool).await.unwrap()
}

/// Faz qualquer DELETE em `orders` falhar, para exercitar o rollback das cascatas.
pub async fn refuse_order_deletes(pool: &PgPool) {
    sqlx::query(
        r#"
        CREATE FUNCTION refuse_order_delete() RETURNS trigger AS $$
        BEGIN
            RAISE EXCEPTION 'orders cannot be deleted right now';
        END
        $$ LANGUAGE plpgsql
        "#,
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "CREATE TRIGGER refuse_order_delete BEFORE DELETE ON orders \
         FOR EACH ROW EXECUTE FUNCTION refuse_order_delete()",
    )
    .execute(pool)
    .await
    .unwrap();
}
