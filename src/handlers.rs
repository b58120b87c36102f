pub mod admin;
pub mod auth;
pub mod cart;
pub mod operations;
pub mod order_histories;
pub mod order_products;
pub mod orders;
pub mod ports;
pub mod products;
pub mod ships;
