// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Clients ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::list_clients,
        handlers::auth::get_client,
        handlers::auth::update_client,
        handlers::auth::delete_client,

        // --- Ports ---
        handlers::ports::list_ports,
        handlers::ports::get_port,
        handlers::ports::create_port,
        handlers::ports::update_port,
        handlers::ports::delete_port,

        // --- Ships ---
        handlers::ships::list_ships,
        handlers::ships::get_ship,
        handlers::ships::create_ship,
        handlers::ships::update_ship,
        handlers::ships::delete_ship,
        handlers::ships::upload_ship_image,
        handlers::ships::get_ship_image,

        // --- Products ---
        handlers::products::list_products,
        handlers::products::list_products_by_port,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::products::upload_product_image,
        handlers::products::get_product_image,

        // --- Orders ---
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::list_orders_by_port,
        handlers::orders::list_orders_by_client,
        handlers::orders::create_order,
        handlers::orders::update_order,
        handlers::orders::delete_order,

        // --- Cart ---
        handlers::cart::add_to_cart,
        handlers::cart::get_cart,
        handlers::cart::remove_from_cart,
        handlers::cart::clear_cart,
        handlers::cart::checkout,

        // --- Operations ---
        handlers::operations::list_operations,
        handlers::operations::get_operation,
        handlers::operations::get_operation_details,
        handlers::operations::list_operations_by_port,
        handlers::operations::list_operations_by_ship,
        handlers::operations::list_operations_by_order,
        handlers::operations::create_operation,
        handlers::operations::update_operation,
        handlers::operations::delete_operation,

        // --- Order products ---
        handlers::order_products::list_order_products,
        handlers::order_products::get_order_product,
        handlers::order_products::list_by_order,
        handlers::order_products::list_by_product,
        handlers::order_products::create_order_product,
        handlers::order_products::update_order_product,
        handlers::order_products::delete_order_product,

        // --- Order histories ---
        handlers::order_histories::list_histories,
        handlers::order_histories::get_history,
        handlers::order_histories::create_history,
        handlers::order_histories::update_history,
        handlers::order_histories::delete_history,

        // --- Admin ---
        handlers::admin::get_blocklist,
        handlers::admin::replace_blocklist,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::Client,
            models::auth::RegisterClientPayload,
            models::auth::UpdateClientPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::EmailBlockDomain,
            models::auth::ReplaceBlocklistPayload,

            // --- Fleet ---
            models::fleet::Port,
            models::fleet::ShipStatus,
            models::fleet::Ship,
            models::fleet::CreatePortPayload,
            models::fleet::UpdatePortPayload,
            models::fleet::CreateShipPayload,
            models::fleet::UpdateShipPayload,
            models::fleet::ImageUploadPayload,

            // --- Catalog ---
            models::catalog::Product,
            models::catalog::CreateProductPayload,
            models::catalog::UpdateProductPayload,

            // --- Orders ---
            models::orders::OrderStatus,
            models::orders::Order,
            models::orders::OrderProduct,
            models::orders::OrderHistory,
            models::orders::CreateOrderPayload,
            models::orders::UpdateOrderPayload,
            models::orders::AddToCartPayload,
            models::orders::CreateOrderProductPayload,
            models::orders::UpdateOrderProductPayload,
            models::orders::CreateOrderHistoryPayload,
            models::orders::UpdateOrderHistoryPayload,
            models::orders::DeletedOrder,
            models::orders::CartResponse,

            // --- Operations ---
            models::operations::OperationType,
            models::operations::Operation,
            models::operations::OperationDetail,
            models::operations::CreateOperationPayload,
            models::operations::UpdateOperationPayload,
        )
    ),
    tags(
        (name = "Clients", description = "Cadastro, Login e Perfil de Clientes"),
        (name = "Ports", description = "Portos"),
        (name = "Ships", description = "Frota de Navios"),
        (name = "Products", description = "Produtos e Cargas"),
        (name = "Orders", description = "Gestão de Pedidos"),
        (name = "Cart", description = "Carrinho e Checkout"),
        (name = "Operations", description = "Operações Portuárias"),
        (name = "Order Products", description = "Linhas de Pedido"),
        (name = "Order Histories", description = "Histórico dos Pedidos"),
        (name = "Admin", description = "Administração (Lista de Domínios Bloqueados)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
