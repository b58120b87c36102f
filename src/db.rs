pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod port_repo;
pub use port_repo::PortRepository;
pub mod ship_repo;
pub use ship_repo::ShipRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod order_product_repo;
pub use order_product_repo::OrderProductRepository;
pub mod operation_repo;
pub use operation_repo::OperationRepository;
pub mod order_history_repo;
pub use order_history_repo::OrderHistoryRepository;
pub mod blocklist_repo;

pub use blocklist_repo::BlocklistRepository;
