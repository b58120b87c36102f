pub mod auth;
pub mod cart_service;
pub mod cascade_service;
pub mod operation_service;
pub mod order_service;

#[cfg(test)]
pub(crate) mod test_support;
