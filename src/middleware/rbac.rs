// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    models::auth::{Client, Role},
};

/// Conjunto de roles aceito por uma rota.
pub trait RoleSet: Send + Sync + 'static {
    fn roles() -> &'static [Role];
}

/// Decide se a role do cliente pertence ao conjunto exigido.
pub fn check_role(role: Role, required: &[Role]) -> Result<(), AppError> {
    if required.contains(&role) {
        return Ok(());
    }
    Err(AppError::Forbidden {
        role,
        required: required.to_vec(),
    })
}

/// O guardião: exige `auth_guard` antes e devolve o cliente autenticado.
pub struct RequireRole<T>(pub Client, pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleSet,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let client = parts
            .extensions
            .get::<Client>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        if let Err(e) = check_role(client.role, T::roles()) {
            tracing::warn!("Client {} denied: {}", client.id, e);
            return Err(e);
        }

        Ok(RequireRole(client, PhantomData))
    }
}

// ---
// CONJUNTOS DE ROLES (TIPOS)
// ---

pub struct Customers;
impl RoleSet for Customers {
    fn roles() -> &'static [Role] {
        &[Role::Client, Role::Employee, Role::Admin]
    }
}

pub struct Staff;
impl RoleSet for Staff {
    fn roles() -> &'static [Role] {
        &[Role::Employee, Role::Admin]
    }
}

pub struct Admins;
impl RoleSet for Admins {
    fn roles() -> &'static [Role] {
        &[Role::Admin]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_pass() {
        assert!(check_role(Role::Employee, Staff::roles()).is_ok());
        assert!(check_role(Role::Admin, Admins::roles()).is_ok());
        assert!(check_role(Role::Client, Customers::roles()).is_ok());
    }

    #[test]
    fn guests_are_not_customers() {
        let err = check_role(Role::Guest, Customers::roles()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Access denied. User role: GUEST, Required: [CLIENT, EMPLOYEE, ADMIN]"
        );
    }

    #[test]
    fn clients_cannot_reach_staff_routes() {
        match check_role(Role::Client, Staff::roles()) {
            Err(AppError::Forbidden { role, required }) => {
                assert_eq!(role, Role::Client);
                assert_eq!(required, vec![Role::Employee, Role::Admin]);
            }
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }
}
