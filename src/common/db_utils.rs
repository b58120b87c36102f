use crate::common::error::AppError;

// ---
// Helper de constraints: traduz violações do Postgres em erros de domínio
// ---
/// Violação de UNIQUE vira `Conflict` (409) e de FOREIGN KEY vira `NotFound` (404).
/// Qualquer outro erro segue como `DatabaseError` (500).
pub(crate) fn map_constraint_error(
    e: sqlx::Error,
    on_unique: impl FnOnce(Option<&str>) -> String,
    on_foreign_key: impl FnOnce(Option<&str>) -> String,
) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::Conflict(on_unique(db_err.constraint()));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::NotFound(on_foreign_key(db_err.constraint()));
        }
    }
    e.into()
}

/// SQLSTATE 22003: valor numérico fora do intervalo da coluna.
pub(crate) fn is_out_of_range(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("22003"),
        _ => false,
    }
}

/// Mensagem padrão para FKs: nomeia a entidade pelo nome da constraint
/// gerada pelo Postgres (ex.: "orders_port_id_fkey" -> "Port").
pub(crate) fn referenced_entity(constraint: Option<&str>) -> String {
    let entity = match constraint {
        Some(c) if c.contains("port_id") => "Port",
        Some(c) if c.contains("client_id") => "Client",
        Some(c) if c.contains("ship_id") => "Ship",
        Some(c) if c.contains("order_id") => "Order",
        Some(c) if c.contains("product_id") => "Product",
        _ => "Referenced entity",
    };
    format!("{} not found", entity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referenced_entity_reads_the_constraint_name() {
        assert_eq!(referenced_entity(Some("orders_port_id_fkey")), "Port not found");
        assert_eq!(referenced_entity(Some("orders_client_id_fkey")), "Client not found");
        assert_eq!(referenced_entity(Some("operations_ship_id_fkey")), "Ship not found");
        assert_eq!(referenced_entity(None), "Referenced entity not found");
    }

    #[test]
    fn non_database_errors_pass_through_as_500() {
        let err = map_constraint_error(
            sqlx::Error::RowNotFound,
            |_| "dup".into(),
            referenced_entity,
        );
        assert!(matches!(err, AppError::DatabaseError(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn only_database_errors_can_be_out_of_range() {
        assert!(!is_out_of_range(&sqlx::Error::RowNotFound));
        assert!(!is_out_of_range(&sqlx::Error::PoolTimedOut));
    }
}
