// sqlx::Error -> AppError

use jobescrow_core::error::AppError;

// SQLite extended result codes: https://www.sqlite.org/rescode.html
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some(code @ ("2067" | "1555")) => AppError::Conflict(format!(
                "Unique constraint violation: {} ({})",
                db_err.message(),
                code
            )),
            Some(code @ ("275" | "787" | "1299")) => AppError::Database(format!(
                "Constraint violation: {} ({})",
                db_err.message(),
                code
            )),
            Some("5") => AppError::Database(format!(
                "Database locked (SQLITE_BUSY): {}",
                db_err.message()
            )),
            Some("13") => AppError::Database(format!("Database full: {}", db_err.message())),
            Some(code) => AppError::Database(format!(
                "Database error [{}]: {}",
                code,
                db_err.message()
            )),
            None => AppError::Database(format!("Database error: {}", db_err.message())),
        },
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => AppError::Database(format!("Column not found: {}", col)),
        _ => AppError::Database(err.to_string()),
    }
}
