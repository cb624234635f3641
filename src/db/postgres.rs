//! PostgreSQL client implementation.
//!
//! Provides `PostgresClient`, a single sqlx connection that implements
//! `DatabaseConnection`. Statements go over the simple query protocol, so
//! every value arrives in text format and any column type can fall back to
//! a string decode.

use crate::db::{DatabaseConnection, ResultRow, ResultTable, Value};
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::Postgres;
use sqlx::{Column as SqlxColumn, Connection, Row as SqlxRow, TypeInfo, ValueRef};
use tracing::debug;

/// A single PostgreSQL connection.
#[derive(Debug)]
pub struct PostgresClient {
    conn: PgConnection,
}

impl PostgresClient {
    /// Opens a connection from a `postgres://` or `postgresql://` URL.
    pub async fn connect(conn_str: &str) -> Result<Self> {
        let options = conn_str
            .parse::<PgConnectOptions>()
            .map_err(|e| RelayError::connection(e.to_string()))?
            .options([("IntervalStyle", "iso_8601")]);

        let conn = PgConnection::connect_with(&options)
            .await
            .map_err(|e| RelayError::connection(e.to_string()))?;
        debug!("Opened PostgreSQL connection");
        Ok(Self { conn })
    }
}

#[async_trait]
impl DatabaseConnection for PostgresClient {
    async fn ping(&mut self) -> Result<()> {
        self.conn
            .ping()
            .await
            .map_err(|e| RelayError::connection(e.to_string()))
    }

    async fn query(&mut self, sql: &str) -> Result<ResultTable> {
        let rows: Vec<PgRow> = sqlx::Executor::fetch_all(&mut self.conn, sqlx::raw_sql(sql))
            .await
            .map_err(|e| RelayError::query(format_query_error(&e)))?;

        let columns = rows.first().map(column_names).unwrap_or_default();
        let rows = rows.iter().map(convert_row).collect::<Result<Vec<_>>>()?;

        Ok(ResultTable::with_data(columns, rows))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| RelayError::connection(e.to_string()))
    }
}

fn column_names(row: &PgRow) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

/// Converts a sqlx PgRow to our row type, stopping at the first bad cell.
fn convert_row(row: &PgRow) -> Result<ResultRow> {
    let mut out = ResultRow::new();
    for (i, col) in row.columns().iter().enumerate() {
        let value = convert_value(row, i, col.type_info().name()).map_err(|e| {
            RelayError::scan(format!("column '{}': {}", col.name(), e))
        })?;
        out.push(col.name(), value);
    }
    Ok(out)
}

/// Converts a single text-format value by its Postgres type name.
fn convert_value(row: &PgRow, index: usize, type_name: &str) -> sqlx::Result<Value> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match type_name {
        "BOOL" => Value::Bool(row.try_get_unchecked::<bool, _>(index)?),
        "INT2" => Value::Int(row.try_get_unchecked::<i16, _>(index)? as i64),
        "INT4" => Value::Int(row.try_get_unchecked::<i32, _>(index)? as i64),
        "INT8" => Value::Int(row.try_get_unchecked::<i64, _>(index)?),
        "FLOAT4" => Value::Float(row.try_get_unchecked::<f32, _>(index)? as f64),
        "FLOAT8" => Value::Float(row.try_get_unchecked::<f64, _>(index)?),
        "BYTEA" => Value::Bytes(row.try_get_unchecked::<Vec<u8>, _>(index)?),
        "DATE" => temporal(row, index, Value::from_date)?,
        "TIME" => temporal(row, index, Value::from_time)?,
        "TIMESTAMP" => temporal(row, index, Value::from_datetime)?,
        "TIMESTAMPTZ" => temporal(row, index, Value::from_datetime_utc)?,
        // No chrono type; the session's IntervalStyle makes these ISO-8601 durations.
        "TIMETZ" | "INTERVAL" => Value::Temporal(row.try_get_unchecked::<String, _>(index)?),
        // NUMERIC, UUID, JSON, arrays and the text family keep the server's text.
        _ => Value::Text(row.try_get_unchecked::<String, _>(index)?),
    };

    Ok(value)
}

/// Decodes a date/time column through chrono.
///
/// Values chrono cannot represent (`infinity`, or output after the batch
/// changed `DateStyle`) keep the server's text.
fn temporal<T>(row: &PgRow, index: usize, to_value: fn(T) -> Value) -> sqlx::Result<Value>
where
    T: for<'r> sqlx::Decode<'r, Postgres>,
{
    match row.try_get_unchecked::<T, _>(index) {
        Ok(v) => Ok(to_value(v)),
        Err(_) => Ok(Value::Temporal(row.try_get_unchecked::<String, _>(index)?)),
    }
}

/// Formats a query error, appending Postgres detail and hint when present.
fn format_query_error(error: &sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    let mut result = String::from(db_error.message());

    if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
        if let Some(detail) = pg_error.detail() {
            result.push_str("\n  DETAIL: ");
            result.push_str(detail);
        }
        if let Some(hint) = pg_error.hint() {
            result.push_str("\n  HINT: ");
            result.push_str(hint);
        }
    }

    result
}
