use diesel::sql_query;
use diesel_async::pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager};
use diesel_async::RunQueryDsl;
use diesel_async::{AsyncConnection, AsyncPgConnection};
use errors::DbError;

use crate::config::configuration::DatabaseSettings;

pub type PgPool = Pool<AsyncPgConnection>;

/******************************************/
// Establishing Db Connection
/******************************************/
pub fn establish_connection(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let manager =
        AsyncDieselConnectionManager::<diesel_async::AsyncPgConnection>::new(&settings.library_db_url);

    Pool::builder(manager)
        .max_size(settings.max_connections)
        .build()
        .map_err(|err| DbError::ConnectionError(err.to_string()))
}

/******************************************/
// Creating new db for tests
/******************************************/
pub async fn create_database(database_name: &str, database_url: &str) -> Result<(), DbError> {
    let mut connection = AsyncPgConnection::establish(database_url)
        .await
        .map_err(|err| DbError::ConnectionError(err.to_string()))?;

    let create_db_query = format!(r#"CREATE DATABASE "{}";"#, database_name);
    sql_query(&create_db_query)
        .execute(&mut connection)
        .await
        .map_err(|err| DbError::QueryBuilderError(err.to_string()))?;
    tracing::info!("Database '{}' created", database_name);
    Ok(())
}

/******************************************/
// Dropping db code
/******************************************/
pub async fn drop_database(database_name: &str, default_db_url: &str) {
    let mut connection = match AsyncPgConnection::establish(default_db_url).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!("Failed to connect to the maintenance database: {}", e);
            return;
        }
    };

    // Postgres refuses to drop a database with open sessions
    let terminate_query = format!(
        r#"
        SELECT pg_terminate_backend(pid)
        FROM pg_stat_activity
        WHERE datname = '{}';
    "#,
        database_name
    );

    if let Err(e) = sql_query(&terminate_query).execute(&mut connection).await {
        tracing::error!("Failed to terminate connections: {}", e);
        return;
    }

    let drop_query = format!(r#"DROP DATABASE IF EXISTS "{}";"#, database_name);

    if let Err(e) = sql_query(&drop_query).execute(&mut connection).await {
        tracing::error!("Failed to drop database: {}", e);
    } else {
        tracing::info!("Database '{}' dropped successfully.", database_name);
    }
}
