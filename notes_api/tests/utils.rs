#![allow(dead_code)]

use diesel::{Connection, PgConnection, RunQueryDsl};
use diesel_migrations::MigrationHarness;
use reqwest::Response;

pub async fn assert_ok_response(response: Response) -> Result<Response, String> {
    if response.status().is_success() {
        Ok(response)
    } else {
        let body = response.text().await.map_err(|err| format!("{err:?}"))?;
        Err(body)
    }
}

/// Reset the notes table between test runs. Refuses to touch any database
/// not named `test` so prod isn't goofed during testing.
pub fn reset_database(db_connection_url: &str) -> Result<(), String> {
    assert!(db_connection_url.ends_with("/test"));
    let mut conn =
        PgConnection::establish(db_connection_url).map_err(|err| format!("{err:?}"))?;
    conn.run_pending_migrations(notes_api::MIGRATIONS)
        .map_err(|err| format!("{err:?}"))?;
    diesel::sql_query("TRUNCATE TABLE notes RESTART IDENTITY")
        .execute(&mut conn)
        .map_err(|err| format!("{err:?}"))?;
    Ok(())
}
