//! Live round trips against a real Snowflake account.
//!
//! These tests are skipped unless `SNOWFLAKE_ACCOUNT` and
//! `SNOWFLAKE_OAUTH_ACCESS_TOKEN` are set in the environment.

use snowbatch::{resolve_statement_count, SnowbatchClient, Value};

fn live_client() -> Option<SnowbatchClient> {
    match SnowbatchClient::from_env() {
        Ok(client) => Some(client),
        Err(reason) => {
            eprintln!("skipping live test: {reason}");
            None
        }
    }
}

#[tokio::test]
async fn live_single_select_round_trip() {
    let Some(client) = live_client() else { return };

    let result = client
        .query_batch("SELECT 1 AS answer;", 1)
        .await
        .expect("live query must succeed");

    assert_eq!(result.len(), 1);
    assert_eq!(result.rows[0]["ANSWER"], Value::Integer(1));
}

#[tokio::test]
async fn live_multi_statement_batch_concatenates_results() {
    let Some(client) = live_client() else { return };

    let statements = "SELECT 1 AS a; SELECT 'two' AS b;";
    let count = resolve_statement_count(statements, None);
    let result = client
        .query_batch(statements, count)
        .await
        .expect("live batch must succeed");

    assert_eq!(result.len(), 2);
    assert_eq!(result.rows[0]["A"], Value::Integer(1));
    assert_eq!(result.rows[1]["B"], Value::Text("two".to_owned()));
}
