use snowbatch::{resolve_statement_count, SnowbatchClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = SnowbatchClient::from_env().map_err(anyhow::Error::msg)?;

    let statements = "SELECT CURRENT_ACCOUNT() AS account; SHOW TABLES;";
    let count = resolve_statement_count(statements, None);

    let result = client.query_batch(statements, count).await?;
    println!("{} row(s)", result.len());
    println!("{}", result.to_json()?);

    Ok(())
}
