use snowbatch::{ExecResource, SnowbatchClient, StatementBlock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = SnowbatchClient::from_env().map_err(anyhow::Error::msg)?;

    let resource = ExecResource::new(
        "demo_users",
        StatementBlock::new(
            "CREATE TABLE demo_users (id INT, name TEXT); \
             INSERT INTO demo_users VALUES (1, 'Alice');",
        ),
        StatementBlock::new("DROP TABLE demo_users;"),
    )
    .with_read(StatementBlock::new("SELECT id, name FROM demo_users;"));

    let mut state = resource.create(&client).await?;
    println!("created {} -> {:?}", state.id, state.read_results);

    resource.delete(&client, &mut state).await?;
    println!("deleted, id now {:?}", state.id);

    Ok(())
}
