//! CRUD lifecycle orchestration for statement batches.
//!
//! [`ExecResource`] models a managed SQL object whose create/read/update/
//! delete stages are each a statement batch; [`QuerySource`] models a
//! one-shot query data source. Both delegate execution to
//! [`SnowbatchClient`] and own the stored-state bookkeeping: the state id
//! and the JSON-encoded read results.

use crate::{Result, SnowbatchClient, SnowbatchError, StatementBlock};

/// A resource whose lifecycle stages execute statement batches.
///
/// The `create` and `delete` stages are mandatory. `read` and `update` are
/// optional; an absent block makes the corresponding stage a no-op rather
/// than an error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExecResource {
    pub name: String,
    pub create: StatementBlock,
    pub read: Option<StatementBlock>,
    pub update: Option<StatementBlock>,
    pub delete: StatementBlock,
}

/// Persisted state for an [`ExecResource`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExecState {
    /// Resource id; cleared once the resource is deleted.
    pub id: String,
    /// JSON-encoded rows produced by the read stage. `None` when the read
    /// stage is not configured or the last materialization failed, never a
    /// stale value from an earlier run.
    pub read_results: Option<String>,
}

impl ExecResource {
    pub fn new(
        name: impl Into<String>,
        create: StatementBlock,
        delete: StatementBlock,
    ) -> Self {
        Self {
            name: name.into(),
            create,
            read: None,
            update: None,
            delete,
        }
    }

    /// Attaches a read stage whose query results are stored in state.
    pub fn with_read(mut self, block: StatementBlock) -> Self {
        self.read = Some(block);
        self
    }

    /// Attaches an update stage.
    pub fn with_update(mut self, block: StatementBlock) -> Self {
        self.update = Some(block);
        self
    }

    /// Rejects empty statement text on any configured block.
    pub fn validate(&self) -> Result<()> {
        if self.create.statements.is_empty() {
            return Err(SnowbatchError::EmptyStatements { stage: "create" });
        }
        if self.delete.statements.is_empty() {
            return Err(SnowbatchError::EmptyStatements { stage: "delete" });
        }
        if matches!(&self.read, Some(block) if block.statements.is_empty()) {
            return Err(SnowbatchError::EmptyStatements { stage: "read" });
        }
        if matches!(&self.update, Some(block) if block.statements.is_empty()) {
            return Err(SnowbatchError::EmptyStatements { stage: "update" });
        }
        Ok(())
    }

    /// Executes the create batch, then refreshes read results.
    ///
    /// The returned state's id is the configured resource name.
    pub async fn create(&self, client: &SnowbatchClient) -> Result<ExecState> {
        self.validate()?;
        client
            .execute_batch(&self.create.statements, self.create.resolved_count())
            .await?;

        let mut state = ExecState {
            id: self.name.clone(),
            read_results: None,
        };
        self.refresh(client, &mut state).await?;
        Ok(state)
    }

    /// Runs the read stage and refreshes `read_results` in place.
    ///
    /// Without a read block this clears the stored results and succeeds. On
    /// any failure the stored results are cleared before the error
    /// propagates, so a stale value never outlives a failed refresh.
    pub async fn refresh(&self, client: &SnowbatchClient, state: &mut ExecState) -> Result<()> {
        let Some(read) = &self.read else {
            state.read_results = None;
            return Ok(());
        };

        match client
            .query_batch(&read.statements, read.resolved_count())
            .await
            .and_then(|rows| rows.to_json())
        {
            Ok(encoded) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(bytes = encoded.len(), "stored read results");
                state.read_results = Some(encoded);
                Ok(())
            }
            Err(err) => {
                state.read_results = None;
                Err(err)
            }
        }
    }

    /// Executes the update batch if one is configured, then refreshes read
    /// results.
    pub async fn update(&self, client: &SnowbatchClient, state: &mut ExecState) -> Result<()> {
        self.validate()?;
        if let Some(update) = &self.update {
            client
                .execute_batch(&update.statements, update.resolved_count())
                .await?;
        }
        self.refresh(client, state).await
    }

    /// Executes the delete batch and clears the state.
    pub async fn delete(&self, client: &SnowbatchClient, state: &mut ExecState) -> Result<()> {
        self.validate()?;
        client
            .execute_batch(&self.delete.statements, self.delete.resolved_count())
            .await?;
        state.id.clear();
        state.read_results = None;
        Ok(())
    }
}

/// A one-shot query data source: a statement batch whose materialized rows
/// are the whole point.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuerySource {
    /// Optional source name used as the state id; a random id is generated
    /// when absent.
    pub name: Option<String>,
    pub statements: String,
    pub number_of_statements: Option<i64>,
}

/// State produced by reading a [`QuerySource`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueryState {
    pub id: String,
    /// JSON-encoded rows, or `None` when materialization failed.
    pub results: Option<String>,
}

impl QuerySource {
    pub fn new(statements: impl Into<String>) -> Self {
        Self {
            name: None,
            statements: statements.into(),
            number_of_statements: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_count(mut self, count: i64) -> Self {
        self.number_of_statements = Some(count);
        self
    }

    /// Executes the batch and returns the materialized rows as state.
    pub async fn read(&self, client: &SnowbatchClient) -> Result<QueryState> {
        if self.statements.is_empty() {
            return Err(SnowbatchError::EmptyStatements { stage: "query" });
        }

        let count =
            crate::resolve_statement_count(&self.statements, self.number_of_statements);
        let encoded = client
            .query_batch(&self.statements, count)
            .await
            .and_then(|rows| rows.to_json())?;

        Ok(QueryState {
            id: self.id(),
            results: Some(encoded),
        })
    }

    fn id(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{ExecResource, QuerySource};
    use crate::{SnowbatchError, StatementBlock};

    fn resource() -> ExecResource {
        ExecResource::new(
            "users_table",
            StatementBlock::new("CREATE TABLE users (id INT);"),
            StatementBlock::new("DROP TABLE users;"),
        )
    }

    #[test]
    fn validate_accepts_minimal_resource() {
        assert!(resource().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_mandatory_stages() {
        let mut broken = resource();
        broken.create = StatementBlock::new("");
        match broken.validate() {
            Err(SnowbatchError::EmptyStatements { stage }) => assert_eq!(stage, "create"),
            other => panic!("expected empty statements error, got {other:?}"),
        }

        let mut broken = resource();
        broken.delete = StatementBlock::new("");
        assert!(matches!(
            broken.validate(),
            Err(SnowbatchError::EmptyStatements { stage: "delete" })
        ));
    }

    #[test]
    fn validate_rejects_empty_optional_stages_when_configured() {
        let broken = resource().with_read(StatementBlock::new(""));
        assert!(matches!(
            broken.validate(),
            Err(SnowbatchError::EmptyStatements { stage: "read" })
        ));

        let ok = resource().with_update(StatementBlock::new("ALTER TABLE users ADD n INT;"));
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn query_source_uses_configured_name_as_id() {
        let source = QuerySource::new("SELECT 1;").with_name("my_query");
        assert_eq!(source.id(), "my_query");
    }

    #[test]
    fn query_source_generates_an_id_when_unnamed() {
        let source = QuerySource::new("SELECT 1;");
        let id = source.id();
        assert_eq!(id.len(), 36);
        assert_ne!(id, source.id());
    }
}
