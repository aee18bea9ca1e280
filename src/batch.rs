/// Resolves the effective statement count for a batch submission.
///
/// A caller-declared positive count is trusted as-is and never validated
/// against the statement text. Otherwise the count falls back to the number
/// of literal `;` characters in the batch. The fallback is a best-effort
/// heuristic with no awareness of SQL quoting or comments, so a semicolon
/// inside a string literal or procedure body inflates it.
pub fn resolve_statement_count(statements: &str, declared: Option<i64>) -> usize {
    match declared {
        Some(count) if count > 0 => count as usize,
        _ => statements.matches(';').count(),
    }
}

/// Statement configuration for one lifecycle stage: the raw SQL text and an
/// optional caller-declared statement count.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatementBlock {
    /// One or many SQL statements separated by semicolons, passed to the
    /// server verbatim.
    pub statements: String,
    /// Declared statement count. `None`, zero, and negative all mean
    /// "derive it from the statement text".
    pub number_of_statements: Option<i64>,
}

impl StatementBlock {
    pub fn new(statements: impl Into<String>) -> Self {
        Self {
            statements: statements.into(),
            number_of_statements: None,
        }
    }

    /// Declares the statement count instead of relying on the heuristic.
    pub fn with_count(mut self, count: i64) -> Self {
        self.number_of_statements = Some(count);
        self
    }

    /// The count submitted alongside this block.
    pub fn resolved_count(&self) -> usize {
        resolve_statement_count(&self.statements, self.number_of_statements)
    }
}
