/// All diagnostic events emitted while building and running statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
    /// A filter compared a column against null with `eq`/`ne`.
    ///
    /// The statement is still built (as `IS NULL` / `IS NOT NULL`); callers
    /// should switch to the dedicated null operator named in `suggested`.
    NullComparison {
        column: String,
        operator: String,
        suggested: String,
    },
    /// A bulk insert was split into physical statements.
    BatchPlanned {
        table: String,
        rows: usize,
        statements: usize,
    },
    /// A physical statement finished executing.
    StatementExecuted {
        kind: StatementKind,
        table: String,
        affected: u64,
    },
    /// Transaction boundary reached.
    Transaction { stage: TransactionStage },
}

/// Kind of statement that was executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        }
    }
}

/// Transaction lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStage {
    Begin,
    Commit,
    Rollback,
}
