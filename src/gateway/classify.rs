/// Which execution path a statement takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Returns rows.
    Read,
    /// Returns an affected-row count.
    Mutate,
}

impl StatementKind {
    /// Prefix check only: a statement is a read when, after trimming and
    /// uppercasing, it starts with `SELECT`. Anything else (including
    /// `WITH ... SELECT` and statements behind leading comments) is a mutate.
    pub fn classify(sql: &str) -> Self {
        if sql.trim().to_uppercase().starts_with("SELECT") {
            Self::Read
        } else {
            Self::Mutate
        }
    }
}
