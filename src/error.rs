use thiserror::Error;

/// Failures scoped to a single dictionary entry. The pipeline logs them with
/// file and headline context and moves on to the next entry.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("structural mismatch: {0}")]
    StructuralMismatch(String),

    #[error("unknown variant label {label:?} for {pos}")]
    UnknownVariantLabel { pos: &'static str, label: String },

    #[error("unrecognized {table} table shape: {rows} rows")]
    UnrecognizedTableShape { table: &'static str, rows: usize },

    #[error("conjugation section after {headline:?} belongs to another entry")]
    MisplacedConjugationSection { headline: String },

    #[error("{table} table has no cell at row {row}, column {col}")]
    MissingCell {
        table: &'static str,
        row: usize,
        col: usize,
    },

    #[error("{form} form not found in conjugation table")]
    MissingForm { form: &'static str },

    #[error("definition spans several lines: {0:?}")]
    DefinitionLineBreak(String),
}

impl ExtractError {
    pub fn mismatch(what: impl Into<String>) -> Self {
        ExtractError::StructuralMismatch(what.into())
    }
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;
