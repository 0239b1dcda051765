use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{source_name}: CSV error: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },
}

impl ParseError {
    pub(crate) fn csv(source_name: &str, source: csv::Error) -> Self {
        ParseError::Csv {
            source_name: source_name.to_string(),
            source,
        }
    }
}
