use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}

impl DomainError {
    pub fn empty(field: &'static str) -> Self {
        Self::EmptyField { field }
    }
}
