//! Allocation validation errors

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single violated allocation rule
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AllocationError {
    #[error("Total investment amount is required")]
    InvestmentRequired,

    #[error("Every row needs a positive price, weight and lot size")]
    IncompleteFields,

    #[error("Total weight exceeds 100%")]
    WeightExceeds,
}

/// Every rule an allocation request violated, in reporting order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<AllocationError>);

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<AllocationError>) -> Self {
        Self(errors)
    }

    pub fn errors(&self) -> &[AllocationError] {
        &self.0
    }

    pub fn contains(&self, error: AllocationError) -> bool {
        self.0.contains(&error)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = AllocationError;
    type IntoIter = std::vec::IntoIter<AllocationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_messages() {
        let errors = ValidationErrors::new(vec![
            AllocationError::InvestmentRequired,
            AllocationError::WeightExceeds,
        ]);
        assert_eq!(
            errors.to_string(),
            "Total investment amount is required; Total weight exceeds 100%"
        );
        assert!(errors.contains(AllocationError::WeightExceeds));
        assert!(!errors.contains(AllocationError::IncompleteFields));
    }
}
