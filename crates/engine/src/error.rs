//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when an expense draft is submitted with required
//!   fields still empty. It carries **every** missing field, not just the first.
//! - [`LookupFailure`] thrown when a member the split needs cannot be found in
//!   the group.
//! - [`InvalidGroup`] thrown when a group is built without members.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`LookupFailure`]: EngineError::LookupFailure
//!  [`InvalidGroup`]: EngineError::InvalidGroup
use std::fmt;

use thiserror::Error;

/// A required expense field left empty in a draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MissingField {
    Amount,
    Description,
    Category,
    PaidBy,
    Date,
    Group,
}

impl MissingField {
    /// Label shown to the user.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Amount => "Amount",
            Self::Description => "Description",
            Self::Category => "Category",
            Self::PaidBy => "Paid By",
            Self::Date => "Date",
            Self::Group => "Group",
        }
    }
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Missing fields, in form order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingFields(pub(crate) Vec<MissingField>);

impl MissingFields {
    #[must_use]
    pub fn fields(&self) -> &[MissingField] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, field: MissingField) -> bool {
        self.0.contains(&field)
    }
}

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Please fill in the following fields: ")?;
        for (idx, field) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

/// Engine custom errors.
#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("{0}")]
    Validation(MissingFields),
    #[error("Lookup failure: {0}")]
    LookupFailure(String),
    #[error("Invalid group: {0}")]
    InvalidGroup(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
