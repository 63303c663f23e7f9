//! Expense drafts.
//!
//! An [`ExpenseDraft`] is the editable, partially filled form behind the
//! create/edit flow. It only becomes a [`ValidExpense`] once every required
//! field is present, and only a valid expense can be turned into an
//! [`ExpenseSubmission`] for the backend.

use chrono::{DateTime, Utc};

use crate::{
    DistributionEntry, EngineError, Expense, Group, MoneyCents, ResultEngine, compute_split,
    error::{MissingField, MissingFields},
    receipt::ReceiptExtraction,
};

/// Category preselected on a new draft.
pub const DEFAULT_CATEGORY: &str = "Food";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseDraft {
    pub amount: Option<MoneyCents>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub paid_by: Option<String>,
    pub split_equally: bool,
    pub group: Option<Group>,
}

/// A draft with every required field filled in.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidExpense {
    pub amount: MoneyCents,
    pub description: String,
    pub date: DateTime<Utc>,
    pub category: String,
    pub paid_by: String,
    pub split_equally: bool,
    pub group: Group,
}

/// Payload for the create/update endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseSubmission {
    pub description: String,
    pub date: DateTime<Utc>,
    pub category: String,
    pub paid_by: String,
    pub group_id: String,
    pub distribution: Vec<DistributionEntry>,
}

fn present_text(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

impl ExpenseDraft {
    /// Blank draft for a new expense in `group`.
    ///
    /// The payer defaults to the viewer when they belong to the group,
    /// otherwise to the first member. The category starts as
    /// [`DEFAULT_CATEGORY`].
    pub fn for_group(viewer_id: &str, group: Group, today: DateTime<Utc>) -> Self {
        let paid_by = if group.has_member(viewer_id) {
            viewer_id.to_string()
        } else {
            group.first_member().id.clone()
        };
        Self {
            amount: None,
            description: None,
            date: Some(today),
            category: Some(DEFAULT_CATEGORY.to_string()),
            paid_by: Some(paid_by),
            split_equally: true,
            group: Some(group),
        }
    }

    /// Draft pre-filled from a recorded expense, for editing.
    ///
    /// The amount is rebuilt from the distribution entries and the split mode
    /// is inferred from them. The group stays empty when it is not among
    /// `groups`.
    pub fn from_expense(expense: &Expense, groups: &[Group]) -> ResultEngine<Self> {
        Ok(Self {
            amount: Some(expense.distributed_total()?),
            description: Some(expense.description.clone()),
            date: Some(expense.date),
            category: Some(expense.category.clone()),
            paid_by: Some(expense.payer_id.clone()),
            split_equally: expense.looks_split_equally(),
            group: groups.iter().find(|g| g.id() == expense.group_id).cloned(),
        })
    }

    /// Overwrites the fields a receipt scan can fill in.
    pub fn apply_receipt(&mut self, extraction: ReceiptExtraction) {
        self.amount = Some(extraction.price);
        self.description = Some(extraction.item_name);
        self.category = Some(extraction.category);
        self.date = Some(extraction.receipt_date);
    }

    /// Checks every required field and reports all the missing ones at once.
    pub fn validate(&self) -> ResultEngine<ValidExpense> {
        let amount = self.amount.filter(|amount| !amount.is_zero());
        let description = present_text(self.description.as_ref());
        let category = present_text(self.category.as_ref());
        let paid_by = present_text(self.paid_by.as_ref());

        match (amount, description, category, paid_by, self.date, &self.group) {
            (
                Some(amount),
                Some(description),
                Some(category),
                Some(paid_by),
                Some(date),
                Some(group),
            ) => Ok(ValidExpense {
                amount,
                description,
                date,
                category,
                paid_by,
                split_equally: self.split_equally,
                group: group.clone(),
            }),
            (amount, description, category, paid_by, date, group) => {
                let missing = [
                    (amount.is_none(), MissingField::Amount),
                    (description.is_none(), MissingField::Description),
                    (category.is_none(), MissingField::Category),
                    (paid_by.is_none(), MissingField::PaidBy),
                    (date.is_none(), MissingField::Date),
                    (group.is_none(), MissingField::Group),
                ]
                .into_iter()
                .filter_map(|(absent, field)| absent.then_some(field))
                .collect();
                Err(EngineError::Validation(MissingFields(missing)))
            }
        }
    }

    /// Validates the draft and computes its distribution.
    pub fn submit(&self, viewer_id: &str) -> ResultEngine<ExpenseSubmission> {
        self.validate()?.into_submission(viewer_id)
    }
}

impl ValidExpense {
    pub fn into_submission(self, viewer_id: &str) -> ResultEngine<ExpenseSubmission> {
        let distribution = compute_split(
            self.amount,
            &self.paid_by,
            &self.group,
            self.split_equally,
            viewer_id,
        )?;
        Ok(ExpenseSubmission {
            description: self.description,
            date: self.date,
            category: self.category,
            paid_by: self.paid_by,
            group_id: self.group.id().to_string(),
            distribution,
        })
    }
}
