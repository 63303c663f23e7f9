//! Recorded expenses.
//!
//! An [`Expense`] is what the backend stores: who paid, for which group, and
//! the distribution entries saying how much each member owes. The meaning of
//! the entries depends on how the expense was split (see
//! [`compute_split`](crate::compute_split)).

use chrono::{DateTime, Utc};

use crate::{MoneyCents, ResultEngine};

/// How much of one expense a member owes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistributionEntry {
    pub member_id: String,
    pub amount: MoneyCents,
}

impl DistributionEntry {
    pub fn new(member_id: impl Into<String>, amount: MoneyCents) -> Self {
        Self {
            member_id: member_id.into(),
            amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    pub id: String,
    pub amount: MoneyCents,
    pub description: String,
    pub date: DateTime<Utc>,
    pub category: String,
    pub payer_id: String,
    pub group_id: String,
    pub distribution: Vec<DistributionEntry>,
}

impl Expense {
    /// Sum of all distribution entries.
    pub fn distributed_total(&self) -> ResultEngine<MoneyCents> {
        MoneyCents::try_sum(self.distribution.iter().map(|entry| entry.amount))
    }

    /// Amount `member_id` owes for this expense, if they have an entry.
    pub fn owed_by(&self, member_id: &str) -> Option<MoneyCents> {
        self.distribution
            .iter()
            .find(|entry| entry.member_id == member_id)
            .map(|entry| entry.amount)
    }

    /// `true` when the distribution looks like an equal split: more than one
    /// entry and every entry carries the same amount.
    pub fn looks_split_equally(&self) -> bool {
        match self.distribution.split_first() {
            Some((first, rest)) if !rest.is_empty() => {
                rest.iter().all(|entry| entry.amount == first.amount)
            }
            _ => false,
        }
    }
}
