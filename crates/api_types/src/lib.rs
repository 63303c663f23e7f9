//! Wire types of the expense backend.
//!
//! The backend speaks camelCase JSON and names identifiers `_id`. Amounts are
//! plain JSON numbers in major units (`12.5` is twelve dollars fifty).

use serde::{Deserialize, Serialize};

pub mod user {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct User {
        #[serde(rename = "_id")]
        pub id: String,
        pub email: String,
        pub name: String,
    }
}

pub mod group {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct MemberDto {
        #[serde(rename = "_id")]
        pub id: String,
        pub name: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct GroupDto {
        #[serde(rename = "_id")]
        pub id: String,
        pub name: String,
        #[serde(default)]
        pub members: Vec<MemberDto>,
    }
}

pub mod expense {
    use std::collections::BTreeMap;

    use chrono::{DateTime, Utc};

    use super::*;
    use crate::group::MemberDto;

    /// One member's share of an expense.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct DistributionDto {
        pub user: String,
        pub amount: f64,
    }

    /// `paidBy` is a bare id in lists and a populated member in details.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum PaidBy {
        Id(String),
        Member(MemberDto),
    }

    impl PaidBy {
        pub fn id(&self) -> &str {
            match self {
                Self::Id(id) => id,
                Self::Member(member) => &member.id,
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseDto {
        #[serde(rename = "_id")]
        pub id: String,
        /// Some backend versions omit the total; it is then the sum of
        /// `expense`.
        #[serde(default)]
        pub amount: Option<f64>,
        pub description: String,
        pub date: DateTime<Utc>,
        pub category: String,
        pub paid_by: PaidBy,
        pub group: String,
        #[serde(default)]
        pub expense: Vec<DistributionDto>,
    }

    /// Body of `POST /expense` and `PUT /expense/{id}`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateExpenseDto {
        pub description: String,
        pub date: DateTime<Utc>,
        pub category: String,
        pub paid_by: String,
        pub group: String,
        pub expense: Vec<DistributionDto>,
    }

    /// Response of `GET /expense/sum`: a `total` plus one key per category.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseSumDto {
        pub total: f64,
        #[serde(flatten)]
        pub categories: BTreeMap<String, f64>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExtractExpenseFromImageDto {
        pub image_base64: String,
        pub mime_type: String,
        /// ISO code assumed when the receipt shows no currency.
        pub default_currency: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExtractedExpenseDto {
        pub price: f64,
        pub item_name: String,
        pub category: String,
        pub receipt_date: DateTime<Utc>,
    }
}
