use api_types::{
    expense::{
        CreateExpenseDto, ExpenseDto, ExpenseSumDto, ExtractExpenseFromImageDto,
        ExtractedExpenseDto,
    },
    group::GroupDto,
    user::User,
};
use chrono::NaiveDate;
use reqwest::{RequestBuilder, Response, Url};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

use crate::error::{AppError, Result};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("rejected: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Thin REST client for the expense backend.
///
/// Calls are single-shot: failures are logged and returned, never retried.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|err| AppError::Input(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    /// `expense/{id}` with the id as a single escaped path segment.
    fn expense_endpoint(&self, id: &str) -> std::result::Result<Url, ClientError> {
        let mut url = self.endpoint("expense")?;
        url.path_segments_mut()
            .map_err(|()| ClientError::Server("base_url cannot be a base".to_string()))?
            .push(id);
        Ok(url)
    }

    pub async fn user_by_email(&self, email: &str) -> std::result::Result<User, ClientError> {
        let endpoint = self.endpoint("user")?;
        self.fetch(self.http.get(endpoint).query(&[("email", email)]))
            .await
    }

    pub async fn groups_for_user(
        &self,
        user_id: &str,
    ) -> std::result::Result<Vec<GroupDto>, ClientError> {
        let endpoint = self.endpoint("group")?;
        self.fetch(self.http.get(endpoint).query(&[("userId", user_id)]))
            .await
    }

    pub async fn expenses_for_user(
        &self,
        user_id: &str,
    ) -> std::result::Result<Vec<ExpenseDto>, ClientError> {
        let endpoint = self.endpoint("expense")?;
        self.fetch(self.http.get(endpoint).query(&[("userId", user_id)]))
            .await
    }

    /// Expenses of several groups; the id is repeated as `groupId=a&groupId=b`.
    pub async fn expenses_for_groups(
        &self,
        group_ids: &[String],
    ) -> std::result::Result<Vec<ExpenseDto>, ClientError> {
        let endpoint = self.endpoint("expense")?;
        let query: Vec<(&str, &str)> = group_ids
            .iter()
            .map(|id| ("groupId", id.as_str()))
            .collect();
        self.fetch(self.http.get(endpoint).query(&query)).await
    }

    pub async fn expense(&self, id: &str) -> std::result::Result<ExpenseDto, ClientError> {
        let endpoint = self.expense_endpoint(id)?;
        self.fetch(self.http.get(endpoint)).await
    }

    pub async fn create_expense(
        &self,
        body: &CreateExpenseDto,
    ) -> std::result::Result<ExpenseDto, ClientError> {
        let endpoint = self.endpoint("expense")?;
        self.fetch(self.http.post(endpoint).json(body)).await
    }

    pub async fn update_expense(
        &self,
        id: &str,
        body: &CreateExpenseDto,
    ) -> std::result::Result<ExpenseDto, ClientError> {
        let endpoint = self.expense_endpoint(id)?;
        self.fetch(self.http.put(endpoint).json(body)).await
    }

    pub async fn delete_expense(&self, id: &str) -> std::result::Result<(), ClientError> {
        let endpoint = self.expense_endpoint(id)?;
        self.send(self.http.delete(endpoint)).await.map(|_| ())
    }

    /// Per-category totals of `user_id` between `from` and `to` inclusive.
    pub async fn expense_sum(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> std::result::Result<ExpenseSumDto, ClientError> {
        let endpoint = self.endpoint("expense/sum")?;
        let from = from.to_string();
        let to = to.to_string();
        self.fetch(self.http.get(endpoint).query(&[
            ("userId", user_id),
            ("from", from.as_str()),
            ("to", to.as_str()),
        ]))
        .await
    }

    pub async fn extract_expense(
        &self,
        body: &ExtractExpenseFromImageDto,
    ) -> std::result::Result<ExtractedExpenseDto, ClientError> {
        let endpoint = self.endpoint("expense/extract")?;
        self.fetch(self.http.post(endpoint).json(body)).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<T, ClientError> {
        let res = self.send(request).await?;
        res.json::<T>().await.map_err(|err| {
            tracing::error!("API error: cannot decode response: {err}");
            ClientError::Transport(err)
        })
    }

    async fn send(&self, request: RequestBuilder) -> std::result::Result<Response, ClientError> {
        let result = match request.send().await {
            Ok(res) if res.status().is_success() => Ok(res),
            Ok(res) => Err(error_from_response(res).await),
            Err(err) => Err(ClientError::Transport(err)),
        };
        if let Err(err) = &result {
            tracing::error!("API error: {err}");
        }
        result
    }
}

async fn error_from_response(res: Response) -> ClientError {
    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());

    match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(body),
        422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    }
}
