//! HTTP store
//!
//! Talks to a REST backend:
//! - `GET {base}/applicants`
//! - `PATCH {base}/applicants/{id}/status`
//! - `PATCH {base}/applicants/{id}/position`

use applicant_board::{BoardPersistence, DomainError, DomainResult, Item, PositionUpdate, StatusUpdate};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Response};

pub struct HttpPersistence {
    client: Client,
    base_url: String,
}

impl HttpPersistence {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn applicant_url(&self, id: &str, field: &str) -> String {
        format!(
            "{}/applicants/{}/{}",
            self.base_url,
            utf8_percent_encode(id, NON_ALPHANUMERIC),
            field
        )
    }
}

fn transport(e: reqwest::Error) -> DomainError {
    DomainError::Persistence(e.to_string())
}

async fn check(response: Response) -> DomainResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DomainError::Persistence(format!("{} {}", status, body.trim())))
}

#[async_trait]
impl BoardPersistence for HttpPersistence {
    async fn load_items(&self) -> DomainResult<Vec<Item>> {
        let response = self
            .client
            .get(format!("{}/applicants", self.base_url))
            .send()
            .await
            .map_err(transport)?;
        check(response).await?.json().await.map_err(transport)
    }

    async fn update_status(&self, update: &StatusUpdate) -> DomainResult<()> {
        let response = self
            .client
            .patch(self.applicant_url(&update.id, "status"))
            .json(update)
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }

    async fn update_position(&self, update: &PositionUpdate) -> DomainResult<()> {
        let response = self
            .client
            .patch(self.applicant_url(&update.id, "position"))
            .json(update)
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }
}
