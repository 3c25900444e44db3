use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::SupabaseError;

/// Client for a Supabase project's REST surface.
///
/// Covers the two endpoints the product touches: `/rest/v1` for table rows
/// and `/auth/v1/otp` for magic-link sign-in. Schema migration and token
/// refresh are the vendor's business, not this client's.
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    /// Creates a new client for the given project URL and anon key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Fetches every row of a table, ordered ascending on `order_column`.
    #[instrument(skip(self), fields(table = %table))]
    pub async fn select_all<T: DeserializeOwned>(
        &self,
        table: &str,
        order_column: &str,
    ) -> Result<Vec<T>, SupabaseError> {
        debug!("Fetching table rows");

        let order = format!("{}.asc", order_column);
        let response = self
            .http
            .get(format!("{}/rest/v1/{}", self.base_url, table))
            .query(&[("select", "*"), ("order", order.as_str())])
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Inserts one record and returns the stored representation, including
    /// the server-assigned id.
    #[instrument(skip(self, row), fields(table = %table))]
    pub async fn insert_one<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        row: &T,
    ) -> Result<R, SupabaseError> {
        debug!("Inserting row");

        // PostgREST takes an array and, with return=representation, answers
        // with the inserted rows.
        let response = self
            .http
            .post(format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let rows: Vec<R> = serde_json::from_value(body)?;
        rows.into_iter()
            .next()
            .ok_or(SupabaseError::MissingRepresentation)
    }

    /// Requests a magic-link sign-in email for `email`.
    ///
    /// The emailed one-time link and the session it opens are handled end to
    /// end by the auth service; success here only means the email was
    /// accepted for delivery.
    #[instrument(skip(self, email))]
    pub async fn sign_in_with_otp(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), SupabaseError> {
        let mut body = serde_json::json!({ "email": email, "create_user": true });
        if let Some(url) = redirect_to {
            body["options"] = serde_json::json!({ "email_redirect_to": url });
        }

        let response = self
            .http
            .post(format!("{}/auth/v1/otp", self.base_url))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        Self::read_body(response).await?;
        debug!("Magic link requested");
        Ok(())
    }

    async fn read_body(response: reqwest::Response) -> Result<serde_json::Value, SupabaseError> {
        let status = response.status();
        let text = response.text().await?;
        let body: serde_json::Value = if text.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        if !status.is_success() {
            // PostgREST puts the diagnostic under "message", the auth
            // service under "msg" or "error_description".
            let message = ["message", "msg", "error_description"]
                .iter()
                .find_map(|key| body.get(key).and_then(|m| m.as_str()))
                .unwrap_or("Unknown error")
                .to_string();
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}
