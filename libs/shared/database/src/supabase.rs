use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE, CONTENT_TYPE},
    Method, Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::pagination::{Direction, Page, PageRequest};

use crate::repository::{sort_column, Entity, Repository, RepositoryError};

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(key) = HeaderValue::from_str(&self.service_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.service_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        headers
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<Response, RepositoryError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers();
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await?;
            error!("API error ({}): {}", status, message);

            return Err(RepositoryError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, RepositoryError>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: Option<HeaderMap>,
    ) -> Result<T, RepositoryError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, body, headers).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET with `Prefer: count=exact`, returning the rows plus the total taken
    /// from `Content-Range` (`0-9/42`, `*/0`).
    pub async fn request_counted<T>(&self, path: &str) -> Result<(Vec<T>, u64), RepositoryError>
    where
        T: DeserializeOwned,
    {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("count=exact"));

        let response = self.send(Method::GET, path, None, Some(headers)).await?;

        let total = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range_total);

        let bytes = response.bytes().await?;
        let rows: Vec<T> = serde_json::from_slice(&bytes)?;
        let total = total.unwrap_or(rows.len() as u64);

        Ok((rows, total))
    }
}

fn parse_content_range_total(range: &str) -> Option<u64> {
    range.rsplit_once('/').and_then(|(_, total)| total.parse().ok())
}

fn return_representation() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

/// PostgREST-backed repository for one table.
pub struct SupabaseRepository<E> {
    supabase: SupabaseClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> SupabaseRepository<E> {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            _entity: PhantomData,
        }
    }

    async fn find_page(
        &self,
        request: &PageRequest,
        filter: Option<String>,
    ) -> Result<Page<E>, RepositoryError> {
        let column = sort_column::<E>(&request.sort)?;
        let direction = match request.sort.direction {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        };

        let mut query_parts = Vec::new();
        if let Some(filter) = filter {
            query_parts.push(filter);
        }
        query_parts.push(format!("order={}.{},id.asc", column, direction));
        query_parts.push(format!("limit={}", request.size));
        query_parts.push(format!("offset={}", request.offset()));

        let path = format!("/rest/v1/{}?{}", E::TABLE, query_parts.join("&"));
        let (rows, total) = self.supabase.request_counted::<E>(&path).await?;

        Ok(Page::new(rows, request, total))
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for SupabaseRepository<E> {
    async fn save(&self, entity: E) -> Result<E, RepositoryError> {
        let body = serde_json::to_value(&entity)?;

        let (method, path) = match entity.id() {
            None => {
                debug!("Inserting new {} row", E::TABLE);
                (Method::POST, format!("/rest/v1/{}", E::TABLE))
            }
            Some(id) => {
                debug!("Updating {} row {}", E::TABLE, id);
                (Method::PATCH, format!("/rest/v1/{}?id=eq.{}", E::TABLE, id))
            }
        };

        let mut result: Vec<E> = self
            .supabase
            .request_with_headers(method, &path, Some(body), Some(return_representation()))
            .await?;

        match (result.pop(), entity.id()) {
            (Some(saved), _) => Ok(saved),
            (None, Some(id)) => Err(RepositoryError::RowNotFound { table: E::TABLE, id }),
            (None, None) => Err(RepositoryError::Backend {
                status: 200,
                message: format!("Insert into {} returned no row", E::TABLE),
            }),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<E>, RepositoryError> {
        debug!("Fetching {} row {}", E::TABLE, id);

        let path = format!("/rest/v1/{}?id=eq.{}&limit=1", E::TABLE, id);
        let mut result: Vec<E> = self.supabase.request(Method::GET, &path, None).await?;

        Ok(result.pop())
    }

    async fn find_all(&self, request: &PageRequest) -> Result<Page<E>, RepositoryError> {
        self.find_page(request, None).await
    }

    async fn find_all_active(&self, request: &PageRequest) -> Result<Page<E>, RepositoryError> {
        let filter = E::ACTIVE_COLUMN.map(|column| format!("{}=is.true", column));
        self.find_page(request, filter).await
    }

    async fn find_one_by(&self, column: &str, value: &str) -> Result<Option<E>, RepositoryError> {
        let path = format!(
            "/rest/v1/{}?{}=eq.{}&limit=1",
            E::TABLE,
            column,
            urlencoding::encode(value)
        );
        let mut result: Vec<E> = self.supabase.request(Method::GET, &path, None).await?;

        Ok(result.pop())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, RepositoryError> {
        debug!("Deleting {} row {}", E::TABLE, id);

        let path = format!("/rest/v1/{}?id=eq.{}", E::TABLE, id);
        let deleted: Vec<Value> = self
            .supabase
            .request_with_headers(Method::DELETE, &path, None, Some(return_representation()))
            .await?;

        Ok(!deleted.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("0-9/42"), Some(42));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-9/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }
}
