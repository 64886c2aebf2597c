use async_trait::async_trait;
use url::Url;

use crate::collection::{MovieRow, PageMeta, PageQuery, TablePage};

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidUrl(String),
    ConnectionFailed(String),
    BadStatus(String),
    InvalidResponse(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InvalidUrl(msg) => write!(f, "Invalid server URL: {}", msg),
            ApiError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            ApiError::BadStatus(msg) => write!(f, "Server error: {}", msg),
            ApiError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// The backend seam: the three endpoints the UI consumes. `ApiClient` is the
/// production implementation; tests substitute their own.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Liveness probe against the server root.
    async fn probe(&self) -> Result<(), ApiError>;
    /// The list of table names the server exposes.
    async fn table_keys(&self) -> Result<Vec<String>, ApiError>;
    /// One page of rows for a named table.
    async fn fetch_page(&self, table: &str, query: &PageQuery) -> Result<TablePage, ApiError>;
}

/// HTTP client for the movie server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(server_url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(server_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "'{}' cannot be used as a base URL",
                server_url
            )));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // new() rejected cannot-be-a-base URLs, so this always succeeds
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        url
    }

    /// Link target for one movie row, served by the backend's detail route.
    pub fn movie_url(&self, name: &str) -> Url {
        self.endpoint(&["movie", name])
    }
}

#[async_trait]
impl TableSource for ApiClient {
    async fn probe(&self) -> Result<(), ApiError> {
        let response = self
            .http
            .get(self.base.clone())
            .send()
            .await
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;
        response
            .error_for_status()
            .map_err(|e| ApiError::BadStatus(e.to_string()))?;
        Ok(())
    }

    async fn table_keys(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["tableKeys", ""]);
        log::info!("Fetching table keys from {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| ApiError::BadStatus(e.to_string()))?;

        let keys: Vec<String> = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        log::info!("Server lists {} table(s)", keys.len());
        Ok(keys)
    }

    async fn fetch_page(&self, table: &str, query: &PageQuery) -> Result<TablePage, ApiError> {
        let url = self.endpoint(&["table", table]);
        log::info!(
            "Fetching table '{}' page {} ({} per page, filter: {:?})",
            table,
            query.page,
            query.per_page,
            query.filter
        );

        let mut request = self.http.get(url).query(&[
            ("page", query.page.to_string()),
            ("per_page", query.per_page.to_string()),
        ]);
        if let Some(filter) = &query.filter {
            request = request.query(&[("q", filter)]);
        }

        let body = request
            .send()
            .await
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| ApiError::BadStatus(e.to_string()))?
            .text()
            .await
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;

        parse_table_page(&body)
    }
}

/// Parse the server's page response: a two-element array of pagination
/// metadata followed by the rows.
pub fn parse_table_page(body: &str) -> Result<TablePage, ApiError> {
    let (meta, rows): (PageMeta, Vec<MovieRow>) =
        serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
    Ok(TablePage { meta, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table_page() {
        let body = r#"[
            {"total_entries": 42},
            [{"name": "alien", "downloads": 12}, {"name": "brazil", "downloads": 0}]
        ]"#;
        let page = parse_table_page(body).unwrap();
        assert_eq!(page.meta.total_entries, 42);
        assert_eq!(page.meta.page, None);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0].name, "alien");
        assert_eq!(page.rows[1].downloads, 0);
    }

    #[test]
    fn test_parse_table_page_with_correction() {
        let body = r#"[
            {"total_entries": 3, "page": 1, "per_page": 15},
            [{"name": "metropolis", "downloads": 7}]
        ]"#;
        let page = parse_table_page(body).unwrap();
        assert_eq!(page.meta.page, Some(1));
        assert_eq!(page.meta.per_page, Some(15));
    }

    #[test]
    fn test_parse_rejects_malformed_body() {
        assert!(parse_table_page("{}").is_err());
        assert!(parse_table_page(r#"[{"total_entries": 1}]"#).is_err());
        assert!(parse_table_page("").is_err());
    }

    #[test]
    fn test_endpoint_building() {
        let client = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(
            client.endpoint(&["tableKeys", ""]).as_str(),
            "http://localhost:8080/tableKeys/"
        );
        assert_eq!(
            client.endpoint(&["table", "movies"]).as_str(),
            "http://localhost:8080/table/movies"
        );
    }

    #[test]
    fn test_movie_url_escapes_name() {
        let client = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(
            client.movie_url("The Third Man").as_str(),
            "http://localhost:8080/movie/The%20Third%20Man"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(ApiClient::new("not a url").is_err());
        assert!(ApiClient::new("mailto:admin@example.com").is_err());
    }
}
