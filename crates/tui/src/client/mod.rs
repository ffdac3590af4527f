use api_types::{
    Ack, ErrorBody,
    category::CategoryView,
    link::LinkView,
    state::StateView,
};
use engine::{Category, Library, Link};
use reqwest::{Response, Url};
use thiserror::Error;

use crate::error::{AppError, Result};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("rejected by server: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("server unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| {
                AppError::Config(config::ConfigError::Message(format!(
                    "invalid base_url {base_url:?}: {err}"
                )))
            })?;
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

    pub async fn health(&self) -> std::result::Result<bool, ClientError> {
        let res = self.http.get(self.endpoint("api/health")?).send().await?;
        let ack: Ack = expect_success(res).await?.json().await?;
        Ok(ack.ok)
    }

    pub async fn state_get(&self) -> std::result::Result<Library, ClientError> {
        let res = self.http.get(self.endpoint("api/state")?).send().await?;
        let view: StateView = expect_success(res).await?.json().await?;
        Ok(library_from_view(view))
    }

    pub async fn state_put(&self, library: &Library) -> std::result::Result<(), ClientError> {
        let res = self
            .http
            .put(self.endpoint("api/state")?)
            .json(&view_from_library(library))
            .send()
            .await?;
        expect_success(res).await?;
        Ok(())
    }
}

async fn expect_success(res: Response) -> std::result::Result<Response, ClientError> {
    if res.status().is_success() {
        return Ok(res);
    }

    let status = res.status();
    let body = res
        .json::<ErrorBody>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());

    let err = match status.as_u16() {
        404 => ClientError::NotFound(body),
        400 | 413 | 422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    };
    Err(err)
}

fn library_from_view(view: StateView) -> Library {
    let categories = view
        .categories
        .into_iter()
        .map(|category| Category::new(category.id, category.name))
        .collect();
    let links = view
        .links
        .into_iter()
        .map(|link| Link {
            id: link.id,
            name: link.name,
            url: link.url,
            alias: link.alias,
            category_id: link.category_id,
            favicon: link.favicon,
            icon_type: link.icon_type,
        })
        .collect();
    Library::new(categories, links)
}

fn view_from_library(library: &Library) -> StateView {
    StateView {
        categories: library
            .categories
            .iter()
            .map(|category| CategoryView {
                id: category.id.clone(),
                name: category.name.clone(),
            })
            .collect(),
        links: library
            .links
            .iter()
            .map(|link| LinkView {
                id: link.id.clone(),
                name: link.name.clone(),
                url: link.url.clone(),
                alias: link.alias.clone(),
                category_id: link.category_id.clone(),
                favicon: link.favicon.clone(),
                icon_type: link.icon_type.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use server::{Documents, FileStorage, ServerOptions};

    use super::*;

    async fn spawn_server(dir: &tempfile::TempDir) -> Client {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let storage = FileStorage::new(dir.path().join("db.json"));
        let addr =
            server::spawn_with_listener(Documents::new(storage), ServerOptions::default(), listener)
                .unwrap();
        Client::new(&format!("http://{addr}/")).unwrap()
    }

    #[tokio::test]
    async fn state_round_trips_through_the_server() {
        let dir = tempfile::tempdir().unwrap();
        let client = spawn_server(&dir).await;

        assert!(client.health().await.unwrap());
        assert!(client.state_get().await.unwrap().is_empty());

        client.state_put(&Library::seed()).await.unwrap();
        assert_eq!(client.state_get().await.unwrap(), Library::seed());
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::new(&format!("http://{addr}/")).unwrap();
        let err = client.state_get().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[test]
    fn malformed_base_url_is_a_config_error() {
        let err = Client::new("not a url").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("invalid base_url"));
    }
}
