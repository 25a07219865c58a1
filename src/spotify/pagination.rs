use std::marker::PhantomData;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{error::PlaylistError, management::TokenManager, types::Page, warning};

/// Walks a cursor-paginated endpoint one page at a time.
///
/// The first request goes to the start URL; each following request goes to
/// the `next` URL embedded in the previous response. The walk ends when
/// `next` is null, missing or empty. Nothing is requested until
/// [`Paginator::next_page`] is called, and [`Paginator::restart`] rewinds the
/// walk to the start URL.
pub struct Paginator<'a, T> {
    client: &'a Client,
    tokens: &'a TokenManager,
    start_url: String,
    next_url: Option<String>,
    pages_fetched: usize,
    max_pages: Option<usize>,
    _item: PhantomData<T>,
}

impl<'a, T: DeserializeOwned> Paginator<'a, T> {
    pub fn new(client: &'a Client, tokens: &'a TokenManager, start_url: impl Into<String>) -> Self {
        let start_url = start_url.into();
        Self {
            client,
            tokens,
            next_url: Some(start_url.clone()),
            start_url,
            pages_fetched: 0,
            max_pages: None,
            _item: PhantomData,
        }
    }

    /// Stops the walk after `max_pages` pages. `None` means no bound.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn restart(&mut self) {
        self.next_url = Some(self.start_url.clone());
        self.pages_fetched = 0;
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetches the next page of items, or `None` once the walk is complete.
    ///
    /// # Errors
    ///
    /// Any non-success response yields [`PlaylistError::Fetch`] carrying the
    /// URL, status and body. A body that is not a page yields
    /// [`PlaylistError::Parse`]. Token refresh failures are passed through.
    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>, PlaylistError> {
        let Some(url) = self.next_url.take() else {
            return Ok(None);
        };

        if let Some(max) = self.max_pages {
            if self.pages_fetched >= max {
                warning!(
                    "Stopped after {} pages, more results are available at {}",
                    max,
                    url
                );
                return Ok(None);
            }
        }

        let token = self.tokens.ensure_valid().await?;
        let response = self.client.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PlaylistError::Fetch {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let page: Page<T> = serde_json::from_str(&body).map_err(|e| PlaylistError::Parse {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        self.pages_fetched += 1;
        self.next_url = page.next.filter(|next| !next.is_empty());
        Ok(Some(page.items))
    }

    /// Collects every remaining item in page order.
    pub async fn collect_all(&mut self) -> Result<Vec<T>, PlaylistError> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await? {
            items.extend(page);
        }
        Ok(items)
    }
}

/// Walks `start_url` to completion and returns all items.
pub async fn fetch_all<T: DeserializeOwned>(
    client: &Client,
    tokens: &TokenManager,
    start_url: &str,
    max_pages: Option<usize>,
) -> Result<Vec<T>, PlaylistError> {
    Paginator::new(client, tokens, start_url)
        .with_max_pages(max_pages)
        .collect_all()
        .await
}
