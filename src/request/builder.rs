//! Request builder and query strategies

use crate::config::DEFAULT_PAGE_SIZE;
use crate::context::Context;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::pagination::PageToken;
use crate::stream::StreamDefinition;
use crate::template::render_path;
use std::collections::BTreeMap;

/// How a stream builds its query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QueryStrategy {
    /// Only what the page token contributes
    #[default]
    Default,
    /// `archived=both` and `size=<page_size>`, overridden by token parameters
    PagedListing,
    /// Always exactly these parameters, token and context ignored
    Fixed(BTreeMap<String, String>),
}

impl QueryStrategy {
    /// Create a fixed strategy
    pub fn fixed<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Fixed(
            params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Builds the request for each page of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestBuilder {
    /// `size` sent by paged listings
    pub page_size: u32,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl RequestBuilder {
    /// Create a builder with the given page size
    pub fn new(page_size: u32) -> Self {
        Self { page_size }
    }

    /// Build the request for the next page
    pub fn build(
        &self,
        stream: &StreamDefinition,
        ctx: &Context,
        token: Option<&PageToken>,
    ) -> Result<ApiRequest> {
        let path = render_path(&stream.path, ctx)?;
        let mut request = ApiRequest::new(path);

        match &stream.query {
            QueryStrategy::Default => {
                merge_token(&mut request.query, token);
            }
            QueryStrategy::PagedListing => {
                request.query.insert("archived".into(), "both".into());
                request
                    .query
                    .insert("size".into(), self.page_size.to_string());
                merge_token(&mut request.query, token);
            }
            QueryStrategy::Fixed(params) => {
                request.query.clone_from(params);
            }
        }

        Ok(request)
    }
}

/// Token parameters win over anything already present
fn merge_token(query: &mut BTreeMap<String, String>, token: Option<&PageToken>) {
    if let Some(token) = token {
        query.extend(token.query_pairs());
    }
}
