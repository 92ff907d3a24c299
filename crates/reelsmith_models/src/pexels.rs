//! Pexels stock image and video search.

use crate::PexelsConfig;
use crate::http::{api_key, json_body, request_error};
use async_trait::async_trait;
use reelsmith_core::ResolvedAsset;
use reelsmith_error::ProviderResult;
use reelsmith_interface::AssetSearchProvider;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

const MAX_PER_PAGE: usize = 80;

#[derive(Debug, Deserialize)]
struct PhotoPage {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    width: u32,
    height: u32,
    src: PhotoSources,
}

#[derive(Debug, Deserialize)]
struct PhotoSources {
    original: String,
    #[serde(default)]
    large2x: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoPage {
    #[serde(default)]
    videos: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    #[serde(default)]
    video_files: Vec<VideoFile>,
}

#[derive(Debug, Deserialize)]
struct VideoFile {
    link: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

fn photo_asset(photo: Photo) -> ResolvedAsset {
    let url = photo.src.large2x.unwrap_or(photo.src.original);
    ResolvedAsset::new(url, photo.width, photo.height)
}

/// The largest rendition of a video whose longest edge fits `max_edge`.
///
/// Falls back to the smallest rendition when every file is larger.
fn video_asset(video: Video, max_edge: u32) -> Option<ResolvedAsset> {
    let sized: Vec<(String, u32, u32)> = video
        .video_files
        .into_iter()
        .filter_map(|f| match (f.width, f.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((f.link, w, h)),
            _ => None,
        })
        .collect();

    let area = |(_, w, h): &(String, u32, u32)| u64::from(*w) * u64::from(*h);
    let fitting = sized
        .iter()
        .filter(|(_, w, h)| (*w).max(*h) <= max_edge)
        .max_by_key(|f| area(f));
    let chosen = fitting.or_else(|| sized.iter().min_by_key(|f| area(f)))?;

    Some(ResolvedAsset::new(chosen.0.clone(), chosen.1, chosen.2))
}

#[derive(Debug, Clone)]
struct PexelsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl PexelsClient {
    fn new(api_key: String, config: &PexelsConfig) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: config.base_url().trim_end_matches('/').to_string(),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
        count: usize,
    ) -> ProviderResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let per_page = count.clamp(1, MAX_PER_PAGE).to_string();
        debug!(url = %url, query, per_page = %per_page, "Searching Pexels");

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .query(&[("query", query), ("per_page", per_page.as_str())])
            .send()
            .await
            .map_err(request_error)?;
        json_body(response).await
    }
}

/// Still image search against the Pexels photo API.
#[derive(Debug, Clone)]
pub struct PexelsImageSearch {
    inner: PexelsClient,
}

impl PexelsImageSearch {
    /// Creates a client, reading the API key from the configured variable.
    ///
    /// # Errors
    ///
    /// Returns an `Auth` error if the variable is unset or empty.
    pub fn from_env(config: &PexelsConfig) -> ProviderResult<Self> {
        Ok(Self::with_api_key(api_key(config.api_key_env())?, config))
    }

    /// Creates a client with an explicit API key.
    pub fn with_api_key(api_key: impl Into<String>, config: &PexelsConfig) -> Self {
        Self {
            inner: PexelsClient::new(api_key.into(), config),
        }
    }
}

#[async_trait]
impl AssetSearchProvider for PexelsImageSearch {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, count: usize) -> ProviderResult<Vec<ResolvedAsset>> {
        let page: PhotoPage = self.inner.get("/v1/search", query, count).await?;
        Ok(page.photos.into_iter().take(count).map(photo_asset).collect())
    }

    fn provider_name(&self) -> &str {
        "pexels-images"
    }
}

/// Stock footage search against the Pexels video API.
#[derive(Debug, Clone)]
pub struct PexelsVideoSearch {
    inner: PexelsClient,
    max_edge: u32,
}

impl PexelsVideoSearch {
    /// Creates a client, reading the API key from the configured variable.
    ///
    /// # Errors
    ///
    /// Returns an `Auth` error if the variable is unset or empty.
    pub fn from_env(config: &PexelsConfig) -> ProviderResult<Self> {
        Ok(Self::with_api_key(api_key(config.api_key_env())?, config))
    }

    /// Creates a client with an explicit API key.
    pub fn with_api_key(api_key: impl Into<String>, config: &PexelsConfig) -> Self {
        Self {
            inner: PexelsClient::new(api_key.into(), config),
            max_edge: *config.max_video_edge(),
        }
    }
}

#[async_trait]
impl AssetSearchProvider for PexelsVideoSearch {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, count: usize) -> ProviderResult<Vec<ResolvedAsset>> {
        let page: VideoPage = self.inner.get("/videos/search", query, count).await?;
        Ok(page
            .videos
            .into_iter()
            .take(count)
            .filter_map(|video| video_asset(video, self.max_edge))
            .collect())
    }

    fn provider_name(&self) -> &str {
        "pexels-videos"
    }
}
