use crate::embed::AjaxResponse;
use crate::embed::IFRAME_ACTION;
use crate::embed::NONCE_ACTION;
use crate::AnimeCard;
use crate::AnimeCardQuery;
use crate::AnimeDetail;
use crate::AnimeIndexEntry;
use crate::Episode;
use crate::Error;
use crate::Genre;
use crate::Iframe;
use crate::ScheduleDay;
use crate::DEFAULT_BASE_URL;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use scraper::Html;
use std::time::Duration;
use url::Url;

pub(crate) const USER_AGENT_VALUE: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "id-ID,id;q=0.9,en-US;q=0.8";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const ADMIN_AJAX_PATH: &str = "wp-admin/admin-ajax.php";

/// Settings for the upstream connection.
///
/// This is fixed once a [`Client`] is built.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The site root, ending in a `/`.
    pub base_url: Url,

    /// The user agent to send
    pub user_agent: String,

    /// The `Accept` header
    pub accept: String,

    /// The `Accept-Language` header
    pub accept_language: String,

    /// The deadline for a single upstream request
    pub timeout: Duration,
}

impl ClientConfig {
    /// Make a config for the given site root.
    pub fn with_base_url(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            base_url,
            ..Self::default()
        }
    }

    /// The headers a browser on the site would send.
    fn default_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::ACCEPT, header_value(&self.accept)?);
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            header_value(&self.accept_language)?,
        );
        headers.insert(
            reqwest::header::REFERER,
            header_value(self.base_url.as_str())?,
        );
        headers.insert(
            reqwest::header::ORIGIN,
            header_value(&self.base_url.origin().ascii_serialization())?,
        );
        Ok(headers)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("invalid default base url"),
            user_agent: USER_AGENT_VALUE.to_string(),
            accept: ACCEPT_VALUE.to_string(),
            accept_language: ACCEPT_LANGUAGE_VALUE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

fn header_value(value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value).map_err(|_| Error::InvalidHeaderValue(value.to_string()))
}

/// The otakudesu client
#[derive(Debug, Clone)]
pub struct Client {
    /// The inner http client
    pub client: reqwest::Client,

    config: ClientConfig,
}

impl Client {
    /// Make a new client with the default config
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default()).expect("failed to build client")
    }

    /// Make a new client with the given config
    pub fn with_config(config: ClientConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(config.default_headers()?)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the config this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve a path against the site root
    fn site_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.config.base_url.join(path)?)
    }

    /// Get the url as html, then transform it
    async fn get_html<F, T>(&self, url: Url, transform: F) -> Result<T, Error>
    where
        F: FnOnce(Html) -> T + Send + 'static,
        T: Send + 'static,
    {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let text = response.text().await?;
        Ok(tokio::task::spawn_blocking(move || {
            let html = Html::parse_document(&text);
            transform(html)
        })
        .await?)
    }

    /// Post a form to the ajax endpoint
    async fn post_ajax(&self, form: &[(String, String)]) -> Result<AjaxResponse, Error> {
        let url = self.site_url(ADMIN_AJAX_PATH)?;
        Ok(self
            .client
            .post(url)
            .header("X-Requested-With", "XMLHttpRequest")
            .form(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    /// Get a page of anime cards.
    ///
    /// The query picks the listing, see [`AnimeCardQuery::kind`].
    pub async fn get_anime_cards(&self, query: &AnimeCardQuery) -> Result<Vec<AnimeCard>, Error> {
        let url = query.url(&self.config.base_url)?;
        let kind = query.kind();
        self.get_html(url, move |html| AnimeCard::from_html(&html, kind))
            .await
    }

    /// Get an anime by slug
    pub async fn get_anime_detail(&self, slug: &str) -> Result<AnimeDetail, Error> {
        let url = self.site_url(&format!("anime/{}/", crate::clean_slug(slug)))?;
        self.get_html(url, |html| AnimeDetail::from_html(&html))
            .await
    }

    /// Get the index of every anime on the site
    pub async fn get_anime_index(&self) -> Result<Vec<AnimeIndexEntry>, Error> {
        let url = self.site_url("anime-list/")?;
        self.get_html(url, |html| AnimeIndexEntry::from_html(&html))
            .await
    }

    /// Get an episode by slug
    pub async fn get_episode(&self, slug: &str) -> Result<Episode, Error> {
        let url = self.site_url(&format!("episode/{}/", crate::clean_slug(slug)))?;
        self.get_html(url, |html| Episode::from_html(&html)).await
    }

    /// Get all genres
    pub async fn get_genres(&self) -> Result<Vec<Genre>, Error> {
        let url = self.site_url("genre-list/")?;
        self.get_html(url, |html| Genre::from_html(&html)).await
    }

    /// Get the weekly release schedule
    pub async fn get_schedule(&self) -> Result<Vec<ScheduleDay>, Error> {
        let url = self.site_url("jadwal-rilis/")?;
        self.get_html(url, |html| ScheduleDay::from_html(&html))
            .await
    }

    /// Get a nonce for [`Client::get_iframe`].
    pub async fn get_nonce(&self) -> Result<String, Error> {
        let form = [("action".to_string(), NONCE_ACTION.to_string())];
        let response = self.post_ajax(&form).await?;
        Ok(response.data)
    }

    /// Resolve a mirror's content token into its embed.
    pub async fn get_iframe(&self, content: &str, nonce: &str) -> Result<Iframe, Error> {
        let form = crate::embed::iframe_form(content, nonce, IFRAME_ACTION)?;
        let response = self.post_ajax(&form).await?;
        let iframe = tokio::task::spawn_blocking(move || Iframe::from_base64(&response.data))
            .await??;
        Ok(iframe)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let config =
            ClientConfig::with_base_url(Url::parse("https://example.com/mirror").unwrap());
        assert_eq!(config.base_url.as_str(), "https://example.com/mirror/");
    }

    #[test]
    fn default_headers_follow_base_url() {
        let config =
            ClientConfig::with_base_url(Url::parse("https://otakudesu.example/").unwrap());
        let headers = config.default_headers().expect("failed to build headers");
        assert_eq!(
            headers.get(reqwest::header::REFERER).unwrap(),
            "https://otakudesu.example/"
        );
        assert_eq!(
            headers.get(reqwest::header::ORIGIN).unwrap(),
            "https://otakudesu.example"
        );
        assert_eq!(
            headers.get(reqwest::header::ACCEPT_LANGUAGE).unwrap(),
            ACCEPT_LANGUAGE_VALUE
        );
    }

    #[test]
    fn site_urls_stay_under_base() {
        let config =
            ClientConfig::with_base_url(Url::parse("https://example.com/mirror/").unwrap());
        let client = Client::with_config(config).expect("failed to build client");
        assert_eq!(
            client.site_url("jadwal-rilis/").unwrap().as_str(),
            "https://example.com/mirror/jadwal-rilis/"
        );
        assert_eq!(
            client.site_url(ADMIN_AJAX_PATH).unwrap().as_str(),
            "https://example.com/mirror/wp-admin/admin-ajax.php"
        );
    }

    #[tokio::test]
    async fn unreachable_upstream_is_an_error() {
        let mut config =
            ClientConfig::with_base_url(Url::parse("http://127.0.0.1:9/").unwrap());
        config.timeout = Duration::from_secs(5);
        let client = Client::with_config(config).expect("failed to build client");

        let error = client
            .get_genres()
            .await
            .expect_err("fetch from a closed port succeeded");
        assert!(matches!(error, Error::Reqwest(_)));
    }
}
