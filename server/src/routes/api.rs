use crate::AppState;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::Json;
use axum::Router;
use otakudesu::AnimeCard;
use otakudesu::AnimeCardQuery;
use otakudesu::AnimeDetail;
use otakudesu::AnimeIndexEntry;
use otakudesu::Episode;
use otakudesu::Genre;
use otakudesu::Iframe;
use otakudesu::ScheduleDay;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::error;

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, serde::Serialize)]
struct ApiError {
    error: &'static str,
    message: String,
}

impl ApiError {
    /// Log an upstream failure and describe it for the client.
    fn upstream(error: &'static str, source: otakudesu::Error) -> Self {
        error!("{error}: {source:?}");
        Self {
            error,
            message: anyhow::Chain::new(&source)
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join(": "),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/anime", get(api_anime))
        .route("/anime/:slug", get(api_anime_slug))
        .route("/anime-list", get(api_anime_list))
        .route("/episode/:slug", get(api_episode_slug))
        .route("/genre", get(api_genre))
        .route("/jadwal", get(api_jadwal))
        .route("/nonce", get(api_nonce))
        .route("/getIframe", get(api_get_iframe))
}

#[derive(Debug, Default, serde::Deserialize)]
struct AnimeParams {
    #[serde(rename = "type")]
    anime_type: Option<String>,
    genre: Option<String>,
    search: Option<String>,
    page: Option<String>,
}

impl AnimeParams {
    /// Anything that isn't a page number means the first page.
    fn into_query(self) -> AnimeCardQuery {
        AnimeCardQuery {
            anime_type: self.anime_type,
            genre: self.genre,
            search: self.search,
            page: self
                .page
                .and_then(|page| page.trim().parse::<NonZeroU32>().ok()),
        }
    }
}

async fn api_anime(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<AnimeParams>,
) -> ApiResult<Vec<AnimeCard>> {
    app_state
        .client
        .get_anime_cards(&params.into_query())
        .await
        .map(Json)
        .map_err(|error| ApiError::upstream("Failed to fetch anime list", error))
}

async fn api_anime_slug(
    State(app_state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<AnimeDetail> {
    app_state
        .client
        .get_anime_detail(&slug)
        .await
        .map(Json)
        .map_err(|error| ApiError::upstream("Failed to fetch anime detail", error))
}

async fn api_anime_list(
    State(app_state): State<Arc<AppState>>,
) -> ApiResult<Vec<AnimeIndexEntry>> {
    app_state
        .client
        .get_anime_index()
        .await
        .map(Json)
        .map_err(|error| ApiError::upstream("Failed to fetch complete anime list", error))
}

async fn api_episode_slug(
    State(app_state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Episode> {
    app_state
        .client
        .get_episode(&slug)
        .await
        .map(Json)
        .map_err(|error| ApiError::upstream("Failed to fetch episode detail", error))
}

async fn api_genre(State(app_state): State<Arc<AppState>>) -> ApiResult<Vec<Genre>> {
    app_state
        .client
        .get_genres()
        .await
        .map(Json)
        .map_err(|error| ApiError::upstream("Failed to fetch genres", error))
}

async fn api_jadwal(State(app_state): State<Arc<AppState>>) -> ApiResult<Vec<ScheduleDay>> {
    app_state
        .client
        .get_schedule()
        .await
        .map(Json)
        .map_err(|error| ApiError::upstream("Failed to fetch schedule", error))
}

#[derive(Debug, serde::Serialize)]
struct ApiNonce {
    data: String,
}

async fn api_nonce(State(app_state): State<Arc<AppState>>) -> ApiResult<ApiNonce> {
    app_state
        .client
        .get_nonce()
        .await
        .map(|data| Json(ApiNonce { data }))
        .map_err(|error| ApiError::upstream("Failed to fetch nonce", error))
}

#[derive(Debug, serde::Deserialize)]
struct IframeParams {
    #[serde(default)]
    content: String,
    #[serde(default)]
    nonce: String,
}

async fn api_get_iframe(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<IframeParams>,
) -> ApiResult<Iframe> {
    app_state
        .client
        .get_iframe(&params.content, &params.nonce)
        .await
        .map(Json)
        .map_err(|error| ApiError::upstream("Failed to fetch iframe", error))
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use otakudesu::ClientConfig;
    use std::time::Duration;
    use tower::ServiceExt;
    use url::Url;

    /// An app whose upstream refuses every connection.
    fn unreachable_app() -> Router {
        let mut config = ClientConfig::with_base_url(Url::parse("http://127.0.0.1:9/").unwrap());
        config.timeout = Duration::from_secs(5);
        let client = otakudesu::Client::with_config(config).expect("failed to build client");
        crate::routes::routes(Arc::new(AppState::with_client(client)))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let body = serde_json::from_slice(&body).expect("body is not json");
        (status, body)
    }

    #[tokio::test]
    async fn health() {
        let (status, body) = get_json(unreachable_app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn upstream_failure_is_500() {
        let cases = [
            ("/api/anime", "Failed to fetch anime list"),
            ("/api/anime?type=ongoing&page=2", "Failed to fetch anime list"),
            ("/api/anime?genre=action&page=abc", "Failed to fetch anime list"),
            ("/api/anime?search=naruto", "Failed to fetch anime list"),
            ("/api/anime/sousou-frieren-sub-indo", "Failed to fetch anime detail"),
            ("/api/anime-list", "Failed to fetch complete anime list"),
            ("/api/episode/snf-episode-28-sub-indo", "Failed to fetch episode detail"),
            ("/api/genre", "Failed to fetch genres"),
            ("/api/jadwal", "Failed to fetch schedule"),
            ("/api/nonce", "Failed to fetch nonce"),
            (
                "/api/getIframe?content=eyJpZCI6MTYyOTQ2LCJpIjowLCJxIjoiNzIwcCJ9&nonce=abc",
                "Failed to fetch iframe",
            ),
        ];

        for (uri, label) in cases {
            let (status, body) = get_json(unreachable_app(), uri).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(body["error"], label, "{uri}");
            assert!(
                !body["message"].as_str().unwrap_or_default().is_empty(),
                "{uri}"
            );
        }
    }

    #[tokio::test]
    async fn missing_iframe_params_is_500() {
        let (status, body) = get_json(unreachable_app(), "/api/getIframe").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch iframe");
    }

    #[test]
    fn page_defaults() {
        let page = |page: Option<&str>| {
            AnimeParams {
                page: page.map(String::from),
                ..AnimeParams::default()
            }
            .into_query()
            .page
            .map(NonZeroU32::get)
        };

        assert_eq!(page(None), None);
        assert_eq!(page(Some("3")), Some(3));
        assert_eq!(page(Some("0")), None);
        assert_eq!(page(Some("-1")), None);
        assert_eq!(page(Some("two")), None);
    }
}
