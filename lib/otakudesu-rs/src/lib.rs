mod anime_card;
mod anime_detail;
mod anime_index;
mod client;
mod embed;
mod episode;
mod genre;
mod schedule;
mod util;

pub use self::anime_card::AnimeCard;
pub use self::anime_card::AnimeCardQuery;
pub use self::anime_card::CardSchema;
pub use self::anime_card::ListingKind;
pub use self::anime_detail::AnimeDetail;
pub use self::anime_detail::EpisodeEntry;
pub use self::anime_index::AnimeIndexEntry;
pub use self::client::Client;
pub use self::client::ClientConfig;
pub use self::embed::Iframe;
pub use self::episode::DownloadLink;
pub use self::episode::Episode;
pub use self::episode::Mirror;
pub use self::genre::Genre;
pub use self::schedule::ScheduleAnime;
pub use self::schedule::ScheduleDay;
pub use self::util::clean_slug;
pub use self::util::extract_slug;

/// The compiled-in default upstream url.
///
/// Always ends with a `/`, so relative paths can be joined onto it.
pub const DEFAULT_BASE_URL: &str = env!("OTAKUDESU_RS_BASE_URL");

/// The library error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A HTTP error
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// A tokio join error
    #[error(transparent)]
    TokioJoin(#[from] tokio::task::JoinError),

    /// Failed to parse a url
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),

    /// Failed to decode a value from base64
    #[error("invalid base64")]
    Base64Decode(#[from] base64::DecodeError),

    /// A decoded value was not utf8
    #[error("decoded value is not utf8")]
    InvalidUtf8String(#[from] std::string::FromUtf8Error),

    /// Invalid json
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A configured header value is not a valid header value
    #[error("invalid header value \"{0}\"")]
    InvalidHeaderValue(String),

    /// The embed content did not decode to a json object
    #[error("embed content is not a json object")]
    InvalidEmbedContent,
}
