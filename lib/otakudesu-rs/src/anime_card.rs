use crate::util::select_attr;
use crate::util::select_slug;
use crate::util::select_text;
use crate::Error;
use once_cell::sync::Lazy;
use scraper::ElementRef;
use scraper::Html;
use scraper::Selector;
use std::num::NonZeroU32;
use url::Url;

const DEFAULT_LISTING_TYPE: &str = "complete";

static DEFAULT_SCHEMA: CardSchema = CardSchema {
    item: ".venz ul li",
    title: "h2",
    image: ".thumb img",
    link: ".thumb a",
    episodes: Some(".epz"),
};

static GENRE_SCHEMA: CardSchema = CardSchema {
    item: ".col-anime-con .col-anime",
    title: ".col-anime-title",
    image: ".col-anime-cover img",
    link: ".col-anime-title a",
    episodes: Some(".col-anime-eps"),
};

static SEARCH_SCHEMA: CardSchema = CardSchema {
    item: "ul.chivsrc li",
    title: "h2",
    image: "img",
    link: "h2 a",
    episodes: None,
};

static DEFAULT_SELECTORS: Lazy<CardSelectors> =
    Lazy::new(|| CardSelectors::compile(&DEFAULT_SCHEMA));
static GENRE_SELECTORS: Lazy<CardSelectors> = Lazy::new(|| CardSelectors::compile(&GENRE_SCHEMA));
static SEARCH_SELECTORS: Lazy<CardSelectors> =
    Lazy::new(|| CardSelectors::compile(&SEARCH_SCHEMA));

/// The kind of listing page a card was scraped from.
///
/// Card markup differs between these pages.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ListingKind {
    /// The ongoing/complete listings
    Default,

    /// A genre listing
    Genre,

    /// Search results
    Search,
}

impl ListingKind {
    /// Get the extraction schema for this kind of listing.
    pub fn schema(self) -> &'static CardSchema {
        match self {
            Self::Default => &DEFAULT_SCHEMA,
            Self::Genre => &GENRE_SCHEMA,
            Self::Search => &SEARCH_SCHEMA,
        }
    }

    fn selectors(self) -> &'static CardSelectors {
        match self {
            Self::Default => Lazy::force(&DEFAULT_SELECTORS),
            Self::Genre => Lazy::force(&GENRE_SELECTORS),
            Self::Search => Lazy::force(&SEARCH_SELECTORS),
        }
    }
}

/// Where the fields of an anime card live in a listing page.
///
/// Every selector but `item` is relative to the card element.
#[derive(Debug)]
pub struct CardSchema {
    /// One match per card
    pub item: &'static str,

    /// Card title text
    pub title: &'static str,

    /// Cover `img`
    pub image: &'static str,

    /// The link to the anime
    pub link: &'static str,

    /// The episode count label, if this listing has one
    pub episodes: Option<&'static str>,
}

#[derive(Debug)]
struct CardSelectors {
    item: Selector,
    title: Selector,
    image: Selector,
    link: Selector,
    episodes: Option<Selector>,
}

impl CardSelectors {
    fn compile(schema: &CardSchema) -> Self {
        let parse = |selector: &str| {
            Selector::parse(selector)
                .unwrap_or_else(|e| panic!("invalid card selector \"{selector}\": {e:?}"))
        };

        Self {
            item: parse(schema.item),
            title: parse(schema.title),
            image: parse(schema.image),
            link: parse(schema.link),
            episodes: schema.episodes.map(parse),
        }
    }
}

/// Parameters for a page of anime cards
#[derive(Debug, Default, Clone)]
pub struct AnimeCardQuery {
    /// The listing type, `ongoing` or `complete`.
    ///
    /// Defaults to `complete`.
    pub anime_type: Option<String>,

    /// A genre slug
    pub genre: Option<String>,

    /// A search query
    pub search: Option<String>,

    /// The page, starting at 1.
    ///
    /// Search results are not paged.
    pub page: Option<NonZeroU32>,
}

impl AnimeCardQuery {
    /// Pick the listing this query is for.
    ///
    /// A search wins over a genre, which wins over the default listing.
    /// Blank values count as absent.
    pub fn kind(&self) -> ListingKind {
        if non_blank(&self.search).is_some() {
            ListingKind::Search
        } else if non_blank(&self.genre).is_some() {
            ListingKind::Genre
        } else {
            ListingKind::Default
        }
    }

    /// Build the upstream url for this query
    pub fn url(&self, base_url: &Url) -> Result<Url, Error> {
        let mut page_buffer = itoa::Buffer::new();
        let page = page_buffer.format(self.page.map_or(1, NonZeroU32::get));

        match self.kind() {
            ListingKind::Search => {
                let mut url = base_url.clone();
                url.query_pairs_mut()
                    .append_pair("s", non_blank(&self.search).unwrap_or_default())
                    .append_pair("post_type", "anime");
                Ok(url)
            }
            ListingKind::Genre => {
                let genre = crate::clean_slug(non_blank(&self.genre).unwrap_or_default());
                Ok(base_url.join(&format!("genres/{genre}/page/{page}/"))?)
            }
            ListingKind::Default => {
                let anime_type = non_blank(&self.anime_type)
                    .map(crate::clean_slug)
                    .unwrap_or_else(|| DEFAULT_LISTING_TYPE.to_string());
                Ok(base_url.join(&format!("{anime_type}-anime/page/{page}/"))?)
            }
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// An anime card from a listing page
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AnimeCard {
    /// Title
    #[serde(rename = "judul")]
    pub title: String,

    /// Cover image url
    #[serde(rename = "gambar")]
    pub image: String,

    /// Anime slug
    pub slug: String,

    /// Episode count label, like "Episode 12"
    #[serde(rename = "eps")]
    pub episodes: String,
}

impl AnimeCard {
    /// Get every card on a listing page.
    pub(crate) fn from_html(html: &Html, kind: ListingKind) -> Vec<Self> {
        let selectors = kind.selectors();
        html.select(&selectors.item)
            .map(|el| Self::from_element(el, selectors))
            .collect()
    }

    fn from_element(el: ElementRef, selectors: &CardSelectors) -> Self {
        Self {
            title: select_text(el, &selectors.title),
            image: select_attr(el, &selectors.image, "src"),
            slug: select_slug(el, &selectors.link),
            episodes: selectors
                .episodes
                .as_ref()
                .map(|selector| select_text(el, selector))
                .unwrap_or_default(),
        }
    }
}
