use crate::util::element_text;
use crate::util::select_attr;
use crate::util::select_text;
use once_cell::sync::Lazy;
use scraper::ElementRef;
use scraper::Html;
use scraper::Selector;
use std::collections::BTreeMap;

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".venutama h1.posttl").unwrap());
static FALLBACK_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static PLAYER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#pembed iframe[src]").unwrap());
static MIRROR_LIST_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".mirrorstream ul").unwrap());
static DOWNLOAD_ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".download ul li").unwrap());
static LI_A_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("li a").unwrap());
static STRONG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("strong").unwrap());
static A_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// An episode page
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Episode {
    /// Title
    #[serde(rename = "judul")]
    pub title: String,

    /// The default embedded player url
    pub iframe: String,

    /// Streaming mirrors, by quality tier like "720p"
    pub mirror: BTreeMap<String, Vec<Mirror>>,

    /// Download links, by format and quality like "Mp4 720p"
    pub download: BTreeMap<String, Vec<DownloadLink>>,
}

impl Episode {
    /// Parse an [`Episode`] from Html.
    pub(crate) fn from_html(html: &Html) -> Self {
        let root = html.root_element();

        let mut title = select_text(root, &TITLE_SELECTOR);
        if title.is_empty() {
            title = select_text(root, &FALLBACK_TITLE_SELECTOR);
        }

        let mut mirror: BTreeMap<String, Vec<Mirror>> = BTreeMap::new();
        for list in root.select(&MIRROR_LIST_SELECTOR) {
            let Some(tier) = mirror_tier(list) else {
                continue;
            };
            mirror
                .entry(tier.to_string())
                .or_default()
                .extend(list.select(&LI_A_SELECTOR).map(Mirror::from_element));
        }

        let mut download: BTreeMap<String, Vec<DownloadLink>> = BTreeMap::new();
        for row in root.select(&DOWNLOAD_ROW_SELECTOR) {
            let label = select_text(row, &STRONG_SELECTOR);
            if label.is_empty() {
                continue;
            }
            download
                .entry(label)
                .or_default()
                .extend(row.select(&A_SELECTOR).map(DownloadLink::from_element));
        }

        Self {
            title,
            iframe: select_attr(root, &PLAYER_SELECTOR, "src"),
            mirror,
            download,
        }
    }
}

/// Get the quality tier of a mirror list from its class, `m720p` -> `720p`.
fn mirror_tier(list: ElementRef<'_>) -> Option<&str> {
    list.value().classes().find_map(|class| {
        let tier = class.strip_prefix('m')?;
        if tier.ends_with('p') && tier.len() > 1 {
            Some(tier)
        } else {
            None
        }
    })
}

/// A streaming mirror
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Mirror {
    /// Host name
    #[serde(rename = "nama")]
    pub name: String,

    /// The opaque token to resolve with [`Client::get_iframe`](crate::Client::get_iframe)
    pub content: String,
}

impl Mirror {
    fn from_element(el: ElementRef) -> Self {
        Self {
            name: element_text(el),
            content: el
                .value()
                .attr("data-content")
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// A download link
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DownloadLink {
    /// Host name
    #[serde(rename = "nama")]
    pub name: String,

    /// Link target
    pub href: String,
}

impl DownloadLink {
    fn from_element(el: ElementRef) -> Self {
        Self {
            name: element_text(el),
            href: el.value().attr("href").unwrap_or_default().to_string(),
        }
    }
}
