use crate::util::element_text;
use crate::util::extract_slug;
use crate::util::select_text;
use once_cell::sync::Lazy;
use scraper::ElementRef;
use scraper::Html;
use scraper::Selector;

static DAY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".kgjdwl321 .kglist321").unwrap());
static H2_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").unwrap());
static ANIME_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("li a").unwrap());

/// The anime released on one day of the week
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ScheduleDay {
    /// Day name, like "Senin"
    #[serde(rename = "hari")]
    pub day: String,

    /// Anime airing that day
    pub anime: Vec<ScheduleAnime>,
}

/// An anime in a [`ScheduleDay`]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ScheduleAnime {
    /// Title
    #[serde(rename = "judul")]
    pub title: String,

    /// Anime slug
    pub slug: String,
}

impl ScheduleDay {
    pub(crate) fn from_html(html: &Html) -> Vec<Self> {
        html.select(&DAY_SELECTOR).map(Self::from_element).collect()
    }

    /// Only links inside this day's block belong to it.
    fn from_element(el: ElementRef) -> Self {
        Self {
            day: select_text(el, &H2_SELECTOR),
            anime: el
                .select(&ANIME_LINK_SELECTOR)
                .map(|a| ScheduleAnime {
                    title: element_text(a),
                    slug: extract_slug(a.value().attr("href").unwrap_or_default()),
                })
                .collect(),
        }
    }
}
