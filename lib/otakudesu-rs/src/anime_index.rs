use crate::util::element_text;
use crate::util::extract_slug;
use once_cell::sync::Lazy;
use scraper::Html;
use scraper::Selector;

static INDEX_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#abtext .jdlbar a").unwrap());

/// An entry in the site's full anime index
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AnimeIndexEntry {
    /// Title
    #[serde(rename = "judul")]
    pub title: String,

    /// Anime slug
    pub slug: String,
}

impl AnimeIndexEntry {
    pub(crate) fn from_html(html: &Html) -> Vec<Self> {
        html.select(&INDEX_LINK_SELECTOR)
            .map(|el| Self {
                title: element_text(el),
                slug: extract_slug(el.value().attr("href").unwrap_or_default()),
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ANIME_LIST: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/test_data/anime_list.html"
    ));

    #[test]
    fn parse_anime_list() {
        let html = Html::parse_document(ANIME_LIST);
        let entries = AnimeIndexEntry::from_html(&html);

        assert_eq!(entries.len(), 4);
        assert_eq!(
            entries[0],
            AnimeIndexEntry {
                title: "Akame ga Kill!".into(),
                slug: "akame-kill-sub-indo".into(),
            }
        );
        assert_eq!(entries[3].slug, "bleach-sennen-kessen-hen-sub-indo");
    }
}
