use crate::util::element_text;
use crate::util::extract_slug;
use once_cell::sync::Lazy;
use scraper::Html;
use scraper::Selector;

static GENRE_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("ul.genres li a").unwrap());

/// A genre
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Genre {
    /// Display name
    #[serde(rename = "judul")]
    pub title: String,

    /// Genre slug, usable as the `genre` of an [`AnimeCardQuery`](crate::AnimeCardQuery)
    pub slug: String,
}

impl Genre {
    pub(crate) fn from_html(html: &Html) -> Vec<Self> {
        html.select(&GENRE_LINK_SELECTOR)
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

    const GENRE_LIST: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/test_data/genre_list.html"
    ));

    #[test]
    fn parse_genre_list() {
        let html = Html::parse_document(GENRE_LIST);
        let genres = Genre::from_html(&html);

        let slugs: Vec<_> = genres.iter().map(|genre| genre.slug.as_str()).collect();
        assert_eq!(slugs, ["action", "adventure", "slice-of-life"]);
        assert_eq!(genres[2].title, "Slice of Life");
    }
}
