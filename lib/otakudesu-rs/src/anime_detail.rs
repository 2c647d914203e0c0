use crate::util::element_text;
use crate::util::select_attr;
use crate::util::select_slug;
use crate::util::select_text;
use once_cell::sync::Lazy;
use scraper::ElementRef;
use scraper::Html;
use scraper::Selector;

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse(".jdlrx h1").unwrap());
static COVER_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse(".fotoanime img").unwrap());
static INFO_ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".infozingle p span").unwrap());
static SYNOPSIS_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse(".sinopc p").unwrap());
static EPISODE_LIST_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".episodelist").unwrap());
static EPISODE_LIST_HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".monktit").unwrap());
static LI_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("ul li").unwrap());
static A_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static SPAN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("span").unwrap());

/// An anime's detail page
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AnimeDetail {
    /// Title
    #[serde(rename = "judul")]
    pub title: String,

    /// Cover image url
    #[serde(rename = "gambar")]
    pub image: String,

    /// Japanese title
    pub japanese: String,

    /// Score
    #[serde(rename = "skor")]
    pub score: String,

    /// Producers, comma separated
    #[serde(rename = "produser")]
    pub producer: String,

    /// TV, Movie, OVA...
    #[serde(rename = "tipe")]
    pub anime_type: String,

    /// Ongoing or Completed
    pub status: String,

    /// Total episode count, may be "Unknown"
    pub total_episode: String,

    /// Episode duration
    #[serde(rename = "durasi")]
    pub duration: String,

    /// Release date
    #[serde(rename = "rilis")]
    pub release: String,

    /// Studio
    pub studio: String,

    /// Genres, comma separated
    pub genre: String,

    /// Synopsis paragraphs, newline separated
    #[serde(rename = "sinopsis")]
    pub synopsis: String,

    /// Episodes
    pub episodes: Vec<EpisodeEntry>,

    /// Batch downloads
    pub batch: Vec<EpisodeEntry>,

    /// Complete bundles
    #[serde(rename = "lengkap")]
    pub complete: Vec<EpisodeEntry>,
}

impl AnimeDetail {
    /// Parse an [`AnimeDetail`] from Html.
    ///
    /// Missing markup leaves the matching field empty.
    pub(crate) fn from_html(html: &Html) -> Self {
        let root = html.root_element();
        let mut detail = Self {
            title: select_text(root, &TITLE_SELECTOR),
            image: select_attr(root, &COVER_SELECTOR, "src"),
            synopsis: root
                .select(&SYNOPSIS_SELECTOR)
                .map(element_text)
                .filter(|paragraph| !paragraph.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            ..Self::default()
        };

        for row in root.select(&INFO_ROW_SELECTOR) {
            let row = element_text(row);
            let Some((label, value)) = row.split_once(':') else {
                continue;
            };
            let value = value.trim().to_string();

            match label.trim().to_lowercase().as_str() {
                "judul" if detail.title.is_empty() => detail.title = value,
                "japanese" => detail.japanese = value,
                "skor" => detail.score = value,
                "produser" => detail.producer = value,
                "tipe" => detail.anime_type = value,
                "status" => detail.status = value,
                "total episode" => detail.total_episode = value,
                "durasi" => detail.duration = value,
                "tanggal rilis" => detail.release = value,
                "studio" => detail.studio = value,
                "genre" => detail.genre = value,
                _ => {}
            }
        }

        for list in root.select(&EPISODE_LIST_SELECTOR) {
            let heading = select_text(list, &EPISODE_LIST_HEADING_SELECTOR).to_lowercase();
            let entries = list.select(&LI_SELECTOR).map(EpisodeEntry::from_element);

            if heading.contains("batch") {
                detail.batch.extend(entries);
            } else if heading.contains("lengkap") {
                detail.complete.extend(entries);
            } else {
                detail.episodes.extend(entries);
            }
        }

        detail
    }
}

/// A link in one of an anime's episode lists
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EpisodeEntry {
    /// Link text
    #[serde(rename = "judul")]
    pub title: String,

    /// Episode, batch or bundle slug
    pub slug: String,

    /// Upload date label
    #[serde(rename = "tanggal")]
    pub date: String,
}

impl EpisodeEntry {
    fn from_element(el: ElementRef) -> Self {
        Self {
            title: select_text(el, &A_SELECTOR),
            slug: select_slug(el, &A_SELECTOR),
            date: el
                .select(&SPAN_SELECTOR)
                .nth(1)
                .map(element_text)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ANIME_FRIEREN: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/test_data/anime/frieren.html"
    ));
    const ANIME_NO_INFO: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/test_data/anime/no_info.html"
    ));

    #[test]
    fn parse_frieren() {
        let html = Html::parse_document(ANIME_FRIEREN);
        let detail = AnimeDetail::from_html(&html);

        assert_eq!(detail.title, "Sousou no Frieren Sub Indo");
        assert_eq!(
            detail.image,
            "https://otakudesu.best/wp-content/uploads/2023/09/frieren.jpg"
        );
        assert_eq!(detail.japanese, "葬送のフリーレン");
        assert_eq!(detail.score, "9.10");
        assert_eq!(detail.producer, "Aniplex, Dentsu, Shogakukan-Shueisha Productions");
        assert_eq!(detail.anime_type, "TV");
        assert_eq!(detail.status, "Completed");
        assert_eq!(detail.total_episode, "28");
        assert_eq!(detail.duration, "24 Menit");
        assert_eq!(detail.release, "Sep 29, 2023");
        assert_eq!(detail.studio, "Madhouse");
        assert_eq!(detail.genre, "Adventure, Drama, Fantasy");
        assert_eq!(detail.synopsis.lines().count(), 2);

        assert_eq!(detail.episodes.len(), 3);
        assert_eq!(
            detail.episodes[0],
            EpisodeEntry {
                title: "Sousou no Frieren Episode 28 (End) Subtitle Indonesia".into(),
                slug: "snf-episode-28-sub-indo".into(),
                date: "22 Mar,2024".into(),
            }
        );

        assert_eq!(detail.batch.len(), 1);
        assert_eq!(detail.batch[0].slug, "snf-batch-sub-indo");

        assert_eq!(detail.complete.len(), 1);
        assert_eq!(detail.complete[0].slug, "snf-lengkap-sub-indo");
    }

    #[test]
    fn missing_info_is_empty() {
        let html = Html::parse_document(ANIME_NO_INFO);
        let detail = AnimeDetail::from_html(&html);

        assert_eq!(detail.title, "Mystery Anime");
        assert!(detail.image.is_empty());
        assert!(detail.japanese.is_empty());
        assert!(detail.score.is_empty());
        assert!(detail.producer.is_empty());
        assert!(detail.anime_type.is_empty());
        assert!(detail.status.is_empty());
        assert!(detail.total_episode.is_empty());
        assert!(detail.duration.is_empty());
        assert!(detail.release.is_empty());
        assert!(detail.studio.is_empty());
        assert!(detail.genre.is_empty());
        assert!(detail.synopsis.is_empty());
        assert!(detail.batch.is_empty());
        assert!(detail.complete.is_empty());
        assert_eq!(detail.episodes.len(), 1);
    }

    #[test]
    fn empty_page_is_empty_detail() {
        let html = Html::parse_document("<html><body></body></html>");
        assert_eq!(AnimeDetail::from_html(&html), AnimeDetail::default());
    }
}
