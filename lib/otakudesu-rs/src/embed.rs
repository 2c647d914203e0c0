use crate::util::select_attr;
use crate::Error;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use scraper::Html;
use scraper::Selector;

/// The ajax action that hands out a nonce.
pub(crate) const NONCE_ACTION: &str = "aa1208d27f29ca340c92c66d1926f13f";

/// The ajax action that resolves a mirror into its embed.
pub(crate) const IFRAME_ACTION: &str = "2a3505c93b0035d3f455df82bf976b84";

static IFRAME_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("iframe").unwrap());

/// The body of an `admin-ajax.php` response
#[derive(Debug, serde::Deserialize)]
pub(crate) struct AjaxResponse {
    pub(crate) data: String,
}

/// Build the form for resolving a mirror.
///
/// `content` is base64 json, like `{"id":162946,"i":0,"q":"720p"}`.
/// Each of its keys becomes a field, followed by the nonce and the action.
pub(crate) fn iframe_form(
    content: &str,
    nonce: &str,
    action: &str,
) -> Result<Vec<(String, String)>, Error> {
    let decoded = STANDARD.decode(content.trim())?;
    let value: serde_json::Value = serde_json::from_slice(&decoded)?;
    let serde_json::Value::Object(object) = value else {
        return Err(Error::InvalidEmbedContent);
    };

    let mut form: Vec<(String, String)> = object
        .into_iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(value) => (key, value),
            value => (key, value.to_string()),
        })
        .collect();
    form.push(("nonce".to_string(), nonce.to_string()));
    form.push(("action".to_string(), action.to_string()));

    Ok(form)
}

/// A resolved embed
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Iframe {
    /// The decoded embed html
    pub html: String,

    /// The `src` of the embed's iframe, or empty if it has none
    pub src: String,
}

impl Iframe {
    /// Decode the base64 html from an ajax response.
    pub(crate) fn from_base64(data: &str) -> Result<Self, Error> {
        let html = String::from_utf8(STANDARD.decode(data.trim())?)?;
        let fragment = Html::parse_fragment(&html);
        let src = select_attr(fragment.root_element(), &IFRAME_SELECTOR, "src");

        Ok(Self { html, src })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CONTENT_720P: &str = "eyJpZCI6MTYyOTQ2LCJpIjowLCJxIjoiNzIwcCJ9";

    #[test]
    fn form_has_content_keys_nonce_and_action() {
        let form = iframe_form(CONTENT_720P, "5ee1a2b3c4", IFRAME_ACTION)
            .expect("failed to build form");

        let field = |name: &str| {
            form.iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        };
        assert_eq!(field("id"), Some("162946"));
        assert_eq!(field("i"), Some("0"));
        assert_eq!(field("q"), Some("720p"));
        assert_eq!(field("nonce"), Some("5ee1a2b3c4"));
        assert_eq!(field("action"), Some(IFRAME_ACTION));
        assert_eq!(form.len(), 5);
    }

    #[test]
    fn form_rejects_bad_content() {
        assert!(matches!(
            iframe_form("not base64!", "nonce", IFRAME_ACTION),
            Err(Error::Base64Decode(_))
        ));

        let not_json = STANDARD.encode("hello");
        assert!(matches!(
            iframe_form(&not_json, "nonce", IFRAME_ACTION),
            Err(Error::Json(_))
        ));

        let not_object = STANDARD.encode("[1, 2, 3]");
        assert!(matches!(
            iframe_form(&not_object, "nonce", IFRAME_ACTION),
            Err(Error::InvalidEmbedContent)
        ));
    }

    #[test]
    fn decode_iframe() {
        let html = concat!(
            "<div class=\"responsive-embed-stream\">",
            "<iframe src=\"https://desustream.info/dstream/filedon/index.php?id=xyz\" ",
            "width=\"100%\" height=\"100%\" allowfullscreen></iframe></div>"
        );
        let iframe = Iframe::from_base64(&STANDARD.encode(html)).expect("failed to decode");

        assert_eq!(iframe.html, html);
        assert_eq!(
            iframe.src,
            "https://desustream.info/dstream/filedon/index.php?id=xyz"
        );
    }

    #[test]
    fn decode_iframe_without_iframe() {
        let iframe =
            Iframe::from_base64(&STANDARD.encode("<p>gone</p>")).expect("failed to decode");
        assert_eq!(iframe.html, "<p>gone</p>");
        assert!(iframe.src.is_empty());
    }

    #[test]
    fn parse_ajax_response() {
        let response: AjaxResponse =
            serde_json::from_str(r#"{"data":"5ee1a2b3c4"}"#).expect("failed to parse");
        assert_eq!(response.data, "5ee1a2b3c4");
    }
}
