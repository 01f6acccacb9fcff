use crate::error::{GuideError, Result};
use reqwest::Url;

/// Third-party service that renders a QR code PNG for the `data` parameter.
pub const QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Link to the detail view of `id`: `base_url` with `?id=<id>` set.
pub fn detail_link(base_url: &str, id: &str) -> Result<String> {
    let mut url = Url::parse(base_url).map_err(|_| GuideError::InvalidUrl(base_url.to_string()))?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "id")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("id", id);
    Ok(url.into())
}

/// Image URL of a QR code that encodes `link`.
pub fn qr_image_url(link: &str) -> String {
    let mut url = Url::parse(QR_SERVICE_URL).expect("QR_SERVICE_URL is a valid URL");
    url.query_pairs_mut()
        .append_pair("size", "180x180")
        .append_pair("data", link);
    url.into()
}
