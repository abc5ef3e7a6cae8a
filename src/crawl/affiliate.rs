//! Affiliate rewriting of outbound product links.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Matches the 10-character product identifier segment of a listing link.
static PRODUCT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/dp/([A-Z0-9]{10})").expect("product id pattern is valid"));

/// Extract the product identifier from a `/dp/<id>` link.
pub fn product_identifier(link: &str) -> Option<&str> {
    PRODUCT_ID
        .captures(link)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Rewrite `link` into the canonical `dp/<id>?tag=<tag>` form on `base`.
///
/// Links without a product identifier are returned unchanged.
pub fn affiliate_link(link: &str, base: &Url, tag: &str) -> String {
    let Some(product_id) = product_identifier(link) else {
        return link.to_string();
    };

    match base.join(&format!("/dp/{product_id}")) {
        Ok(mut canonical) => {
            canonical.query_pairs_mut().append_pair("tag", tag);
            canonical.into()
        }
        Err(e) => {
            log::warn!("Cannot build affiliate link for {link}: {e}");
            link.to_string()
        }
    }
}
