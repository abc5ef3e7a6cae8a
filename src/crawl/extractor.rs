//! Best-effort extraction of ranked product records from listing pages.
//!
//! Every lookup is an ordered chain of CSS selectors tried until one yields
//! plausible text. Markup that does not fit degrades to a shorter result,
//! never to an error.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

use crate::crawl::affiliate::affiliate_link;
use crate::domain::product::NewProduct;
use crate::domain::types::{
    ProductRank, ProductSummary, ProductTitle, ProductUrl, TypeConstraintError,
};

/// Summary used when no candidate text qualifies.
pub const SUMMARY_UNAVAILABLE: &str = "No description available";
/// Longest summary kept verbatim, in characters.
pub const SUMMARY_MAX_CHARS: usize = 200;
const ELLIPSIS: &str = "...";

/// Product containers, most specific layout first.
const BLOCK_PATTERNS: &[&str] = &[
    r#"li[id^="zg-ordered-list"]"#,
    ".zg-item-immersion",
    r#"div[data-component-type="s-search-result"]"#,
    ".s-result-item",
    r#"li[class*="zg-item"]"#,
];

const TITLE_PATTERNS: &[&str] = &[
    "h2",
    r#"span[class*="title"]"#,
    ".s-title-instructions-style",
    r#"a[class*="title"]"#,
    ".a-text-normal",
];

const SUMMARY_PATTERNS: &[&str] = &[
    ".a-size-small",
    ".a-color-secondary",
    r#"span[class*="review"]"#,
    r#"span[class*="rating"]"#,
    ".a-text-subtle",
];

static BLOCKS: LazyLock<Vec<(&'static str, Selector)>> = LazyLock::new(|| {
    BLOCK_PATTERNS
        .iter()
        .map(|pattern| (*pattern, parse_selector(pattern)))
        .collect()
});

/// Candidates for the class-name scan used when no block pattern matches.
static CLASSED_CONTAINERS: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("div[class], li[class]"));

static ITEM_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)item|product").expect("item class pattern is valid"));

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("a[href]"));

static TITLE: LazyLock<FieldChain> =
    LazyLock::new(|| FieldChain::new(TITLE_PATTERNS, is_plausible_title));

static SUMMARY: LazyLock<FieldChain> =
    LazyLock::new(|| FieldChain::new(SUMMARY_PATTERNS, is_plausible_summary));

fn parse_selector(pattern: &str) -> Selector {
    Selector::parse(pattern).expect("static selector is valid")
}

/// Ordered selectors sharing one acceptance predicate; the first selected
/// element whose text is accepted wins.
struct FieldChain {
    selectors: Vec<Selector>,
    accept: fn(&str) -> bool,
}

impl FieldChain {
    fn new(patterns: &[&str], accept: fn(&str) -> bool) -> Self {
        Self {
            selectors: patterns.iter().map(|p| parse_selector(p)).collect(),
            accept,
        }
    }

    fn resolve(&self, block: ElementRef<'_>) -> Option<String> {
        self.selectors
            .iter()
            .filter_map(|selector| block.select(selector).next())
            .map(element_text)
            .find(|text| (self.accept)(text))
    }
}

/// Trimmed text fragments of `element`, concatenated without separators.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

fn is_plausible_title(text: &str) -> bool {
    text.chars().count() > 3
}

/// Star ratings ("4.5 out of 5 stars") share classes with descriptions.
fn is_plausible_summary(text: &str) -> bool {
    text.chars().count() > 10 && !text.to_lowercase().contains("stars")
}

fn truncate_summary(text: String) -> String {
    if text.chars().count() <= SUMMARY_MAX_CHARS {
        return text;
    }
    let mut truncated: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

fn has_item_class(element: &ElementRef<'_>) -> bool {
    element
        .value()
        .classes()
        .any(|class| ITEM_CLASS.is_match(class))
}

#[derive(Debug, Error)]
enum BlockError {
    #[error("unresolvable link {href}: {source}")]
    Link {
        href: String,
        source: url::ParseError,
    },
    #[error(transparent)]
    Constraint(#[from] TypeConstraintError),
}

/// Turns listing pages into ranked [`NewProduct`] records.
#[derive(Debug, Clone)]
pub struct Extractor {
    base_url: Url,
    affiliate_tag: String,
}

impl Extractor {
    pub fn new(base_url: Url, affiliate_tag: impl Into<String>) -> Self {
        Self {
            base_url,
            affiliate_tag: affiliate_tag.into(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Extract at most `limit` products from raw page bytes.
    pub fn extract(&self, page: &[u8], limit: usize) -> Vec<NewProduct> {
        let html = String::from_utf8_lossy(page);
        let document = Html::parse_document(&html);
        self.extract_document(&document, limit)
    }

    /// Extract at most `limit` products from a parsed page.
    ///
    /// Ranks count accepted records only: blocks without a link are skipped
    /// first, then blocks without a usable title.
    pub fn extract_document(&self, document: &Html, limit: usize) -> Vec<NewProduct> {
        let mut products = Vec::new();

        for (position, block) in locate_blocks(document, limit).into_iter().enumerate() {
            if products.len() >= limit {
                break;
            }
            match self.extract_block(block, products.len() + 1) {
                Ok(Some(product)) => {
                    log::debug!("  {}. {}", product.rank, product.title);
                    products.push(product);
                }
                Ok(None) => {}
                Err(e) => log::warn!("Skipping product block {}: {e}", position + 1),
            }
        }

        log::info!("Extracted {} products", products.len());
        products
    }

    fn extract_block(
        &self,
        block: ElementRef<'_>,
        rank: usize,
    ) -> Result<Option<NewProduct>, BlockError> {
        let Some(href) = block
            .select(&ANCHOR)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
        else {
            return Ok(None);
        };

        let link = self.base_url.join(href).map_err(|source| BlockError::Link {
            href: href.to_string(),
            source,
        })?;
        let link = affiliate_link(link.as_str(), &self.base_url, &self.affiliate_tag);

        let Some(title) = TITLE.resolve(block) else {
            log::debug!("Dropping product block without a title: {link}");
            return Ok(None);
        };

        let summary = SUMMARY
            .resolve(block)
            .map(truncate_summary)
            .unwrap_or_else(|| SUMMARY_UNAVAILABLE.to_string());

        let rank = i32::try_from(rank)
            .map_err(|_| TypeConstraintError::InvalidValue(format!("rank {rank} out of range")))?;

        Ok(Some(NewProduct {
            title: ProductTitle::new(title)?,
            affiliate_link: ProductUrl::new(link)?,
            summary: Some(ProductSummary::new(summary)?),
            rank: ProductRank::new(rank)?,
        }))
    }
}

/// Find candidate product blocks using the first block pattern that matches,
/// falling back to a class-name scan.
fn locate_blocks(document: &Html, limit: usize) -> Vec<ElementRef<'_>> {
    for (pattern, selector) in BLOCKS.iter() {
        let matches: Vec<ElementRef<'_>> = document.select(selector).collect();
        if !matches.is_empty() {
            log::info!("Found {} products using selector: {pattern}", matches.len());
            return matches.into_iter().take(limit).collect();
        }
    }

    log::info!("No products found with standard selectors, trying fallback");
    document
        .select(&CLASSED_CONTAINERS)
        .filter(has_item_class)
        .take(limit)
        .collect()
}
