// src/ingest/catalog.rs
//
// Builds the list of feeds a run will poll: the fixed global feeds plus
// one feed per (template x ticker) pair. Pure; no I/O happens here.

use crate::ingest::error::ConfigError;
use crate::ingest::types::FeedSource;

/// Feeds that do not take a symbol.
pub const GLOBAL_FEEDS: &[&str] = &[
    "https://rss.cnn.com/rss/money_latest.rss",
    "https://rss.nytimes.com/services/xml/rss/nyt/Business.xml",
    "https://feeds.bbci.co.uk/news/business/rss.xml",
    "https://www.marketwatch.com/rss/topstories",
    "https://www.marketwatch.com/rss/markets",
    "https://www.investing.com/rss/news.rss",
    "https://www.ft.com/markets?format=rss",
    "https://www.economist.com/business/rss.xml",
    "https://www.theguardian.com/business/rss",
    "https://seekingalpha.com/feed.xml",
    "https://www.coindesk.com/arc/outboundfeeds/rss/?outputType=xml",
    "https://feeds.a.dj.com/rss/RSSMarketsMain.xml",
    "https://feeds.a.dj.com/rss/RSSWSJcomUSBusiness.xml",
    "https://feeds.a.dj.com/rss/RSSWSJcomUSMarkets.xml",
    "https://www.cnbc.com/id/19854910/device/rss/rss.html",
    "https://www.barrons.com/rss",
    "https://www.investopedia.com/feedbuilder/feed/getfeed/?feedName=topNews",
    "https://www.reddit.com/r/finance/.rss",
    "https://business.financialpost.com/feed",
    "https://feeds.content.dowjones.io/public/rss/mw_realtimeheadlines",
    "https://feeds.content.dowjones.io/public/rss/mw_topstories",
    "https://feeds.content.dowjones.io/public/rss/mw_bulletins",
    "https://feeds.content.dowjones.io/public/rss/mw_marketpulse",
    "https://news.google.com/rss/search?q=when:24h+allinurl:bloomberg.com&hl=en-US&gl=US&ceid=US:en",
    "https://www.marketbeat.com/rss.ashx?type=headlines",
    "https://www.marketbeat.com/rss.ashx?type=originals",
    "https://www.marketbeat.com/rss.ashx?type=instant-alerts",
    "https://search.cnbc.com/rs/search/combinedcms/view.xml?partnerId=wrss01&id=100003114",
    "https://ragingbull.com/feed/",
];

/// Per-symbol templates; `{}` is the substitution slot.
pub const SYMBOL_FEED_TEMPLATES: &[&str] = &[
    "https://feeds.finance.yahoo.com/rss/2.0/headline?s={}&region=US&lang=en-US",
    "https://www.nasdaq.com/feed/rssoutbound?symbol={}",
];

/// Expand the built-in feed lists for the given tickers.
pub fn default_catalog(symbols: &[String]) -> Result<Vec<FeedSource>, ConfigError> {
    build(GLOBAL_FEEDS, SYMBOL_FEED_TEMPLATES, symbols)
}

/// Expand arbitrary feed lists. Order is deterministic: globals in the
/// order given, then symbol feeds symbol-major with templates in the
/// order given within each symbol.
pub fn build(
    globals: &[&str],
    templates: &[&str],
    symbols: &[String],
) -> Result<Vec<FeedSource>, ConfigError> {
    if symbols.is_empty() {
        return Err(ConfigError::EmptyTickers);
    }
    for tpl in templates {
        if tpl.matches("{}").count() != 1 {
            return Err(ConfigError::BadTemplate((*tpl).to_string()));
        }
    }

    let mut sources = Vec::with_capacity(globals.len() + symbols.len() * templates.len());
    for url in globals {
        sources.push(FeedSource::global(*url));
    }
    for sym in symbols {
        for tpl in templates {
            sources.push(FeedSource::for_symbol(tpl.replacen("{}", sym, 1), sym));
        }
    }
    Ok(sources)
}
