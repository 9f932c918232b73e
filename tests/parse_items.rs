// tests/parse_items.rs
use chrono::{TimeZone, Utc};
use stock_news_ingestor::ingest::parse::{candidates, ItemOutcome};

const MARKET_XML: &str = include_str!("fixtures/market_rss.xml");
const FEED_URL: &str = "https://news.example.com/rss";

#[test]
fn fixture_yields_outcomes_in_document_order() {
    let outcomes: Vec<ItemOutcome> = candidates(MARKET_XML, FEED_URL)
        .expect("fixture parses")
        .collect();
    assert_eq!(outcomes.len(), 6);

    // 1: complete item
    match &outcomes[0] {
        ItemOutcome::Candidate(c) => {
            assert_eq!(c.url, "https://news.example.com/articles/fed-holds-rates");
            assert_eq!(
                c.title.as_deref(),
                Some("Fed holds rates steady as inflation cools")
            );
            assert_eq!(
                c.published_at,
                Utc.with_ymd_and_hms(2024, 6, 10, 8, 30, 0).unwrap()
            );
            assert_eq!(c.source_feed, FEED_URL);
            assert!(c.summary.as_deref().unwrap().contains("benchmark rate"));
        }
        other => panic!("expected candidate, got {other:?}"),
    }

    // 2: empty <link> falls back to <guid>, attribute and all
    match &outcomes[1] {
        ItemOutcome::Candidate(c) => {
            assert_eq!(c.url, "https://news.example.com/articles/chipmaker-earnings");
        }
        other => panic!("expected guid-fallback candidate, got {other:?}"),
    }

    // 3: no pubDate
    assert!(matches!(outcomes[2], ItemOutcome::MissingField));
    // 4: unparseable pubDate
    assert!(matches!(outcomes[3], ItemOutcome::UnparseableDate));
    // 5: no link and no guid
    assert!(matches!(outcomes[4], ItemOutcome::MissingField));

    // 6: zone-less pubDate interpreted as UTC
    match &outcomes[5] {
        ItemOutcome::Candidate(c) => {
            assert_eq!(
                c.published_at,
                Utc.with_ymd_and_hms(2024, 6, 8, 6, 15, 0).unwrap()
            );
        }
        other => panic!("expected zone-less candidate, got {other:?}"),
    }
}

#[test]
fn malformed_xml_fails_the_feed() {
    assert!(candidates("this is not xml <<<", FEED_URL).is_err());
}

#[test]
fn channel_without_items_is_empty_not_an_error() {
    let xml = r#"<?xml version="1.0"?>
        <rss version="2.0"><channel><title>Empty</title></channel></rss>"#;
    let outcomes: Vec<_> = candidates(xml, FEED_URL).expect("parses").collect();
    assert!(outcomes.is_empty());
}

#[test]
fn iterator_is_consumed_once() {
    let mut items = candidates(MARKET_XML, FEED_URL).expect("fixture parses");
    let first = items.by_ref().count();
    assert_eq!(first, 6);
    assert_eq!(items.count(), 0);
}
