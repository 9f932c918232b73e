// tests/ingest_dedup.rs
//
// Running the pipeline twice over unchanged feed responses must leave
// the store exactly as one run left it: the url constraint, not the
// application, is the dedup authority.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use stock_news_ingestor::ingest::error::FetchError;
use stock_news_ingestor::ingest::fetch::FeedTransport;
use stock_news_ingestor::ingest::run_once;
use stock_news_ingestor::ingest::types::FeedSource;
use stock_news_ingestor::store::{HeadlineStore, MemoryStore};

struct FixedTransport {
    bodies: HashMap<String, String>,
}

#[async_trait]
impl FeedTransport for FixedTransport {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        Ok(self.bodies[url].clone())
    }
}

fn rss(urls: &[&str]) -> String {
    let pub_date = Utc::now().to_rfc2822();
    let items: String = urls
        .iter()
        .map(|url| {
            format!("<item><title>t</title><link>{url}</link><pubDate>{pub_date}</pubDate></item>")
        })
        .collect();
    format!("<?xml version=\"1.0\"?><rss version=\"2.0\"><channel>{items}</channel></rss>")
}

#[tokio::test]
async fn rerunning_unchanged_feeds_adds_nothing() {
    let transport = FixedTransport {
        bodies: HashMap::from([
            (
                "https://a.example/rss".to_string(),
                rss(&["https://a.example/1", "https://a.example/2"]),
            ),
            (
                "https://b.example/rss".to_string(),
                rss(&["https://b.example/1"]),
            ),
        ]),
    };
    let store = MemoryStore::new();
    let srcs = vec![
        FeedSource::global("https://a.example/rss"),
        FeedSource::global("https://b.example/rss"),
    ];

    let first = run_once(&srcs, &transport, &store, 8).await;
    assert_eq!(first.items_inserted, 3);
    assert_eq!(first.items_deduplicated, 0);
    assert_eq!(store.len(), 3);

    let second = run_once(&srcs, &transport, &store, 8).await;
    assert_eq!(second.items_inserted, 0);
    assert_eq!(second.items_deduplicated, 3);
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn first_write_wins_on_conflicting_content() {
    let store = MemoryStore::new();
    let url = "https://a.example/story";
    let pub_date = Utc::now().to_rfc2822();

    let original = format!(
        "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel>\
         <item><title>Original headline</title><link>{url}</link>\
         <pubDate>{pub_date}</pubDate></item></channel></rss>"
    );
    let edited = format!(
        "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel>\
         <item><title>Edited headline</title><link>{url}</link>\
         <pubDate>{pub_date}</pubDate></item></channel></rss>"
    );

    let srcs = vec![FeedSource::global("https://a.example/rss")];

    let t1 = FixedTransport {
        bodies: HashMap::from([("https://a.example/rss".to_string(), original)]),
    };
    run_once(&srcs, &t1, &store, 8).await;

    let t2 = FixedTransport {
        bodies: HashMap::from([("https://a.example/rss".to_string(), edited)]),
    };
    let report = run_once(&srcs, &t2, &store, 8).await;
    assert_eq!(report.items_deduplicated, 1);

    let rows = store.all_by_date_desc().await.unwrap();
    assert_eq!(rows.len(), 1);
    // The re-published headline never overwrites the stored one.
    assert_eq!(rows[0].title.as_deref(), Some("Original headline"));
}
