//! Search feeds: a query turned into a feed URL.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

/// Source label given to articles found through a search feed.
pub const SEARCH_SOURCE_NAME: &str = "Google News";

/// Build a German-edition Google News RSS search URL for `query`.
#[must_use]
pub fn google_news_search_url(query: &str) -> String {
    let encoded = utf8_percent_encode(query.trim(), NON_ALPHANUMERIC).to_string();
    format!("https://news.google.com/rss/search?q={encoded}&hl=de&gl=DE&ceid=DE:de")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_percent_encoded() {
        assert_eq!(
            google_news_search_url(" künstliche Intelligenz "),
            "https://news.google.com/rss/search?q=k%C3%BCnstliche%20Intelligenz\
             &hl=de&gl=DE&ceid=DE:de"
        );
    }

    #[test]
    fn reserved_characters_do_not_leak_into_the_query_string() {
        let url = google_news_search_url("a&b=c");
        assert!(url.contains("q=a%26b%3Dc&"));
    }
}
