//! Response shapes for the MediaWiki Action API (`format=json&formatversion=2`).

use std::collections::HashMap;

use serde::Deserialize;

/// `list=search` response.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    pub search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchHit {
    pub title: String,
}

/// `prop=pageprops` / `prop=links` response.
#[derive(Debug, Deserialize)]
pub(crate) struct PagesResponse {
    #[serde(default)]
    pub query: Option<PagesQuery>,
    /// Parameters to send back to fetch the next batch, if any.
    #[serde(default, rename = "continue")]
    pub continuation: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PagesQuery {
    #[serde(default)]
    pub pages: Vec<PageEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageEntry {
    pub title: String,
    #[serde(default)]
    pub missing: bool,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub pageprops: Option<PageProps>,
    #[serde(default)]
    pub links: Vec<LinkEntry>,
}

impl PageEntry {
    /// Disambiguation pages carry an (empty-valued) `disambiguation` page prop.
    pub fn is_disambiguation(&self) -> bool {
        self.pageprops
            .as_ref()
            .is_some_and(|props| props.disambiguation.is_some())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageProps {
    #[serde(default)]
    pub disambiguation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LinkEntry {
    pub title: String,
}

/// `action=parse&prop=text` response.
#[derive(Debug, Deserialize)]
pub(crate) struct ParseResponse {
    pub parse: ParsedPage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ParsedPage {
    pub text: String,
}

/// Top-level `error` object returned with HTTP 200.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub info: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_entry_variants() {
        let json = r#"{"query": {"pages": [
            {"ns": 0, "title": "Ghost", "missing": true},
            {"title": "Bad|Title", "invalidreason": "bad char", "invalid": true},
            {"pageid": 1, "ns": 0, "title": "Mercury", "pageprops": {"disambiguation": ""}},
            {"pageid": 2, "ns": 0, "title": "Ada Lovelace"}
        ]}}"#;

        let resp: PagesResponse = serde_json::from_str(json).expect("parse");
        let pages = resp.query.expect("query").pages;
        assert!(pages[0].missing);
        assert!(pages[1].invalid);
        assert!(pages[2].is_disambiguation());
        assert!(!pages[3].is_disambiguation());
        assert!(resp.continuation.is_none());
    }

    #[test]
    fn continuation_is_captured() {
        let json = r#"{
            "continue": {"plcontinue": "736|0|Babbage", "continue": "||"},
            "query": {"pages": [{"title": "Ada Lovelace", "links": [{"ns": 0, "title": "Analytical Engine"}]}]}
        }"#;

        let resp: PagesResponse = serde_json::from_str(json).expect("parse");
        let next = resp.continuation.expect("continue");
        assert_eq!(next["plcontinue"], "736|0|Babbage");
        assert_eq!(resp.query.unwrap().pages[0].links[0].title, "Analytical Engine");
    }
}
