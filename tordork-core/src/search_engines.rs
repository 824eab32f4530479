//! Search engine registry
//!
//! The two clearnet engines a run can target, with their URL templates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported search engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Startpage (proxied Google results)
    #[default]
    Startpage,
    /// Yandex
    Yandex,
}

impl Engine {
    /// All supported engines, default first
    pub const ALL: [Engine; 2] = [Engine::Startpage, Engine::Yandex];

    /// Lowercase name used on the command line and in logs
    pub fn name(&self) -> &'static str {
        match self {
            Engine::Startpage => "startpage",
            Engine::Yandex => "yandex",
        }
    }

    /// URL template with {query} placeholder
    pub fn url_template(&self) -> &'static str {
        match self {
            Engine::Startpage => "https://www.startpage.com/sp/search?q={query}",
            Engine::Yandex => "https://yandex.com/search/?text={query}",
        }
    }

    /// Build search URL for a query
    pub fn build_url(&self, query: &str) -> String {
        self.url_template()
            .replace("{query}", &urlencoding::encode(query))
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Engine::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown engine '{}' (expected startpage or yandex)", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url() {
        let url = Engine::Startpage.build_url("site:example.com filetype:pdf");
        assert_eq!(
            url,
            "https://www.startpage.com/sp/search?q=site%3Aexample.com%20filetype%3Apdf"
        );

        let url = Engine::Yandex.build_url("ransomware payments");
        assert_eq!(url, "https://yandex.com/search/?text=ransomware%20payments");
    }

    #[test]
    fn test_build_url_non_ascii() {
        let url = Engine::Yandex.build_url("пароль");
        assert!(url.ends_with("?text=%D0%BF%D0%B0%D1%80%D0%BE%D0%BB%D1%8C"));
    }

    #[test]
    fn test_default_engine() {
        assert_eq!(Engine::default(), Engine::Startpage);
    }

    #[test]
    fn test_parse_engine() {
        assert_eq!("yandex".parse::<Engine>().unwrap(), Engine::Yandex);
        assert_eq!(" StartPage ".parse::<Engine>().unwrap(), Engine::Startpage);
        assert!("bing".parse::<Engine>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Engine::Yandex).unwrap();
        assert_eq!(json, "\"yandex\"");
        let engine: Engine = serde_json::from_str("\"startpage\"").unwrap();
        assert_eq!(engine, Engine::Startpage);
    }
}
