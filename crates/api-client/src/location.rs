use crate::error::ApiError;
use reqwest::Url;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Where a document lives: a local file or an http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Path(PathBuf),
    Url(Url),
}

impl FromStr for SourceLocation {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ApiError::InvalidData("empty source location".to_string()));
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            let url = Url::parse(trimmed)
                .map_err(|e| ApiError::InvalidData(format!("invalid URL '{}': {}", trimmed, e)))?;
            return Ok(SourceLocation::Url(url));
        }
        Ok(SourceLocation::Path(PathBuf::from(trimmed)))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Path(path) => write!(f, "{}", path.display()),
            SourceLocation::Url(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("data/metals.json")]
    #[case("/srv/bullion/news.json")]
    fn test_paths(#[case] raw: &str) {
        assert_eq!(raw.parse::<SourceLocation>().unwrap(), SourceLocation::Path(PathBuf::from(raw)));
    }

    #[rstest]
    fn test_urls() {
        let location: SourceLocation = "https://open.er-api.com/v6/latest/USD".parse().unwrap();
        assert!(matches!(location, SourceLocation::Url(ref url) if url.host_str() == Some("open.er-api.com")));
    }

    #[rstest]
    #[case("")]
    #[case("http://")]
    fn test_invalid(#[case] raw: &str) {
        assert!(raw.parse::<SourceLocation>().is_err());
    }
}
