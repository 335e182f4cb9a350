use std::fmt;

use thiserror::Error;

/// Which upstream a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Primary commerce backend (category tree + brands).
    Commerce,
    /// Secondary content backend (flat category records).
    Content,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Commerce => "commerce",
            Backend::Content => "content",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum SiteInfoError {
    #[error("{backend} http {status}: {body}")]
    Http {
        backend: Backend,
        status: u16,
        body: String,
    },
    #[error("{backend} network: {source}")]
    Transport {
        backend: Backend,
        #[source]
        source: reqwest::Error,
    },
    #[error("{backend} graphql errors: {}", .messages.join("; "))]
    GraphQl {
        backend: Backend,
        messages: Vec<String>,
    },
    #[error("{backend} decode: {source}")]
    Decode {
        backend: Backend,
        #[source]
        source: serde_json::Error,
    },
    #[error("config: {0}")]
    Config(String),
}

impl SiteInfoError {
    /// Backend that produced the error, if it came from a network call.
    pub fn backend(&self) -> Option<Backend> {
        match self {
            SiteInfoError::Http { backend, .. }
            | SiteInfoError::Transport { backend, .. }
            | SiteInfoError::GraphQl { backend, .. }
            | SiteInfoError::Decode { backend, .. } => Some(*backend),
            SiteInfoError::Config(_) => None,
        }
    }

    /// True for failures of the upstream call itself (as opposed to bad local config).
    pub fn is_transport(&self) -> bool {
        !matches!(self, SiteInfoError::Config(_))
    }
}

pub type Result<T, E = SiteInfoError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_error_joins_messages() {
        let err = SiteInfoError::GraphQl {
            backend: Backend::Content,
            messages: vec!["field missing".into(), "denied".into()],
        };
        assert_eq!(
            err.to_string(),
            "content graphql errors: field missing; denied"
        );
        assert_eq!(err.backend(), Some(Backend::Content));
        assert!(err.is_transport());
    }

    #[test]
    fn config_errors_are_not_transport() {
        let err = SiteInfoError::Config("missing COMMERCE_GRAPHQL_URL".into());
        assert!(!err.is_transport());
        assert_eq!(err.backend(), None);
    }
}
