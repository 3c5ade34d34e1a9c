//! Watch endpoints of the invoice service.
//!
//! A watch URL has the shape `ws://<host>:<port>/ws?invoice_id=<id>`: the
//! service exposes one websocket path and selects the invoice through the
//! query string.

use std::fmt;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    #[error("Wrong URL scheme, must be 'ws' or 'wss' but was '{_0}'")]
    Scheme(String),
    #[error("Watch URLs carry the invoice in an 'invoice_id' query parameter")]
    MissingInvoiceId,
    #[error("String does not parse as URL")]
    Url(
        #[from]
        #[source]
        url::ParseError,
    ),
}

/// One invoice's status feed on a given service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEndpoint {
    /// Base URL of the service, e.g. `ws://localhost:5000`.
    pub server: url::Url,
    pub invoice_id: String,
}

impl WatchEndpoint {
    pub fn new(server: url::Url, invoice_id: impl Into<String>) -> Self {
        Self {
            server,
            invoice_id: invoice_id.into(),
        }
    }

    /// The full connect URL: `<server>/ws?invoice_id=<id>`.
    pub fn url(&self) -> url::Url {
        let mut url = self.server.clone();
        url.set_path("/ws");
        url.query_pairs_mut()
            .clear()
            .append_pair("invoice_id", &self.invoice_id);
        url
    }
}

impl TryFrom<&url::Url> for WatchEndpoint {
    type Error = ParseError;

    fn try_from(url: &url::Url) -> Result<Self, ParseError> {
        match url.scheme() {
            "ws" | "wss" => {},
            other => return Err(ParseError::Scheme(other.into())),
        }
        let invoice_id = url
            .query_pairs()
            .find(|(name, _)| name == "invoice_id")
            .map(|(_, value)| value.into_owned())
            .ok_or(ParseError::MissingInvoiceId)?;
        let mut server = url.clone();
        server.set_path("");
        server.set_query(None);
        Ok(Self { server, invoice_id })
    }
}

impl std::str::FromStr for WatchEndpoint {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, ParseError> {
        Self::try_from(&url::Url::parse(input)?)
    }
}

impl fmt::Display for WatchEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builds_the_default_watch_url() {
        let endpoint = WatchEndpoint::new(
            url::Url::parse("ws://localhost:5000").unwrap(),
            "some-id",
        );
        assert_eq!(endpoint.url().as_str(), "ws://localhost:5000/ws?invoice_id=some-id");
    }

    #[test]
    fn parses_back_what_it_builds() {
        let endpoint: WatchEndpoint = "ws://localhost:5000/ws?invoice_id=some-id"
            .parse()
            .unwrap();
        assert_eq!(endpoint.invoice_id, "some-id");
        assert_eq!(endpoint.server.as_str(), "ws://localhost:5000/");
        assert_eq!(endpoint, WatchEndpoint::try_from(&endpoint.url()).unwrap());
    }

    #[test]
    fn rejects_non_websocket_schemes() {
        let err = "http://localhost:5000/ws?invoice_id=some-id"
            .parse::<WatchEndpoint>()
            .unwrap_err();
        assert_eq!(err, ParseError::Scheme("http".into()));
    }

    #[test]
    fn requires_an_invoice_id() {
        let err = "ws://localhost:5000/ws".parse::<WatchEndpoint>().unwrap_err();
        assert_eq!(err, ParseError::MissingInvoiceId);
    }

    #[test]
    fn query_values_are_escaped() {
        let endpoint = WatchEndpoint::new(
            url::Url::parse("ws://localhost:5000").unwrap(),
            "id with spaces",
        );
        assert_eq!(
            endpoint.url().query(),
            Some("invoice_id=id+with+spaces"),
        );
    }
}
