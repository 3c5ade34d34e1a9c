//! The invoice update payloads the webhook service emits and consumes.

use std::{fmt, str::FromStr};

use serde_derive::{Deserialize, Serialize};

/// Lifecycle states of an invoice.
///
/// The serialized forms are part of the wire protocol, so they must be
/// spelled exactly as shown. `InvoiceRecievedPayment` is misspelled
/// upstream; the spelling is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    #[serde(rename = "InvoiceCreated")]
    Created,
    #[serde(rename = "InvoiceRecievedPayment")]
    ReceivedPayment,
    #[serde(rename = "InvoicePayed")]
    Payed,
    #[serde(rename = "InvoiceExpired")]
    Expired,
}

impl InvoiceStatus {
    /// Whether the service stops sending updates after this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, InvoiceStatus::Payed | InvoiceStatus::Expired)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Created => write!(f, "InvoiceCreated"),
            InvoiceStatus::ReceivedPayment => write!(f, "InvoiceRecievedPayment"),
            InvoiceStatus::Payed => write!(f, "InvoicePayed"),
            InvoiceStatus::Expired => write!(f, "InvoiceExpired"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported invoice status '{_0}'")]
pub struct BadStatus(String);

impl FromStr for InvoiceStatus {
    type Err = BadStatus;

    fn from_str(status: &str) -> Result<Self, BadStatus> {
        match status {
            "InvoiceCreated" => Ok(InvoiceStatus::Created),
            "InvoiceRecievedPayment" => Ok(InvoiceStatus::ReceivedPayment),
            "InvoicePayed" => Ok(InvoiceStatus::Payed),
            "InvoiceExpired" => Ok(InvoiceStatus::Expired),
            other => Err(BadStatus(other.to_owned())),
        }
    }
}

/// The body of one webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceUpdate {
    #[serde(rename = "invoiceId")]
    pub invoice_id: String,
    #[serde(rename = "type")]
    pub status: InvoiceStatus,
}

impl InvoiceUpdate {
    pub fn new(invoice_id: impl Into<String>, status: InvoiceStatus) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            status,
        }
    }

    /// Compact JSON rendering, the byte sequence a sender signs.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("invoice updates always serialize")
    }
}

#[derive(Deserialize)]
struct StatusFrame {
    message: StatusBody,
}

#[derive(Deserialize)]
struct StatusBody {
    #[serde(rename = "invoiceStatus")]
    invoice_status: InvoiceStatus,
}

/// Best-effort decode of a `{"message": {"invoiceStatus": …}}` frame from
/// the status feed. Plain notices and unknown statuses yield `None`.
pub fn peek_status(text: &str) -> Option<InvoiceStatus> {
    serde_json::from_str::<StatusFrame>(text)
        .ok()
        .map(|frame| frame.message.invoice_status)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn wire_spellings_are_exact() {
        assert_eq!(InvoiceStatus::ReceivedPayment.to_string(), "InvoiceRecievedPayment");
        assert_eq!(
            "InvoiceRecievedPayment".parse::<InvoiceStatus>(),
            Ok(InvoiceStatus::ReceivedPayment),
        );
        /* The correct spelling is not part of the protocol. */
        assert!("InvoiceReceivedPayment".parse::<InvoiceStatus>().is_err());
    }

    #[test]
    fn update_serializes_like_a_delivery() {
        let update = InvoiceUpdate::new("bob", InvoiceStatus::Created);
        assert_eq!(update.to_json(), r#"{"invoiceId":"bob","type":"InvoiceCreated"}"#);

        let parsed: InvoiceUpdate =
            serde_json::from_str(r#"{"invoiceId": "some-id", "type": "InvoicePayed"}"#).unwrap();
        assert_eq!(parsed, InvoiceUpdate::new("some-id", InvoiceStatus::Payed));
    }

    #[test]
    fn terminal_statuses_end_the_feed() {
        assert!(InvoiceStatus::Payed.is_terminal());
        assert!(InvoiceStatus::Expired.is_terminal());
        assert!(!InvoiceStatus::Created.is_terminal());
        assert!(!InvoiceStatus::ReceivedPayment.is_terminal());
    }

    #[test]
    fn peeks_status_frames_only() {
        assert_eq!(
            peek_status(r#"{"message": {"invoiceStatus": "InvoicePayed"}}"#),
            Some(InvoiceStatus::Payed),
        );
        assert_eq!(peek_status(r#"{"message": "status not found"}"#), None);
        assert_eq!(peek_status("not even json"), None);
    }
}
