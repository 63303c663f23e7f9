//! Receipt images sent to the extraction endpoint, and what comes back.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};

use crate::MoneyCents;

const DEFAULT_MIME: &str = "image/jpeg";

/// Currency the extractor assumes when the receipt does not show one.
pub const DEFAULT_CURRENCY: &str = "CAD";

/// Base64 payload plus mime type, as the extraction endpoint expects it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiptImage {
    pub image_base64: String,
    pub mime_type: String,
}

/// Expense fields read from a receipt.
#[derive(Clone, Debug, PartialEq)]
pub struct ReceiptExtraction {
    pub price: MoneyCents,
    pub item_name: String,
    pub category: String,
    pub receipt_date: DateTime<Utc>,
}

/// Guesses the mime type from a file name or uri.
///
/// HEIC images are sent as `image/heic` without converting them to JPEG.
pub fn mime_type_for(uri: &str) -> &'static str {
    let lower = uri.to_ascii_lowercase();
    if let Some(declared) = lower.strip_prefix("data:") {
        let declared = declared.split([';', ',']).next().unwrap_or_default();
        return match declared {
            "image/png" => "image/png",
            "image/gif" => "image/gif",
            "image/heic" => "image/heic",
            _ => DEFAULT_MIME,
        };
    }
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".gif") {
        "image/gif"
    } else if lower.ends_with(".heic") {
        "image/heic"
    } else {
        DEFAULT_MIME
    }
}

/// Raw base64 payload of a `data:` uri (everything after the first comma).
/// Anything else is returned unchanged.
pub fn strip_data_uri(value: &str) -> &str {
    if !value.starts_with("data:") {
        return value;
    }
    match value.split_once(',') {
        Some((_, payload)) => payload,
        None => value,
    }
}

impl ReceiptImage {
    /// Encodes raw image bytes read from `file_name`.
    pub fn from_bytes(file_name: &str, bytes: &[u8]) -> Self {
        Self {
            image_base64: STANDARD.encode(bytes),
            mime_type: mime_type_for(file_name).to_string(),
        }
    }

    /// Wraps an already encoded `data:` uri.
    pub fn from_data_uri(uri: &str) -> Self {
        Self {
            image_base64: strip_data_uri(uri).to_string(),
            mime_type: mime_type_for(uri).to_string(),
        }
    }
}
