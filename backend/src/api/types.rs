//! REST API types and download constants.
//!
//! Successful cleans are returned as workbook bytes with a fixed suggested
//! filename and MIME type; failures and warnings are JSON bodies built here.

use serde_json::{json, Value};
use uuid::Uuid;

/// Suggested filename for the cleaned workbook download.
pub const DOWNLOAD_FILENAME: &str = "Ori_Nabiji_შეკვეთა(ასატვირთი).xlsx";

/// MIME type of a modern (xlsx) workbook.
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// `Content-Disposition` value for the download, with the non-ASCII
/// filename percent-encoded per RFC 5987.
pub fn download_disposition() -> String {
    format!(
        "attachment; filename*=UTF-8''{}",
        rfc5987_encode(DOWNLOAD_FILENAME)
    )
}

/// Percent-encode a filename for the `filename*` parameter.
///
/// Keeps RFC 5987 attr-char bytes literal and hex-encodes everything else.
fn rfc5987_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        let literal = byte.is_ascii_alphanumeric()
            || matches!(
                byte,
                b'!' | b'#' | b'$' | b'&' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
            );
        if literal {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

/// JSON body for a failed run.
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
    })
}

/// JSON body for the empty-selection short-circuit: not an error, the
/// transform is simply skipped.
pub fn warning_response(message: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "warning",
        "warning": message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let body = error_response("boom");
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "boom");
        assert!(body["jobId"].as_str().is_some());
    }

    #[test]
    fn test_warning_response_shape() {
        let body = warning_response("nothing to clear");
        assert_eq!(body["status"], "warning");
        assert_eq!(body["warning"], "nothing to clear");
    }

    #[test]
    fn test_disposition_is_ascii() {
        let disposition = download_disposition();
        assert!(disposition.is_ascii());
        assert!(disposition.starts_with("attachment; filename*=UTF-8''"));
        // The latin part of the filename survives the encoding literally.
        assert!(disposition.contains("Ori_Nabiji_"));
        assert!(disposition.contains(".xlsx"));
    }

    #[test]
    fn test_rfc5987_encoding() {
        assert_eq!(rfc5987_encode("a b"), "a%20b");
        assert_eq!(rfc5987_encode("ა"), "%E1%83%90");
        assert_eq!(rfc5987_encode("file-1.xlsx"), "file-1.xlsx");
    }
}
