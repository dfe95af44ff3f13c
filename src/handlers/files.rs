// Multipart reading and file download responses shared by the upload handlers

use axum::{
    extract::Multipart,
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::error::ApiError;

/// A file part read from a multipart form.
pub(crate) struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Reads every part of a multipart form. Text parts are returned by name,
/// the part named `file` is returned separately.
pub(crate) async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(Vec<(String, String)>, Option<UploadedFile>), ApiError> {
    let mut fields = Vec::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(e.body_text()))?;
            file = Some(UploadedFile { name: file_name, bytes: bytes.to_vec() });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::Validation(e.body_text()))?;
            fields.push((name, value));
        }
    }

    Ok((fields, file))
}

/// 200 with the stored bytes as an attachment named `file_name`.
pub(crate) fn attachment_response(file_name: &str, bytes: Vec<u8>) -> impl IntoResponse {
    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (header::CONTENT_DISPOSITION, content_disposition(file_name)),
    ];

    (StatusCode::OK, headers, bytes)
}

/// `attachment` disposition with an ASCII fallback name and the
/// UTF-8 name percent-encoded in `filename*`.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();

    let mut encoded = String::new();
    for byte in file_name.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-' | b'_') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }

    format!("attachment; filename=\"{}\"; filename*=UTF-8''{}", fallback, encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_ascii() {
        assert_eq!(
            content_disposition("notes.pdf"),
            "attachment; filename=\"notes.pdf\"; filename*=UTF-8''notes.pdf"
        );
    }

    #[test]
    fn test_content_disposition_encodes_chinese() {
        let value = content_disposition("真题.pdf");
        assert!(value.starts_with("attachment; filename=\"__.pdf\""));
        assert!(value.ends_with("filename*=UTF-8''%E7%9C%9F%E9%A2%98.pdf"));
        assert!(value.is_ascii());
    }

    #[test]
    fn test_attachment_response_headers() {
        let response = attachment_response("截图.png", vec![1, 2, 3]).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/octet-stream");
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("filename*=UTF-8''%E6%88%AA%E5%9B%BE.png"));
    }
}
