use base64ct::{Base64, Encoding};
use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;

pub(crate) fn is_valid_image_ref(image: &str) -> bool {
    lazy_static! {
        static ref IMAGE_RE: Regex = Regex::new(
            r"^(https?://[^\s]+|data:image/[a-z0-9.+-]+;base64,[A-Za-z0-9+/]+={0,2})$"
        )
        .unwrap();
    }
    IMAGE_RE.is_match(image)
}

/// Encodes an uploaded image as an embedded `data:` URL.
pub fn data_url_from_bytes(body: Bytes, content_type: &str) -> anyhow::Result<String> {
    anyhow::ensure!(!body.is_empty(), "empty image upload");
    let content_type = content_type.trim().to_ascii_lowercase();
    anyhow::ensure!(
        is_supported_image_type(&content_type),
        "unsupported image type {content_type}"
    );
    Ok(format!(
        "data:{};base64,{}",
        content_type,
        Base64::encode_string(&body)
    ))
}

fn is_supported_image_type(ct: &str) -> bool {
    matches!(
        ct,
        "image/jpeg" | "image/jpg" | "image/png" | "image/webp" | "image/gif" | "image/svg+xml"
    )
}

#[cfg(test)]
mod image_tests {
    use super::*;

    #[test]
    fn only_browser_image_types_are_accepted() {
        for ct in ["image/jpeg", "image/png", "image/webp", "image/gif", "image/svg+xml"] {
            assert!(is_supported_image_type(ct), "{ct}");
        }
        assert!(!is_supported_image_type("image/tiff"));
        assert!(!is_supported_image_type("application/octet-stream"));
        assert!(!is_supported_image_type(""));
    }

    #[test]
    fn data_url_encodes_bytes() {
        let url = data_url_from_bytes(Bytes::from_static(b"hi!"), "Image/PNG").unwrap();
        assert_eq!(url, "data:image/png;base64,aGkh");
        assert!(is_valid_image_ref(&url));
    }

    #[test]
    fn data_url_rejects_non_images_and_empty_uploads() {
        assert!(data_url_from_bytes(Bytes::from_static(b"x"), "text/plain").is_err());
        assert!(data_url_from_bytes(Bytes::new(), "image/png").is_err());
    }

    #[test]
    fn image_refs() {
        assert!(is_valid_image_ref("https://example.com/a.jpg"));
        assert!(is_valid_image_ref("http://example.com/a.jpg"));
        assert!(!is_valid_image_ref(""));
        assert!(!is_valid_image_ref("ftp://example.com/a.jpg"));
        assert!(!is_valid_image_ref("data:text/plain;base64,aGkh"));
    }
}
