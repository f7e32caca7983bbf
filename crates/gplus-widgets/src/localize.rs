//! Image URL localization
//!
//! Walks a fetched payload and swaps known image URL fields for mirrored
//! local paths. Absent fields mean "nothing to do"; failed results pass
//! through untouched.

use crate::fetcher::FetchResult;
use remote_file_mirror::FileMirror;
use serde_json::Value;

/// Request the larger profile image rendition before mirroring.
fn enlarge_profile_image(url: &str) -> String {
    url.replace("sz=50", "sz=100")
}

/// Rewrite the known image URL fields of a payload in place:
/// the profile image (enlarged first), the profile cover photo, and
/// every feed attachment image.
pub async fn localize(mirror: &FileMirror, result: &mut FetchResult) {
    let FetchResult::Payload(record) = result else {
        return;
    };

    if let Some(url) = record
        .pointer("/image/url")
        .and_then(Value::as_str)
        .map(str::to_string)
    {
        let local = mirror.mirror(&enlarge_profile_image(&url)).await;
        record["image"]["url"] = Value::String(local);
    }

    if let Some(url) = record
        .pointer("/cover/coverPhoto/url")
        .and_then(Value::as_str)
        .map(str::to_string)
    {
        let local = mirror.mirror(&url).await;
        record["cover"]["coverPhoto"]["url"] = Value::String(local);
    }

    if let Some(items) = record.get_mut("items").and_then(Value::as_array_mut) {
        for item in items {
            let Some(attachments) = item
                .pointer_mut("/object/attachments")
                .and_then(Value::as_array_mut)
            else {
                continue;
            };
            for attachment in attachments {
                let Some(url) = attachment
                    .pointer("/image/url")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                else {
                    continue;
                };
                let local = mirror.mirror(&url).await;
                attachment["image"]["url"] = Value::String(local);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;
    use axum::routing::get;
    use axum::Router;
    use chrono::Utc;
    use serde_json::json;
    use sha1::{Digest, Sha1};
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR fake image body";

    /// Serve PNG bytes on every path, recording request URIs.
    async fn spawn_image_stub(seen: Arc<Mutex<Vec<String>>>) -> String {
        let app = Router::new().route(
            "/{*path}",
            get(move |uri: Uri| {
                let seen = seen.clone();
                async move {
                    seen.lock().unwrap().push(uri.to_string());
                    PNG.to_vec()
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn mirror_in(dir: &std::path::Path) -> FileMirror {
        FileMirror::new(dir.to_path_buf(), "googleplus", 3600, Utc::now())
    }

    fn sha1_of(url: &str) -> String {
        hex::encode(Sha1::digest(url.as_bytes()))
    }

    #[test]
    fn test_enlarge_profile_image() {
        assert_eq!(
            enlarge_profile_image("https://example.com/photo.jpg?sz=50"),
            "https://example.com/photo.jpg?sz=100"
        );
        // No size parameter, nothing to rewrite
        assert_eq!(
            enlarge_profile_image("https://example.com/photo.jpg"),
            "https://example.com/photo.jpg"
        );
    }

    #[tokio::test]
    async fn test_localize_ignores_failed_results() {
        let dir = tempdir().unwrap();
        let mirror = mirror_in(dir.path());
        let mut result = FetchResult::NotConfigured("set a key".to_string());

        localize(&mirror, &mut result).await;

        assert_eq!(result, FetchResult::NotConfigured("set a key".to_string()));
    }

    #[tokio::test]
    async fn test_localize_is_a_noop_without_image_fields() {
        let dir = tempdir().unwrap();
        let mirror = mirror_in(dir.path());
        let record = json!({"displayName": "Jane", "kind": "plus#person"});
        let mut result = FetchResult::Payload(record.clone());

        localize(&mirror, &mut result).await;

        assert_eq!(result, FetchResult::Payload(record));
    }

    #[tokio::test]
    async fn test_localize_enlarges_and_mirrors_profile_image() {
        let dir = tempdir().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_image_stub(seen.clone()).await;
        let mirror = mirror_in(dir.path());

        let url = format!("{}/photo.jpg?sz=50", base);
        let mut result = FetchResult::Payload(json!({"image": {"url": url}}));

        localize(&mirror, &mut result).await;

        let FetchResult::Payload(record) = result else {
            panic!("expected Payload");
        };
        let enlarged = format!("{}/photo.jpg?sz=100", base);
        assert_eq!(
            record["image"]["url"],
            format!("/googleplus/{}.png", sha1_of(&enlarged))
        );
        assert_eq!(seen.lock().unwrap().as_slice(), ["/photo.jpg?sz=100"]);
    }

    #[tokio::test]
    async fn test_localize_mirrors_cover_photo_as_is() {
        let dir = tempdir().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_image_stub(seen.clone()).await;
        let mirror = mirror_in(dir.path());

        let url = format!("{}/cover.png", base);
        let mut result =
            FetchResult::Payload(json!({"cover": {"coverPhoto": {"url": url}}}));

        localize(&mirror, &mut result).await;

        let FetchResult::Payload(record) = result else {
            panic!("expected Payload");
        };
        assert_eq!(
            record["cover"]["coverPhoto"]["url"],
            format!("/googleplus/{}.png", sha1_of(&url))
        );
    }

    #[tokio::test]
    async fn test_localize_mirrors_feed_attachment_images() {
        let dir = tempdir().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_image_stub(seen.clone()).await;
        let mirror = mirror_in(dir.path());

        let url = format!("{}/img.png", base);
        let mut result = FetchResult::Payload(json!({
            "items": [
                // No attachments at all, must be tolerated
                {"title": "plain post", "object": {}},
                {
                    "title": "post with image",
                    "object": {"attachments": [
                        {"image": {"url": url}},
                        // Attachment without an image, also tolerated
                        {"objectType": "article"}
                    ]}
                }
            ]
        }));

        localize(&mirror, &mut result).await;

        let FetchResult::Payload(record) = result else {
            panic!("expected Payload");
        };
        assert_eq!(
            record["items"][1]["object"]["attachments"][0]["image"]["url"],
            format!("/googleplus/{}.png", sha1_of(&url))
        );
        assert_eq!(record["items"][0]["title"], "plain post");
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
