//! Form bodies: urlencoded and multipart.

#[cfg(feature = "multipart")]
use axum::extract::Multipart;

use crate::error::Result;
#[cfg(feature = "multipart")]
use crate::error::TypesError;
#[cfg(feature = "multipart")]
use crate::schema::FileBlob;
use crate::schema::Value;

/// Parse an `application/x-www-form-urlencoded` body
///
/// Same rules as [`parse_query`](super::parse_query).
pub fn parse_form(body: &[u8]) -> Result<Value> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;

    let mut object = std::collections::BTreeMap::new();
    for (name, value) in pairs {
        super::insert_repeated(&mut object, name, Value::String(value));
    }
    Ok(Value::Object(object))
}

/// Read a multipart body into an object of strings and files
///
/// Parts with a file name become [`Value::File`], the rest are read as text.
/// Several parts under one name collect into an array, so a `Files` schema
/// sees one blob or a list depending on what the client sent.
#[cfg(feature = "multipart")]
pub async fn read_multipart(mut multipart: Multipart) -> Result<Value> {
    let mut object = std::collections::BTreeMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| TypesError::multipart(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            tracing::debug!("Skipping multipart field without a name");
            continue;
        };

        let value = match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| TypesError::multipart(e.to_string()))?;
                Value::File(FileBlob::from_bytes(content_type, data).with_name(file_name))
            }
            None => Value::String(
                field
                    .text()
                    .await
                    .map_err(|e| TypesError::multipart(e.to_string()))?,
            ),
        };

        super::insert_repeated(&mut object, name, value);
    }

    Ok(Value::Object(object))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form() {
        let form = parse_form(b"remember=true&age=36&tag=a&tag=b").unwrap();
        assert_eq!(form.get("remember"), Some(&Value::from("true")));
        assert_eq!(form.get("age"), Some(&Value::from("36")));
        assert_eq!(form.get("tag"), Some(&Value::Array(vec!["a".into(), "b".into()])));
    }

    #[cfg(feature = "multipart")]
    mod multipart {
        use super::*;
        use axum::body::Body;
        use axum::extract::FromRequest;
        use axum::http::{Request, header};

        const BOUNDARY: &str = "X-TIDEWAY-BOUNDARY";

        async fn multipart(body: String) -> Multipart {
            let request = Request::builder()
                .method("POST")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap();
            Multipart::from_request(request, &()).await.unwrap()
        }

        fn text_part(name: &str, value: &str) -> String {
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
        }

        fn file_part(name: &str, file_name: &str, content_type: &str, data: &str) -> String {
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n{}\r\n",
                BOUNDARY, name, file_name, content_type, data
            )
        }

        #[tokio::test]
        async fn test_fields_and_files() {
            let body = [
                text_part("title", "holiday"),
                file_part("photo", "a.png", "image/png", "PNGDATA"),
                format!("--{}--\r\n", BOUNDARY),
            ]
            .concat();

            let value = read_multipart(multipart(body).await).await.unwrap();
            assert_eq!(value.get("title"), Some(&Value::from("holiday")));

            let Some(Value::File(photo)) = value.get("photo") else {
                panic!("photo should be a file");
            };
            assert_eq!(photo.name.as_deref(), Some("a.png"));
            assert_eq!(photo.content_type, "image/png");
            assert_eq!(photo.size, 7);
        }

        #[tokio::test]
        async fn test_repeated_files_collect() {
            let body = [
                file_part("photos", "a.png", "image/png", "A"),
                file_part("photos", "b.jpg", "image/jpeg", "BB"),
                format!("--{}--\r\n", BOUNDARY),
            ]
            .concat();

            let value = read_multipart(multipart(body).await).await.unwrap();
            let Some(Value::Array(photos)) = value.get("photos") else {
                panic!("photos should be a list");
            };
            assert_eq!(photos.len(), 2);
        }
    }
}
