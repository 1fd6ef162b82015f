//! Image upload endpoint.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::instrument;

use super::{ApiClient, ApiError, ApiToken};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

impl ApiClient {
    /// Upload one image and return its public URL.
    ///
    /// The file travels as multipart field `image`.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected or the API request fails.
    #[instrument(skip(self, token, bytes), fields(size = bytes.len()))]
    pub async fn upload_image(
        &self,
        token: &ApiToken,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("image", part);

        let request = self
            .request(Method::POST, "upload", &[], Some(token))?
            .multipart(form);
        let response: UploadResponse = self
            .execute(request, "Upload failed. Please try again.")
            .await?;
        Ok(response.url)
    }
}
