use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use bytes::Bytes;

use common::catalog::BookDraft;

use crate::http_server::api::extract::AdminUser;
use crate::http_server::api::ApiError;
use crate::images::image_url;
use crate::ServiceState;

/// A cover image as received in the form
#[derive(Debug)]
struct Upload {
    file_name: Option<String>,
    content_type: String,
    data: Bytes,
}

/// Multipart form fields: `title`, `author`, `description` and the
///  `image` file
#[derive(Debug, Default)]
struct BookForm {
    title: String,
    author: String,
    description: String,
    image: Option<Upload>,
}

impl BookForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, ApiError> {
        let mut form = BookForm::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => form.title = field.text().await.map_err(bad_form)?,
                "author" => form.author = field.text().await.map_err(bad_form)?,
                "description" => form.description = field.text().await.map_err(bad_form)?,
                "image" => form.image = read_upload(field).await?,
                other => tracing::debug!(field = other, "ignoring unknown form field"),
            }
        }

        Ok(form)
    }
}

async fn read_upload(field: Field<'_>) -> Result<Option<Upload>, ApiError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field
        .content_type()
        .map(str::to_string)
        .or_else(|| {
            file_name
                .as_deref()
                .and_then(|name| mime_guess::from_path(name).first())
                .map(|mime| mime.to_string())
        })
        .unwrap_or_default();
    let data = field.bytes().await.map_err(bad_form)?;

    // browsers send an empty part when no file was picked
    if data.is_empty() {
        return Ok(None);
    }

    Ok(Some(Upload {
        file_name,
        content_type,
        data,
    }))
}

fn bad_form(err: MultipartError) -> ApiError {
    ApiError::BadRequest(err.body_text())
}

pub async fn handler(
    State(state): State<ServiceState>,
    AdminUser(admin): AdminUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = BookForm::read(&mut multipart).await?;
    let Some(upload) = form.image else {
        return Err(ApiError::BadRequest("Book image is required".to_string()));
    };

    let key = state
        .images()
        .put_cover(upload.file_name.as_deref(), &upload.content_type, upload.data)
        .await?;

    let draft = BookDraft {
        title: form.title,
        author: form.author,
        description: form.description,
        image: image_url(state.public_url(), &key),
    };

    match state.catalog().create_book(&admin, draft).await {
        Ok(book) => Ok((http::StatusCode::CREATED, Json(book))),
        Err(err) => {
            // the cover is useless without its book
            if let Err(e) = state.images().delete(&key).await {
                tracing::warn!(key = %key, error = %e, "failed to remove orphaned cover");
            }
            Err(err.into())
        }
    }
}
