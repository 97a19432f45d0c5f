use std::sync::Arc;

use axum::{
  Json,
  body::Body,
  extract::{Multipart, Path, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use tokio_util::io::ReaderStream;

use super::Admin;
use crate::{
  prelude::*,
  state::AppState,
  sv::uploads::{Upload, content_type_for},
};

/// Multipart field carrying the image
const FIELD: &str = "image";

pub async fn upload(
  State(app): State<Arc<AppState>>,
  _: Admin,
  mut multipart: Multipart,
) -> Result<(StatusCode, Json<Upload>)> {
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|err| Error::validation(err.body_text()))?
  {
    if field.name() != Some(FIELD) {
      continue;
    }

    let content_type = field.content_type().unwrap_or_default().to_string();
    let bytes =
      field.bytes().await.map_err(|err| Error::validation(err.body_text()))?;

    let upload = app.sv().uploads.store(&content_type, &bytes).await?;
    return Ok((StatusCode::CREATED, Json(upload)));
  }

  Err(Error::validation(format!("Missing `{FIELD}` file field")))
}

pub async fn serve(
  State(app): State<Arc<AppState>>,
  Path(name): Path<String>,
) -> Result<impl IntoResponse> {
  let path = app.sv().uploads.resolve(&name)?;

  let file = match tokio::fs::File::open(&path).await {
    Ok(file) => file,
    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
      return Err(Error::NotFound("Upload"));
    }
    Err(err) => return Err(err.into()),
  };

  let headers = [
    (header::CONTENT_TYPE, content_type_for(&name).to_string()),
    (
      header::CACHE_CONTROL,
      String::from("public, max-age=31536000, immutable"),
    ),
  ];

  Ok((headers, Body::from_stream(ReaderStream::new(file))))
}
