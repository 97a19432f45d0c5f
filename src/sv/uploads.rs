use std::path::PathBuf;

use mime_guess::{Mime, mime};
use serde::{Deserialize, Serialize};
use tokio::fs;
use uuid::Uuid;

use crate::{config::Config, prelude::*};

/// Image subtypes accepted for upload
const IMAGE_SUBTYPES: &[&str] = &["png", "jpeg", "gif", "webp"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upload {
  pub name: String,
  pub url: String,
}

pub fn extension_for(content_type: &str) -> Option<&'static str> {
  let parsed = content_type.trim().parse::<Mime>().ok()?;
  let subtype = parsed.subtype().as_str();
  if parsed.type_() != mime::IMAGE || !IMAGE_SUBTYPES.contains(&subtype) {
    return None;
  }
  let exts = mime_guess::get_mime_extensions(&parsed)?;
  exts
    .iter()
    .find(|ext| **ext == subtype)
    .or(exts.first())
    .copied()
}

pub fn content_type_for(name: &str) -> Mime {
  mime_guess::from_path(name).first_or_octet_stream()
}

pub struct Uploads<'a> {
  config: &'a Config,
}

impl<'a> Uploads<'a> {
  pub fn new(config: &'a Config) -> Self {
    Self { config }
  }

  pub async fn store(
    &self,
    content_type: &str,
    bytes: &[u8],
  ) -> Result<Upload> {
    let ext = extension_for(content_type).ok_or_else(|| {
      Error::validation("Only png, jpeg, gif and webp images are accepted")
    })?;

    if bytes.is_empty() {
      return Err(Error::validation("Uploaded file is empty"));
    }
    if bytes.len() > self.config.max_upload_size {
      return Err(Error::validation(format!(
        "Uploaded file exceeds {} bytes",
        self.config.max_upload_size
      )));
    }

    fs::create_dir_all(&self.config.uploads_dir).await?;

    let name = format!("{}.{ext}", Uuid::new_v4().simple());
    fs::write(self.config.uploads_dir.join(&name), bytes).await?;

    let url = format!(
      "{}/uploads/{name}",
      self.config.public_url.trim_end_matches('/')
    );
    info!("Stored upload `{name}` ({} bytes)", bytes.len());

    Ok(Upload { name, url })
  }

  /// Path of a stored upload; anything that could escape the directory is
  /// treated as missing.
  pub fn resolve(&self, name: &str) -> Result<PathBuf> {
    if name.is_empty()
      || name.contains(['/', '\\'])
      || name.contains("..")
    {
      return Err(Error::NotFound("Upload"));
    }
    Ok(self.config.uploads_dir.join(name))
  }
}
