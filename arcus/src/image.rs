use crate::error::ImageParseError;
use derive_more::Display;
use std::str::FromStr;

pub const DEFAULT_TAG: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{name}:{tag}")]
pub struct ImageName {
  pub name: String,
  pub tag: String,
}

impl ImageName {
  pub fn new(
    name: impl Into<String>,
    tag: impl Into<String>,
  ) -> ImageName {
    ImageName { name: name.into(), tag: tag.into() }
  }
}

/// `name[:tag]`, a colon inside the registry part (`localhost:5000/arcus`) isn't a tag.
/// Digest references (`name@sha256:...`) aren't supported
impl FromStr for ImageName {
  type Err = ImageParseError;

  fn from_str(s: &str) -> Result<ImageName, ImageParseError> {
    let invalid = || ImageParseError(s.to_string());
    if s.is_empty() || s.contains('@') || s.ends_with(':') || s.ends_with('/') {
      return Err(invalid());
    }

    let (name, tag) = match s.rsplit_once(':') {
      Some((name, tag)) if !tag.contains('/') => (name, tag),
      _ => (s, DEFAULT_TAG),
    };
    if name.is_empty() {
      return Err(invalid());
    }
    Ok(ImageName::new(name, tag))
  }
}
