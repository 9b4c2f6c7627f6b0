//! Error types for `catpoint-core`.

use thiserror::Error;

/// An error raised while the controller talks to one of its collaborators.
///
/// The controller has no failure modes of its own; both variants carry the
/// collaborator's error unchanged as their source.
#[derive(Debug, Error)]
pub enum Error {
  #[error("repository error: {0}")]
  Repository(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("image classifier error: {0}")]
  Classifier(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn repository<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Repository(Box::new(e))
  }

  pub(crate) fn classifier<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Classifier(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
