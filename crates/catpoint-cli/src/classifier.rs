//! The image classifier the binary wires into the controller.

use catpoint_core::classifier::ImageClassifier;
use rand_core::{OsRng, RngCore};
use thiserror::Error;

use crate::config::ClassifierMode;

#[derive(Debug, Error)]
pub enum ClassifierError {
  #[error("image is empty")]
  EmptyImage,

  #[error("entropy source failed: {0}")]
  Entropy(String),
}

/// Stand-in for a real vision model: either a fixed answer or a coin flip
/// drawn from the OS RNG.
#[derive(Debug, Clone, Copy)]
pub enum StubClassifier {
  Random,
  Fixed(bool),
}

impl From<ClassifierMode> for StubClassifier {
  fn from(mode: ClassifierMode) -> Self {
    match mode {
      ClassifierMode::Random => Self::Random,
      ClassifierMode::Always => Self::Fixed(true),
      ClassifierMode::Never => Self::Fixed(false),
    }
  }
}

impl ImageClassifier for StubClassifier {
  type Error = ClassifierError;

  fn classify(&self, image: &[u8], _threshold: f32) -> Result<bool, ClassifierError> {
    if image.is_empty() {
      return Err(ClassifierError::EmptyImage);
    }

    match self {
      Self::Fixed(answer) => Ok(*answer),
      Self::Random => {
        let mut byte = [0u8; 1];
        OsRng
          .try_fill_bytes(&mut byte)
          .map_err(|e| ClassifierError::Entropy(e.to_string()))?;
        Ok(byte[0] & 1 == 1)
      }
    }
  }
}
