//! The `ImageClassifier` trait.

/// Decides whether an image shows the trigger subject (a cat).
///
/// Calls are blocking; the controller waits for the answer.
pub trait ImageClassifier {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return `true` if `image` contains a cat with at least
  /// `confidence_threshold` percent confidence.
  fn classify(
    &self,
    image: &[u8],
    confidence_threshold: f32,
  ) -> Result<bool, Self::Error>;
}

/// A classifier that always gives the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClassifier(pub bool);

impl ImageClassifier for FixedClassifier {
  type Error = std::convert::Infallible;

  fn classify(&self, _image: &[u8], _threshold: f32) -> Result<bool, Self::Error> {
    Ok(self.0)
  }
}
