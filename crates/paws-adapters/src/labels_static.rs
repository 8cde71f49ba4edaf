//! Offline label-source adapter.
//!
//! Stands in for the remote classifier when no backend is reachable: either
//! a fixed label list, or labels read from the image file name
//! (`golden_retriever-dog.jpg` yields `["golden retriever dog"]`).

use paws_core::{
    error::ApiError,
    ports::LabelSourcePort,
    types::{ImagePayload, LabelAnalysis, LabelSet},
};

#[derive(Debug, Clone)]
enum Mode {
    Fixed(LabelSet),
    FileName,
}

/// Label source that never touches the network.
#[derive(Debug, Clone)]
pub struct StaticLabelSource {
    mode: Mode,
}

impl StaticLabelSource {
    /// Always answer with `labels`.
    #[must_use]
    pub fn fixed(labels: LabelSet) -> Self {
        Self { mode: Mode::Fixed(labels) }
    }

    /// Derive a single label from the image file stem.
    #[must_use]
    pub fn from_file_name() -> Self {
        Self { mode: Mode::FileName }
    }
}

fn label_from_file_name(file_name: &str) -> Option<String> {
    let stem = file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem);
    let words: Vec<&str> =
        stem.split(|c: char| c == '_' || c == '-' || c.is_whitespace()).filter(|w| !w.is_empty()).collect();
    (!words.is_empty()).then(|| words.join(" "))
}

#[async_trait::async_trait]
impl LabelSourcePort for StaticLabelSource {
    async fn analyze(&self, image: &ImagePayload) -> Result<LabelAnalysis, ApiError> {
        let labels = match &self.mode {
            Mode::Fixed(labels) => labels.clone(),
            Mode::FileName => label_from_file_name(&image.file_name).into_iter().collect(),
        };
        Ok(LabelAnalysis { image_url: None, labels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_labels_ignore_image() {
        let source = StaticLabelSource::fixed(vec!["Dog".into(), "Beagle".into()]);
        let analysis = source.analyze(&ImagePayload::jpeg(vec![])).await.unwrap();
        assert_eq!(analysis.labels, ["Dog", "Beagle"]);
        assert!(analysis.image_url.is_none());
    }

    #[tokio::test]
    async fn file_name_becomes_label() {
        let source = StaticLabelSource::from_file_name();
        let image = ImagePayload {
            file_name: "golden_retriever-dog.jpg".into(),
            ..ImagePayload::jpeg(vec![])
        };
        let analysis = source.analyze(&image).await.unwrap();
        assert_eq!(analysis.labels, ["golden retriever dog"]);
    }

    #[test]
    fn blank_file_name_yields_no_label() {
        assert_eq!(label_from_file_name(".jpg"), None);
        assert_eq!(label_from_file_name("cat"), Some("cat".into()));
    }
}
