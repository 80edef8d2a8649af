//! Loading answer sets and patient records from disk

use cape_diagnostics::{CapeError, Result, CAPE0401};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Serialization format of an input document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.json` files are JSON; everything else is read as YAML
    pub fn from_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json { Self::Json } else { Self::Yaml }
    }

    pub fn parse<T: DeserializeOwned>(self, source: &str) -> std::result::Result<T, String> {
        match self {
            Self::Json => serde_json::from_str(source).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(source).map_err(|e| e.to_string()),
        }
    }
}

/// Read and deserialize a JSON or YAML document
pub fn load_document<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .map_err(|e| CapeError::system(CAPE0401, format!("cannot read {}: {e}", path.display())))?;
    let format = DocumentFormat::from_path(path);
    log::debug!("loading {} as {format:?}", path.display());
    format
        .parse(&source)
        .map_err(|e| CapeError::system(CAPE0401, format!("cannot parse {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cape_rules::AnswerContext;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("a.json", DocumentFormat::Json)]
    #[case("a.JSON", DocumentFormat::Json)]
    #[case("a.yml", DocumentFormat::Yaml)]
    #[case("a.yaml", DocumentFormat::Yaml)]
    #[case("answers", DocumentFormat::Yaml)]
    #[case("dir.json/answers", DocumentFormat::Yaml)]
    fn test_format_from_extension(#[case] path: &str, #[case] expected: DocumentFormat) {
        assert_eq!(DocumentFormat::from_path(Path::new(path)), expected);
    }

    #[test]
    fn test_load_yaml_answers() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "pci_lt_1m: \"yes\"\nhigh_bleeding_risk_ncs: \"no\"").unwrap();

        let answers: AnswerContext = load_document(file.path()).unwrap();
        assert_eq!(answers.len(), 2);
        assert!(answers.get("pci_lt_1m").unwrap().matches_text("yes"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_document::<AnswerContext>("/nonexistent/answers.json").unwrap_err();
        assert_eq!(err.code(), CAPE0401);
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_document::<AnswerContext>(file.path()).unwrap_err();
        assert!(err.to_string().contains("cannot parse"));
    }
}
