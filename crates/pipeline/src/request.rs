use copypanda_core::params::ParameterSet;
use serde::Serialize;

/// Everything needed to generate one article.
///
/// Built once per submission from the validated payload and the resolved
/// parameters; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub title: String,
    pub context: Option<String>,
    /// Body section titles in the order they must appear.
    pub sections: Vec<String>,
    pub parameters: ParameterSet,
}
