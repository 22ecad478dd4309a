//! Deterministic offline text generator.

use async_trait::async_trait;

use crate::domain::ports::{GenerationPurpose, GenerationRequest, GeneratorError, TextGenerator};

/// Generator that derives plans and drafts directly from its inputs.
///
/// Plans split the subject into clauses; drafts restate the subject followed
/// by each evidence snippet with its citation number. Used offline and in
/// tests where reproducible traces matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }

    fn plan(subject: &str) -> String {
        subject
            .split(['?', ';', '\n'])
            .flat_map(|part| part.split(" and "))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draft(subject: &str, context: &[String]) -> String {
        if context.is_empty() {
            return String::new();
        }
        let mut lines = vec![subject.trim().to_string()];
        lines.extend(
            context
                .iter()
                .enumerate()
                .map(|(i, snippet)| format!("- {} [{}]", snippet.trim(), i + 1)),
        );
        lines.join("\n")
    }
}

#[async_trait]
impl TextGenerator for TemplateGenerator {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        Ok(match request.purpose {
            GenerationPurpose::Plan => Self::plan(&request.subject),
            GenerationPurpose::Draft => Self::draft(&request.subject, &request.context),
        })
    }
}
