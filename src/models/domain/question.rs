use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    #[serde(alias = "question")]
    pub prompt: String,
    pub options: IndexMap<String, String>, // key -> text, in presentation order
    #[serde(alias = "answer")]
    pub correct_answer: String, // comma-joined keys for multi-select
    #[serde(default)]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<ExamDomain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// Correct option keys, split on `,` and trimmed.
    pub fn correct_answer_keys(&self) -> Vec<String> {
        self.correct_answer
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn option_text(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    #[default]
    SingleChoice,
    MultipleChoice,
    TrueFalse,
    Matching,
    DragDrop,
    CaseStudy,
}

impl QuestionType {
    pub fn is_multi_select(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice)
    }
}

/// AZ-900 skill areas. Weights are informational and sum to 100.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamDomain {
    CloudConcepts,
    CoreAzureServices,
    CoreSolutions,
    SecurityAndNetworking,
    IdentityGovernanceCompliance,
    CostManagementAndSlas,
}

impl ExamDomain {
    pub const ALL: [ExamDomain; 6] = [
        ExamDomain::CloudConcepts,
        ExamDomain::CoreAzureServices,
        ExamDomain::CoreSolutions,
        ExamDomain::SecurityAndNetworking,
        ExamDomain::IdentityGovernanceCompliance,
        ExamDomain::CostManagementAndSlas,
    ];

    pub fn weight(&self) -> u32 {
        match self {
            ExamDomain::CloudConcepts => 20,
            ExamDomain::CoreAzureServices => 20,
            ExamDomain::CoreSolutions => 15,
            ExamDomain::SecurityAndNetworking => 15,
            ExamDomain::IdentityGovernanceCompliance => 20,
            ExamDomain::CostManagementAndSlas => 10,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExamDomain::CloudConcepts => "Cloud concepts",
            ExamDomain::CoreAzureServices => "Core Azure services",
            ExamDomain::CoreSolutions => "Core solutions and management tools",
            ExamDomain::SecurityAndNetworking => "General security and network security",
            ExamDomain::IdentityGovernanceCompliance => {
                "Identity, governance, privacy and compliance"
            }
            ExamDomain::CostManagementAndSlas => "Cost management and service level agreements",
        }
    }
}
