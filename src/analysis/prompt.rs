//! Prompt composition: personas, instructions, and the exchange sent per request.

use crate::completion::Exchange;
use crate::models::AnalysisSection;

/// Instruction sent with a pull request diff.
pub const PR_REVIEW_INSTRUCTION: &str =
    "Do a complete review of the following PR diff. Suggest comments, improvements and code quality:";

/// The fixed system-role persona for a kind of analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    /// Whole-diff pull request review.
    PrReviewer,
    /// Chunked whole-repository analysis.
    CodeReviewer,
}

impl Persona {
    pub fn system_prompt(self) -> &'static str {
        match self {
            Persona::PrReviewer => {
                "You are an assistant specialized in PR code review. \
                 Your goal is to provide a complete review of the PR diff. \
                 You should suggest improvements and code quality. \
                 If you don't know what to say, just say so."
            }
            Persona::CodeReviewer => "You are a senior software engineer reviewing code.",
        }
    }
}

/// Instruction for one repository-analysis section.
pub fn section_instruction(section: AnalysisSection) -> &'static str {
    match section {
        AnalysisSection::Summary => {
            "Analyze this entire source codebase and provide a concise summary of what the application does."
        }
        AnalysisSection::UseCases => "Extract the most important use cases from the source code.",
        AnalysisSection::CodeQuality => {
            "Identify the most critical code quality issues found in the source code. Provide a brief list."
        }
        AnalysisSection::Security => {
            "Identify the most critical security vulnerabilities in the source code. Provide a brief list."
        }
        AnalysisSection::Improvements => {
            "Suggest the most important areas to improve in the application."
        }
    }
}

/// Build the exchange for one request: persona as system, `instruction\n\nbody` as user.
pub fn compose(persona: Persona, instruction: &str, body: &str) -> Exchange {
    Exchange {
        system: persona.system_prompt().to_string(),
        user: format!("{instruction}\n\n{body}"),
    }
}
