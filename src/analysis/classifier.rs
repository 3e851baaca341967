//! Rule-based document type classification

use crate::analysis::keywords::round_to;
use crate::config::AnalysisConfig;
use crate::error::{AnalyzerError, Result};
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};

pub const GENERAL_DOCUMENT: &str = "General Document";
const MAX_ALTERNATIVES: usize = 2;

/// Category name and the cue phrases that vote for it
const CATEGORIES: &[(&str, &[&str])] = &[
    ("Legal Document", &[
        "agreement", "contract", "hereby", "whereas", "party", "parties", "plaintiff",
        "defendant", "court", "jurisdiction", "clause", "liability", "indemnify",
        "indemnification", "governing law", "terms and conditions", "breach",
        "arbitration", "herein", "thereof", "statute", "attorney", "witnesseth",
        "covenant", "confidentiality", "termination",
    ]),
    ("Financial Report", &[
        "revenue", "profit", "earnings", "balance sheet", "cash flow", "fiscal",
        "quarter", "net income", "assets", "liabilities", "equity", "dividend",
        "ebitda", "operating income", "financial statements", "shareholders",
        "investment", "expenses", "gross margin", "audit",
    ]),
    ("Academic Paper", &[
        "abstract", "introduction", "methodology", "hypothesis", "literature review",
        "results", "discussion", "conclusion", "references", "et al", "experiment",
        "participants", "journal", "study", "findings", "research", "theoretical",
        "empirical", "citation", "university",
    ]),
    ("Medical Record", &[
        "patient", "diagnosis", "treatment", "symptoms", "prescription", "medication",
        "dosage", "clinical", "physician", "hospital", "medical history",
        "blood pressure", "allergies", "therapy", "prognosis", "surgery",
        "examination", "mg", "chronic", "nurse",
    ]),
    ("Technical Documentation", &[
        "installation", "configuration", "api", "endpoint", "parameter", "function",
        "server", "database", "install", "deploy", "documentation", "version",
        "interface", "module", "command", "specification", "architecture", "software",
        "hardware", "protocol",
    ]),
    ("Resume/CV", &[
        "experience", "education", "skills", "curriculum vitae", "resume",
        "employment history", "bachelor", "master's", "certifications", "proficient",
        "responsibilities", "achievements", "objective", "gpa", "internship",
        "volunteer", "linkedin", "work history", "professional summary",
    ]),
    ("Business Proposal", &[
        "proposal", "executive summary", "scope of work", "deliverables", "timeline",
        "budget", "stakeholders", "objectives", "milestones", "pricing", "roi",
        "implementation plan", "value proposition", "client", "solution", "strategy",
        "market analysis", "competitive", "recommendation", "next steps",
    ]),
    ("News Article", &[
        "reported", "according to", "said", "sources", "press release", "breaking",
        "journalist", "spokesperson", "announced", "officials", "yesterday",
        "interview", "reuters", "associated press", "headline", "correspondent",
        "statement", "told reporters", "news", "editor",
    ]),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub document_type: String,
    /// Share of all cue hits won by the chosen type, 3 decimals
    pub confidence: f64,
    pub alternatives: Vec<ClassificationScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationScore {
    pub document_type: String,
    pub confidence: f64,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            document_type: "Unknown".to_string(),
            confidence: 0.0,
            alternatives: Vec::new(),
        }
    }
}

pub struct DocumentClassifier {
    matcher: AhoCorasick,
    /// Category index for each matcher pattern
    pattern_categories: Vec<usize>,
    min_hits: usize,
}

impl DocumentClassifier {
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        let mut patterns = Vec::new();
        let mut pattern_categories = Vec::new();

        for (index, (_, cues)) in CATEGORIES.iter().enumerate() {
            for cue in cues.iter() {
                patterns.push(*cue);
                pattern_categories.push(index);
            }
        }

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)
            .map_err(|e| AnalyzerError::TextProcessing(format!("Failed to build classifier: {}", e)))?;

        Ok(Self {
            matcher,
            pattern_categories,
            min_hits: config.min_classification_hits.max(1),
        })
    }

    pub fn classify(&self, text: &str) -> Result<Classification> {
        let hits = self.count_hits(text);
        let total: usize = hits.iter().sum();

        let mut ranked: Vec<(usize, usize)> = hits
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, count)| *count > 0)
            .collect();
        // Most hits first; list order breaks ties
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let confidence_of = |count: usize| round_to(count as f64 / total as f64, 3);

        match ranked.first() {
            Some(&(best, count)) if count >= self.min_hits => Ok(Classification {
                document_type: CATEGORIES[best].0.to_string(),
                confidence: confidence_of(count),
                alternatives: ranked
                    .iter()
                    .skip(1)
                    .take(MAX_ALTERNATIVES)
                    .map(|&(index, count)| ClassificationScore {
                        document_type: CATEGORIES[index].0.to_string(),
                        confidence: confidence_of(count),
                    })
                    .collect(),
            }),
            _ => Ok(Classification {
                document_type: GENERAL_DOCUMENT.to_string(),
                confidence: 0.0,
                alternatives: Vec::new(),
            }),
        }
    }

    /// Whole-word cue hits per category
    fn count_hits(&self, text: &str) -> Vec<usize> {
        let mut hits = vec![0usize; CATEGORIES.len()];
        let bytes = text.as_bytes();

        for mat in self.matcher.find_iter(text) {
            let before_ok = mat.start() == 0 || !is_word_byte(bytes[mat.start() - 1]);
            let after_ok = mat.end() == bytes.len() || !is_word_byte(bytes[mat.end()]);

            if before_ok && after_ok {
                hits[self.pattern_categories[mat.pattern().as_usize()]] += 1;
            }
        }

        hits
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}
