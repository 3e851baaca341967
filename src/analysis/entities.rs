//! Rule-based named entity extraction

use crate::analysis::keywords::round_to;
use crate::analysis::patterns::{
    CAPITALIZED_RUN, EMAIL, FIRST_NAMES, ISO_DATE, LOCATIONS, MONEY, MONTHS_AND_DAYS, MONTH_DATE,
    NUMERIC_DATE, ORG_PREFIXES, ORG_SUFFIXES, PERCENT, PERSON_TITLES, URL,
};
use crate::analysis::text_processor::TextProcessor;
use crate::config::AnalysisConfig;
use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

/// Words that introduce a place when they precede an unknown capitalized name
const LOCATION_CUES: &[&str] = &["in", "at", "from", "near", "across", "to"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_group: String,
    pub word: String,
    /// Confidence of the rule that produced the entity, 3 decimals
    pub score: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityGroup {
    Person,
    Organization,
    Location,
    Misc,
    Date,
    Money,
    Percent,
    Email,
    Url,
}

impl EntityGroup {
    pub fn label(&self) -> &'static str {
        match self {
            EntityGroup::Person => "PER",
            EntityGroup::Organization => "ORG",
            EntityGroup::Location => "LOC",
            EntityGroup::Misc => "MISC",
            EntityGroup::Date => "DATE",
            EntityGroup::Money => "MONEY",
            EntityGroup::Percent => "PERCENT",
            EntityGroup::Email => "EMAIL",
            EntityGroup::Url => "URL",
        }
    }
}

struct Mention {
    group: EntityGroup,
    word: String,
    score: f64,
}

pub struct EntityExtractor {
    max_entities: usize,
}

impl EntityExtractor {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            max_entities: config.max_entities,
        }
    }

    pub fn extract(&self, processor: &TextProcessor, text: &str) -> Result<Vec<Entity>> {
        let text = processor.clean_text(text);
        let mut mentions = Vec::new();
        let mut covered: Vec<Range<usize>> = Vec::new();

        let pattern_rules: [(&Regex, EntityGroup, f64); 7] = [
            (&*EMAIL, EntityGroup::Email, 0.99),
            (&*URL, EntityGroup::Url, 0.98),
            (&*MONEY, EntityGroup::Money, 0.95),
            (&*PERCENT, EntityGroup::Percent, 0.95),
            (&*ISO_DATE, EntityGroup::Date, 0.95),
            (&*MONTH_DATE, EntityGroup::Date, 0.92),
            (&*NUMERIC_DATE, EntityGroup::Date, 0.85),
        ];

        for (pattern, group, score) in pattern_rules {
            for m in pattern.find_iter(&text) {
                if overlaps(&covered, &m.range()) {
                    continue;
                }
                covered.push(m.range());
                mentions.push(Mention {
                    group,
                    word: m.as_str().trim().to_string(),
                    score,
                });
            }
        }

        for m in CAPITALIZED_RUN.find_iter(&text) {
            if overlaps(&covered, &m.range()) {
                continue;
            }

            let before = &text[..m.start()];
            let previous = before.split_whitespace().last().map(str::to_lowercase);
            let sentence_start = before
                .trim_end()
                .chars()
                .last()
                .map_or(true, |c| matches!(c, '.' | '!' | '?' | ':' | ';'));

            if let Some(mention) = classify_run(processor, m.as_str(), previous.as_deref(), sentence_start) {
                mentions.push(mention);
            }
        }

        Ok(self.aggregate(mentions))
    }

    /// Group repeated mentions, keeping the best score
    fn aggregate(&self, mentions: Vec<Mention>) -> Vec<Entity> {
        let mut grouped: HashMap<(EntityGroup, String), (usize, f64)> = HashMap::new();
        for mention in mentions {
            let entry = grouped.entry((mention.group, mention.word)).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 = entry.1.max(mention.score);
        }

        let mut entities: Vec<Entity> = grouped
            .into_iter()
            .map(|((group, word), (count, score))| Entity {
                entity_group: group.label().to_string(),
                word,
                score: round_to(score, 3),
                count,
            })
            .collect();

        entities.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| b.score.total_cmp(&a.score))
                .then_with(|| a.word.cmp(&b.word))
        });
        entities.truncate(self.max_entities);
        entities
    }
}

fn overlaps(covered: &[Range<usize>], range: &Range<usize>) -> bool {
    covered
        .iter()
        .any(|c| c.start < range.end && range.start < c.end)
}

fn classify_run(
    processor: &TextProcessor,
    run: &str,
    previous: Option<&str>,
    sentence_start: bool,
) -> Option<Mention> {
    let mut words: Vec<&str> = run
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c == '\'' || c == '-' || c == '&'))
        .filter(|w| !w.is_empty())
        .collect();

    let leading = words
        .iter()
        .take_while(|w| processor.is_stop_word(&w.to_lowercase()))
        .count();
    words.drain(..leading);
    let sentence_start = sentence_start && leading == 0;

    let first = words.first()?.to_lowercase();
    let last = words.last()?.to_lowercase();
    let lower = words.join(" ").to_lowercase();

    if words.iter().all(|w| MONTHS_AND_DAYS.contains(w.to_lowercase().as_str())) {
        return None;
    }

    if words.len() == 1 && (first.chars().count() < 2 || PERSON_TITLES.contains(first.as_str())) {
        return None;
    }

    let mention = |group, word: String, score| Some(Mention { group, word, score });

    if previous.map_or(false, |p| PERSON_TITLES.contains(p)) {
        return mention(EntityGroup::Person, words.join(" "), 0.9);
    }

    if words.len() > 1 && PERSON_TITLES.contains(first.as_str()) {
        return mention(EntityGroup::Person, words[1..].join(" "), 0.9);
    }

    if words.len() > 1
        && (ORG_SUFFIXES.contains(last.as_str()) || ORG_PREFIXES.contains(first.as_str()))
    {
        return mention(EntityGroup::Organization, words.join(" "), 0.9);
    }

    if LOCATIONS.contains(lower.as_str()) {
        return mention(EntityGroup::Location, words.join(" "), 0.88);
    }

    if words.len() == 1 && is_acronym(words[0]) {
        return mention(EntityGroup::Organization, words[0].to_string(), 0.6);
    }

    if (2..=3).contains(&words.len()) && FIRST_NAMES.contains(first.as_str()) {
        return mention(EntityGroup::Person, words.join(" "), 0.85);
    }

    // A lone capitalized word opening a sentence is usually just a word
    if words.len() == 1 && sentence_start {
        return None;
    }

    if words.len() <= 2 && previous.map_or(false, |p| LOCATION_CUES.contains(&p)) {
        return mention(EntityGroup::Location, words.join(" "), 0.6);
    }

    mention(EntityGroup::Misc, words.join(" "), 0.5)
}

fn is_acronym(word: &str) -> bool {
    let len = word.chars().count();
    (2..=6).contains(&len) && word.chars().all(|c| c.is_ascii_uppercase())
}
