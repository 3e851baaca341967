//! Readability formulas over sentence, word and syllable counts

use crate::analysis::keywords::round_to;
use crate::analysis::text_processor::TextProcessor;
use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readability {
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub gunning_fog: f64,
    pub smog_index: f64,
    pub coleman_liau_index: f64,
    pub automated_readability_index: f64,
    pub reading_level: String,
}

impl Readability {
    pub fn unknown() -> Self {
        Self {
            flesch_reading_ease: 0.0,
            flesch_kincaid_grade: 0.0,
            gunning_fog: 0.0,
            smog_index: 0.0,
            coleman_liau_index: 0.0,
            automated_readability_index: 0.0,
            reading_level: "Unknown".to_string(),
        }
    }
}

/// Raw counts the formulas are built from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextCounts {
    pub sentences: usize,
    pub words: usize,
    pub syllables: usize,
    pub letters: usize,
    /// Words with three or more syllables
    pub polysyllables: usize,
}

impl TextCounts {
    pub fn from_text(processor: &TextProcessor, text: &str) -> Self {
        let cleaned = processor.clean_text(text);
        let words = processor.words(&cleaned);

        let mut counts = TextCounts {
            sentences: processor.split_sentences(&cleaned).len(),
            words: words.len(),
            ..Default::default()
        };

        for word in words {
            let syllables = count_syllables(word);
            counts.syllables += syllables;
            counts.letters += word.chars().filter(|c| c.is_alphanumeric()).count();
            if syllables >= 3 {
                counts.polysyllables += 1;
            }
        }

        counts
    }
}

pub fn analyze(processor: &TextProcessor, text: &str) -> Result<Readability> {
    let counts = TextCounts::from_text(processor, text);
    if counts.words == 0 || counts.sentences == 0 {
        return Err(AnalyzerError::TextProcessing(
            "Readability needs at least one sentence".to_string(),
        ));
    }

    let words = counts.words as f64;
    let sentences = counts.sentences as f64;
    let words_per_sentence = words / sentences;
    let syllables_per_word = counts.syllables as f64 / words;
    let letters_per_word = counts.letters as f64 / words;

    let flesch_reading_ease = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    let flesch_kincaid_grade = 0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59;
    let gunning_fog = 0.4 * (words_per_sentence + 100.0 * counts.polysyllables as f64 / words);
    let smog_index = 1.043 * (counts.polysyllables as f64 * 30.0 / sentences).sqrt() + 3.1291;
    let coleman_liau_index =
        0.0588 * (letters_per_word * 100.0) - 0.296 * (sentences / words * 100.0) - 15.8;
    let automated_readability_index = 4.71 * letters_per_word + 0.5 * words_per_sentence - 21.43;

    Ok(Readability {
        flesch_reading_ease: round_to(flesch_reading_ease, 2),
        flesch_kincaid_grade: round_to(flesch_kincaid_grade, 2),
        gunning_fog: round_to(gunning_fog, 2),
        smog_index: round_to(smog_index, 2),
        coleman_liau_index: round_to(coleman_liau_index, 2),
        automated_readability_index: round_to(automated_readability_index, 2),
        reading_level: reading_level(flesch_reading_ease).to_string(),
    })
}

/// Flesch reading ease bands
pub fn reading_level(ease: f64) -> &'static str {
    match ease {
        e if e >= 90.0 => "Very Easy",
        e if e >= 80.0 => "Easy",
        e if e >= 70.0 => "Fairly Easy",
        e if e >= 60.0 => "Standard",
        e if e >= 50.0 => "Fairly Difficult",
        e if e >= 30.0 => "Difficult",
        _ => "Very Confusing",
    }
}

/// Vowel-group syllable estimate with silent-e handling; never below one
pub fn count_syllables(word: &str) -> usize {
    let word: Vec<char> = word
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect();

    if word.is_empty() {
        return 0;
    }
    if word.len() <= 3 {
        return 1;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut syllables: usize = 0;
    let mut previous_vowel = false;
    for &c in &word {
        let vowel = is_vowel(c);
        if vowel && !previous_vowel {
            syllables += 1;
        }
        previous_vowel = vowel;
    }

    let n = word.len();
    let ends_with = |suffix: &str| {
        let suffix: Vec<char> = suffix.chars().collect();
        n >= suffix.len() && word[n - suffix.len()..] == suffix[..]
    };

    // Silent trailing "e", except "-le" after a consonant (ta-ble)
    if ends_with("e") && !ends_with("ee") {
        let consonant_le = ends_with("le") && n >= 3 && !is_vowel(word[n - 3]);
        if !consonant_le {
            syllables = syllables.saturating_sub(1);
        }
    }
    if ends_with("es") || ends_with("ed") {
        let stem_end = word[n - 3];
        if !matches!(stem_end, 't' | 'd' | 's' | 'x' | 'z' | 'c' | 'g') && !is_vowel(stem_end) {
            syllables = syllables.saturating_sub(1);
        }
    }

    syllables.max(1)
}
