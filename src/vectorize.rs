//! Term-document matrix construction with English stopword removal

use crate::error::{ClusterError, Result};
use ndarray::Array2;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

/// Words of two or more word characters
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// Standard English stopword list
pub static ENGLISH_STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
        "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
        "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
        "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
        "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
        "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
        "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
        "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg", "eight",
        "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even", "ever",
        "every", "everyone", "everything", "everywhere", "except", "few", "fifteen", "fifty",
        "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty", "found",
        "four", "from", "front", "full", "further", "get", "give", "go", "had", "has", "hasnt",
        "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon",
        "hers", "herself", "him", "himself", "his", "how", "however", "hundred", "i", "ie", "if",
        "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself", "keep", "last",
        "latter", "latterly", "least", "less", "ltd", "made", "many", "may", "me", "meanwhile",
        "might", "mill", "mine", "more", "moreover", "most", "mostly", "move", "much", "must",
        "my", "myself", "name", "namely", "neither", "never", "nevertheless", "next", "nine",
        "no", "nobody", "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off",
        "often", "on", "once", "one", "only", "onto", "or", "other", "others", "otherwise",
        "our", "ours", "ourselves", "out", "over", "own", "part", "per", "perhaps", "please",
        "put", "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems", "serious",
        "several", "she", "should", "show", "side", "since", "sincere", "six", "sixty", "so",
        "some", "somehow", "someone", "something", "sometime", "sometimes", "somewhere",
        "still", "such", "system", "take", "ten", "than", "that", "the", "their", "them",
        "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore",
        "therein", "thereupon", "these", "they", "thick", "thin", "third", "this", "those",
        "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
        "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up",
        "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
        "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein",
        "whereupon", "wherever", "whether", "which", "while", "whither", "who", "whoever",
        "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet",
        "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Ordered set of terms; position is the matrix column
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Vocabulary {
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Column index of `term`, if present
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.binary_search_by(|t| t.as_str().cmp(term)).ok()
    }
}

/// Term counts: one row per document, one column per vocabulary term
#[derive(Debug, Clone)]
pub struct TermMatrix {
    pub counts: Array2<f64>,
    pub vocabulary: Vocabulary,
}

impl TermMatrix {
    pub fn n_documents(&self) -> usize {
        self.counts.nrows()
    }
}

/// Count vectorizer with an English stopword filter
#[derive(Debug, Clone, Copy, Default)]
pub struct Vectorizer;

impl Vectorizer {
    pub fn new() -> Self {
        Self
    }

    /// Split a document into its surviving terms
    pub fn tokenize(&self, document: &str) -> Vec<String> {
        let folded = document.to_lowercase();
        TOKEN_PATTERN
            .find_iter(&folded)
            .map(|m| m.as_str())
            .filter(|t| !ENGLISH_STOP_WORDS.contains(*t))
            .map(str::to_string)
            .collect()
    }

    /// Build the vocabulary and count matrix for `documents`.
    ///
    /// Vocabulary terms are sorted, so identical input always yields the same
    /// column order. Fails when no term survives filtering.
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<TermMatrix> {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|d| self.tokenize(d.as_ref()))
            .collect();

        let mut columns: BTreeMap<&str, usize> = BTreeMap::new();
        for token in tokenized.iter().flatten() {
            columns.insert(token.as_str(), 0);
        }
        if columns.is_empty() {
            return Err(ClusterError::EmptyVocabulary {
                documents: documents.len(),
            });
        }
        for (idx, col) in columns.values_mut().enumerate() {
            *col = idx;
        }

        let mut counts = Array2::<f64>::zeros((documents.len(), columns.len()));
        for (row, tokens) in tokenized.iter().enumerate() {
            for token in tokens {
                counts[[row, columns[token.as_str()]]] += 1.0;
            }
        }

        let terms = columns.keys().map(|t| t.to_string()).collect();
        tracing::debug!(
            documents = documents.len(),
            terms = counts.ncols(),
            "built term-document matrix"
        );

        Ok(TermMatrix {
            counts,
            vocabulary: Vocabulary { terms },
        })
    }
}
