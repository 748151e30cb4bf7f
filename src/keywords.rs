//! Top keyword extraction from cluster centroids

use crate::vectorize::Vocabulary;
use ndarray::{Array2, ArrayView1};

/// A vocabulary term with its centroid weight
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub term: String,
    pub weight: f64,
}

/// Highest-weighted `top_n` terms of one centroid.
///
/// Ties keep vocabulary order. A vocabulary smaller than `top_n` yields
/// every term and nothing more.
pub fn top_keywords(vocabulary: &Vocabulary, centroid: ArrayView1<f64>, top_n: usize) -> Vec<Keyword> {
    let mut ranked: Vec<(usize, f64)> = centroid.iter().copied().enumerate().collect();
    // stable sort: equal weights stay in vocabulary order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(top_n)
        .filter_map(|(idx, weight)| {
            vocabulary.terms().get(idx).map(|term| Keyword {
                term: term.clone(),
                weight,
            })
        })
        .collect()
}

/// Top keywords for every cluster, indexed by cluster id
pub fn rank_clusters(vocabulary: &Vocabulary, centroids: &Array2<f64>, top_n: usize) -> Vec<Vec<Keyword>> {
    centroids
        .outer_iter()
        .map(|centroid| top_keywords(vocabulary, centroid, top_n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorize::Vectorizer;
    use ndarray::array;

    fn vocabulary() -> Vocabulary {
        Vectorizer::new()
            .fit_transform(&["alpha beta gamma delta"])
            .unwrap()
            .vocabulary
    }

    #[test]
    fn test_sorted_by_descending_weight() {
        // vocabulary order: alpha, beta, delta, gamma
        let vocab = vocabulary();
        let centroid = array![0.1, 0.9, 0.5, 0.3];
        let keywords = top_keywords(&vocab, centroid.view(), 10);

        let terms: Vec<&str> = keywords.iter().map(|k| k.term.as_str()).collect();
        assert_eq!(terms, vec!["beta", "delta", "gamma", "alpha"]);
        assert!(keywords.windows(2).all(|w| w[0].weight >= w[1].weight));
    }

    #[test]
    fn test_ties_keep_vocabulary_order() {
        let vocab = vocabulary();
        let centroid = array![0.5, 0.5, 0.0, 0.5];
        let terms: Vec<String> = top_keywords(&vocab, centroid.view(), 3)
            .into_iter()
            .map(|k| k.term)
            .collect();
        assert_eq!(terms, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_short_vocabulary_is_not_padded() {
        let vocab = vocabulary();
        let keywords = top_keywords(&vocab, array![1.0, 2.0, 3.0, 4.0].view(), 10);
        assert_eq!(keywords.len(), 4);
        assert!(keywords.iter().all(|k| vocab.index_of(&k.term).is_some()));
    }

    #[test]
    fn test_truncates_to_top_n() {
        let vocab = vocabulary();
        let keywords = top_keywords(&vocab, array![1.0, 2.0, 3.0, 4.0].view(), 2);
        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords[0].term, "gamma");
    }

    #[test]
    fn test_rank_clusters_one_list_per_centroid() {
        let vocab = vocabulary();
        let centroids = array![[1.0, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0, 0.0]];
        let ranked = rank_clusters(&vocab, &centroids, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0][0].term, "alpha");
        assert_eq!(ranked[1].len(), 2);
    }
}
