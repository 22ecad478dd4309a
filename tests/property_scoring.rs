//! Property tests for scoring, thresholds and ranking invariants

use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

use cogmesh::domain::models::{get_threshold, Citation, RawDoc, Thresholds, SNIPPET_MAX_CHARS};
use cogmesh::services::scoring_engine::{citation_score, context_score, relevance_score};
use cogmesh::services::{
    build_citations, enrich_documents, rank, ScoringEngine, SourceReputationRegistry,
};

fn engine() -> ScoringEngine {
    ScoringEngine::new(Arc::new(SourceReputationRegistry::new()))
}

/// Short ASCII text or long text mixing multi-byte characters.
fn doc_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,40}",
        "[a-zé漢字🦀 ]{150,400}",
    ]
}

fn source_kind() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("kb".to_string()),
        Just("cluster".to_string()),
        Just("link".to_string()),
        Just("fallback".to_string()),
        "[a-z]{1,8}",
    ]
}

proptest! {
    /// Property: every subscore and the final score stay within [0, 1]
    #[test]
    fn prop_scores_are_bounded(
        text in ".{0,200}",
        query in ".{0,60}",
        hints in prop::collection::vec("[a-z ]{0,12}", 0..5),
        sources in prop::collection::vec(source_kind(), 0..10),
    ) {
        let citations: Vec<Citation> = sources
            .iter()
            .enumerate()
            .map(|(i, s)| Citation::new(format!("d{i}"), 0.5, "x").with_source(s.as_str()))
            .collect();
        let score = engine().score_validation(&text, &query, &citations, Some(hints.as_slice()));

        for value in [
            score.final_score,
            score.subscores.citation,
            score.subscores.context,
            score.subscores.source,
            score.subscores.relevance,
        ] {
            prop_assert!((0.0..=1.0).contains(&value), "out of range: {value}");
        }
    }

    /// Property: the citation subscore never decreases with more citations
    #[test]
    fn prop_citation_score_monotonic(a in 0usize..50, b in 0usize..50) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(citation_score(lo) <= citation_score(hi));
        prop_assert!(citation_score(hi) <= 1.0);
    }

    /// Property: blank hints behave exactly like no hints
    #[test]
    fn prop_blank_hints_are_neutral(text in ".{0,80}", blanks in prop::collection::vec("[ \t]{0,4}", 0..4)) {
        prop_assert!((context_score(&text, Some(blanks.as_slice())) - 0.5).abs() < 1e-12);
        prop_assert!((context_score(&text, None) - 0.5).abs() < 1e-12);
    }

    /// Property: a text that repeats the query is fully relevant
    #[test]
    fn prop_query_in_text_is_relevant(words in prop::collection::btree_set("[a-z]{2,8}", 3..6)) {
        let query = words.into_iter().collect::<Vec<_>>().join(" ");
        prop_assert!((relevance_score(&query, &query) - 1.0).abs() < 1e-12);
    }

    /// Property: unknown and empty strategies resolve to the default threshold
    #[test]
    fn prop_unknown_strategy_uses_default(strategy in "[a-z]{0,10}", default in 0.0f64..=1.0) {
        let thresholds = Thresholds::new(BTreeMap::from([
            ("default".to_string(), default),
            ("critic".to_string(), 0.6),
        ]))
        .unwrap();
        let expected = if strategy == "critic" { 0.6 } else { default };
        prop_assert!((get_threshold(&thresholds, &strategy) - expected).abs() < 1e-12);
    }

    /// Property: ranking keeps every document and sorts by descending score
    #[test]
    fn prop_rank_sorted_and_complete(
        texts in prop::collection::vec("[a-z ]{0,40}", 0..20),
        query in "[a-z ]{0,20}",
    ) {
        let docs: Vec<RawDoc> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| RawDoc::new(format!("d{i}"), t.as_str(), "kb"))
            .collect();
        let ranked = rank(&docs, &query);

        prop_assert_eq!(ranked.len(), docs.len());
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        prop_assert!(ranked.iter().all(|d| (0.0..=1.0).contains(&d.score)));
    }

    /// Property: enrich, rank and cite keeps every document's identity,
    /// bounds snippets and carries enrichment metadata through ranking
    #[test]
    fn prop_enrich_rank_cite_preserves_identity(
        texts in prop::collection::vec(doc_text(), 0..12),
        query in "[a-zé ]{0,20}",
    ) {
        let docs: Vec<RawDoc> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| RawDoc::new(format!("d{i}"), t.as_str(), "kb"))
            .collect();
        let by_id: BTreeMap<&str, &RawDoc> = docs.iter().map(|d| (d.id.as_str(), d)).collect();

        let ranked = rank(&enrich_documents(&docs), &query);
        let citations = build_citations(&ranked);

        prop_assert_eq!(citations.len(), docs.len());
        for (citation, ranked_doc) in citations.iter().zip(&ranked) {
            let original = by_id.get(citation.doc_id.as_str()).copied();
            prop_assert!(original.is_some(), "unknown id {}", citation.doc_id);
            let original = original.unwrap();

            prop_assert_eq!(&ranked_doc.doc.text, &original.text);
            prop_assert!(citation.snippet.chars().count() <= SNIPPET_MAX_CHARS);
            let expected: String = original.text.chars().take(SNIPPET_MAX_CHARS).collect();
            prop_assert_eq!(&citation.snippet, &expected);
            prop_assert!((citation.score - ranked_doc.score).abs() < f64::EPSILON);

            let metadata = ranked_doc.doc.metadata.as_ref();
            prop_assert!(metadata.is_some());
            let metadata = metadata.unwrap();
            prop_assert_eq!(&metadata["enriched"], &serde_json::Value::Bool(true));
            prop_assert_eq!(
                &metadata["word_count"],
                &serde_json::Value::from(original.text.split_whitespace().count())
            );
        }

        let mut ids: Vec<&str> = citations.iter().map(|c| c.doc_id.as_str()).collect();
        ids.sort_unstable();
        let mut expected_ids: Vec<&str> = by_id.keys().copied().collect();
        expected_ids.sort_unstable();
        prop_assert_eq!(ids, expected_ids);
    }
}
