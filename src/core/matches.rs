// matches.rs - Pairwise match records and best-match collection per allele

use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Orientation of the query segment relative to the reference allele
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Plus,
    Minus,
}

/// One raw alignment between the query and a reference allele.
///
/// Coordinates are 1-based inclusive and normalised so `start <= end`;
/// a reversed subject interval is recorded as `Strand::Minus`.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseMatch {
    /// Reference allele id (`locus_index`)
    pub allele_id: String,
    pub subject_length: usize,
    pub query_length: usize,
    pub subject_start: usize,
    pub subject_end: usize,
    pub query_start: usize,
    pub query_end: usize,
    /// Percent identity reported by the aligner
    pub identity: f64,
    pub alignment_length: usize,
    pub evalue: f64,
    pub score: f64,
    pub identical: usize,
    pub strand: Strand,
}

impl PairwiseMatch {
    /// Build a record from raw aligner coordinates, which may be reversed
    #[allow(clippy::too_many_arguments)]
    pub fn from_raw(
        allele_id: String,
        subject_length: usize,
        query_length: usize,
        subject_coords: (usize, usize),
        query_coords: (usize, usize),
        identity: f64,
        alignment_length: usize,
        evalue: f64,
        score: f64,
        identical: usize,
    ) -> Self {
        let (sstart, send) = subject_coords;
        let (qstart, qend) = query_coords;
        let reversed = (sstart > send) != (qstart > qend);

        Self {
            allele_id,
            subject_length,
            query_length,
            subject_start: sstart.min(send),
            subject_end: sstart.max(send),
            query_start: qstart.min(qend),
            query_end: qstart.max(qend),
            identity,
            alignment_length,
            evalue,
            score,
            identical,
            strand: if reversed { Strand::Minus } else { Strand::Plus },
        }
    }

    /// Number of reference allele bases covered by the match
    pub fn subject_span(&self) -> usize {
        self.subject_end + 1 - self.subject_start
    }

    /// Percentage of the reference allele covered by the match
    pub fn subject_coverage(&self) -> f64 {
        if self.subject_length == 0 {
            return 0.0;
        }
        100.0 * self.subject_span() as f64 / self.subject_length as f64
    }
}

/// Best match per allele id
pub type BestMatches = HashMap<String, PairwiseMatch>;

/// Keep the first record seen for each allele id.
///
/// Input must already be ordered by allele, then descending score,
/// identity and length, so the first record is the best one. An empty
/// input gives an empty map.
pub fn collect_best_matches<I>(matches: I) -> BestMatches
where
    I: IntoIterator<Item = PairwiseMatch>,
{
    let mut best = BestMatches::new();
    for record in matches {
        if let Entry::Vacant(slot) = best.entry(record.allele_id.clone()) {
            slot.insert(record);
        }
    }
    best
}

#[cfg(test)]
pub(crate) fn test_match(
    allele_id: &str,
    subject_length: usize,
    span: usize,
    identity: f64,
    score: f64,
) -> PairwiseMatch {
    let identical = (span as f64 * identity / 100.0).round() as usize;
    PairwiseMatch::from_raw(
        allele_id.to_string(),
        subject_length,
        5_000_000,
        (1, span),
        (1000, 1000 + span - 1),
        identity,
        span,
        0.0,
        score,
        identical,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_normalised() {
        let m = PairwiseMatch::from_raw(
            "adk_1".into(),
            500,
            10_000,
            (480, 21),
            (100, 559),
            99.0,
            460,
            1e-50,
            800.0,
            455,
        );
        assert_eq!(m.subject_start, 21);
        assert_eq!(m.subject_end, 480);
        assert_eq!(m.strand, Strand::Minus);
        assert_eq!(m.subject_span(), 460);
        assert!((m.subject_coverage() - 92.0).abs() < 1e-9);

        let plus = PairwiseMatch::from_raw(
            "adk_1".into(),
            500,
            10_000,
            (1, 500),
            (100, 599),
            100.0,
            500,
            0.0,
            900.0,
            500,
        );
        assert_eq!(plus.strand, Strand::Plus);
        assert_eq!(plus.subject_coverage(), 100.0);
    }

    #[test]
    fn test_first_record_per_allele_wins() {
        let records = vec![
            test_match("adk_1", 100, 100, 100.0, 185.0),
            test_match("adk_1", 100, 90, 99.0, 160.0),
            test_match("adk_2", 100, 100, 98.0, 170.0),
            test_match("fumC_3", 200, 200, 100.0, 370.0),
            test_match("adk_2", 100, 100, 100.0, 999.0),
        ];
        let best = collect_best_matches(records);

        assert_eq!(best.len(), 3);
        assert_eq!(best["adk_1"].score, 185.0);
        // Later records are discarded even when they look better
        assert_eq!(best["adk_2"].score, 170.0);
    }

    #[test]
    fn test_empty_input() {
        let best = collect_best_matches(Vec::new());
        assert!(best.is_empty());
    }
}
