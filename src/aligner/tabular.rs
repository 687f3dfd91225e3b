// tabular.rs - Reader for the aligner's tab-separated match records

use crate::core::PairwiseMatch;
use crate::error::{Result, TypingError};
use std::path::Path;
use std::str::FromStr;

/// Output columns requested from the aligner, in order
pub const OUTPUT_FIELDS: [&str; 12] = [
    "sseqid", "slen", "qlen", "sstart", "send", "qstart", "qend", "pident", "length", "evalue",
    "bitscore", "nident",
];

/// Read raw match records. A missing or empty file means no hits.
pub fn read_tabular(file_path: &Path) -> Result<Vec<PairwiseMatch>> {
    match std::fs::metadata(file_path) {
        Ok(meta) if meta.len() == 0 => return Ok(Vec::new()),
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(TypingError::io(file_path, e)),
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .from_path(file_path)
        .map_err(|e| TypingError::csv(file_path, e))?;

    let mut matches = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| TypingError::csv(file_path, e))?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(row as u64 + 1);

        if record.len() != OUTPUT_FIELDS.len() {
            return Err(TypingError::parse(
                file_path,
                line,
                format!(
                    "expected {} fields, found {}",
                    OUTPUT_FIELDS.len(),
                    record.len()
                ),
            ));
        }

        let fields: Vec<&str> = record.iter().map(str::trim).collect();
        let number = |i: usize| -> Result<usize> { parse_field(file_path, line, i, fields[i]) };
        let float = |i: usize| -> Result<f64> { parse_field(file_path, line, i, fields[i]) };

        matches.push(PairwiseMatch::from_raw(
            fields[0].to_string(),
            number(1)?,
            number(2)?,
            (number(3)?, number(4)?),
            (number(5)?, number(6)?),
            float(7)?,
            number(8)?,
            float(9)?,
            float(10)?,
            number(11)?,
        ));
    }

    Ok(matches)
}

fn parse_field<T: FromStr>(file_path: &Path, line: u64, index: usize, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        TypingError::parse(
            file_path,
            line,
            format!("invalid {} '{}'", OUTPUT_FIELDS[index], value),
        )
    })
}

/// Order records so the best record of each allele comes first: allele id,
/// then descending score, identity and alignment length.
pub fn sort_for_collection(matches: &mut [PairwiseMatch]) {
    matches.sort_by(|a, b| {
        a.allele_id
            .cmp(&b.allele_id)
            .then_with(|| b.score.total_cmp(&a.score))
            .then_with(|| b.identity.total_cmp(&a.identity))
            .then_with(|| b.alignment_length.cmp(&a.alignment_length))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{collect_best_matches, Strand};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_raw(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_records() {
        let raw = write_raw(
            "adk_1\t536\t2900000\t1\t536\t1000\t1535\t100.000\t536\t0.0\t990\t536\n\
             fumC_3\t469\t2900000\t469\t1\t5000\t5468\t99.147\t469\t0.0\t846\t465\n",
        );
        let matches = read_tabular(raw.path()).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].allele_id, "adk_1");
        assert_eq!(matches[0].score, 990.0);
        assert_eq!(matches[1].subject_start, 1);
        assert_eq!(matches[1].subject_end, 469);
        assert_eq!(matches[1].strand, Strand::Minus);
        assert_eq!(matches[1].identical, 465);
    }

    #[test]
    fn test_missing_or_empty_output_means_no_hits() {
        let empty = write_raw("");
        assert!(read_tabular(empty.path()).unwrap().is_empty());

        let dir = tempfile::tempdir().unwrap();
        assert!(read_tabular(&dir.path().join("absent.tsv")).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_record_rejected() {
        let raw = write_raw("adk_1\t536\t2900000\t1\t536\n");
        assert!(matches!(
            read_tabular(raw.path()),
            Err(TypingError::Parse { line: 1, .. })
        ));

        let raw = write_raw("adk_1\tx\t2900000\t1\t536\t1000\t1535\t100\t536\t0.0\t990\t536\n");
        assert!(read_tabular(raw.path()).is_err());
    }

    #[test]
    fn test_sort_puts_best_record_first() {
        let raw = write_raw(
            "adk_1\t536\t9000\t1\t500\t1\t500\t99.0\t500\t0.0\t900\t495\n\
             fumC_3\t469\t9000\t1\t469\t1\t469\t100.0\t469\t0.0\t846\t469\n\
             adk_1\t536\t9000\t1\t536\t1\t536\t100.0\t536\t0.0\t990\t536\n\
             adk_1\t536\t9000\t1\t530\t1\t530\t100.0\t530\t0.0\t990\t530\n",
        );
        let mut matches = read_tabular(raw.path()).unwrap();
        sort_for_collection(&mut matches);

        let order: Vec<(&str, usize)> = matches
            .iter()
            .map(|m| (m.allele_id.as_str(), m.alignment_length))
            .collect();
        assert_eq!(
            order,
            vec![("adk_1", 536), ("adk_1", 530), ("adk_1", 500), ("fumC_3", 469)]
        );

        let best = collect_best_matches(matches);
        assert_eq!(best["adk_1"].alignment_length, 536);
    }
}
