//! Tab-delimited mapping files.
//!
//! The format is a stable contract other tooling produces: one record per
//! line, exactly two fields (source, destination) separated by a single
//! tab, no header, no comments, no quoting. A record with the wrong field
//! count fails the whole file; there is no partial-file recovery.

use std::io::Read;
use std::path::Path;

use chanmap_recon::Mapping;

use crate::error::IoError;

/// Parse one mapping file into (source, destination) records, in file order.
pub fn read_mapping_file(path: &Path) -> Result<Vec<Mapping>, IoError> {
    let content = read_file_as_utf8(path)?;
    parse_records(&content, path)
}

/// Read file and convert to UTF-8 if needed. Mapping files often come out
/// of Windows tooling that writes Windows-1252.
fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let read_err = |e: std::io::Error| IoError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn parse_records(content: &str, path: &Path) -> Result<Vec<Mapping>, IoError> {
    // Quoting disabled: a quote is an ordinary identifier character here,
    // and the only structure is the tab split.
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(content.as_bytes());

    let mut mappings = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| IoError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if record.len() != 2 {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(IoError::BadRecord {
                path: path.to_path_buf(),
                line,
                fields: record.len(),
            });
        }

        mappings.push(Mapping::new(&record[0], &record[1]));
    }

    Ok(mappings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn parses_pairs_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "m.txt", b"eng/rpm\tdash/rpm\neng/temp\tdash/temp\n");

        let mappings = read_mapping_file(&path).unwrap();
        assert_eq!(
            mappings,
            vec![
                Mapping::new("eng/rpm", "dash/rpm"),
                Mapping::new("eng/temp", "dash/temp"),
            ]
        );
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "m.txt", b"a\tx\r\nb\ty\r\n");

        let mappings = read_mapping_file(&path).unwrap();
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[1], Mapping::new("b", "y"));
    }

    #[test]
    fn wrong_field_count_fails_the_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "m.txt", b"a\tx\nb\ty\tz\nc\tw\n");

        let err = read_mapping_file(&path).unwrap_err();
        match err {
            IoError::BadRecord { line, fields, .. } => {
                assert_eq!(line, 2);
                assert_eq!(fields, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn single_field_line_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "m.txt", b"no-separator-here\n");

        assert!(matches!(
            read_mapping_file(&path).unwrap_err(),
            IoError::BadRecord { fields: 1, .. }
        ));
    }

    #[test]
    fn quotes_are_ordinary_characters() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "m.txt", b"\"eng\"/rpm\tdash/\"rpm\"\n");

        let mappings = read_mapping_file(&path).unwrap();
        assert_eq!(mappings, vec![Mapping::new("\"eng\"/rpm", "dash/\"rpm\"")]);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "m.txt", b"a\tx\n\nb\ty\n");

        let mappings = read_mapping_file(&path).unwrap();
        assert_eq!(mappings.len(), 2);
    }

    #[test]
    fn windows_1252_content_is_decoded() {
        let dir = tempfile::tempdir().unwrap();
        // 0xE9 is é in Windows-1252 and invalid on its own in UTF-8.
        let path = write_file(&dir, "m.txt", b"moteur/r\xe9gime\tdash/rpm\n");

        let mappings = read_mapping_file(&path).unwrap();
        assert_eq!(mappings[0].source, "moteur/régime");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_mapping_file(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }
}
