use std::fs;
use std::io;
use std::path::Path;

/// Read a .txt list file and return one value per line.
///
/// A `#` starts a comment: at the start of a line the whole line is dropped,
/// anywhere else the line is truncated at the marker. Values are trimmed and
/// empty lines are skipped.
pub fn parse_txt_file_list(path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let mut values = Vec::new();

    for line in content.lines() {
        let kept = match line.find('#') {
            None => line,
            Some(0) => continue,
            Some(pos) => &line[..pos],
        };

        let value = kept.trim();
        if !value.is_empty() {
            values.push(value.to_string());
        }
    }

    Ok(values)
}

/// Normalize a map name to the convention used in demo filenames:
/// lowercase, spaces replaced with dashes. Idempotent.
pub fn pathify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_list(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_txt_file_list() {
        let file = write_list("inferno # old name\n# comment only\nmirage\n\nDust 2\n");
        let values = parse_txt_file_list(file.path()).unwrap();
        assert_eq!(values, vec!["inferno", "mirage", "Dust 2"]);
    }

    #[test]
    fn test_parse_txt_file_list_no_comments() {
        let file = write_list("7148\n7552\n");
        let values = parse_txt_file_list(file.path()).unwrap();
        assert_eq!(values, vec!["7148", "7552"]);
    }

    #[test]
    fn test_pathify() {
        assert_eq!(pathify("Ancient"), "ancient");
        assert_eq!(pathify("Dust 2"), "dust-2");
        assert_eq!(pathify("  Mirage "), "mirage");
    }

    #[test]
    fn test_pathify_idempotent() {
        for name in ["Ancient", "Dust 2", "Nuke", "dust-2"] {
            let once = pathify(name);
            assert_eq!(pathify(&once), once);
        }
    }
}
