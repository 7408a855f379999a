use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;
use unrar::Archive;

use crate::utils::pathify;

/// Extract every `.rar` archive in `demorar_dir` into `output_dir`.
/// Returns the number of archives extracted. Extraction is all-or-nothing
/// per archive; a bad archive aborts the run.
pub fn extract_all(demorar_dir: &Path, output_dir: &Path) -> Result<usize> {
    let mut extracted = 0;

    for entry in fs::read_dir(demorar_dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.extension().map(|ext| ext == "rar").unwrap_or(false) {
            info!("Extracting {:?}", path);
            extract_archive(&path, output_dir)
                .with_context(|| format!("failed to extract {}", path.display()))?;
            extracted += 1;
        }
    }

    Ok(extracted)
}

fn extract_archive(archive_path: &Path, output_dir: &Path) -> Result<()> {
    let mut archive = Archive::new(archive_path).open_for_processing()?;

    while let Some(header) = archive.read_header()? {
        archive = if header.entry().is_file() {
            header.extract_with_base(output_dir)?
        } else {
            header.skip()?
        };
    }

    Ok(())
}

/// Keep only `.dem` files named after a wanted map; delete everything else,
/// directories included. Map names are matched against the normalized
/// filename convention (see [`pathify`]).
pub fn filter_demos(output_dir: &Path, maps: &[String]) -> Result<usize> {
    let wanted: Vec<String> = maps.iter().map(|m| pathify(m)).collect();
    let mut removed = 0;

    for entry in fs::read_dir(output_dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            fs::remove_dir_all(&path)?;
            removed += 1;
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let keep = name.ends_with(".dem") && wanted.iter().any(|map| name.contains(map.as_str()));
        if !keep {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_filter_demos() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "esl-pro-league-m1-dust-2.dem",
            "esl-pro-league-m2-mirage.dem",
            "esl-pro-league-m1-dust-2.txt",
            "demos.rar",
        ] {
            File::create(dir.path().join(name)).unwrap();
        }
        fs::create_dir(dir.path().join("leftovers")).unwrap();
        File::create(dir.path().join("leftovers/readme.txt")).unwrap();

        let maps = vec!["Dust 2".to_string()];
        let removed = filter_demos(dir.path(), &maps).unwrap();
        assert_eq!(removed, 4);

        let remaining: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(remaining, vec!["esl-pro-league-m1-dust-2.dem"]);
    }

    #[test]
    fn test_extract_all_ignores_non_rar_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        File::create(dir.path().join("demos.zip")).unwrap();

        let extracted = extract_all(dir.path(), out.path()).unwrap();
        assert_eq!(extracted, 0);
    }
}
