//! Fixture file loading.

use crate::{FixtureFormat, KnpFixture, SpecError, SpecResult};
use std::fs;
use std::path::Path;

fn load_error(path: &Path, message: impl ToString) -> SpecError {
    SpecError::Load {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Load a single fixture file; the extension selects the format.
pub fn load_fixture(path: &Path) -> SpecResult<KnpFixture> {
    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(FixtureFormat::from_extension)
        .ok_or_else(|| load_error(path, "expected a .knp or .jumanpp file"))?;
    let content = fs::read_to_string(path).map_err(|e| load_error(path, e))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    KnpFixture::parse(name, format, &content)
}

/// Load all fixtures below a directory (glob: **/*.{knp,jumanpp}), sorted by relative path.
pub fn load_all_fixtures(dir: &Path) -> SpecResult<Vec<(String, KnpFixture)>> {
    let mut fixtures = Vec::new();
    load_fixtures_recursive(dir, dir, &mut fixtures)?;
    fixtures.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(fixtures)
}

fn load_fixtures_recursive(
    base: &Path,
    dir: &Path,
    fixtures: &mut Vec<(String, KnpFixture)>,
) -> SpecResult<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dir).map_err(|e| load_error(dir, e))? {
        let path = entry.map_err(|e| load_error(dir, e))?.path();

        if path.is_dir() {
            load_fixtures_recursive(base, &path, fixtures)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| FixtureFormat::from_extension(e).is_some())
        {
            let relative = path.strip_prefix(base).unwrap_or(&path);
            let fixture = load_fixture(&path)?;
            fixtures.push((relative.display().to_string(), fixture));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures_dir() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    #[test]
    fn test_load_fixture() {
        let fixture = load_fixture(&fixtures_dir().join("basic").join("tenki.knp")).unwrap();
        assert_eq!(fixture.name, "tenki.knp");
        assert_eq!(fixture.format, FixtureFormat::Knp);
        assert_eq!(fixture.document.text(), "天気がいいので散歩した。");
    }

    #[test]
    fn test_load_all_fixtures() {
        let fixtures = load_all_fixtures(&fixtures_dir()).unwrap();
        assert!(fixtures.len() >= 10);
        assert!(fixtures
            .iter()
            .any(|(name, fixture)| name.ends_with("tenki.jumanpp")
                && fixture.format == FixtureFormat::Jumanpp));
    }

    #[test]
    fn test_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            load_fixture(file.path()),
            Err(SpecError::Load { .. })
        ));
    }
}
