//! Stand-in analyzers written as `sh` scripts.

use std::io::Write;

use tempfile::TempPath;

use crate::config::AnalyzerConfig;

pub(crate) const MORPHEME: &str = "天気 てんき 天気 名詞 6 普通名詞 1 * 0 * 0";

/// Echoes comments and answers every text line with one morpheme.
pub(crate) const FAKE_JUMANPP: &str = r##"while IFS= read -r line; do
  case "$line" in
    "#"*) printf '%s\n' "$line" ;;
    *) printf '%s\n' '天気 てんき 天気 名詞 6 普通名詞 1 * 0 * 0' 'EOS' ;;
  esac
done
"##;

/// Echoes comments and answers every sentence with one phrase.
pub(crate) const FAKE_KNP: &str = r##"while IFS= read -r line; do
  case "$line" in
    "#"*) printf '%s\n' "$line" ;;
    EOS) printf '%s\n' '* -1D' '+ -1D' '天気 てんき 天気 名詞 6 普通名詞 1 * 0 * 0' 'EOS' ;;
  esac
done
"##;

/// Answers every document with one analyzed sentence.
pub(crate) const FAKE_KWJA: &str = r##"while IFS= read -r line; do
  case "$line" in
    EOD) printf '%s\n' '# S-ID:kwja-0' '* -1D' '+ -1D' '天気 てんき 天気 名詞 6 普通名詞 1 * 0 * 0' 'EOS' 'EOD' ;;
  esac
done
"##;

pub(crate) struct FakeAnalyzer {
    script: TempPath,
}

impl FakeAnalyzer {
    pub(crate) fn new(script: &str) -> Self {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(script.as_bytes()).unwrap();
        FakeAnalyzer {
            script: file.into_temp_path(),
        }
    }

    pub(crate) fn config(&self) -> AnalyzerConfig {
        AnalyzerConfig::new("sh")
            .with_options(vec![self.script.display().to_string()])
            .with_timeout_secs(5)
    }
}

pub(crate) fn missing() -> AnalyzerConfig {
    AnalyzerConfig::new("layered-knp-no-such-analyzer")
}
