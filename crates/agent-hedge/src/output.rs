//! Result file output

use crate::error::Result;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::info;

/// Timestamp format used in file names and file headers
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Format a timestamp for result files
pub fn timestamp(now: DateTime<Local>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// `{TICKER}_{timestamp}.txt`, ticker upper-cased
pub fn result_filename(ticker: &str, timestamp: &str) -> String {
    format!("{}_{timestamp}.txt", ticker.to_uppercase())
}

/// File body: header lines, a blank line, then the decision verbatim
pub fn render_result(ticker: &str, timestamp: &str, result: &str) -> String {
    format!(
        "Ticker: {}\nTimestamp: {timestamp}\n\nFinal Result:\n{result}",
        ticker.to_uppercase()
    )
}

/// Write the result file into `dir` and return its path
pub async fn write_result(
    dir: &Path,
    ticker: &str,
    now: DateTime<Local>,
    result: &str,
) -> Result<PathBuf> {
    let stamp = timestamp(now);
    let path = dir.join(result_filename(ticker, &stamp));
    tokio::fs::write(&path, render_result(ticker, &stamp, result)).await?;
    info!(path = %path.display(), "Result saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    #[test]
    fn test_filename() {
        assert_eq!(
            result_filename("aapl", &timestamp(fixed_now())),
            "AAPL_20240305_140709.txt"
        );
    }

    #[test]
    fn test_render() {
        let body = render_result("nvda", "20240305_140709", r#"{"action": "hold"}"#);
        assert_eq!(
            body,
            "Ticker: NVDA\nTimestamp: 20240305_140709\n\nFinal Result:\n{\"action\": \"hold\"}"
        );
    }

    #[tokio::test]
    async fn test_write_result() {
        let dir = std::env::temp_dir().join(format!("hedge-output-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let path = write_result(&dir, "msft", fixed_now(), "not json").await.unwrap();

        assert_eq!(path.file_name().unwrap(), "MSFT_20240305_140709.txt");
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.ends_with("Final Result:\nnot json"));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
