//! JSON report files.

use crate::domain::error::CotError;
use crate::domain::market::SymbolReport;
use crate::ports::report_port::ReportSink;
use std::fs;
use std::path::{Path, PathBuf};

enum Target {
    /// One file per report, named after its symbol.
    Directory(PathBuf),
    /// Every report goes to this exact path.
    File(PathBuf),
}

pub struct JsonReportAdapter {
    target: Target,
}

impl JsonReportAdapter {
    pub fn in_dir(output_dir: PathBuf) -> Self {
        Self {
            target: Target::Directory(output_dir),
        }
    }

    pub fn to_file(path: PathBuf) -> Self {
        Self {
            target: Target::File(path),
        }
    }

    fn path_for(&self, report: &SymbolReport) -> PathBuf {
        match &self.target {
            Target::Directory(dir) => dir.join(report.file_name()),
            Target::File(path) => path.clone(),
        }
    }
}

fn output_error(path: &Path, reason: impl ToString) -> CotError {
    CotError::Output {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

impl ReportSink for JsonReportAdapter {
    fn write(&self, report: &SymbolReport) -> Result<String, CotError> {
        let path = self.path_for(report);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| output_error(parent, e))?;
        }
        let json = report.to_json()?;
        fs::write(&path, json).map_err(|e| output_error(&path, e))?;
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn report(symbol: &str) -> SymbolReport {
        SymbolReport {
            symbol: symbol.into(),
            collected_at: NaiveDate::from_ymd_opt(2025, 7, 4)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            entries: vec![],
        }
    }

    #[test]
    fn writes_into_nested_directory() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("data").join("ai");
        let sink = JsonReportAdapter::in_dir(out.clone());

        let written = sink.write(&report("EUR/USD")).unwrap();
        assert_eq!(written, out.join("eurusd_cot.json").display().to_string());

        let back = SymbolReport::from_json(&fs::read_to_string(&written).unwrap()).unwrap();
        assert_eq!(back, report("EUR/USD"));
    }

    #[test]
    fn explicit_file_target() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.json");
        let sink = JsonReportAdapter::to_file(path.clone());
        sink.write(&report("FULL")).unwrap();
        assert!(path.exists());
    }
}
