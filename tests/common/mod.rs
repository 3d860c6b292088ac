#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Canonical dataset shared by the integration suites. Row 3 duplicates
/// row 2 exactly and row 4 has a blank quantity, so cleaning drops one
/// row and imputes one value (median quantity 2).
pub const SAMPLE_CSV: &str = "\
date,category,city,product,quantity,unit_price
2024-01-01,Electronics,Pune,Phone,2,500
2024-01-01,Electronics,Pune,Phone,2,500
2024-01-02,Clothing,Mumbai,Shirt,,200
2024-01-02,Electronics,Delhi,Laptop,1,800
2024-01-03,Clothing,Pune,Jeans,3,150
2024-01-03,Electronics,Mumbai,Phone,2,500
2024-01-04,Clothing,Delhi,Shirt,4,120
";

/// Returns the absolute path to the dataset bundled with the crate.
pub fn dataset_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("sales_data.csv")
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}
