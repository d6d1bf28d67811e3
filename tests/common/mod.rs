/*!
 * Common test utilities for the polyko test suite
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// Re-export the mock provider module
pub mod mock_providers;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}
