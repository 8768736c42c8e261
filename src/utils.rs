use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Artifact file name for a URL list: `<stem>_output.txt`
pub fn output_file_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "urls".to_string());
    format!("{}_output.txt", stem)
}

/// All `.txt` artifacts directly inside `dir`, sorted by path
///
/// A missing directory yields an empty list.
pub fn list_output_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Render a duration as "N minutes and M seconds", whole units only
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{} minutes and {} seconds", secs / 60, secs % 60)
}

/// Read a URL list, one URL per line, kept verbatim and in order
pub fn read_url_list(path: &Path) -> io::Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents.lines().map(str::to_string).collect())
}
