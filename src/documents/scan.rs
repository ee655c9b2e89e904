use crate::utils::has_extension;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A map document found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemDocument {
    /// Sub-folder of the root holding the document, `None` for the root itself
    pub folder: Option<String>,
    pub path: PathBuf,
}

/// Find the documents with `extension` in `root` and in each folder directly
/// below it.
///
/// Documents in the root come first, then each folder's documents, all in
/// name order. Deeper folders are not searched. A root that is not a
/// directory holds no documents.
pub fn find_documents(
    root: &Path,
    extension: &str,
) -> Result<Vec<FilesystemDocument>, std::io::Error> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut documents: Vec<FilesystemDocument> = find_documents_in_folder(root, extension)?
        .into_iter()
        .map(|path| FilesystemDocument { folder: None, path })
        .collect();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        // Symlinked folders count, as they would when browsing the root
        if !entry.path().is_dir() {
            continue;
        }

        let folder = entry.file_name().to_string_lossy().to_string();
        for path in find_documents_in_folder(entry.path(), extension)? {
            documents.push(FilesystemDocument {
                folder: Some(folder.clone()),
                path,
            });
        }
    }

    Ok(documents)
}

/// Files directly inside `folder` whose extension matches, ignoring case
fn find_documents_in_folder(
    folder: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>, std::io::Error> {
    debug!("Searching {} for *.{} files", folder.display(), extension);

    let mut paths = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();

        // Must be a file, not a directory that happens to end in the extension
        if has_extension(path, extension) && path.is_file() {
            paths.push(path.to_path_buf());
        }
    }

    debug!(
        "Found {} *.{} files in {}",
        paths.len(),
        extension,
        folder.display()
    );
    Ok(paths)
}
