use super::types::ChangedFile;

/// Render the changed files into the single text blob handed to the model.
///
/// Each file becomes a three-line block, in the order GitHub returned them:
///
///   File: {filename}
///   Changes:
///   {patch}
///
/// Files without a patch still contribute a block with an empty patch line.
/// Nothing is filtered or truncated.
pub fn render_diff_blob(files: &[ChangedFile]) -> String {
    let mut blob = String::new();
    for file in files {
        blob.push_str(&format!(
            "File: {}\nChanges:\n{}\n",
            file.filename,
            file.patch.as_deref().unwrap_or_default()
        ));
    }
    blob
}
