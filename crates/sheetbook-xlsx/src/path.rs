//! Package path helpers

/// Split a package path into its folder and file name
///
/// A path without a folder yields an empty folder.
pub fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

/// Path of the relationship part that belongs to `path`
///
/// `xl/workbook.xml` becomes `xl/_rels/workbook.xml.rels`.
pub fn relationships_path(path: &str) -> String {
    let (folder, file) = split_path(path);
    if folder.is_empty() {
        format!("_rels/{}.rels", file)
    } else {
        format!("{}/_rels/{}.rels", folder, file)
    }
}
