//! Extension-based classification of files into destination folders.
//!
//! A [`RuleTable`] maps file extensions to folder names. Lookups are
//! case-insensitive on the extension; anything without a matching rule
//! (including files with no extension at all) falls through to the
//! default folder.
//!
//! # Examples
//!
//! ```
//! use sortwatch::classifier::RuleTable;
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! let mut rules = HashMap::new();
//! rules.insert("pdf".to_string(), "Documents".to_string());
//! let table = RuleTable::new(rules, "Others".to_string());
//!
//! assert_eq!(table.folder_for_path(Path::new("report.PDF")), "Documents");
//! assert_eq!(table.folder_for_path(Path::new("notes")), "Others");
//! ```
use std::collections::HashMap;
use std::path::Path;

/// Maps file extensions to destination folder names.
///
/// The table is built once from configuration and never mutated afterwards.
/// Extension keys are normalized (lowercased, leading dots stripped) at
/// construction time so lookups are a single hash probe.
#[derive(Debug, Clone)]
pub struct RuleTable {
    folders: HashMap<String, String>,
    default_folder: String,
}

impl RuleTable {
    /// Creates a rule table from raw extension-to-folder pairs.
    ///
    /// Keys are normalized, so `"PDF"`, `"pdf"` and `".pdf"` all define
    /// the same rule. Folder names are kept verbatim.
    pub fn new(rules: HashMap<String, String>, default_folder: String) -> Self {
        let folders = rules
            .into_iter()
            .map(|(ext, folder)| (normalize_extension(&ext), folder))
            .collect();

        Self {
            folders,
            default_folder,
        }
    }

    /// Returns the folder configured for files with no matching rule.
    pub fn default_folder(&self) -> &str {
        &self.default_folder
    }

    /// Resolves an extension to its destination folder name.
    ///
    /// Matching is case-insensitive; a leading dot on `ext` is ignored.
    /// Unknown extensions resolve to the default folder.
    pub fn folder_for_extension(&self, ext: &str) -> &str {
        self.folders
            .get(&normalize_extension(ext))
            .map(String::as_str)
            .unwrap_or(&self.default_folder)
    }

    /// Resolves a file path to its destination folder name.
    ///
    /// Only the extension of the final path component is considered.
    /// This is total: every path resolves to some folder name.
    pub fn folder_for_path(&self, path: &Path) -> &str {
        match path.extension() {
            Some(ext) => self.folder_for_extension(&ext.to_string_lossy()),
            None => &self.default_folder,
        }
    }
}

/// Lowercases an extension and strips any leading dots.
fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RuleTable {
        let mut rules = HashMap::new();
        rules.insert("pdf".to_string(), "Documents".to_string());
        rules.insert("jpg".to_string(), "Images".to_string());
        rules.insert("JPEG".to_string(), "Images".to_string());
        RuleTable::new(rules, "Others".to_string())
    }

    #[test]
    fn test_known_extension_resolves_to_mapped_folder() {
        let table = table();
        assert_eq!(table.folder_for_extension("pdf"), "Documents");
        assert_eq!(table.folder_for_extension("jpg"), "Images");
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        let table = table();
        assert_eq!(table.folder_for_extension("PDF"), "Documents");
        assert_eq!(table.folder_for_extension("Jpg"), "Images");
        // Uppercase rule keys are normalized at construction time too.
        assert_eq!(table.folder_for_extension("jpeg"), "Images");
    }

    #[test]
    fn test_leading_dot_is_stripped() {
        let table = table();
        assert_eq!(table.folder_for_extension(".pdf"), "Documents");
    }

    #[test]
    fn test_unknown_extension_falls_through_to_default() {
        let table = table();
        assert_eq!(table.folder_for_extension("xyz"), "Others");
        assert_eq!(table.folder_for_extension(""), "Others");
    }

    #[test]
    fn test_path_with_extension() {
        let table = table();
        assert_eq!(table.folder_for_path(Path::new("/tmp/report.pdf")), "Documents");
        assert_eq!(table.folder_for_path(Path::new("photo.JPG")), "Images");
    }

    #[test]
    fn test_path_without_extension() {
        let table = table();
        assert_eq!(table.folder_for_path(Path::new("/tmp/README")), "Others");
        assert_eq!(table.folder_for_path(Path::new(".gitignore")), "Others");
    }

    #[test]
    fn test_only_last_extension_component_counts() {
        let table = table();
        // "archive.pdf.bak" has extension "bak", not "pdf".
        assert_eq!(table.folder_for_path(Path::new("archive.pdf.bak")), "Others");
    }

    #[test]
    fn test_folder_names_returned_verbatim() {
        let mut rules = HashMap::new();
        rules.insert("mp3".to_string(), "My Music".to_string());
        let table = RuleTable::new(rules, "Misc Stuff".to_string());
        assert_eq!(table.folder_for_extension("mp3"), "My Music");
        assert_eq!(table.default_folder(), "Misc Stuff");
    }
}
