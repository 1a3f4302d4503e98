//! Image reference parsing and on-disk lookup.
//!
//! Card rows reference images as `images/<SET_CODE>/<FILE>.<ext>` but the
//! image tree accumulated years of inconsistent naming: swapped extensions,
//! editorial suffixes, a dotless-extension data-entry defect, and one legacy
//! set directory that was renamed outright. [`ImageLocator`] holds the image
//! roots plus a stem index of every file on disk and resolves a referenced
//! path to the file that actually exists.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

/// Image extensions tried when probing for a file, in preference order.
pub const IMAGE_EXTS: [&str; 3] = ["jpeg", "jpg", "png"];

/// Editorial suffixes that may appear on a stem without a matching file.
pub const STRIP_SUFFIXES: [&str; 2] = ["-ai", "-trib"];

/// Legacy set directory that was renamed; files under it now carry the
/// replacement code in both the directory and the file name.
pub const LEGACY_SET_CODE: &str = "STD";
pub const LEGACY_SET_REPLACEMENT: &str = "SD2";

lazy_static! {
    static ref IMAGE_REF_RE: Regex =
        Regex::new(r"images/([A-Z0-9]+)/([A-Za-z0-9_.-]+)\.(jpeg|jpg|png)$").unwrap();
    static ref LEGACY_STEM_RE: Regex = Regex::new(r"STD-(\d+)").unwrap();
}

/// A parsed `images/<SET_CODE>/<FILE>.<ext>` reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub set_code: String,
    pub stem: String,
}

impl ImageRef {
    /// The stem plus each known-suffix-stripped variant, in lookup order.
    pub fn stems_to_try(&self) -> Vec<String> {
        let mut stems = vec![self.stem.clone()];
        for suffix in STRIP_SUFFIXES {
            if let Some(stripped) = self.stem.strip_suffix(suffix) {
                stems.push(stripped.to_string());
            }
        }
        stems
    }
}

/// Parses an image reference, repairing the known dotless-`jpeg` defect
/// (e.g. `images/VOY/VOY-143jpeg`) before giving up.
pub fn parse_image_ref(expected: &str) -> Option<ImageRef> {
    if let Some(caps) = IMAGE_REF_RE.captures(expected) {
        return Some(image_ref_from_captures(&caps));
    }
    let last = expected.rsplit('/').next()?;
    if expected.split('/').count() >= 3
        && !last.contains('.')
        && last.len() >= 4
        && last.to_ascii_lowercase().ends_with("jpeg")
    {
        let repaired = format!("{}.jpeg", &expected[..expected.len() - 4]);
        if let Some(caps) = IMAGE_REF_RE.captures(&repaired) {
            return Some(image_ref_from_captures(&caps));
        }
    }
    None
}

fn image_ref_from_captures(caps: &regex::Captures) -> ImageRef {
    let file_name = &caps[2];
    // A stem like "VOY-143.ai" still carries a bogus inner extension.
    let stem = Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    ImageRef {
        set_code: caps[1].to_string(),
        stem,
    }
}

/// Resolves referenced image paths against one or more image root
/// directories, with a precomputed stem index for the global fallback.
pub struct ImageLocator {
    roots: Vec<PathBuf>,
    index: HashMap<String, Vec<PathBuf>>,
}

impl ImageLocator {
    /// Scans `<root>/<SET_CODE>/*` under every root and indexes each file by
    /// stem (and by each suffix-stripped stem variant).
    pub fn new(roots: &[PathBuf]) -> Self {
        let index = build_index(roots);
        log::debug!(
            "Indexed {} image stems under {} root(s)",
            index.len(),
            roots.len()
        );
        Self {
            roots: roots.to_vec(),
            index,
        }
    }

    /// Whether the literal referenced path exists under any root.
    pub fn exists(&self, file_name: &str) -> bool {
        let relative = file_name.replace("images/", "");
        self.roots.iter().any(|root| root.join(&relative).exists())
    }

    /// Finds a substitute path for a missing reference using the full
    /// heuristic chain, including the global index fallback.
    ///
    /// When several indexed files share a stem the first one encountered
    /// during the directory scan wins; that order is filesystem-dependent
    /// and not guaranteed stable across platforms.
    pub fn find_candidate(&self, expected: &str) -> Option<String> {
        let reference = parse_image_ref(expected)?;
        self.candidate_for(&reference, true)
    }

    /// Whether any heuristic rewrite of the reference names an existing file
    /// in its own (or the legacy-renamed) set directory. Used by the
    /// diagnostic checker, which does not consult the global index.
    pub fn has_known_candidate(&self, expected: &str) -> bool {
        parse_image_ref(expected)
            .and_then(|reference| self.candidate_for(&reference, false))
            .is_some()
    }

    fn candidate_for(&self, reference: &ImageRef, use_index: bool) -> Option<String> {
        if let Some(candidate) = self.legacy_candidate(reference) {
            return Some(candidate);
        }
        for stem in reference.stems_to_try() {
            if let Some(candidate) = self.probe_set_dir(&reference.set_code, &stem) {
                return Some(candidate);
            }
            if use_index {
                if let Some(candidate) = self.lookup_index(&stem) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Legacy-set rename: `images/STD/STD-042.jpeg` moved to
    /// `images/SD2/SD2-042.<ext>`.
    fn legacy_candidate(&self, reference: &ImageRef) -> Option<String> {
        if reference.set_code != LEGACY_SET_CODE {
            return None;
        }
        let caps = LEGACY_STEM_RE.captures(&reference.stem)?;
        let alt_stem = format!("{}-{}", LEGACY_SET_REPLACEMENT, &caps[1]);
        for root in &self.roots {
            let dir = root.join(LEGACY_SET_REPLACEMENT);
            for ext in IMAGE_EXTS {
                if dir.join(format!("{alt_stem}.{ext}")).exists() {
                    return Some(format!("images/{LEGACY_SET_REPLACEMENT}/{alt_stem}.{ext}"));
                }
            }
        }
        None
    }

    /// Probes the reference's own set directory for extension variants,
    /// including the dotless malformed spelling.
    fn probe_set_dir(&self, set_code: &str, stem: &str) -> Option<String> {
        for root in &self.roots {
            let dir = root.join(set_code);
            for ext in IMAGE_EXTS {
                if dir.join(format!("{stem}.{ext}")).exists() {
                    return Some(format!("images/{set_code}/{stem}.{ext}"));
                }
                if dir.join(format!("{stem}{ext}")).exists() {
                    return Some(format!("images/{set_code}/{stem}{ext}"));
                }
            }
        }
        None
    }

    /// Global fallback: any on-disk file with this stem, in any set
    /// directory. Tie-break among multiple matches is arbitrary.
    fn lookup_index(&self, stem: &str) -> Option<String> {
        let file = self.index.get(stem)?.first()?;
        let set_dir = file.parent()?.file_name()?.to_str()?;
        let name = file.file_name()?.to_str()?;
        Some(format!("images/{set_dir}/{name}"))
    }
}

fn build_index(roots: &[PathBuf]) -> HashMap<String, Vec<PathBuf>> {
    let mut index: HashMap<String, Vec<PathBuf>> = HashMap::new();
    for root in roots {
        let Ok(entries) = fs::read_dir(root) else {
            continue;
        };
        for entry in entries.flatten() {
            let set_dir = entry.path();
            if !set_dir.is_dir() {
                continue;
            }
            let Ok(files) = fs::read_dir(&set_dir) else {
                continue;
            };
            for file in files.flatten() {
                let path = file.path();
                if !path.is_file() {
                    continue;
                }
                let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                    continue;
                };
                if !name.contains('.') {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                    continue;
                };
                index.entry(stem.to_string()).or_default().push(path.clone());
                for suffix in STRIP_SUFFIXES {
                    if let Some(stripped) = stem.strip_suffix(suffix) {
                        index.entry(stripped.to_string()).or_default().push(path.clone());
                    }
                }
            }
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"img").unwrap();
    }

    #[test]
    fn test_parse_image_ref() {
        let parsed = parse_image_ref("images/HAD/HAD-010.jpeg").unwrap();
        assert_eq!(parsed.set_code, "HAD");
        assert_eq!(parsed.stem, "HAD-010");
    }

    #[test]
    fn test_parse_image_ref_strips_inner_extension() {
        let parsed = parse_image_ref("images/VOY/VOY-143.ai.jpeg").unwrap();
        assert_eq!(parsed.stem, "VOY-143");
    }

    #[test]
    fn test_parse_image_ref_repairs_dotless_jpeg() {
        let parsed = parse_image_ref("images/VOY/VOY-143jpeg").unwrap();
        assert_eq!(parsed.set_code, "VOY");
        assert_eq!(parsed.stem, "VOY-143");
    }

    #[test]
    fn test_parse_image_ref_rejects_unrelated_paths() {
        assert!(parse_image_ref("pack-art/AGT.png").is_none());
        assert!(parse_image_ref("images/AGT/file.gif").is_none());
        assert!(parse_image_ref("plainname").is_none());
    }

    #[test]
    fn test_stems_to_try_includes_suffix_stripped_variant() {
        let reference = ImageRef {
            set_code: "HAD".to_string(),
            stem: "HAD-010-ai".to_string(),
        };
        assert_eq!(reference.stems_to_try(), vec!["HAD-010-ai", "HAD-010"]);
    }

    #[test]
    fn test_exists_checks_all_roots() {
        let dir = TempDir::new().unwrap();
        let primary = dir.path().join("images");
        let secondary = dir.path().join("site").join("images");
        touch(&secondary.join("AGT").join("AGT-001.jpeg"));

        let locator = ImageLocator::new(&[primary, secondary]);
        assert!(locator.exists("images/AGT/AGT-001.jpeg"));
        assert!(!locator.exists("images/AGT/AGT-002.jpeg"));
    }

    #[test]
    fn test_legacy_set_rename() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("images");
        touch(&root.join("SD2").join("SD2-042.jpeg"));

        let locator = ImageLocator::new(&[root]);
        assert_eq!(
            locator.find_candidate("images/STD/STD-042.jpeg"),
            Some("images/SD2/SD2-042.jpeg".to_string())
        );
    }

    #[test]
    fn test_extension_substitution() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("images");
        touch(&root.join("AGT").join("AGT-003.png"));

        let locator = ImageLocator::new(&[root]);
        assert_eq!(
            locator.find_candidate("images/AGT/AGT-003.jpeg"),
            Some("images/AGT/AGT-003.png".to_string())
        );
    }

    #[test]
    fn test_suffix_strip_with_extension_swap() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("images");
        touch(&root.join("HAD").join("HAD-010.jpg"));

        let locator = ImageLocator::new(&[root]);
        assert_eq!(
            locator.find_candidate("images/HAD/HAD-010-ai.jpeg"),
            Some("images/HAD/HAD-010.jpg".to_string())
        );
    }

    #[test]
    fn test_dotless_file_on_disk_is_found() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("images");
        // The file itself was saved without the dot.
        touch(&root.join("VOY").join("VOY-143jpeg"));

        let locator = ImageLocator::new(&[root]);
        assert_eq!(
            locator.find_candidate("images/VOY/VOY-143.jpeg"),
            Some("images/VOY/VOY-143jpeg".to_string())
        );
    }

    #[test]
    fn test_index_fallback_finds_file_in_other_set_directory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("images");
        touch(&root.join("PRO").join("QQQ-007.jpeg"));

        let locator = ImageLocator::new(&[root]);
        assert_eq!(
            locator.find_candidate("images/QQQ/QQQ-007.jpeg"),
            Some("images/PRO/QQQ-007.jpeg".to_string())
        );
        // The diagnostic probe ignores the index on purpose.
        assert!(!locator.has_known_candidate("images/QQQ/QQQ-007.jpeg"));
    }

    #[test]
    fn test_index_matches_suffixed_file_for_bare_stem() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("images");
        touch(&root.join("TRB").join("TRB-001-trib.png"));

        let locator = ImageLocator::new(&[root]);
        assert_eq!(
            locator.find_candidate("images/ALT/TRB-001.jpeg"),
            Some("images/TRB/TRB-001-trib.png".to_string())
        );
    }

    #[test]
    fn test_no_candidate_leaves_nothing_found() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("images");
        fs::create_dir_all(&root).unwrap();

        let locator = ImageLocator::new(&[root]);
        assert_eq!(locator.find_candidate("images/AGT/AGT-001.jpeg"), None);
    }
}
