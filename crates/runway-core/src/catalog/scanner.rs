//! Catalog scanning over the show directory layout.
//!
//! Photographs live in `root/"{designer} {season} {year} {show}"/`. The
//! scanner visits every combination of the configured attributes in
//! declaration order, skips directories that do not exist, and builds one
//! tagged [`ImageRecord`] per supported image file.

use std::path::Path;
use std::sync::Arc;

use walkdir::WalkDir;

use crate::config::{CatalogConfig, Config, FailurePolicy};
use crate::error::PipelineResult;
use crate::tagging::{FeatureTagger, SimilarityOracle, Vocabulary};
use crate::types::{ImageRecord, ShowKey};

use super::thumbnail::{JpegThumbnailer, ThumbnailCodec};

/// The enumerated attribute values a scan iterates over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogDimensions {
    pub designers: Vec<String>,
    pub seasons: Vec<String>,
    pub years: Vec<String>,
    pub shows: Vec<String>,
}

impl CatalogDimensions {
    /// Every `designer × season × year × show` combination, designer outermost.
    pub fn show_keys(&self) -> impl Iterator<Item = ShowKey> + '_ {
        self.designers.iter().flat_map(move |designer| {
            self.seasons.iter().flat_map(move |season| {
                self.years.iter().flat_map(move |year| {
                    self.shows
                        .iter()
                        .map(move |show| ShowKey::new(designer, season, year, show))
                })
            })
        })
    }
}

impl From<&CatalogConfig> for CatalogDimensions {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            designers: config.designers.clone(),
            seasons: config.seasons.clone(),
            years: config.years.clone(),
            shows: config.shows.clone(),
        }
    }
}

/// Counters collected during one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Show directories that existed
    pub directories: usize,
    /// Image records produced
    pub images: usize,
    /// Images that ended up with no labels because tagging failed
    pub tag_failures: usize,
    /// Images that ended up with no thumbnail because encoding failed
    pub thumbnail_failures: usize,
    /// Directory entries that could not be read and were skipped
    pub unreadable_entries: usize,
}

/// Builds image records by walking show directories.
pub struct CatalogScanner {
    tagger: FeatureTagger,
    thumbnails: Arc<dyn ThumbnailCodec>,
    vocabulary: Arc<Vocabulary>,
    supported_formats: Vec<String>,
    failure_policy: FailurePolicy,
}

impl CatalogScanner {
    pub fn new(
        tagger: FeatureTagger,
        thumbnails: Arc<dyn ThumbnailCodec>,
        vocabulary: Arc<Vocabulary>,
        supported_formats: Vec<String>,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            tagger,
            thumbnails,
            vocabulary,
            supported_formats,
            failure_policy,
        }
    }

    /// Wire a scanner from configuration around the given oracle.
    pub fn from_config(config: &Config, oracle: Arc<dyn SimilarityOracle>) -> Self {
        Self::new(
            FeatureTagger::new(oracle, &config.tagging),
            Arc::new(JpegThumbnailer::new(config.thumbnail.clone())),
            Arc::new(config.vocabulary()),
            config.catalog.supported_formats.clone(),
            config.tagging.failure_policy,
        )
    }

    /// Scan `root` for every show in `dimensions`.
    ///
    /// Missing show directories contribute nothing. Records follow the
    /// combination order; within a directory they follow listing order.
    pub fn scan(
        &self,
        root: &Path,
        dimensions: &CatalogDimensions,
    ) -> PipelineResult<Vec<ImageRecord>> {
        self.scan_with_report(root, dimensions)
            .map(|(records, _)| records)
    }

    /// Like [`scan`](Self::scan), also returning per-scan counters.
    pub fn scan_with_report(
        &self,
        root: &Path,
        dimensions: &CatalogDimensions,
    ) -> PipelineResult<(Vec<ImageRecord>, ScanReport)> {
        let start = std::time::Instant::now();
        let mut records = Vec::new();
        let mut report = ScanReport::default();

        for key in dimensions.show_keys() {
            let dir = root.join(key.dir_name());
            if !dir.is_dir() {
                tracing::trace!("No directory for {:?}", dir);
                continue;
            }
            report.directories += 1;

            for entry in WalkDir::new(&dir)
                .min_depth(1)
                .max_depth(1)
                .follow_links(true)
            {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!("Skipping unreadable entry in {:?}: {e}", dir);
                        report.unreadable_entries += 1;
                        continue;
                    }
                };
                let path = entry.path();
                if !entry.file_type().is_file() || !self.is_supported(path) {
                    continue;
                }
                records.push(self.build_record(path, &key, &mut report)?);
            }
        }

        report.images = records.len();
        tracing::info!(
            "Scanned {} show directories: {} images ({} untagged, {} without thumbnail, {} unreadable) in {:?}",
            report.directories,
            report.images,
            report.tag_failures,
            report.thumbnail_failures,
            report.unreadable_entries,
            start.elapsed()
        );

        Ok((records, report))
    }

    fn build_record(
        &self,
        path: &Path,
        key: &ShowKey,
        report: &mut ScanReport,
    ) -> PipelineResult<ImageRecord> {
        let labels = match self.tagger.try_tag(path, &self.vocabulary) {
            Ok(labels) => labels,
            Err(e) if self.failure_policy == FailurePolicy::Degrade => {
                tracing::warn!("Tagging skipped: {e}");
                report.tag_failures += 1;
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let thumbnail = match self.thumbnails.encode(path) {
            Ok(payload) => payload,
            Err(e) if self.failure_policy == FailurePolicy::Degrade => {
                tracing::warn!("Thumbnail skipped: {e}");
                report.thumbnail_failures += 1;
                String::new()
            }
            Err(e) => return Err(e),
        };

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(ImageRecord {
            path: path.to_path_buf(),
            file_name,
            designer: key.designer.clone(),
            season: key.season.clone(),
            year: key.year.clone(),
            show: key.show.clone(),
            labels,
            thumbnail,
        })
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.supported_formats
                    .iter()
                    .any(|fmt| fmt.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    pub fn tagger(&self) -> &FeatureTagger {
        &self.tagger
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaggingConfig;
    use crate::error::PipelineError;
    use crate::tagging::SimilarityOracle;
    use crate::types::Label;

    struct NoMatches;

    impl SimilarityOracle for NoMatches {
        fn score(&self, _image: &Path, labels: &[Label]) -> PipelineResult<Vec<f32>> {
            Ok(vec![0.0; labels.len()])
        }
    }

    struct NoThumbnails;

    impl ThumbnailCodec for NoThumbnails {
        fn encode(&self, _path: &Path) -> PipelineResult<String> {
            Ok(String::new())
        }
    }

    struct BrokenThumbnails;

    impl ThumbnailCodec for BrokenThumbnails {
        fn encode(&self, path: &Path) -> PipelineResult<String> {
            Err(PipelineError::Thumbnail {
                path: path.to_path_buf(),
                message: "codec unavailable".to_string(),
            })
        }
    }

    fn scanner(codec: Arc<dyn ThumbnailCodec>, policy: FailurePolicy) -> CatalogScanner {
        CatalogScanner::new(
            FeatureTagger::new(Arc::new(NoMatches), &TaggingConfig::default()),
            codec,
            Arc::new(Vocabulary::from_labels(vec!["dress".to_string()])),
            vec!["png".into(), "jpg".into(), "jpeg".into()],
            policy,
        )
    }

    fn dims(designers: &[&str], years: &[&str]) -> CatalogDimensions {
        CatalogDimensions {
            designers: designers.iter().map(|s| s.to_string()).collect(),
            seasons: vec!["Fall Winter".to_string()],
            years: years.iter().map(|s| s.to_string()).collect(),
            shows: vec!["Paris".to_string()],
        }
    }

    #[test]
    fn test_show_keys_cartesian_order() {
        let d = CatalogDimensions {
            designers: vec!["A".into(), "B".into()],
            seasons: vec!["S".into()],
            years: vec!["1".into(), "2".into()],
            shows: vec!["P".into()],
        };
        let names: Vec<String> = d.show_keys().map(|k| k.dir_name()).collect();
        assert_eq!(names, vec!["A S 1 P", "A S 2 P", "B S 1 P", "B S 2 P"]);
    }

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        let s = scanner(Arc::new(NoThumbnails), FailurePolicy::Degrade);
        assert!(s.is_supported(Path::new("a.JPG")));
        assert!(s.is_supported(Path::new("a.Jpeg")));
        assert!(s.is_supported(Path::new("a.png")));
        assert!(!s.is_supported(Path::new("a.webp")));
        assert!(!s.is_supported(Path::new("README")));
    }

    #[test]
    fn test_missing_root_yields_empty_catalog() {
        let s = scanner(Arc::new(NoThumbnails), FailurePolicy::Degrade);
        let (records, report) = s
            .scan_with_report(Path::new("/nonexistent/root"), &dims(&["YSL"], &["2025"]))
            .unwrap();
        assert!(records.is_empty());
        assert_eq!(report, ScanReport::default());
    }

    #[test]
    fn test_scan_skips_other_files_and_subdirectories() {
        let root = tempfile::tempdir().unwrap();
        let show = root.path().join("YSL Fall Winter 2025 Paris");
        std::fs::create_dir_all(show.join("nested")).unwrap();
        std::fs::write(show.join("a.jpg"), b"x").unwrap();
        std::fs::write(show.join("notes.txt"), b"x").unwrap();
        std::fs::write(show.join("nested").join("b.jpg"), b"x").unwrap();

        let s = scanner(Arc::new(NoThumbnails), FailurePolicy::Degrade);
        let records = s.scan(root.path(), &dims(&["YSL"], &["2025"])).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file_name, "a.jpg");
        assert_eq!(records[0].designer, "YSL");
        assert_eq!(records[0].season, "Fall Winter");
        assert_eq!(records[0].year, "2025");
        assert_eq!(records[0].show, "Paris");
    }

    #[test]
    fn test_records_follow_combination_order() {
        let root = tempfile::tempdir().unwrap();
        for dir in ["Dior Fall Winter 2024 Paris", "YSL Fall Winter 2023 Paris"] {
            std::fs::create_dir_all(root.path().join(dir)).unwrap();
            std::fs::write(root.path().join(dir).join("look.png"), b"x").unwrap();
        }

        let s = scanner(Arc::new(NoThumbnails), FailurePolicy::Degrade);
        let records = s
            .scan(root.path(), &dims(&["YSL", "Dior"], &["2023", "2024"]))
            .unwrap();
        let designers: Vec<&str> = records.iter().map(|r| r.designer.as_str()).collect();
        assert_eq!(designers, vec!["YSL", "Dior"]);
    }

    #[test]
    fn test_thumbnail_failure_degrades() {
        let root = tempfile::tempdir().unwrap();
        let show = root.path().join("YSL Fall Winter 2025 Paris");
        std::fs::create_dir_all(&show).unwrap();
        std::fs::write(show.join("a.jpg"), b"x").unwrap();

        let s = scanner(Arc::new(BrokenThumbnails), FailurePolicy::Degrade);
        let (records, report) = s
            .scan_with_report(root.path(), &dims(&["YSL"], &["2025"]))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].thumbnail.is_empty());
        assert_eq!(report.thumbnail_failures, 1);
        assert_eq!(report.directories, 1);
    }

    #[test]
    fn test_thumbnail_failure_propagates_when_configured() {
        let root = tempfile::tempdir().unwrap();
        let show = root.path().join("YSL Fall Winter 2025 Paris");
        std::fs::create_dir_all(&show).unwrap();
        std::fs::write(show.join("a.jpg"), b"x").unwrap();

        let s = scanner(Arc::new(BrokenThumbnails), FailurePolicy::Propagate);
        let err = s.scan(root.path(), &dims(&["YSL"], &["2025"])).unwrap_err();
        assert!(matches!(err, PipelineError::Thumbnail { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_entries_are_counted_and_skipped() {
        let root = tempfile::tempdir().unwrap();
        let show = root.path().join("YSL Fall Winter 2025 Paris");
        std::fs::create_dir_all(&show).unwrap();
        std::fs::write(show.join("a.jpg"), b"x").unwrap();
        std::os::unix::fs::symlink(show.join("gone.jpg"), show.join("dangling.jpg")).unwrap();

        let s = scanner(Arc::new(NoThumbnails), FailurePolicy::Propagate);
        let (records, report) = s
            .scan_with_report(root.path(), &dims(&["YSL"], &["2025"]))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file_name, "a.jpg");
        assert_eq!(report.unreadable_entries, 1);
    }
}
