//! Built-in job sets for the Clear Choice Restoration website.

use crate::{
    error::{GenerationError, Result},
    models::JobSet,
};
use std::path::Path;

/// Placeholder in preset reference paths, replaced by the configured logo symbol.
pub const LOGO_SYMBOL_PLACEHOLDER: &str = "{logo_symbol}";

const PRESETS: &[(&str, &str)] = &[
    ("site", include_str!("../../presets/site.json")),
    ("backgrounds", include_str!("../../presets/backgrounds.json")),
    ("more-backgrounds", include_str!("../../presets/more-backgrounds.json")),
    ("logos", include_str!("../../presets/logos.json")),
];

pub fn names() -> Vec<&'static str> {
    PRESETS.iter().map(|(name, _)| *name).collect()
}

pub fn get(name: &str, logo_symbol: &Path) -> Result<JobSet> {
    let (_, json) = PRESETS
        .iter()
        .find(|(preset, _)| *preset == name)
        .ok_or_else(|| {
            GenerationError::Manifest(format!(
                "unknown preset '{}' (available: {})",
                name,
                names().join(", ")
            ))
        })?;

    let mut set = JobSet::from_json_str(json)?;
    for job in &mut set.jobs {
        for reference in &mut job.reference_images {
            if reference.as_os_str() == LOGO_SYMBOL_PLACEHOLDER {
                *reference = logo_symbol.to_path_buf();
            }
        }
    }
    set.validate()?;
    Ok(set)
}

pub fn all(logo_symbol: &Path) -> Result<Vec<JobSet>> {
    names()
        .into_iter()
        .map(|name| get(name, logo_symbol))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_all_presets_parse_and_validate() {
        let sets = all(Path::new("logo.jpg")).unwrap();
        assert_eq!(sets.len(), 4);
        for set in &sets {
            assert!(!set.jobs.is_empty(), "{} has no jobs", set.name);
        }
    }

    #[test]
    fn test_site_preset() {
        let site = get("site", Path::new("/brand/symbol.jpg")).unwrap();
        assert_eq!(site.jobs.len(), 10);
        assert_eq!(site.output_dir, PathBuf::from("Images/Site"));
        assert_eq!(site.image_size.as_deref(), Some("2K"));

        let hero = &site.jobs[0];
        assert_eq!(hero.filename, "hero-banner.jpg");
        assert_eq!(hero.aspect_ratio.as_deref(), Some("21:9"));
        assert!(hero.reference_images.is_empty());

        let inspection = &site.jobs[1];
        assert_eq!(
            inspection.reference_images,
            vec![PathBuf::from("/brand/symbol.jpg")]
        );
    }

    #[test]
    fn test_background_presets_use_flash_model_without_hints() {
        let backgrounds = get("backgrounds", Path::new("logo.jpg")).unwrap();
        assert_eq!(backgrounds.jobs.len(), 5);
        assert_eq!(backgrounds.model.as_deref(), Some("gemini-2.0-flash-exp"));
        assert!(backgrounds.aspect_ratio.is_none());
        assert!(backgrounds.jobs.iter().all(|job| job.aspect_ratio.is_none()));

        let more = get("more-backgrounds", Path::new("logo.jpg")).unwrap();
        assert_eq!(more.jobs.len(), 2);
        assert_eq!(more.output_dir, backgrounds.output_dir);
    }

    #[test]
    fn test_logo_preset() {
        let logos = get("logos", Path::new("symbol.jpg")).unwrap();
        let ratios: Vec<_> = logos
            .jobs
            .iter()
            .map(|job| job.aspect_ratio.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(ratios, vec!["21:9", "1:1"]);
    }

    #[test]
    fn test_unknown_preset() {
        let err = get("favicons", Path::new("logo.jpg")).unwrap_err();
        assert!(err.to_string().contains("available: site"));
    }
}
