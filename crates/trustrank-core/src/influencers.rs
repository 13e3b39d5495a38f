use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::social::SocialHandle;
use crate::ConfigError;

/// One influencer entry in the seed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluencerConfig {
    pub name: String,
    pub niche: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub social: Vec<SocialHandle>,
    pub notes: Option<String>,
}

impl InfluencerConfig {
    /// Generate a URL-safe slug from the influencer name.
    ///
    /// Accented Latin letters are folded to ASCII so `"Léna Situations"`
    /// becomes `"lena-situations"`.
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(fold_accent)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else if c == ' ' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'ö' | 'õ' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ÿ' | 'ý' => 'y',
        other => other,
    }
}

#[derive(Debug, Deserialize)]
pub struct InfluencersFile {
    pub influencers: Vec<InfluencerConfig>,
}

/// Load and validate the influencer seed file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_influencers(path: &Path) -> Result<InfluencersFile, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::InfluencersFileIo {
            path: path.display().to_string(),
            source: e,
        })?;

    parse_influencers(&content)
}

/// Parse and validate seed file contents.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_influencers(content: &str) -> Result<InfluencersFile, ConfigError> {
    let file: InfluencersFile = serde_yaml::from_str(content)?;
    validate_influencers(&file)?;
    Ok(file)
}

fn validate_influencers(file: &InfluencersFile) -> Result<(), ConfigError> {
    let mut seen_slugs = HashSet::new();

    for influencer in &file.influencers {
        if influencer.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "influencer name must be non-empty".to_string(),
            ));
        }

        let slug = influencer.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "influencer '{}' produces an empty slug",
                influencer.name
            )));
        }
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate influencer slug: '{}' (from '{}')",
                slug, influencer.name
            )));
        }

        if influencer
            .social
            .iter()
            .any(|h| h.platform.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "influencer '{}' has a social handle without a platform",
                influencer.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn influencer(name: &str) -> InfluencerConfig {
        InfluencerConfig {
            name: name.to_string(),
            niche: None,
            image_url: None,
            social: vec![],
            notes: None,
        }
    }

    #[test]
    fn slug_simple_name() {
        assert_eq!(influencer("Squeezie").slug(), "squeezie");
    }

    #[test]
    fn slug_folds_accents_and_spaces() {
        assert_eq!(influencer("Léna Situations").slug(), "lena-situations");
    }

    #[test]
    fn slug_strips_punctuation() {
        assert_eq!(influencer("Mister V!! (Officiel)").slug(), "mister-v-officiel");
    }

    #[test]
    fn parse_valid_file() {
        let yaml = r"
influencers:
  - name: Squeezie
    niche: gaming
    social:
      - platform: youtube
        followers: 18M
  - name: Cyprien
";
        let file = parse_influencers(yaml).expect("valid file");
        assert_eq!(file.influencers.len(), 2);
        assert_eq!(file.influencers[0].social[0].followers, "18M");
        assert!(file.influencers[1].social.is_empty());
    }

    #[test]
    fn duplicate_slug_is_rejected() {
        let yaml = r"
influencers:
  - name: Tibo InShape
  - name: tibo inshape
";
        let err = parse_influencers(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn blank_name_is_rejected() {
        let yaml = r"
influencers:
  - name: '  '
";
        assert!(matches!(
            parse_influencers(yaml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        assert!(matches!(
            parse_influencers("influencers: [oops"),
            Err(ConfigError::InfluencersFileParse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_influencers(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::InfluencersFileIo { .. }));
    }

    #[test]
    fn load_influencers_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("influencers.yaml");
        let file = load_influencers(&path).expect("failed to load influencers.yaml");
        assert!(!file.influencers.is_empty());
        assert!(file
            .influencers
            .iter()
            .any(|i| i.slug() == "lena-situations"));
    }
}
