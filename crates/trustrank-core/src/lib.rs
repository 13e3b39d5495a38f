//! Domain types, validation and configuration shared by every trustrank crate.

pub mod app_config;
pub mod config;
pub mod influencers;
pub mod mentions;
pub mod scoring;
pub mod signals;
pub mod social;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use influencers::{
    load_influencers, parse_influencers, slugify, InfluencerConfig, InfluencersFile,
};
pub use mentions::{Mention, MentionLabel, Severity};
pub use scoring::{ScoringConfig, SignalCountingPolicy};
pub use signals::{content_hash, CommunitySignal, NewCommunitySignal, SignalStatus, SignalType};
pub use social::{parse_social_handles, SocialHandle};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read influencers file {path}: {source}")]
    InfluencersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse influencers file: {0}")]
    InfluencersFileParse(#[from] serde_yaml::Error),

    #[error("invalid influencers file: {0}")]
    Validation(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("a RATING signal requires a rating")]
    MissingRating,

    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i16),

    #[error("only RATING signals may carry a rating ({0} given one)")]
    UnexpectedRating(SignalType),

    #[error("comment must not be blank")]
    BlankComment,

    #[error("comment exceeds {max} characters")]
    CommentTooLong { max: usize },

    #[error("unknown signal type: {0}")]
    UnknownSignalType(String),

    #[error("unknown severity: {0}")]
    UnknownSeverity(String),

    #[error("unknown signal status: {0}")]
    UnknownSignalStatus(String),
}
