use std::env;

use once_cell::sync::Lazy;

use crate::prompt::geometry::{
    DEFAULT_NEAR_THRESHOLD, DEFAULT_OVERLAP_THRESHOLD, DEFAULT_REGION_TOLERANCE,
};
use crate::prompt::synthesize::{PromptOptions, DEFAULT_RELATIVE_PAIR_CAP, DEFAULT_TRAILER};

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub prompt_trailer: String,
    pub region_tolerance: f64,
    pub near_threshold: f64,
    pub overlap_threshold: f64,
    pub relative_pair_cap: usize,
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::load);

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn load() -> Self {
        Config {
            log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
            prompt_trailer: env_string("PROMPT_TRAILER", DEFAULT_TRAILER),
            region_tolerance: env_f64("REGION_TOLERANCE", DEFAULT_REGION_TOLERANCE),
            near_threshold: env_f64("NEAR_THRESHOLD", DEFAULT_NEAR_THRESHOLD),
            overlap_threshold: env_f64("OVERLAP_THRESHOLD", DEFAULT_OVERLAP_THRESHOLD),
            relative_pair_cap: env_usize("RELATIVE_PAIR_CAP", DEFAULT_RELATIVE_PAIR_CAP),
        }
    }

    /// Synthesis knobs as configured by the environment; falls back to
    /// the reference defaults field by field.
    pub fn prompt_options(&self) -> PromptOptions {
        PromptOptions {
            trailer: self.prompt_trailer.clone(),
            region_tolerance: self.region_tolerance,
            near_threshold: self.near_threshold,
            overlap_threshold: self.overlap_threshold,
            relative_pair_cap: self.relative_pair_cap,
        }
    }
}
