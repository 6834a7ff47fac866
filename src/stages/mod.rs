pub mod stage0_sanitize;
pub mod stage1_parse;
pub mod stage2_build;

pub use stage0_sanitize::{
    decode_lossy, default_noise_phrases, is_garbled, sanitize, strip_noise, NormalizerConfig,
};
pub use stage1_parse::{parse_report, truncate_chars, ParserConfig};
pub use stage2_build::{build_checklists, BuildResult};
