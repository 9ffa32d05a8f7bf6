//! Backend capabilities consulted by copy decisions.
//!
//! # Environment Variables
//!
//! - `TEXADJ_MAX_TEXTURE_SIZE` - Override maximum texture dimension
//! - `TEXADJ_NO_NPOT_TILING` - Disable repeat wrap on non-power-of-two textures ("1" or "true")
//! - `TEXADJ_DISABLE_MIPMAPS` - Disable mipmap support ("1" or "true")

use std::env;

use texadj_core::{Error, Result};

/// Default assumptions when the backend reports nothing.
const DEFAULT_MAX_TEXTURE_SIZE: u32 = 16384;
const MIN_TEXTURE_SIZE_OVERRIDE: u32 = 64;
const MAX_TEXTURE_SIZE_OVERRIDE: u32 = 65536;

/// GPU capability limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuCaps {
    /// Maximum texture dimension (width or height).
    pub max_texture_size: u32,
    /// Repeat/mirror wrap works on non-power-of-two textures.
    pub npot_texture_tile_support: bool,
    /// Mip-mapped textures can be created and sampled.
    pub mip_map_support: bool,
}

impl Default for GpuCaps {
    fn default() -> Self {
        Self {
            max_texture_size: DEFAULT_MAX_TEXTURE_SIZE,
            npot_texture_tile_support: true,
            mip_map_support: true,
        }
    }
}

impl GpuCaps {
    /// Caps of a backend without NPOT tiling (GLES2 class hardware).
    pub fn without_npot_tiling() -> Self {
        Self {
            npot_texture_tile_support: false,
            ..Self::default()
        }
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut caps = Self::default();

        if let Ok(v) = env::var("TEXADJ_MAX_TEXTURE_SIZE") {
            caps.max_texture_size = parse_texture_size("TEXADJ_MAX_TEXTURE_SIZE", &v)?;
        }
        if env_flag("TEXADJ_NO_NPOT_TILING") {
            caps.npot_texture_tile_support = false;
        }
        if env_flag("TEXADJ_DISABLE_MIPMAPS") {
            caps.mip_map_support = false;
        }

        tracing::debug!(
            max_texture_size = caps.max_texture_size,
            npot_tiling = caps.npot_texture_tile_support,
            mipmaps = caps.mip_map_support,
            "GPU caps"
        );
        Ok(caps)
    }

    /// Check if a texture fits within the backend limits.
    #[inline]
    pub fn fits(&self, width: u32, height: u32) -> bool {
        width <= self.max_texture_size && height <= self.max_texture_size
    }
}

fn parse_texture_size(name: &str, raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|s| (MIN_TEXTURE_SIZE_OVERRIDE..=MAX_TEXTURE_SIZE_OVERRIDE).contains(s))
        .ok_or_else(|| Error::invalid_config(name, raw))
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
