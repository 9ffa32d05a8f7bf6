//! Sampler state: wrap mode per axis and filter.

/// Behaviour for texture coordinates outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    #[default]
    Clamp,
    Repeat,
    MirrorRepeat,
}

/// Texture filter.
///
/// `MipMap` implies trilinear sampling across mip levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Filter {
    #[default]
    Nearest = 0,
    Bilerp = 1,
    MipMap = 2,
}

impl Filter {
    /// Key word for this filter.
    #[inline]
    pub const fn as_word(self) -> u32 {
        self as u32
    }
}

/// How a texture is sampled. Default is clamp + nearest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SamplerState {
    pub wrap_x: WrapMode,
    pub wrap_y: WrapMode,
    pub filter: Filter,
}

impl SamplerState {
    /// Same wrap mode on both axes.
    pub const fn new(wrap: WrapMode, filter: Filter) -> Self {
        Self {
            wrap_x: wrap,
            wrap_y: wrap,
            filter,
        }
    }

    pub const fn with_wrap_modes(wrap_x: WrapMode, wrap_y: WrapMode, filter: Filter) -> Self {
        Self {
            wrap_x,
            wrap_y,
            filter,
        }
    }

    /// Clamp sampler with the given filter.
    pub const fn clamp(filter: Filter) -> Self {
        Self::new(WrapMode::Clamp, filter)
    }

    /// Returns `true` if either axis repeats or mirrors.
    #[inline]
    pub fn is_repeated(&self) -> bool {
        self.wrap_x != WrapMode::Clamp || self.wrap_y != WrapMode::Clamp
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }
}
