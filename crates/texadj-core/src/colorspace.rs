//! Color space tags and color-space transform descriptions.
//!
//! Textures carry an optional [`ColorSpaceId`] and an [`AlphaType`]. When a
//! texture is sampled into a draw with a different destination color space
//! the sampling unit is wrapped in a [`ColorSpaceXform`] describing which
//! conversion steps a shader must run. The conversion math itself lives in
//! the shading backend; this module only decides *which* steps are needed.
//!
//! # Supported Color Spaces
//!
//! - Scene-referred linear: [`ColorSpaceId::LinearSrgb`], [`ColorSpaceId::Rec2020`],
//!   [`ColorSpaceId::AcesCg`], [`ColorSpaceId::Aces2065`]
//! - Display-referred: [`ColorSpaceId::Srgb`], [`ColorSpaceId::Rec709`],
//!   [`ColorSpaceId::DciP3`], [`ColorSpaceId::DisplayP3`]
//! - Log-encoded: [`ColorSpaceId::AcesCct`]
//!
//! # Usage
//!
//! ```
//! use texadj_core::{AlphaType, ColorSpaceId, ColorSpaceXform};
//!
//! let xform = ColorSpaceXform::make(
//!     Some(ColorSpaceId::Srgb),
//!     AlphaType::Premul,
//!     Some(ColorSpaceId::LinearSrgb),
//! ).unwrap();
//! assert!(xform.linearize);
//! assert!(!xform.gamut_transform);
//!
//! // Same space on both sides needs no transform.
//! assert!(ColorSpaceXform::make(
//!     Some(ColorSpaceId::Srgb),
//!     AlphaType::Premul,
//!     Some(ColorSpaceId::Srgb),
//! ).is_none());
//! ```

use std::fmt;

/// How pixel alpha relates to the color channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlphaType {
    /// Alpha interpretation is not known.
    #[default]
    Unknown,
    /// Every pixel is opaque.
    Opaque,
    /// Color channels are premultiplied by alpha.
    Premul,
    /// Color channels are independent of alpha.
    Unpremul,
}

/// Transfer function family of a color space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferFn {
    /// Linear light.
    Linear,
    /// sRGB piecewise curve (also used by Display P3).
    Srgb,
    /// BT.1886 gamma 2.4.
    Gamma24,
    /// DCI gamma 2.6.
    Gamma26,
    /// ACEScct log curve with toe.
    AcesCct,
}

/// Runtime identifier for the color spaces a texture may be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpaceId {
    /// sRGB with standard transfer function.
    Srgb,
    /// Linear sRGB (Rec.709 primaries).
    LinearSrgb,
    /// ITU-R BT.709 with gamma 2.4.
    Rec709,
    /// ITU-R BT.2020, linear variant.
    Rec2020,
    /// DCI-P3 (theater white).
    DciP3,
    /// Display P3 (D65, sRGB curve).
    DisplayP3,
    /// ACEScg (AP1, linear).
    AcesCg,
    /// ACES2065-1 (AP0, linear).
    Aces2065,
    /// ACEScct (AP1, log).
    AcesCct,
}

impl ColorSpaceId {
    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Srgb => "sRGB",
            Self::LinearSrgb => "Linear sRGB",
            Self::Rec709 => "Rec.709",
            Self::Rec2020 => "Rec.2020",
            Self::DciP3 => "DCI-P3",
            Self::DisplayP3 => "Display P3",
            Self::AcesCg => "ACEScg",
            Self::Aces2065 => "ACES2065-1",
            Self::AcesCct => "ACEScct",
        }
    }

    /// Transfer function family.
    pub const fn transfer(self) -> TransferFn {
        match self {
            Self::Srgb | Self::DisplayP3 => TransferFn::Srgb,
            Self::Rec709 => TransferFn::Gamma24,
            Self::DciP3 => TransferFn::Gamma26,
            Self::AcesCct => TransferFn::AcesCct,
            Self::LinearSrgb | Self::Rec2020 | Self::AcesCg | Self::Aces2065 => TransferFn::Linear,
        }
    }

    /// Whether values are encoded in linear light.
    #[inline]
    pub const fn is_linear(self) -> bool {
        matches!(self.transfer(), TransferFn::Linear)
    }

    /// CIE xy chromaticity of the white point.
    pub const fn white_point(self) -> (f32, f32) {
        match self {
            Self::AcesCg | Self::Aces2065 | Self::AcesCct => (0.32168, 0.33767),
            Self::DciP3 => (0.314, 0.351),
            _ => (0.3127, 0.3290),
        }
    }

    /// CIE xy chromaticities of the red, green and blue primaries.
    pub const fn primaries(self) -> [(f32, f32); 3] {
        match self {
            Self::Srgb | Self::LinearSrgb | Self::Rec709 => {
                [(0.640, 0.330), (0.300, 0.600), (0.150, 0.060)]
            }
            Self::Rec2020 => [(0.708, 0.292), (0.170, 0.797), (0.131, 0.046)],
            Self::DciP3 | Self::DisplayP3 => [(0.680, 0.320), (0.265, 0.690), (0.150, 0.060)],
            Self::AcesCg | Self::AcesCct => [(0.713, 0.293), (0.165, 0.830), (0.128, 0.044)],
            Self::Aces2065 => [(0.7347, 0.2653), (0.0000, 1.0000), (0.0001, -0.0770)],
        }
    }

    /// Returns `true` if both spaces share primaries and white point.
    pub fn same_gamut(self, other: ColorSpaceId) -> bool {
        self.primaries() == other.primaries() && self.white_point() == other.white_point()
    }
}

impl fmt::Display for ColorSpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conversion steps needed to bring texture colors into a destination space.
///
/// Steps run in field order: unpremul, linearize, gamut, encode, premul.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSpaceXform {
    /// Source color space of the texture.
    pub src: ColorSpaceId,
    /// Destination color space of the draw.
    pub dst: ColorSpaceId,
    /// Alpha type of the sampled texture.
    pub alpha_type: AlphaType,
    /// Divide out alpha before touching the transfer function.
    pub unpremul: bool,
    /// Apply the inverse source transfer function.
    pub linearize: bool,
    /// Apply the source-to-destination gamut matrix.
    pub gamut_transform: bool,
    /// Apply the destination transfer function.
    pub encode: bool,
    /// Multiply alpha back in.
    pub premul: bool,
}

impl ColorSpaceXform {
    /// Builds the transform, or `None` when no conversion is required.
    ///
    /// Untagged sources or destinations are treated as "no conversion".
    pub fn make(
        src: Option<ColorSpaceId>,
        alpha_type: AlphaType,
        dst: Option<ColorSpaceId>,
    ) -> Option<Self> {
        let (src, dst) = (src?, dst?);
        if src == dst {
            return None;
        }

        let transfer_differs = src.transfer() != dst.transfer();
        let gamut_transform = !src.same_gamut(dst);
        let linearize = !src.is_linear() && (transfer_differs || gamut_transform);
        let encode = !dst.is_linear() && (transfer_differs || gamut_transform);

        if !(linearize || gamut_transform || encode) {
            return None;
        }

        let premul_steps = alpha_type == AlphaType::Premul && (linearize || encode);
        Some(Self {
            src,
            dst,
            alpha_type,
            unpremul: premul_steps,
            linearize,
            gamut_transform,
            encode,
            premul: premul_steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorspace_names() {
        assert_eq!(ColorSpaceId::Srgb.name(), "sRGB");
        assert_eq!(ColorSpaceId::AcesCg.name(), "ACEScg");
        assert_eq!(ColorSpaceId::Rec2020.to_string(), "Rec.2020");
    }

    #[test]
    fn test_colorspace_linearity() {
        assert!(!ColorSpaceId::Srgb.is_linear());
        assert!(ColorSpaceId::AcesCg.is_linear());
        assert!(ColorSpaceId::LinearSrgb.is_linear());
        assert!(!ColorSpaceId::AcesCct.is_linear());
    }

    #[test]
    fn test_xform_untagged_is_none() {
        assert!(ColorSpaceXform::make(None, AlphaType::Premul, Some(ColorSpaceId::Srgb)).is_none());
        assert!(ColorSpaceXform::make(Some(ColorSpaceId::Srgb), AlphaType::Premul, None).is_none());
    }

    #[test]
    fn test_xform_gamut_only() {
        let x = ColorSpaceXform::make(
            Some(ColorSpaceId::LinearSrgb),
            AlphaType::Premul,
            Some(ColorSpaceId::Rec2020),
        )
        .unwrap();
        assert!(x.gamut_transform);
        assert!(!x.linearize);
        assert!(!x.encode);
        // Linear to linear never touches alpha.
        assert!(!x.unpremul && !x.premul);
    }

    #[test]
    fn test_xform_transfer_only() {
        let x = ColorSpaceXform::make(
            Some(ColorSpaceId::Srgb),
            AlphaType::Unpremul,
            Some(ColorSpaceId::Rec709),
        )
        .unwrap();
        assert!(!x.gamut_transform);
        assert!(x.linearize && x.encode);
        assert!(!x.unpremul);
    }

    #[test]
    fn test_xform_premul_wraps_transfer() {
        let x = ColorSpaceXform::make(
            Some(ColorSpaceId::Srgb),
            AlphaType::Premul,
            Some(ColorSpaceId::DisplayP3),
        )
        .unwrap();
        assert!(x.gamut_transform);
        assert!(x.unpremul && x.premul);
    }
}
