// Symphonia
// Copyright (c) 2019-2022 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub const MAX_WINDOWS: usize = 8;
pub const MAX_SFBS: usize = 64;

pub const ONLY_LONG_SEQUENCE: u8 = 0;
pub const LONG_START_SEQUENCE: u8 = 1;
pub const EIGHT_SHORT_SEQUENCE: u8 = 2;
pub const LONG_STOP_SEQUENCE: u8 = 3;

pub const ZERO_HCB: u8 = 0;
pub const ESC_HCB: u8 = 11;
pub const RESERVED_HCB: u8 = 12;
pub const NOISE_HCB: u8 = 13;
pub const INTENSITY_HCB2: u8 = 14;
pub const INTENSITY_HCB: u8 = 15;

/// The codebook assigned to a scale factor band by the section data.
///
/// Derived from ISO/IEC 14496-3 Table 4.151. The reserved codebook (12) is kept as a distinct
/// variant instead of being rejected up-front so the scale factor decoder can report it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Codebook {
    /// All spectral coefficients in the band are zero.
    #[default]
    Zero,
    /// One of the spectral Huffman codebooks (1 to 11).
    Spectral(u8),
    /// The reserved codebook, "BOOKSCL".
    Reserved,
    /// Perceptual noise substitution.
    Noise,
    /// Intensity stereo, out-of-phase.
    Intensity2,
    /// Intensity stereo, in-phase.
    Intensity,
}

impl Codebook {
    /// Classify a 4-bit `sect_cb` value.
    pub fn from_section(cb: u8) -> Codebook {
        match cb {
            ZERO_HCB => Codebook::Zero,
            RESERVED_HCB => Codebook::Reserved,
            NOISE_HCB => Codebook::Noise,
            INTENSITY_HCB2 => Codebook::Intensity2,
            INTENSITY_HCB => Codebook::Intensity,
            cb if cb <= ESC_HCB => Codebook::Spectral(cb),
            // Wider than the 4-bit sect_cb field.
            _ => Codebook::Reserved,
        }
    }

    /// Get the 4-bit `sect_cb` value of the codebook.
    pub fn index(self) -> u8 {
        match self {
            Codebook::Zero => ZERO_HCB,
            Codebook::Spectral(cb) => cb,
            Codebook::Reserved => RESERVED_HCB,
            Codebook::Noise => NOISE_HCB,
            Codebook::Intensity2 => INTENSITY_HCB2,
            Codebook::Intensity => INTENSITY_HCB,
        }
    }

    #[inline(always)]
    pub fn is_zero(self) -> bool {
        self == Codebook::Zero
    }

    #[inline(always)]
    pub fn is_intensity(self) -> bool {
        matches!(self, Codebook::Intensity | Codebook::Intensity2)
    }

    #[inline(always)]
    pub fn is_noise(self) -> bool {
        self == Codebook::Noise
    }
}

macro_rules! validate {
    ($a:expr) => {
        if !$a {
            log::error!("check failed at {}:{}", file!(), line!());
            return symphonia_core::errors::decode_error("aac: invalid data");
        }
    };
}

pub(crate) use validate;
