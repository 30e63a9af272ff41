// Symphonia
// Copyright (c) 2019-2022 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use symphonia_core::errors::Result;
use symphonia_core::io::ReadBitsLtr;

use log::debug;

/// Width of the `dpcm_noise_nrg` literal. It is counted in `length_of_rvlc_sf` even though it is
/// not part of the scale factor segment.
const DPCM_NOISE_NRG_BITS: u32 = 9;

/// `rvlc_sf_data()` header fields. ISO/IEC 14496-3 Table 4.A.14.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RvlcHeader {
    pub sf_concealment: bool,
    pub rev_global_gain: u8,
    /// Length of the scale factor segment in bits, excluding `dpcm_noise_nrg`.
    pub length_of_rvlc_sf: u16,
    /// The first noise energy, coded as a 9-bit literal rather than a difference.
    pub dpcm_noise_nrg: u16,
    pub sf_escapes_present: bool,
    /// Length of the escape segment in bits.
    pub length_of_rvlc_escapes: u8,
    pub dpcm_noise_last_position: u16,
}

impl RvlcHeader {
    /// Read the header. The field widths and presence depend on the window sequence and on
    /// whether any band of the channel uses the noise codebook.
    pub fn read<B: ReadBitsLtr>(bs: &mut B, eight_short: bool, noise_used: bool) -> Result<Self> {
        let sf_concealment = bs.read_bool()?;
        let rev_global_gain = bs.read_bits_leq32(8)? as u8;

        let sf_bits = if eight_short { 11 } else { 9 };

        let mut length_of_rvlc_sf = bs.read_bits_leq32(sf_bits)? as u16;
        let mut dpcm_noise_nrg = 0;

        if noise_used {
            dpcm_noise_nrg = bs.read_bits_leq32(DPCM_NOISE_NRG_BITS)? as u16;

            if u32::from(length_of_rvlc_sf) < DPCM_NOISE_NRG_BITS {
                debug!(
                    "rvlc: scale factor length {} shorter than noise energy literal",
                    length_of_rvlc_sf
                );
            }

            length_of_rvlc_sf = length_of_rvlc_sf.saturating_sub(DPCM_NOISE_NRG_BITS as u16);
        }

        let sf_escapes_present = bs.read_bool()?;

        let length_of_rvlc_escapes =
            if sf_escapes_present { bs.read_bits_leq32(8)? as u8 } else { 0 };

        let dpcm_noise_last_position = if noise_used { bs.read_bits_leq32(9)? as u16 } else { 0 };

        Ok(RvlcHeader {
            sf_concealment,
            rev_global_gain,
            length_of_rvlc_sf,
            dpcm_noise_nrg,
            sf_escapes_present,
            length_of_rvlc_escapes,
            dpcm_noise_last_position,
        })
    }
}
