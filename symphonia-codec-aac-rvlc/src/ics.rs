// Symphonia
// Copyright (c) 2019-2022 The Project Symphonia Developers.
//
// Previous Author: Kostya Shishkov <kostya.shiskov@gmail.com>
//
// This source file includes code originally written for the NihAV
// project. With the author's permission, it has been relicensed for,
// and ported to the Symphonia project.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use symphonia_core::errors::Result;
use symphonia_core::io::ReadBitsLtr;

use crate::common::*;
use crate::rvlc::RvlcHeader;

/// The scale factor state of one individual channel stream.
///
/// The window layout and global gain are decoded by the caller. This struct is only concerned
/// with the band codebooks and the scale factors derived from them.
#[derive(Clone)]
pub struct ChannelStream {
    pub global_gain: u8,
    pub window_sequence: u8,
    pub window_groups: usize,
    pub max_sfb: usize,
    pub sfb_cb: [[Codebook; MAX_SFBS]; MAX_WINDOWS],
    /// True if any band uses the noise codebook.
    pub noise_used: bool,
    /// Scale factors, intensity positions, and noise energies, by group and band.
    pub scale_factors: [[i16; MAX_SFBS]; MAX_WINDOWS],
    pub rvlc: RvlcHeader,
}

impl Default for ChannelStream {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelStream {
    pub fn new() -> Self {
        Self {
            global_gain: 0,
            window_sequence: ONLY_LONG_SEQUENCE,
            window_groups: 1,
            max_sfb: 0,
            sfb_cb: [[Codebook::Zero; MAX_SFBS]; MAX_WINDOWS],
            noise_used: false,
            scale_factors: [[0; MAX_SFBS]; MAX_WINDOWS],
            rvlc: RvlcHeader::default(),
        }
    }

    #[inline(always)]
    pub fn is_eight_short(&self) -> bool {
        self.window_sequence == EIGHT_SHORT_SEQUENCE
    }

    /// Assign `cb` to bands `start..end` of group `g`, keeping `noise_used` up-to-date.
    pub fn set_section(&mut self, g: usize, start: usize, end: usize, cb: Codebook) {
        self.sfb_cb[g][start..end].fill(cb);
        self.noise_used |= cb.is_noise() && start < end;
    }

    /// Read `section_data()`. ISO/IEC 14496-3 Table 4.52.
    ///
    /// Unlike the non-resilient decoder, a section using the reserved codebook is recorded rather
    /// than rejected. The scale factor decoder reports it.
    pub fn read_section_data<B: ReadBitsLtr>(&mut self, bs: &mut B) -> Result<()> {
        validate!(self.window_groups <= MAX_WINDOWS && self.max_sfb <= MAX_SFBS);

        let sect_bits = if self.is_eight_short() { 3 } else { 5 };
        let sect_esc_val = (1 << sect_bits) - 1;

        self.noise_used = false;

        for g in 0..self.window_groups {
            let mut k = 0;

            while k < self.max_sfb {
                let cb = Codebook::from_section(bs.read_bits_leq32(4)? as u8);

                let mut sect_len = 0;

                loop {
                    let sect_len_incr = bs.read_bits_leq32(sect_bits)? as usize;

                    sect_len += sect_len_incr;

                    if sect_len_incr < sect_esc_val {
                        break;
                    }
                }

                validate!(k + sect_len <= self.max_sfb);

                self.set_section(g, k, k + sect_len, cb);

                k += sect_len;
            }
        }
        Ok(())
    }
}
