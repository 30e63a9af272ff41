// Symphonia
// Copyright (c) 2019-2022 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::debug;

use super::huffman::read_delta;
use super::segment::SegmentReader;
use super::{ForwardOutcome, RvlcError};
use crate::common::Codebook;
use crate::ics::ChannelStream;

impl ChannelStream {
    /// Decode the scale factors of all groups and bands in the forward direction.
    ///
    /// A codeword that cannot be decoded conceals the remainder of the channel: that band and all
    /// following bands are set to 0 and no further bits are read. This is not an error. A band
    /// using the reserved codebook, or a negative scale factor, aborts decoding and leaves the
    /// remaining bands untouched.
    pub(crate) fn decode_sf_forward(
        &mut self,
        sf: &mut SegmentReader<'_>,
        esc: &mut SegmentReader<'_>,
    ) -> Result<ForwardOutcome, RvlcError> {
        let mut noise_pcm_flag = true;
        let mut scf_intensity = 0i16;
        let mut scf_noise = i16::from(self.global_gain) - 90;
        let mut scf_normal = i16::from(self.global_gain);

        let mut outcome = ForwardOutcome::Complete;

        for g in 0..self.window_groups {
            for sfb in 0..self.max_sfb {
                if outcome != ForwardOutcome::Complete {
                    self.scale_factors[g][sfb] = 0;
                    continue;
                }

                let cb = self.sfb_cb[g][sfb];

                self.scale_factors[g][sfb] = match cb {
                    Codebook::Zero => 0,
                    Codebook::Reserved => {
                        return Err(RvlcError::InvalidCodebook { group: g, sfb });
                    }
                    Codebook::Noise if noise_pcm_flag => {
                        noise_pcm_flag = false;
                        scf_noise += self.rvlc.dpcm_noise_nrg as i16;
                        scf_noise
                    }
                    _ => {
                        let Some(delta) = read_delta(sf, esc)
                        else {
                            debug!("rvlc: concealing scale factors from group {} band {}", g, sfb);

                            outcome = ForwardOutcome::Concealed { group: g, sfb };
                            self.scale_factors[g][sfb] = 0;
                            continue;
                        };

                        if cb.is_intensity() {
                            scf_intensity += delta;
                            scf_intensity
                        }
                        else if cb.is_noise() {
                            scf_noise += delta;
                            scf_noise
                        }
                        else {
                            scf_normal += delta;

                            if scf_normal < 0 {
                                return Err(RvlcError::ScaleFactorUnderflow { group: g, sfb });
                            }

                            scf_normal
                        }
                    }
                };
            }
        }

        Ok(outcome)
    }
}
