// Symphonia
// Copyright (c) 2019-2022 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error resilient scale factor data using reversible variable length codes (RVLC).
//!
//! The scale factor differences and their escapes are transmitted in two payloads whose lengths
//! are declared up-front in a small header. Each payload is carved out of the bitstream into its
//! own segment before decoding, so a corrupted codeword can never desynchronize the rest of the
//! channel stream. Only the forward decoding pass is implemented.

use symphonia_core::errors::Error;
use symphonia_core::io::ReadBitsLtr;

use log::{debug, warn};

use crate::common::{MAX_SFBS, MAX_WINDOWS};
use crate::ics::ChannelStream;

mod forward;
mod header;
mod huffman;
mod segment;

pub use header::RvlcHeader;
use segment::{Segment, SegmentReader};

/// A failure that aborts scale factor decoding for the channel.
#[derive(Debug, thiserror::Error)]
pub enum RvlcError {
    /// A band was assigned the reserved codebook.
    #[error("aac: rvlc band uses reserved codebook (group {group}, band {sfb})")]
    InvalidCodebook { group: usize, sfb: usize },
    /// The running scale factor became negative.
    #[error("aac: rvlc negative scale factor (group {group}, band {sfb})")]
    ScaleFactorUnderflow { group: usize, sfb: usize },
    /// The channel stream itself could not be read.
    #[error(transparent)]
    Stream(#[from] Error),
}

impl RvlcError {
    /// Gets the numeric error code of a decoding failure, or `None` for a stream error.
    pub fn code(&self) -> Option<u8> {
        match self {
            RvlcError::InvalidCodebook { .. } => Some(3),
            RvlcError::ScaleFactorUnderflow { .. } => Some(4),
            RvlcError::Stream(_) => None,
        }
    }
}

impl From<RvlcError> for Error {
    fn from(err: RvlcError) -> Error {
        match err {
            RvlcError::InvalidCodebook { .. } => Error::DecodeError("aac: rvlc invalid codebook"),
            RvlcError::ScaleFactorUnderflow { .. } => {
                Error::DecodeError("aac: rvlc scale factor underflow")
            }
            RvlcError::Stream(err) => err,
        }
    }
}

/// The result of a successful forward decode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Every band was decoded.
    Complete,
    /// A codeword could not be decoded. The band at `group` and `sfb`, and every band after it,
    /// was set to 0.
    Concealed { group: usize, sfb: usize },
}

impl ChannelStream {
    /// Read `rvlc_sf_data()` header fields into `self.rvlc`.
    ///
    /// `window_sequence` and `noise_used` must be set before calling.
    pub fn read_rvlc_header<B: ReadBitsLtr>(&mut self, bs: &mut B) -> Result<(), Error> {
        self.rvlc = RvlcHeader::read(bs, self.is_eight_short(), self.noise_used)?;
        Ok(())
    }

    /// Carve the scale factor and escape payloads described by `self.rvlc` from `bs` and decode
    /// them into `self.scale_factors`.
    ///
    /// `bs` is advanced by exactly the declared payload lengths whatever the outcome of decoding.
    pub fn decode_rvlc_scale_factors<B: ReadBitsLtr>(
        &mut self,
        bs: &mut B,
    ) -> Result<ForwardOutcome, RvlcError> {
        let sf_segment = if self.rvlc.length_of_rvlc_sf > 0 {
            Some(Segment::carve(bs, u32::from(self.rvlc.length_of_rvlc_sf))?)
        }
        else {
            None
        };

        let esc_segment = if self.rvlc.sf_escapes_present {
            Some(Segment::carve(bs, u32::from(self.rvlc.length_of_rvlc_escapes))?)
        }
        else {
            None
        };

        if self.window_groups > MAX_WINDOWS || self.max_sfb > MAX_SFBS {
            return Err(Error::DecodeError("aac: invalid data").into());
        }

        let mut sf = match &sf_segment {
            Some(segment) => segment.reader(),
            None => SegmentReader::empty(),
        };

        let mut esc = match &esc_segment {
            Some(segment) => segment.reader(),
            None => SegmentReader::empty(),
        };

        let result = self.decode_sf_forward(&mut sf, &mut esc);

        match &result {
            Ok(_) if sf.bits_left() > 0 => {
                debug!(
                    "rvlc: {} scale factor bits unused after {} decoded",
                    sf.bits_left(),
                    sf.bits_consumed()
                );
            }
            Err(err) => warn!("{}", err),
            _ => (),
        }

        result
    }

    /// Read the RVLC header followed by the scale factor and escape payloads.
    pub fn read_rvlc_scale_factor_data<B: ReadBitsLtr>(
        &mut self,
        bs: &mut B,
    ) -> Result<ForwardOutcome, RvlcError> {
        self.read_rvlc_header(bs)?;
        self.decode_rvlc_scale_factors(bs)
    }
}

/// Pack a string of '0' and '1' characters, most-significant bit first. Whitespace is ignored.
#[cfg(test)]
pub(crate) fn pack_bits(bits: &str) -> Vec<u8> {
    let mut buf = Vec::new();

    for (i, bit) in bits.chars().filter(|c| !c.is_whitespace()).enumerate() {
        if i % 8 == 0 {
            buf.push(0);
        }
        if bit == '1' {
            buf[i / 8] |= 0x80 >> (i % 8);
        }
    }

    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Codebook;
    use symphonia_core::io::{BitReaderLtr, FiniteBitStream};

    fn bin(value: u32, width: usize) -> String {
        format!("{:0width$b}", value, width = width)
    }

    fn spectral_channel(bands: usize, global_gain: u8) -> ChannelStream {
        let mut ics = ChannelStream::new();
        ics.global_gain = global_gain;
        ics.max_sfb = bands;
        ics.set_section(0, 0, bands, Codebook::Spectral(1));
        ics
    }

    #[test]
    fn verify_pack_bits() {
        assert_eq!(pack_bits("1000 0001 1"), [0x81, 0x80]);
        assert!(pack_bits("").is_empty());
    }

    #[test]
    fn verify_error_codes() {
        assert_eq!(RvlcError::InvalidCodebook { group: 0, sfb: 1 }.code(), Some(3));
        assert_eq!(RvlcError::ScaleFactorUnderflow { group: 0, sfb: 1 }.code(), Some(4));
        assert_eq!(RvlcError::Stream(Error::DecodeError("test")).code(), None);
    }

    #[test]
    fn verify_error_conversion() {
        match Error::from(RvlcError::InvalidCodebook { group: 1, sfb: 2 }) {
            Error::DecodeError("aac: rvlc invalid codebook") => {}
            e => panic!("unexpected error {:?}", e),
        }

        match Error::from(RvlcError::ScaleFactorUnderflow { group: 1, sfb: 2 }) {
            Error::DecodeError("aac: rvlc scale factor underflow") => {}
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn verify_segments_advance_stream() {
        let mut ics = spectral_channel(2, 100);
        ics.rvlc.length_of_rvlc_sf = 12;
        ics.rvlc.sf_escapes_present = true;
        ics.rvlc.length_of_rvlc_escapes = 5;

        // Scale factor segment: "111" "111", then 6 unused bits. Escape segment: 5 unused bits.
        let bits = "111111 000000 10101 0110";
        let buf = pack_bits(bits);
        let mut bs = BitReaderLtr::new(&buf);

        let outcome = ics.decode_rvlc_scale_factors(&mut bs).unwrap();

        assert_eq!(outcome, ForwardOutcome::Complete);
        assert_eq!(&ics.scale_factors[0][..2], &[101, 102]);
        assert_eq!(bs.bits_left(), 8 * buf.len() as u64 - 17);
        assert_eq!(bs.read_bits_leq32(4).unwrap(), 0b0110);
    }

    #[test]
    fn verify_segment_advances_stream_when_concealed() {
        let mut ics = spectral_channel(4, 100);
        ics.rvlc.length_of_rvlc_sf = 10;

        // "110010" is not an allowed codeword.
        let bits = "110010 1111 1001";
        let buf = pack_bits(bits);
        let mut bs = BitReaderLtr::new(&buf);

        let outcome = ics.decode_rvlc_scale_factors(&mut bs).unwrap();

        assert_eq!(outcome, ForwardOutcome::Concealed { group: 0, sfb: 0 });
        assert_eq!(bs.read_bits_leq32(4).unwrap(), 0b1001);
    }

    #[test]
    fn verify_segment_advances_stream_on_failure() {
        let mut ics = spectral_channel(2, 1);
        ics.rvlc.length_of_rvlc_sf = 8;

        // "1001" is -2, the scale factor becomes negative.
        let bits = "1001 0000 1100";
        let buf = pack_bits(bits);
        let mut bs = BitReaderLtr::new(&buf);

        let err = ics.decode_rvlc_scale_factors(&mut bs).unwrap_err();

        assert_eq!(err.code(), Some(4));
        assert_eq!(bs.read_bits_leq32(4).unwrap(), 0b1100);
    }

    #[test]
    fn verify_noise_literal_excluded_from_segment() {
        let mut ics = ChannelStream::new();
        ics.global_gain = 100;
        ics.max_sfb = 3;
        ics.set_section(0, 0, 1, Codebook::Noise);
        ics.set_section(0, 1, 3, Codebook::Spectral(2));

        // The declared length includes the 9-bit literal, leaving 6 bits for the segment.
        let bits = format!(
            "0 {} {} {} 0 {} 111 101 0110",
            bin(0, 8),
            bin(9 + 6, 9),
            bin(25, 9),
            bin(0, 9)
        );
        let buf = pack_bits(&bits);
        let mut bs = BitReaderLtr::new(&buf);

        let outcome = ics.read_rvlc_scale_factor_data(&mut bs).unwrap();

        assert_eq!(outcome, ForwardOutcome::Complete);
        assert_eq!(ics.rvlc.length_of_rvlc_sf, 6);
        assert_eq!(&ics.scale_factors[0][..3], &[100 - 90 + 25, 101, 100]);
        assert_eq!(bs.read_bits_leq32(4).unwrap(), 0b0110);
    }

    #[test]
    fn verify_empty_scale_factor_segment() {
        let mut ics = spectral_channel(2, 50);

        let buf = pack_bits("1010");
        let mut bs = BitReaderLtr::new(&buf);

        let outcome = ics.decode_rvlc_scale_factors(&mut bs).unwrap();

        assert_eq!(outcome, ForwardOutcome::Concealed { group: 0, sfb: 0 });
        assert_eq!(bs.bits_left(), 8);
    }

    #[test]
    fn verify_declared_length_past_end() {
        let mut ics = spectral_channel(2, 50);
        ics.rvlc.length_of_rvlc_sf = 100;

        let buf = pack_bits("1010 1010");
        let mut bs = BitReaderLtr::new(&buf);

        let err = ics.decode_rvlc_scale_factors(&mut bs).unwrap_err();

        assert!(matches!(err, RvlcError::Stream(_)));
        assert_eq!(err.code(), None);
    }

    #[test]
    fn verify_invalid_layout() {
        let mut ics = spectral_channel(2, 50);
        ics.max_sfb = MAX_SFBS + 1;

        let buf = pack_bits("1010 1010");

        let err = ics.decode_rvlc_scale_factors(&mut BitReaderLtr::new(&buf)).unwrap_err();

        assert!(matches!(err, RvlcError::Stream(Error::DecodeError(_))));
    }
}
