// Symphonia
// Copyright (c) 2019-2022 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use symphonia_core::errors::{decode_error, Result};
use symphonia_core::io::{BitReaderLtr, ReadBitsLtr};

/// An owned copy of an exact number of bits carved out of a larger bitstream.
///
/// The RVLC scale factor and escape payloads are carved into segments so that however their
/// contents decode, the parent bitstream is always advanced by the declared length.
pub struct Segment {
    buf: Box<[u8]>,
    len: u32,
}

impl Segment {
    /// Copy the next `len` bits of `bs` into a new segment, advancing `bs` by exactly `len`
    /// bits. The final byte of the segment is zero padded.
    pub fn carve<B: ReadBitsLtr>(bs: &mut B, len: u32) -> Result<Segment> {
        let mut buf = Vec::with_capacity(((len + 7) >> 3) as usize);

        let mut remaining = len;

        while remaining >= 8 {
            buf.push(bs.read_bits_leq32(8)? as u8);
            remaining -= 8;
        }

        if remaining > 0 {
            buf.push((bs.read_bits_leq32(remaining)? << (8 - remaining)) as u8);
        }

        Ok(Segment { buf: buf.into_boxed_slice(), len })
    }

    /// Instantiate a reader positioned at the first bit of the segment.
    pub fn reader(&self) -> SegmentReader<'_> {
        SegmentReader { bs: BitReaderLtr::new(&self.buf), len: self.len, consumed: 0 }
    }
}

/// An independent bit reader over a `Segment`.
///
/// Reads are bounded by the carved length in bits, not the length of the padded buffer.
pub struct SegmentReader<'a> {
    bs: BitReaderLtr<'a>,
    len: u32,
    consumed: u32,
}

impl<'a> SegmentReader<'a> {
    /// Instantiate a reader over no data. Every read fails.
    pub fn empty() -> Self {
        SegmentReader { bs: BitReaderLtr::new(&[]), len: 0, consumed: 0 }
    }

    /// Read `num_bits` bits, most-significant first. A read that would run past the end of the
    /// segment fails without consuming anything.
    pub fn read_bits(&mut self, num_bits: u32) -> Result<u32> {
        if num_bits > self.bits_left() {
            return decode_error("aac: rvlc segment exhausted");
        }

        let bits = self.bs.read_bits_leq32(num_bits)?;
        self.consumed += num_bits;

        Ok(bits)
    }

    /// Gets the number of bits read so far.
    pub fn bits_consumed(&self) -> u32 {
        self.consumed
    }

    /// Gets the number of unread bits.
    pub fn bits_left(&self) -> u32 {
        self.len - self.consumed
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
