// Symphonia
// Copyright (c) 2019-2022 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reversible variable length codes for scale factors. ISO/IEC 14496-3 Section 4.6.2.

use log::debug;

use super::segment::SegmentReader;

/// The value returned for a codeword that is not allowed, or that could not be read.
pub const SENTINEL: i8 = 99;

/// The scale factor difference that is extended by an escape codeword.
pub const ESC_VAL: i8 = 7;

#[derive(Copy, Clone, Debug)]
pub struct RvlcEntry {
    pub value: i8,
    pub len: u32,
    pub code: u32,
}

const fn entry(value: i8, len: u32, code: u32) -> RvlcEntry {
    RvlcEntry { value, len, code }
}

/// A canonical codebook: entries are ordered by ascending length, then ascending codeword. The
/// last entry is a sentinel with length `max_len`.
pub struct RvlcCodebook {
    pub entries: &'static [RvlcEntry],
    pub max_len: u32,
}

/// Reversible scale factor differences, ISO/IEC 14496-3 Table 4.A.6.
#[rustfmt::skip]
const RVLC_SCALEFACTOR_ENTRIES: [RvlcEntry; 23 + 1] = [
    entry( 0, 1,   0), //         0
    entry(-1, 3,   5), //       101
    entry( 1, 3,   7), //       111
    entry(-2, 4,   9), //      1001
    entry(-3, 5,  17), //     10001
    entry( 2, 5,  27), //     11011
    entry(-4, 6,  33), //    100001
    entry(99, 6,  50), //    110010
    entry( 3, 6,  51), //    110011
    entry(99, 6,  52), //    110100
    entry(-7, 7,  65), //   1000001
    entry(99, 7,  96), //   1100000
    entry(99, 7,  98), //   1100010
    entry( 7, 7,  99), //   1100011
    entry( 4, 7, 107), //   1101011
    entry(-5, 8, 129), //  10000001
    entry(99, 8, 194), //  11000010
    entry( 5, 8, 195), //  11000011
    entry(99, 8, 212), //  11010100
    entry(99, 9, 256), // 100000000
    entry(-6, 9, 257), // 100000001
    entry(99, 9, 426), // 110101010
    entry( 6, 9, 427), // 110101011
    entry(99, 10,  0),
];

/// Scale factor escapes, ISO/IEC 14496-3 Table 4.A.7.
#[rustfmt::skip]
const RVLC_ESCAPE_ENTRIES: [RvlcEntry; 54 + 1] = [
    entry( 1,  2,      0),
    entry( 0,  2,      2),
    entry( 3,  3,      2),
    entry( 2,  3,      6),
    entry( 4,  4,     14),
    entry( 7,  5,     13),
    entry( 6,  5,     15),
    entry( 5,  5,     31),
    entry(11,  6,     24),
    entry(10,  6,     25),
    entry( 9,  6,     29),
    entry( 8,  6,     61),
    entry(13,  7,     56),
    entry(12,  7,    120),
    entry(15,  8,    114),
    entry(14,  8,    242),
    entry(17,  9,    230),
    entry(16,  9,    486),
    entry(19, 10,    463),
    entry(18, 10,    974),
    entry(22, 11,    925),
    entry(20, 11,   1950),
    entry(21, 11,   1951),
    entry(23, 12,   1848),
    entry(25, 13,   3698),
    entry(24, 14,   7399),
    entry(26, 15,  14797),
    entry(49, 19, 236736),
    entry(50, 19, 236737),
    entry(51, 19, 236738),
    entry(52, 19, 236739),
    entry(53, 19, 236740),
    entry(27, 20, 473482),
    entry(28, 20, 473483),
    entry(29, 20, 473484),
    entry(30, 20, 473485),
    entry(31, 20, 473486),
    entry(32, 20, 473487),
    entry(33, 20, 473488),
    entry(34, 20, 473489),
    entry(35, 20, 473490),
    entry(36, 20, 473491),
    entry(37, 20, 473492),
    entry(38, 20, 473493),
    entry(39, 20, 473494),
    entry(40, 20, 473495),
    entry(41, 20, 473496),
    entry(42, 20, 473497),
    entry(43, 20, 473498),
    entry(44, 20, 473499),
    entry(45, 20, 473500),
    entry(46, 20, 473501),
    entry(47, 20, 473502),
    entry(48, 20, 473503),
    entry(99, 21,      0),
];

pub static RVLC_SCALEFACTORS: RvlcCodebook =
    RvlcCodebook { entries: &RVLC_SCALEFACTOR_ENTRIES, max_len: 10 };

pub static RVLC_ESCAPES: RvlcCodebook = RvlcCodebook { entries: &RVLC_ESCAPE_ENTRIES, max_len: 21 };

/// Decode one codeword by growing the running codeword to the length of each entry of the
/// canonical codebook in turn and comparing.
///
/// At most `max_len` bits are consumed. A codeword that matches no entry by then, or that runs
/// out of bits, yields `SENTINEL`.
pub fn read_codeword(bs: &mut SegmentReader<'_>, cb: &RvlcCodebook) -> i8 {
    let mut entries = cb.entries.iter();

    let Some(mut entry) = entries.next() else { return SENTINEL };

    let mut len = entry.len;

    let mut code = match bs.read_bits(len) {
        Ok(bits) => bits,
        Err(_) => return SENTINEL,
    };

    while code != entry.code && len < cb.max_len {
        entry = match entries.next() {
            Some(next) => next,
            None => return SENTINEL,
        };

        let extra = entry.len - len;

        code = match bs.read_bits(extra) {
            Ok(bits) => (code << extra) | bits,
            Err(_) => return SENTINEL,
        };

        len += extra;
    }

    if code == entry.code {
        entry.value
    }
    else {
        SENTINEL
    }
}

/// Decode a scale factor difference, resolving escapes from the escape segment.
///
/// Returns `None` if either codeword decodes to `SENTINEL`.
pub fn read_delta(sf: &mut SegmentReader<'_>, esc: &mut SegmentReader<'_>) -> Option<i16> {
    let value = read_codeword(sf, &RVLC_SCALEFACTORS);

    let value = match value {
        SENTINEL => return None,
        value if value == ESC_VAL || value == -ESC_VAL => {
            if esc.is_empty() {
                debug!("rvlc: escaped scale factor without escape data");
            }

            match read_codeword(esc, &RVLC_ESCAPES) {
                SENTINEL => return None,
                ext if value > 0 => value + ext,
                ext => value - ext,
            }
        }
        _ => value,
    };

    Some(i16::from(value))
}
