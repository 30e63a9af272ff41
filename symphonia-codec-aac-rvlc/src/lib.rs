// Symphonia
// Copyright (c) 2019-2022 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scale factor decoding for error resilient AAC channel streams that use reversible variable
//! length codes (RVLC).
//!
//! A [`ChannelStream`] holds the band codebooks of one channel. After the codebooks are known,
//! [`ChannelStream::read_rvlc_scale_factor_data`] reads the RVLC header and payloads from the
//! channel's bitstream and fills in [`ChannelStream::scale_factors`].

mod common;
mod ics;
mod rvlc;

pub use common::{
    Codebook, EIGHT_SHORT_SEQUENCE, LONG_START_SEQUENCE, LONG_STOP_SEQUENCE, MAX_SFBS, MAX_WINDOWS,
    ONLY_LONG_SEQUENCE,
};
pub use ics::ChannelStream;
pub use rvlc::{ForwardOutcome, RvlcError, RvlcHeader};
