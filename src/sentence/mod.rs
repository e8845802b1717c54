// src/sentence/mod.rs
//! Sentence type dispatch and the per-type decoders

pub mod gga;
pub mod gsa;
pub mod gsv;
pub mod rmc;
pub mod vtg;

pub use gga::GgaPacket;
pub use gsa::GsaPacket;
pub use gsv::GsvPacket;
pub use rmc::RmcPacket;
pub use vtg::VtgPacket;

use crate::error::{NmeaError, Result};
use crate::info::SentenceMask;

/// The known talker+sentence tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceType {
    Gga,
    Gsa,
    Gsv,
    Rmc,
    Vtg,
}

impl SentenceType {
    /// Match the first 5 characters of a sentence body (after the `$`)
    /// against the known tags, case-sensitively. An unknown prefix is a
    /// normal outcome, not an error.
    pub fn detect(buff: &str) -> Option<SentenceType> {
        match buff.get(..5)? {
            "GPGGA" => Some(SentenceType::Gga),
            "GPGSA" => Some(SentenceType::Gsa),
            "GPGSV" => Some(SentenceType::Gsv),
            "GPRMC" => Some(SentenceType::Rmc),
            "GPVTG" => Some(SentenceType::Vtg),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            SentenceType::Gga => "GPGGA",
            SentenceType::Gsa => "GPGSA",
            SentenceType::Gsv => "GPGSV",
            SentenceType::Rmc => "GPRMC",
            SentenceType::Vtg => "GPVTG",
        }
    }

    pub fn mask(self) -> SentenceMask {
        match self {
            SentenceType::Gga => SentenceMask::GGA,
            SentenceType::Gsa => SentenceMask::GSA,
            SentenceType::Gsv => SentenceMask::GSV,
            SentenceType::Rmc => SentenceMask::RMC,
            SentenceType::Vtg => SentenceMask::VTG,
        }
    }
}

/// Check a hemisphere letter: N/S for latitude, E/W for longitude
pub(crate) fn validate_hemisphere(c: char, latitude: bool, tag: &str) -> Result<()> {
    let ok = if latitude { c == 'N' || c == 'S' } else { c == 'E' || c == 'W' };
    if ok {
        Ok(())
    } else {
        Err(NmeaError::Enumeration(format!(
            "{}: invalid hemisphere letter '{}'",
            tag, c
        )))
    }
}
