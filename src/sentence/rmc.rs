// src/sentence/rmc.rs
//! RMC — recommended minimum navigation data

use crate::error::{NmeaError, Result};
use crate::info::{FieldMask, FixInfo, FixType, SentenceMask, SignalQuality};
use crate::scan::{scan, Slot};
use crate::sentence::validate_hemisphere;
use crate::time::{parse_time, NmeaTime};

/// Decoded RMC sentence. The trailing mode indicator was added in NMEA
/// 2.3, so both 13- and 14-field sentences are accepted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RmcPacket {
    pub present: FieldMask,
    /// Time of day plus the date fields when the sentence carries them
    pub time: NmeaTime,
    /// 'A' active or 'V' void
    pub status: Option<char>,
    /// Unsigned ddmm.mmmm
    pub lat: f64,
    pub ns: Option<char>,
    /// Unsigned dddmm.mmmm
    pub lon: f64,
    pub ew: Option<char>,
    /// Speed over ground in knots
    pub speed: f64,
    /// Course over ground in degrees
    pub direction: f64,
    /// Magnetic declination in degrees
    pub declination: f64,
    pub declin_ew: Option<char>,
    /// NMEA 2.3 mode indicator, carried but not interpreted
    pub mode: Option<char>,
}

impl RmcPacket {
    pub fn parse(sentence: &str) -> Result<RmcPacket> {
        let mut time = None;
        let mut status = None;
        let mut lat = None;
        let mut ns = None;
        let mut lon = None;
        let mut ew = None;
        let mut speed = None;
        let mut direction = None;
        let mut day = None;
        let mut mon = None;
        let mut year = None;
        let mut declination = None;
        let mut declin_ew = None;
        let mut mode = None;

        let matched = scan(
            sentence,
            "$GPRMC,%s,%c,%f,%c,%f,%c,%f,%f,%2d%2d%2d,%f,%c,%c*",
            &mut [
                Slot::Str(&mut time),
                Slot::Char(&mut status),
                Slot::Float(&mut lat),
                Slot::Char(&mut ns),
                Slot::Float(&mut lon),
                Slot::Char(&mut ew),
                Slot::Float(&mut speed),
                Slot::Float(&mut direction),
                Slot::Int(&mut day),
                Slot::Int(&mut mon),
                Slot::Int(&mut year),
                Slot::Float(&mut declination),
                Slot::Char(&mut declin_ew),
                Slot::Char(&mut mode),
            ],
        );
        if matched != 13 && matched != 14 {
            return Err(NmeaError::FieldCount(format!(
                "GPRMC: need 13 or 14 fields, got {}",
                matched
            )));
        }

        let mut pack = RmcPacket::default();

        if let Some(t) = time {
            pack.time = parse_time(t)?;
            pack.present |= FieldMask::UTCTIME;
        }
        if let Some(s) = status {
            if s != 'A' && s != 'V' {
                return Err(NmeaError::Enumeration(format!(
                    "GPRMC: invalid status '{}'",
                    s
                )));
            }
            pack.status = Some(s);
        }
        if let (Some(value), Some(hemi)) = (lat, ns) {
            validate_hemisphere(hemi, true, "GPRMC")?;
            pack.lat = value.abs();
            pack.ns = Some(hemi);
            pack.present |= FieldMask::LAT;
        }
        if let (Some(value), Some(hemi)) = (lon, ew) {
            validate_hemisphere(hemi, false, "GPRMC")?;
            pack.lon = value.abs();
            pack.ew = Some(hemi);
            pack.present |= FieldMask::LON;
        }
        if let Some(value) = speed {
            pack.speed = value;
            pack.present |= FieldMask::SPEED;
        }
        if let Some(value) = direction {
            pack.direction = value;
            pack.present |= FieldMask::DIRECTION;
        }

        match (day, mon, year) {
            (Some(day), Some(mon), Some(year)) => {
                if !(1..=31).contains(&day) || !(1..=12).contains(&mon) {
                    return Err(NmeaError::Parse(format!(
                        "GPRMC: invalid date {:02}{:02}{:02}",
                        day, mon, year
                    )));
                }
                pack.time.day = day;
                // Month zero-based; two-digit years window into 1990-2089
                pack.time.mon = mon - 1;
                pack.time.year = if year < 90 { year + 100 } else { year };
                pack.present |= FieldMask::UTCDATE;
            }
            (None, None, None) => {}
            _ => {
                return Err(NmeaError::Parse("GPRMC: incomplete date".to_string()));
            }
        }

        if let (Some(value), Some(hemi)) = (declination, declin_ew) {
            validate_hemisphere(hemi, false, "GPRMC")?;
            pack.declination = value;
            pack.declin_ew = Some(hemi);
            pack.present |= FieldMask::DECLINATION;
        }
        pack.mode = mode;

        Ok(pack)
    }

    /// Fold into the snapshot. An active status promotes an undetermined
    /// signal/fix to the minimal valid state; a void status forces both
    /// to their bad sentinels. Time and position always overwrite.
    pub fn merge_into(&self, info: &mut FixInfo) {
        match self.status {
            Some('A') => {
                if info.sig == SignalQuality::Invalid {
                    info.sig = SignalQuality::Gps;
                }
                if info.fix == FixType::NoFix {
                    info.fix = FixType::Fix2d;
                }
            }
            Some('V') => {
                info.sig = SignalQuality::Invalid;
                info.fix = FixType::NoFix;
            }
            _ => {}
        }

        info.utc = self.time;
        info.lat = if self.ns == Some('S') { -self.lat } else { self.lat };
        info.lon = if self.ew == Some('W') { -self.lon } else { self.lon };
        info.speed = self.speed * 1.852; // knots to km/h
        info.direction = self.direction;
        info.smask |= SentenceMask::RMC;
    }
}
