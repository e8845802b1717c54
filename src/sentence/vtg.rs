// src/sentence/vtg.rs
//! VTG — course and speed over ground

use crate::error::{NmeaError, Result};
use crate::info::{FieldMask, FixInfo, SentenceMask};
use crate::scan::{scan, Slot};

const FIELD_COUNT: usize = 8;

/// Decoded VTG sentence. The four unit letters are format self-checks,
/// not data: T(rue), M(agnetic), N (knots), K (km/h).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VtgPacket {
    pub present: FieldMask,
    /// True course over ground in degrees
    pub direction: f64,
    /// Magnetic course over ground in degrees
    pub declination: f64,
    /// Speed over ground in knots
    pub speed_knots: f64,
    /// Speed over ground in km/h
    pub speed_kph: f64,
}

impl VtgPacket {
    pub fn parse(sentence: &str) -> Result<VtgPacket> {
        let mut direction = None;
        let mut dir_unit = None;
        let mut declination = None;
        let mut dec_unit = None;
        let mut speed_knots = None;
        let mut knots_unit = None;
        let mut speed_kph = None;
        let mut kph_unit = None;

        let matched = scan(
            sentence,
            "$GPVTG,%f,%c,%f,%c,%f,%c,%f,%c*",
            &mut [
                Slot::Float(&mut direction),
                Slot::Char(&mut dir_unit),
                Slot::Float(&mut declination),
                Slot::Char(&mut dec_unit),
                Slot::Float(&mut speed_knots),
                Slot::Char(&mut knots_unit),
                Slot::Float(&mut speed_kph),
                Slot::Char(&mut kph_unit),
            ],
        );
        if matched != FIELD_COUNT {
            return Err(NmeaError::FieldCount(format!(
                "GPVTG: need {} fields, got {}",
                FIELD_COUNT, matched
            )));
        }

        for (unit, expected) in [
            (dir_unit, 'T'),
            (dec_unit, 'M'),
            (knots_unit, 'N'),
            (kph_unit, 'K'),
        ] {
            if unit != Some(expected) {
                return Err(NmeaError::Enumeration(format!(
                    "GPVTG: expected unit letter '{}', got {:?}",
                    expected, unit
                )));
            }
        }

        let mut pack = VtgPacket::default();
        if let Some(value) = direction {
            pack.direction = value;
            pack.present |= FieldMask::DIRECTION;
        }
        if let Some(value) = declination {
            pack.declination = value;
            pack.present |= FieldMask::DECLINATION;
        }
        if let Some(value) = speed_knots {
            pack.speed_knots = value;
            pack.present |= FieldMask::SPEED;
        }
        if let Some(value) = speed_kph {
            pack.speed_kph = value;
            pack.present |= FieldMask::SPEED;
        }

        Ok(pack)
    }

    /// Fold into the snapshot: course, magnetic declination and speed,
    /// already in the snapshot's km/h
    pub fn merge_into(&self, info: &mut FixInfo) {
        info.direction = self.direction;
        info.declination = self.declination;
        info.speed = self.speed_kph;
        info.smask |= SentenceMask::VTG;
    }
}
