// src/info.rs
//! Fix-info snapshot and satellite table
//!
//! The snapshot is the durable merge target owned by the caller for the
//! lifetime of a GPS session. Decoded packets are transient; each merge
//! folds one packet into the snapshot and records the contributing
//! sentence type in the cumulative mask.

use crate::time::NmeaTime;
use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum satellites trackable in the snapshot's table
pub const MAX_SATELLITES: usize = 12;

bitflags! {
    /// Which sentence types have contributed to a snapshot
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct SentenceMask: u32 {
        const GGA = 0x01;
        const GSA = 0x02;
        const GSV = 0x04;
        const RMC = 0x08;
        const VTG = 0x10;
    }
}

bitflags! {
    /// Per-packet presence flags: a flag is set iff the wire sentence
    /// supplied a non-empty token for the field and it passed validation
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct FieldMask: u32 {
        const UTCDATE        = 1 << 0;
        const UTCTIME        = 1 << 1;
        const SIG            = 1 << 2;
        const FIX            = 1 << 3;
        const PDOP           = 1 << 4;
        const HDOP           = 1 << 5;
        const VDOP           = 1 << 6;
        const LAT            = 1 << 7;
        const LON            = 1 << 8;
        const ELV            = 1 << 9;
        const SPEED          = 1 << 10;
        const DIRECTION      = 1 << 11;
        const DECLINATION    = 1 << 12;
        const SATINUSECOUNT  = 1 << 13;
        const SATINUSE       = 1 << 14;
        const SATINVIEWCOUNT = 1 << 15;
        const SATINVIEW      = 1 << 16;
    }
}

/// Signal quality as reported in the GGA quality field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalQuality {
    #[default]
    Invalid = 0,
    Gps = 1,
    Dgps = 2,
    Pps = 3,
    Rtk = 4,
    FloatRtk = 5,
    Estimated = 6,
    Manual = 7,
    Simulation = 8,
}

impl SignalQuality {
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(SignalQuality::Invalid),
            1 => Some(SignalQuality::Gps),
            2 => Some(SignalQuality::Dgps),
            3 => Some(SignalQuality::Pps),
            4 => Some(SignalQuality::Rtk),
            5 => Some(SignalQuality::FloatRtk),
            6 => Some(SignalQuality::Estimated),
            7 => Some(SignalQuality::Manual),
            8 => Some(SignalQuality::Simulation),
            _ => None,
        }
    }

    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn description(self) -> &'static str {
        match self {
            SignalQuality::Invalid => "No fix",
            SignalQuality::Gps => "GPS",
            SignalQuality::Dgps => "DGPS",
            SignalQuality::Pps => "PPS",
            SignalQuality::Rtk => "RTK",
            SignalQuality::FloatRtk => "Float RTK",
            SignalQuality::Estimated => "Estimated",
            SignalQuality::Manual => "Manual",
            SignalQuality::Simulation => "Simulation",
        }
    }
}

/// Fix type as reported in the GSA fix field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixType {
    #[default]
    NoFix = 1,
    Fix2d = 2,
    Fix3d = 3,
}

impl FixType {
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(FixType::NoFix),
            2 => Some(FixType::Fix2d),
            3 => Some(FixType::Fix3d),
            _ => None,
        }
    }

    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn description(self) -> &'static str {
        match self {
            FixType::NoFix => "No fix",
            FixType::Fix2d => "2D fix",
            FixType::Fix3d => "3D fix",
        }
    }
}

/// One entry of the satellite-in-view table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Satellite {
    /// PRN number
    pub id: i32,
    /// Elevation angle in degrees
    pub elevation: i32,
    /// Azimuth in degrees from true north
    pub azimuth: i32,
    /// Signal-to-noise ratio in dB
    pub snr: i32,
    /// Whether the satellite is used in the current solution
    pub in_use: bool,
}

impl Satellite {
    pub fn signal_strength_description(&self) -> &'static str {
        match self.snr {
            snr if snr >= 40 => "Excellent",
            snr if snr >= 35 => "Good",
            snr if snr >= 25 => "Fair",
            snr if snr >= 15 => "Poor",
            _ => "Very Poor",
        }
    }
}

/// Satellites in view (built by GSV) cross-marked in use (by GSA)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SatelliteTable {
    /// Number of in-view satellites matched against the last in-use list
    pub in_use: i32,
    /// Satellites in view as reported by GSV
    pub in_view: i32,
    pub sats: [Option<Satellite>; MAX_SATELLITES],
}

impl SatelliteTable {
    /// Table entries currently marked as used in the solution
    pub fn used(&self) -> impl Iterator<Item = &Satellite> {
        self.sats.iter().flatten().filter(|sat| sat.in_use)
    }
}

/// Aggregated positioning snapshot
///
/// Latitude/longitude stay in the signed ddmm.mmmm form of the wire, with
/// the hemisphere sign applied; speed is kept in km/h.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixInfo {
    /// Sentence types merged so far
    pub smask: SentenceMask,
    pub utc: NmeaTime,
    pub sig: SignalQuality,
    pub fix: FixType,
    pub pdop: f64,
    pub hdop: f64,
    pub vdop: f64,
    /// Signed ddmm.mmmm, north positive
    pub lat: f64,
    /// Signed dddmm.mmmm, east positive
    pub lon: f64,
    /// Antenna elevation in meters above mean sea level
    pub elevation: f64,
    /// Speed over ground in km/h
    pub speed: f64,
    /// Course over ground in degrees
    pub direction: f64,
    /// Magnetic declination in degrees
    pub declination: f64,
    pub satinfo: SatelliteTable,
}

impl FixInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the snapshot currently represents a valid position fix
    pub fn has_fix(&self) -> bool {
        self.fix != FixType::NoFix
    }

    /// UTC timestamp of the snapshot, once both RMC date and a time of
    /// day have been merged
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.utc.to_datetime()
    }

    pub fn fix_description(&self) -> &'static str {
        self.fix.description()
    }
}
