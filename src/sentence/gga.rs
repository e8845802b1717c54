// src/sentence/gga.rs
//! GGA — Global Positioning System fix data

use crate::error::{NmeaError, Result};
use crate::frame;
use crate::info::{FieldMask, FixInfo, SentenceMask, SignalQuality};
use crate::scan::{scan, Slot};
use crate::sentence::validate_hemisphere;
use crate::time::{parse_time, NmeaTime};

const FIELD_COUNT: usize = 14;

/// Decoded GGA sentence
///
/// Latitude/longitude stay unsigned here, with their hemisphere letters
/// kept raw; the sign is applied when merging into the snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GgaPacket {
    pub present: FieldMask,
    pub time: NmeaTime,
    /// Unsigned ddmm.mmmm
    pub lat: f64,
    pub ns: Option<char>,
    /// Unsigned dddmm.mmmm
    pub lon: f64,
    pub ew: Option<char>,
    pub sig: SignalQuality,
    /// Satellites in use as counted by the receiver
    pub satinuse: i32,
    pub hdop: f64,
    /// Antenna elevation in meters
    pub elevation: f64,
    pub elv_unit: Option<char>,
    /// Geoid separation in meters
    pub diff: f64,
    pub diff_unit: Option<char>,
    pub dgps_age: f64,
    pub dgps_sid: i32,
}

impl GgaPacket {
    pub fn parse(sentence: &str) -> Result<GgaPacket> {
        let mut time = None;
        let mut lat = None;
        let mut ns = None;
        let mut lon = None;
        let mut ew = None;
        let mut sig = None;
        let mut satinuse = None;
        let mut hdop = None;
        let mut elevation = None;
        let mut elv_unit = None;
        let mut diff = None;
        let mut diff_unit = None;
        let mut dgps_age = None;
        let mut dgps_sid = None;

        let matched = scan(
            sentence,
            "$GPGGA,%s,%f,%c,%f,%c,%d,%d,%f,%f,%c,%f,%c,%f,%d*",
            &mut [
                Slot::Str(&mut time),
                Slot::Float(&mut lat),
                Slot::Char(&mut ns),
                Slot::Float(&mut lon),
                Slot::Char(&mut ew),
                Slot::Int(&mut sig),
                Slot::Int(&mut satinuse),
                Slot::Float(&mut hdop),
                Slot::Float(&mut elevation),
                Slot::Char(&mut elv_unit),
                Slot::Float(&mut diff),
                Slot::Char(&mut diff_unit),
                Slot::Float(&mut dgps_age),
                Slot::Int(&mut dgps_sid),
            ],
        );
        if matched != FIELD_COUNT {
            return Err(NmeaError::FieldCount(format!(
                "GPGGA: need {} fields, got {}",
                FIELD_COUNT, matched
            )));
        }

        let mut pack = GgaPacket::default();

        if let Some(t) = time {
            pack.time = parse_time(t)?;
            pack.present |= FieldMask::UTCTIME;
        }
        if let (Some(value), Some(hemi)) = (lat, ns) {
            validate_hemisphere(hemi, true, "GPGGA")?;
            pack.lat = value.abs();
            pack.ns = Some(hemi);
            pack.present |= FieldMask::LAT;
        }
        if let (Some(value), Some(hemi)) = (lon, ew) {
            validate_hemisphere(hemi, false, "GPGGA")?;
            pack.lon = value.abs();
            pack.ew = Some(hemi);
            pack.present |= FieldMask::LON;
        }
        if let Some(value) = sig {
            pack.sig = SignalQuality::from_value(value).ok_or_else(|| {
                NmeaError::Enumeration(format!("GPGGA: invalid signal quality {}", value))
            })?;
            pack.present |= FieldMask::SIG;
        }
        if let Some(value) = satinuse {
            pack.satinuse = value.saturating_abs();
            pack.present |= FieldMask::SATINUSECOUNT;
        }
        if let Some(value) = hdop {
            pack.hdop = value.abs();
            pack.present |= FieldMask::HDOP;
        }
        if let (Some(value), Some(unit)) = (elevation, elv_unit) {
            if unit != 'M' {
                return Err(NmeaError::Enumeration(format!(
                    "GPGGA: invalid elevation unit '{}'",
                    unit
                )));
            }
            pack.elevation = value;
            pack.elv_unit = Some(unit);
            pack.present |= FieldMask::ELV;
        }
        if let (Some(value), Some(unit)) = (diff, diff_unit) {
            if unit != 'M' {
                return Err(NmeaError::Enumeration(format!(
                    "GPGGA: invalid geoid separation unit '{}'",
                    unit
                )));
            }
            pack.diff = value;
            pack.diff_unit = Some(unit);
        }
        if let Some(value) = dgps_age {
            pack.dgps_age = value.abs();
        }
        if let Some(value) = dgps_sid {
            pack.dgps_sid = value.saturating_abs();
        }

        Ok(pack)
    }

    /// Fold into the snapshot: time of day, signal quality, HDOP,
    /// elevation, and signed position
    pub fn merge_into(&self, info: &mut FixInfo) {
        info.utc.hour = self.time.hour;
        info.utc.min = self.time.min;
        info.utc.sec = self.time.sec;
        info.utc.hsec = self.time.hsec;
        info.sig = self.sig;
        info.hdop = self.hdop;
        info.elevation = self.elevation;
        info.lat = if self.ns == Some('S') { -self.lat } else { self.lat };
        info.lon = if self.ew == Some('W') { -self.lon } else { self.lon };
        info.smask |= SentenceMask::GGA;
    }

    /// Rebuild a packet from a snapshot, for sentence generation
    pub fn from_info(info: &FixInfo) -> GgaPacket {
        let mut pack = GgaPacket::default();
        pack.time = info.utc;
        pack.present |= FieldMask::UTCTIME;
        pack.lat = info.lat.abs();
        pack.ns = Some(if info.lat >= 0.0 { 'N' } else { 'S' });
        pack.present |= FieldMask::LAT;
        pack.lon = info.lon.abs();
        pack.ew = Some(if info.lon >= 0.0 { 'E' } else { 'W' });
        pack.present |= FieldMask::LON;
        pack.sig = info.sig;
        pack.present |= FieldMask::SIG;
        pack.satinuse = info.satinfo.in_use;
        pack.present |= FieldMask::SATINUSECOUNT;
        pack.hdop = info.hdop;
        pack.present |= FieldMask::HDOP;
        pack.elevation = info.elevation;
        pack.elv_unit = Some('M');
        pack.present |= FieldMask::ELV;
        pack
    }

    /// Emit a framed `$GPGGA...*hh\r\n` sentence; absent fields stay empty
    pub fn generate(&self) -> String {
        let time = if self.present.contains(FieldMask::UTCTIME) {
            format!(
                "{:02}{:02}{:02}.{:02}",
                self.time.hour, self.time.min, self.time.sec, self.time.hsec
            )
        } else {
            String::new()
        };
        let (lat, ns) = if self.present.contains(FieldMask::LAT) {
            (format!("{:09.4}", self.lat), self.ns.map(String::from).unwrap_or_default())
        } else {
            (String::new(), String::new())
        };
        let (lon, ew) = if self.present.contains(FieldMask::LON) {
            (format!("{:010.4}", self.lon), self.ew.map(String::from).unwrap_or_default())
        } else {
            (String::new(), String::new())
        };
        let sig = if self.present.contains(FieldMask::SIG) {
            self.sig.value().to_string()
        } else {
            String::new()
        };
        let satinuse = if self.present.contains(FieldMask::SATINUSECOUNT) {
            format!("{:02}", self.satinuse)
        } else {
            String::new()
        };
        let hdop = if self.present.contains(FieldMask::HDOP) {
            format!("{:03.1}", self.hdop)
        } else {
            String::new()
        };
        let (elv, elv_unit) = if self.present.contains(FieldMask::ELV) {
            (format!("{:03.1}", self.elevation), self.elv_unit.map(String::from).unwrap_or_default())
        } else {
            (String::new(), String::new())
        };

        frame::seal(&format!(
            "$GPGGA,{},{},{},{},{},{},{},{},{},{},,,,",
            time, lat, ns, lon, ew, sig, satinuse, hdop, elv, elv_unit
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::FixType;

    const GGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

    #[test]
    fn test_parse_full_sentence() {
        let pack = GgaPacket::parse(GGA).unwrap();
        assert_eq!((pack.time.hour, pack.time.min, pack.time.sec), (12, 35, 19));
        assert_eq!(pack.lat, 4807.038);
        assert_eq!(pack.ns, Some('N'));
        assert_eq!(pack.lon, 1131.0);
        assert_eq!(pack.ew, Some('E'));
        assert_eq!(pack.sig, SignalQuality::Gps);
        assert_eq!(pack.satinuse, 8);
        assert_eq!(pack.hdop, 0.9);
        assert_eq!(pack.elevation, 545.4);
        assert_eq!(pack.diff, 46.9);
        assert!(pack.present.contains(
            FieldMask::UTCTIME
                | FieldMask::LAT
                | FieldMask::LON
                | FieldMask::SIG
                | FieldMask::SATINUSECOUNT
                | FieldMask::HDOP
                | FieldMask::ELV
        ));
    }

    #[test]
    fn test_empty_fields_are_absent_not_errors() {
        let pack = GgaPacket::parse("$GPGGA,,,,,,,,,,,,,,*56\r\n").unwrap();
        assert!(pack.present.is_empty());
        assert_eq!(pack.sig, SignalQuality::Invalid);
        assert_eq!(pack.ns, None);
    }

    #[test]
    fn test_short_sentence_fails() {
        assert!(GgaPacket::parse("$GPGGA,123519,4807.038,N").is_err());
    }

    #[test]
    fn test_invalid_hemisphere_fails() {
        let res = GgaPacket::parse("$GPGGA,123519,4807.038,X,01131.000,E,1,08,0.9,545.4,M,46.9,M,,");
        assert!(res.is_err());
    }

    #[test]
    fn test_invalid_elevation_unit_fails() {
        let res = GgaPacket::parse("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,F,46.9,M,,");
        assert!(res.is_err());
    }

    #[test]
    fn test_invalid_signal_quality_fails() {
        let res = GgaPacket::parse("$GPGGA,123519,4807.038,N,01131.000,E,9,08,0.9,545.4,M,46.9,M,,");
        assert!(res.is_err());
    }

    #[test]
    fn test_merge_applies_hemisphere_sign() {
        let mut info = FixInfo::new();
        let mut pack = GgaPacket::parse(GGA).unwrap();
        pack.ns = Some('S');
        pack.ew = Some('W');
        pack.merge_into(&mut info);
        assert_eq!(info.lat, -4807.038);
        assert_eq!(info.lon, -1131.0);
        assert!(info.smask.contains(SentenceMask::GGA));
        assert_eq!(info.sig, SignalQuality::Gps);
        assert_eq!(info.hdop, 0.9);
        assert_eq!(info.elevation, 545.4);
        // Fix type is GSA's to report
        assert_eq!(info.fix, FixType::NoFix);
    }

    #[test]
    fn test_generate_round_trip() {
        let pack = GgaPacket::parse(GGA).unwrap();
        let sentence = pack.generate();
        let back = GgaPacket::parse(&sentence).unwrap();
        assert_eq!(back.time, pack.time);
        assert_eq!(back.lat, pack.lat);
        assert_eq!(back.ns, pack.ns);
        assert_eq!(back.lon, pack.lon);
        assert_eq!(back.ew, pack.ew);
        assert_eq!(back.sig, pack.sig);
        assert_eq!(back.satinuse, pack.satinuse);
        assert_eq!(back.hdop, pack.hdop);
        assert_eq!(back.elevation, pack.elevation);
    }

    #[test]
    fn test_from_info_splits_hemisphere() {
        let mut info = FixInfo::new();
        info.lat = -4807.038;
        info.lon = 1131.0;
        let pack = GgaPacket::from_info(&info);
        assert_eq!(pack.lat, 4807.038);
        assert_eq!(pack.ns, Some('S'));
        assert_eq!(pack.ew, Some('E'));
    }
}
