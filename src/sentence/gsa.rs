// src/sentence/gsa.rs
//! GSA — active satellites and dilution of precision

use crate::error::{NmeaError, Result};
use crate::frame;
use crate::info::{FieldMask, FixInfo, FixType, SentenceMask, SignalQuality};
use crate::scan::{scan, Slot};

/// PRN slots carried by one GSA sentence
pub const GSA_SAT_COUNT: usize = 12;

const FIELD_COUNT: usize = 17;

/// Decoded GSA sentence. Unused PRN slots hold 0 (the protocol reserves
/// PRN 0; it never identifies a real satellite), and once any slot is
/// used the array is kept sorted ascending with unused slots last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GsaPacket {
    pub present: FieldMask,
    /// Selection mode: 'A' automatic or 'M' manual
    pub mode: Option<char>,
    pub fix: FixType,
    pub sat_prn: [i32; GSA_SAT_COUNT],
    pub pdop: f64,
    pub hdop: f64,
    pub vdop: f64,
}

/// Sort key ordering unused (zero) PRN slots after every real PRN
pub(crate) fn prn_sort_key(prn: i32) -> i32 {
    if prn == 0 {
        i32::MAX
    } else {
        prn
    }
}

impl GsaPacket {
    pub fn parse(sentence: &str) -> Result<GsaPacket> {
        let mut mode = None;
        let mut fix = None;
        let mut prn: [Option<i32>; GSA_SAT_COUNT] = [None; GSA_SAT_COUNT];
        let mut pdop = None;
        let mut hdop = None;
        let mut vdop = None;

        let [p0, p1, p2, p3, p4, p5, p6, p7, p8, p9, p10, p11] = &mut prn;
        let matched = scan(
            sentence,
            "$GPGSA,%c,%d,%d,%d,%d,%d,%d,%d,%d,%d,%d,%d,%d,%d,%f,%f,%f*",
            &mut [
                Slot::Char(&mut mode),
                Slot::Int(&mut fix),
                Slot::Int(p0),
                Slot::Int(p1),
                Slot::Int(p2),
                Slot::Int(p3),
                Slot::Int(p4),
                Slot::Int(p5),
                Slot::Int(p6),
                Slot::Int(p7),
                Slot::Int(p8),
                Slot::Int(p9),
                Slot::Int(p10),
                Slot::Int(p11),
                Slot::Float(&mut pdop),
                Slot::Float(&mut hdop),
                Slot::Float(&mut vdop),
            ],
        );
        if matched != FIELD_COUNT {
            return Err(NmeaError::FieldCount(format!(
                "GPGSA: need {} fields, got {}",
                FIELD_COUNT, matched
            )));
        }

        let mut pack = GsaPacket::default();

        if let Some(c) = mode {
            let c = c.to_ascii_uppercase();
            if c != 'A' && c != 'M' {
                return Err(NmeaError::Enumeration(format!(
                    "GPGSA: invalid selection mode '{}'",
                    c
                )));
            }
            pack.mode = Some(c);
            pack.present |= FieldMask::SIG;
        }
        if let Some(value) = fix {
            pack.fix = FixType::from_value(value).ok_or_else(|| {
                NmeaError::Enumeration(format!("GPGSA: invalid fix type {}", value))
            })?;
            pack.present |= FieldMask::FIX;
        }

        for (slot, value) in pack.sat_prn.iter_mut().zip(prn.iter()) {
            *slot = value.unwrap_or(0);
        }
        if pack.sat_prn.iter().any(|&p| p != 0) {
            pack.sat_prn.sort_by_key(|&p| prn_sort_key(p));
            pack.present |= FieldMask::SATINUSE;
        }

        if let Some(value) = pdop {
            pack.pdop = value.abs();
            pack.present |= FieldMask::PDOP;
        }
        if let Some(value) = hdop {
            pack.hdop = value.abs();
            pack.present |= FieldMask::HDOP;
        }
        if let Some(value) = vdop {
            pack.vdop = value.abs();
            pack.present |= FieldMask::VDOP;
        }

        Ok(pack)
    }

    /// Fold into the snapshot: fix type and DOP triad verbatim, then
    /// reconcile the in-use PRNs against the satellite-in-view table. A
    /// PRN with no table entry contributes neither a mark nor a count.
    pub fn merge_into(&self, info: &mut FixInfo) {
        info.fix = self.fix;
        info.pdop = self.pdop;
        info.hdop = self.hdop;
        info.vdop = self.vdop;

        for sat in info.satinfo.sats.iter_mut().flatten() {
            sat.in_use = false;
        }
        let mut used = 0;
        for &prn in self.sat_prn.iter().filter(|&&p| p != 0) {
            for sat in info.satinfo.sats.iter_mut().flatten() {
                if sat.id == prn {
                    sat.in_use = true;
                    used += 1;
                }
            }
        }
        info.satinfo.in_use = used;
        info.smask |= SentenceMask::GSA;
    }

    /// Rebuild a packet from a snapshot, for sentence generation
    pub fn from_info(info: &FixInfo) -> GsaPacket {
        let mut pack = GsaPacket::default();
        pack.mode = Some(if info.sig == SignalQuality::Manual { 'M' } else { 'A' });
        pack.present |= FieldMask::SIG;
        pack.fix = info.fix;
        pack.present |= FieldMask::FIX;

        let mut slot = 0;
        for sat in info.satinfo.used() {
            if slot >= GSA_SAT_COUNT {
                break;
            }
            pack.sat_prn[slot] = sat.id;
            slot += 1;
        }
        if slot > 0 {
            pack.sat_prn.sort_by_key(|&p| prn_sort_key(p));
            pack.present |= FieldMask::SATINUSE;
        }

        pack.pdop = info.pdop;
        pack.present |= FieldMask::PDOP;
        pack.hdop = info.hdop;
        pack.present |= FieldMask::HDOP;
        pack.vdop = info.vdop;
        pack.present |= FieldMask::VDOP;
        pack
    }

    /// Emit a framed `$GPGSA...*hh\r\n` sentence; unused PRN slots and
    /// absent fields stay empty
    pub fn generate(&self) -> String {
        let mode = match self.mode {
            Some(c) if self.present.contains(FieldMask::SIG) => c.to_string(),
            _ => String::new(),
        };
        let fix = if self.present.contains(FieldMask::FIX) {
            self.fix.value().to_string()
        } else {
            String::new()
        };

        let mut body = format!("$GPGSA,{},{}", mode, fix);
        for &prn in &self.sat_prn {
            if prn != 0 {
                body.push_str(&format!(",{:02}", prn));
            } else {
                body.push(',');
            }
        }
        for (flag, value) in [
            (FieldMask::PDOP, self.pdop),
            (FieldMask::HDOP, self.hdop),
            (FieldMask::VDOP, self.vdop),
        ] {
            if self.present.contains(flag) {
                body.push_str(&format!(",{:.1}", value));
            } else {
                body.push(',');
            }
        }
        frame::seal(&body)
    }
}
