// src/sentence/gsv.rs
//! GSV — satellites in view, up to four per sentence
//!
//! A full in-view report spans several GSV sentences; each carries its
//! 1-based pack index, the pack count and the total in view. Reassembly
//! happens at merge time by writing into the snapshot's satellite table
//! at the pack-index offset.

use crate::error::{NmeaError, Result};
use crate::info::{FieldMask, FixInfo, Satellite, SentenceMask, MAX_SATELLITES};
use crate::scan::{scan, Slot};

/// Satellites encoded per physical GSV sentence
pub const SATS_IN_PACK: usize = 4;

/// One satellite block of a GSV sentence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GsvSatellite {
    pub id: i32,
    pub elevation: i32,
    pub azimuth: i32,
    pub snr: i32,
}

/// Decoded GSV sentence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GsvPacket {
    pub present: FieldMask,
    /// Sentences in this report
    pub pack_count: i32,
    /// 1-based index of this sentence within the report
    pub pack_index: i32,
    /// Total satellites in view
    pub sat_count: i32,
    pub sats: [GsvSatellite; SATS_IN_PACK],
}

impl GsvPacket {
    pub fn parse(sentence: &str) -> Result<GsvPacket> {
        let mut pack_count = None;
        let mut pack_index = None;
        let mut sat_count = None;
        let mut sat: [[Option<i32>; 4]; SATS_IN_PACK] = [[None; 4]; SATS_IN_PACK];

        let [s0, s1, s2, s3] = &mut sat;
        let [id0, elv0, az0, snr0] = s0;
        let [id1, elv1, az1, snr1] = s1;
        let [id2, elv2, az2, snr2] = s2;
        let [id3, elv3, az3, snr3] = s3;
        let matched = scan(
            sentence,
            "$GPGSV,%d,%d,%d,\
             %d,%d,%d,%d,\
             %d,%d,%d,%d,\
             %d,%d,%d,%d,\
             %d,%d,%d,%d*",
            &mut [
                Slot::Int(&mut pack_count),
                Slot::Int(&mut pack_index),
                Slot::Int(&mut sat_count),
                Slot::Int(id0),
                Slot::Int(elv0),
                Slot::Int(az0),
                Slot::Int(snr0),
                Slot::Int(id1),
                Slot::Int(elv1),
                Slot::Int(az1),
                Slot::Int(snr1),
                Slot::Int(id2),
                Slot::Int(elv2),
                Slot::Int(az2),
                Slot::Int(snr2),
                Slot::Int(id3),
                Slot::Int(elv3),
                Slot::Int(az3),
                Slot::Int(snr3),
            ],
        );

        let (Some(pack_count), Some(pack_index), Some(sat_count)) =
            (pack_count, pack_index, sat_count)
        else {
            return Err(NmeaError::Parse(
                "GPGSV: missing sequence header".to_string(),
            ));
        };

        // Trailing slots may legitimately be empty only in the last
        // sentence of a report; everything else must be fully populated
        let remaining = sat_count as i64 - (pack_index as i64 - 1) * SATS_IN_PACK as i64;
        let in_pack = remaining.min(SATS_IN_PACK as i64).max(0);
        let min_tokens = (3 + 4 * in_pack) as usize;
        let max_tokens = 3 + 4 * SATS_IN_PACK;
        if matched < min_tokens || matched > max_tokens {
            return Err(NmeaError::FieldCount(format!(
                "GPGSV: need {}..{} fields, got {}",
                min_tokens, max_tokens, matched
            )));
        }

        let mut pack = GsvPacket { pack_count, pack_index, sat_count, ..GsvPacket::default() };
        for (entry, values) in pack.sats.iter_mut().zip(sat.iter()) {
            *entry = GsvSatellite {
                id: values[0].unwrap_or(0),
                elevation: values[1].unwrap_or(0),
                azimuth: values[2].unwrap_or(0),
                snr: values[3].unwrap_or(0),
            };
        }

        pack.present |= FieldMask::SATINVIEWCOUNT;
        if pack.sats.iter().any(|s| s.id != 0) {
            pack.present |= FieldMask::SATINVIEW;
        }

        Ok(pack)
    }

    /// Fold into the snapshot's satellite table at the pack-index offset.
    /// An index beyond the declared pack count or the table capacity is
    /// ignored so that one bad sentence cannot corrupt an otherwise valid
    /// report.
    pub fn merge_into(&self, info: &mut FixInfo) {
        if self.pack_index > self.pack_count
            || self.pack_index as i64 * SATS_IN_PACK as i64 > MAX_SATELLITES as i64
        {
            return;
        }
        let index = self.pack_index.max(1) as usize;

        info.satinfo.in_view = self.sat_count;

        let offset = (index - 1) * SATS_IN_PACK;
        let remaining = self.sat_count as i64 - offset as i64;
        let in_pack = remaining.min(SATS_IN_PACK as i64).max(0) as usize;
        for isat in 0..in_pack {
            let entry = &self.sats[isat];
            let slot = &mut info.satinfo.sats[offset + isat];
            // An in-use mark from a previous GSA merge survives a refresh
            let in_use = slot.map_or(false, |s| s.in_use);
            *slot = Some(Satellite {
                id: entry.id,
                elevation: entry.elevation,
                azimuth: entry.azimuth,
                snr: entry.snr,
                in_use,
            });
        }

        info.smask |= SentenceMask::GSV;
    }
}
