// src/parser.rs
//! Parsing context: drives frame extraction, dispatch, decode and merge

use crate::error::Result;
use crate::frame;
use crate::info::FixInfo;
use crate::sentence::{
    GgaPacket, GsaPacket, GsvPacket, RmcPacket, SentenceType, VtgPacket,
};
use crate::trace::{NopSink, TraceSink};

/// Decodes sentences out of raw buffers and merges them into a caller-
/// owned [`FixInfo`] snapshot. Holds no per-sentence state; the only
/// thing it owns is the diagnostic sink installed at construction.
pub struct NmeaParser {
    tracer: Box<dyn TraceSink>,
}

impl NmeaParser {
    /// Parser with the default no-op diagnostic sink
    pub fn new() -> Self {
        Self { tracer: Box::new(NopSink) }
    }

    /// Parser routing diagnostics to the given sink
    pub fn with_tracer(tracer: Box<dyn TraceSink>) -> Self {
        Self { tracer }
    }

    /// Scan `buff` for complete frames, decode each recognized sentence
    /// and merge it into `info`. Malformed frames and unknown tags are
    /// skipped without touching the snapshot. Returns the number of
    /// sentences merged.
    pub fn parse_buffer(&self, buff: &[u8], info: &mut FixInfo) -> usize {
        let mut pos = 0;
        let mut merged = 0;

        while pos < buff.len() {
            let Some(start) = buff[pos..].iter().position(|&b| b == b'$') else {
                break;
            };
            let span = &buff[pos + start..];
            match frame::find_tail(span) {
                Some(frame) => {
                    match std::str::from_utf8(&span[..frame.len]) {
                        Ok(text) => {
                            if let Ok(Some(_)) = self.parse_sentence(text, info) {
                                merged += 1;
                            }
                        }
                        Err(_) => self.tracer.error("sentence is not valid ASCII"),
                    }
                    pos += start + frame.len;
                }
                // No valid frame here; resynchronize past this `$`
                None => pos += start + 1,
            }
        }

        merged
    }

    /// Decode one framed sentence and merge it into `info`. Returns the
    /// merged sentence type, `Ok(None)` for an unrecognized tag (a normal
    /// outcome the caller simply skips), or the decode error after
    /// routing it to the diagnostic sink.
    pub fn parse_sentence(&self, sentence: &str, info: &mut FixInfo) -> Result<Option<SentenceType>> {
        self.tracer.trace(sentence.trim_end());

        let body = sentence.strip_prefix('$').unwrap_or(sentence);
        let Some(stype) = SentenceType::detect(body) else {
            return Ok(None);
        };

        let result = match stype {
            SentenceType::Gga => GgaPacket::parse(sentence).map(|p| p.merge_into(info)),
            SentenceType::Gsa => GsaPacket::parse(sentence).map(|p| p.merge_into(info)),
            SentenceType::Gsv => GsvPacket::parse(sentence).map(|p| p.merge_into(info)),
            SentenceType::Rmc => RmcPacket::parse(sentence).map(|p| p.merge_into(info)),
            SentenceType::Vtg => VtgPacket::parse(sentence).map(|p| p.merge_into(info)),
        };

        match result {
            Ok(()) => Ok(Some(stype)),
            Err(e) => {
                self.tracer.error(&e.to_string());
                Err(e)
            }
        }
    }
}

impl Default for NmeaParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::{FixType, SentenceMask, SignalQuality};

    const FEED: &str = concat!(
        "$GPGSV,3,1,12,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45*7F\r\n",
        "$GPGSV,3,2,12,15,30,050,47,17,45,100,44,19,12,200,38,22,60,270,42*7B\r\n",
        "$GPGSV,3,3,12,24,10,090,33,25,05,020,,31,10,120,30,32,70,300,41*77\r\n",
        "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n",
        "$GPGSA,A,3,04,05,,,09,12,,,24,,,,2.5,1.3,2.1*39\r\n",
        "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A\r\n",
        "$GPVTG,084.4,T,077.8,M,022.4,N,041.5,K*4A\r\n",
    );

    #[test]
    fn test_session_aggregates_all_types() {
        let parser = NmeaParser::new();
        let mut info = FixInfo::new();
        let merged = parser.parse_buffer(FEED.as_bytes(), &mut info);

        assert_eq!(merged, 7);
        assert_eq!(
            info.smask,
            SentenceMask::GGA
                | SentenceMask::GSA
                | SentenceMask::GSV
                | SentenceMask::RMC
                | SentenceMask::VTG
        );
        assert_eq!(info.fix, FixType::Fix3d);
        assert_eq!(info.sig, SignalQuality::Gps);
        assert_eq!(info.satinfo.in_view, 12);
        // PRNs 12 and 24 from the GSA list are in the in-view table
        assert_eq!(info.satinfo.in_use, 2);
        assert_eq!(info.lat, 4807.038);
        assert_eq!(info.speed, 41.5);
        assert!(info.timestamp().is_some());
    }

    #[test]
    fn test_corrupted_checksum_frame_is_skipped() {
        let parser = NmeaParser::new();
        let mut info = FixInfo::new();
        let feed = concat!(
            "$GPGSA,A,3,04,05,,,09,12,,,24,,,,2.5,1.3,2.1*00\r\n",
            "$GPVTG,084.4,T,077.8,M,022.4,N,041.5,K*4A\r\n",
        );
        let merged = parser.parse_buffer(feed.as_bytes(), &mut info);
        assert_eq!(merged, 1);
        assert_eq!(info.smask, SentenceMask::VTG);
        assert_eq!(info.fix, FixType::NoFix);
    }

    #[test]
    fn test_noise_between_frames_is_ignored() {
        let parser = NmeaParser::new();
        let mut info = FixInfo::new();
        let mut feed = Vec::new();
        feed.extend_from_slice(b"garbage\xfe\x01noise");
        feed.extend_from_slice(b"$GPVTG,084.4,T,077.8,M,022.4,N,041.5,K*4A\r\n");
        feed.extend_from_slice(b"more$$$noise");
        let merged = parser.parse_buffer(&feed, &mut info);
        assert_eq!(merged, 1);
        assert_eq!(info.speed, 41.5);
    }

    #[test]
    fn test_embedded_start_resynchronizes() {
        let parser = NmeaParser::new();
        let mut info = FixInfo::new();
        // A truncated sentence runs straight into a complete one
        let feed = "$GPGGA,123519,4807.038$GPVTG,084.4,T,077.8,M,022.4,N,041.5,K*4A\r\n";
        let merged = parser.parse_buffer(feed.as_bytes(), &mut info);
        assert_eq!(merged, 1);
        assert_eq!(info.smask, SentenceMask::VTG);
    }

    #[test]
    fn test_unknown_tag_is_skipped() {
        let parser = NmeaParser::new();
        let mut info = FixInfo::new();
        let sealed = crate::frame::seal("$GPZDA,123519.00,23,03,1994,00,00");
        assert_eq!(parser.parse_buffer(sealed.as_bytes(), &mut info), 0);
        assert!(info.smask.is_empty());
    }

    #[test]
    fn test_rmc_void_overrides_earlier_gsa_fix() {
        let parser = NmeaParser::new();
        let mut info = FixInfo::new();
        parser
            .parse_sentence("$GPGSA,A,3,04,05,,,09,12,,,24,,,,2.5,1.3,2.1*39\r\n", &mut info)
            .unwrap();
        assert_eq!(info.fix, FixType::Fix3d);
        parser
            .parse_sentence(
                "$GPRMC,123519,V,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*7D\r\n",
                &mut info,
            )
            .unwrap();
        assert_eq!(info.fix, FixType::NoFix);
        assert_eq!(info.sig, SignalQuality::Invalid);
    }

    #[test]
    fn test_decode_failure_reaches_sink() {
        use std::sync::{Arc, Mutex};

        struct CollectSink(Arc<Mutex<Vec<String>>>);
        impl TraceSink for CollectSink {
            fn trace(&self, _message: &str) {}
            fn error(&self, message: &str) {
                self.0.lock().unwrap().push(message.to_string());
            }
        }

        // Valid frame, invalid selection mode
        let sealed = crate::frame::seal("$GPGSA,Q,3,04,05,,,09,12,,,24,,,,2.5,1.3,2.1");
        let errors = Arc::new(Mutex::new(Vec::new()));
        let parser = NmeaParser::with_tracer(Box::new(CollectSink(Arc::clone(&errors))));
        let mut info = FixInfo::new();
        assert_eq!(parser.parse_buffer(sealed.as_bytes(), &mut info), 0);
        assert!(info.smask.is_empty());
        let errors = errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("selection mode"));
    }
}
