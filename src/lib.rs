// src/lib.rs
//! NMEA-0183 Decoder Library
//!
//! Decodes GGA, GSA, GSV, RMC and VTG sentences from raw byte streams and
//! aggregates them into one coherent fix-info snapshot. Transport (serial
//! ports, files, sockets) is the caller's business: feed raw buffers to
//! [`NmeaParser::parse_buffer`] and keep the [`FixInfo`] snapshot for the
//! lifetime of the GPS session.

pub mod error;
pub mod frame;
pub mod info;
pub mod parser;
pub mod scan;
pub mod sentence;
pub mod time;
pub mod trace;

// Re-export main types for convenience
pub use error::{NmeaError, Result};
pub use info::{FieldMask, FixInfo, FixType, Satellite, SentenceMask, SignalQuality};
pub use parser::NmeaParser;
pub use sentence::{GgaPacket, GsaPacket, GsvPacket, RmcPacket, SentenceType, VtgPacket};
pub use time::NmeaTime;
pub use trace::{LogSink, NopSink, TraceSink};
