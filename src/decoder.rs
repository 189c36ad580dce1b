//! Multi-member gzip stream decoder.
//!
//! [`MultiGzDecoder`] turns a byte source holding zero or more concatenated
//! gzip members into one continuous stream of decompressed bytes, exposed
//! through [`std::io::Read`]. Nothing is decoded until the first `read`.
//!
//! # State machine
//!
//! ```text
//!                  ┌───────────── footer ok ─────────────┐
//!                  v                                     │
//!   ExpectHeader ──header ok──> Streaming ──end──> ExpectFooter
//!        │                         │                     │
//!     0 bytes                 bad payload           bad footer
//!        v                         v                     v
//!    Exhausted                  Failed <─────────────────┘
//! ```
//!
//! `Exhausted` and `Failed` are terminal: later reads return `Ok(0)` or the
//! same error again. The loop back from `ExpectFooter` to `ExpectHeader` is
//! what distinguishes this decoder from a single-member one; setting
//! [`DecodeOptions::single_member`] turns it off.
//!
//! # Trailing data
//!
//! After at least one member validated, bytes that do not start a valid
//! member are governed by [`TailPolicy`]. Under `Strict` (the default) they
//! fail the stream; under `Lenient` they are reported at display level 2 and
//! the stream ends normally. A stream whose very first member is bad always
//! fails.

use std::io::{self, BufRead, BufReader, Read};

use crate::config::{DEFAULT_HEADER_CRC_POLICY, DEFAULT_TAIL_POLICY, INPUT_BUFFER_SIZE};
use crate::cursor::ByteCursor;
use crate::displaylevel;
use crate::error::{ErrorKind, GzError};
use crate::inflate::RawInflater;
use crate::member::{read_and_validate_footer, read_header, MemberFooter, MemberHeader, FOOTER_SIZE};

pub use crate::member::HeaderCrcPolicy;

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Handling of bytes after the last valid member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TailPolicy {
    /// Trailing bytes that do not form a valid member fail the stream.
    #[default]
    Strict,
    /// Trailing garbage after at least one valid member is ignored.
    Lenient,
}

/// Decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub tail_policy: TailPolicy,
    pub header_crc: HeaderCrcPolicy,
    /// Stop after the first validated member, leaving the rest of the
    /// source unread.
    pub single_member: bool,
    /// Keep a [`MemberSummary`] for every validated member; drain them
    /// with [`MultiGzDecoder::take_member_summaries`].
    pub record_members: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            tail_policy: DEFAULT_TAIL_POLICY,
            header_crc: DEFAULT_HEADER_CRC_POLICY,
            single_member: false,
            record_members: false,
        }
    }
}

impl DecodeOptions {
    pub fn tail_policy(mut self, policy: TailPolicy) -> Self {
        self.tail_policy = policy;
        self
    }

    pub fn header_crc(mut self, policy: HeaderCrcPolicy) -> Self {
        self.header_crc = policy;
        self
    }

    pub fn single_member(mut self, yes: bool) -> Self {
        self.single_member = yes;
        self
    }

    pub fn record_members(mut self, yes: bool) -> Self {
        self.record_members = yes;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// State
// ─────────────────────────────────────────────────────────────────────────────

/// Externally visible decoder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    ExpectHeader,
    Streaming,
    ExpectFooter,
    Exhausted,
    Failed,
}

/// Running totals for the member being decoded.
#[derive(Clone, Default)]
struct MemberProgress {
    crc: crc32fast::Hasher,
    produced: u64,
}

enum State {
    ExpectHeader,
    Streaming(MemberProgress),
    ExpectFooter(MemberProgress),
    Exhausted,
    Failed(GzError),
}

/// What the decoder learned about one fully validated member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSummary {
    /// 0-based position in the stream.
    pub index: u64,
    /// Offset of the member's first magic byte.
    pub start_offset: u64,
    pub header: MemberHeader,
    /// Raw DEFLATE bytes between header and footer.
    pub compressed_len: u64,
    /// Header + payload + footer.
    pub member_len: u64,
    pub uncompressed_len: u64,
    pub footer: MemberFooter,
}

// ─────────────────────────────────────────────────────────────────────────────
// MultiGzDecoder
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming decoder for concatenated gzip members.
///
/// Owns its source for its whole life; dropping the decoder (or calling
/// [`close`](Self::close)) releases it.
pub struct MultiGzDecoder<R> {
    cursor: ByteCursor<R>,
    inflater: RawInflater,
    state: State,
    options: DecodeOptions,
    /// Members fully validated so far; also the index of the current one.
    members: u64,
    member_start: u64,
    header: Option<MemberHeader>,
    total_out: u64,
    summaries: Vec<MemberSummary>,
}

impl<R: Read> MultiGzDecoder<BufReader<R>> {
    /// Bind a decoder to `source` with default options. Never fails; the
    /// first header is parsed on the first `read`.
    pub fn new(source: R) -> Self {
        Self::with_options(source, DecodeOptions::default())
    }

    pub fn with_options(source: R, options: DecodeOptions) -> Self {
        Self::from_bufread_with_options(BufReader::with_capacity(INPUT_BUFFER_SIZE, source), options)
    }
}

impl<R: BufRead> MultiGzDecoder<R> {
    /// Use an already-buffered source directly.
    pub fn from_bufread(source: R) -> Self {
        Self::from_bufread_with_options(source, DecodeOptions::default())
    }

    pub fn from_bufread_with_options(source: R, options: DecodeOptions) -> Self {
        MultiGzDecoder {
            cursor: ByteCursor::new(source),
            inflater: RawInflater::new(),
            state: State::ExpectHeader,
            options,
            members: 0,
            member_start: 0,
            header: None,
            total_out: 0,
            summaries: Vec::new(),
        }
    }

    // ── Diagnostics ─────────────────────────────────────────────────────────

    pub fn state(&self) -> DecoderState {
        match self.state {
            State::ExpectHeader => DecoderState::ExpectHeader,
            State::Streaming(_) => DecoderState::Streaming,
            State::ExpectFooter(_) => DecoderState::ExpectFooter,
            State::Exhausted => DecoderState::Exhausted,
            State::Failed(_) => DecoderState::Failed,
        }
    }

    /// Number of members whose footer has been validated.
    pub fn members_decoded(&self) -> u64 {
        self.members
    }

    /// Header of the member currently (or most recently) being decoded.
    pub fn last_header(&self) -> Option<&MemberHeader> {
        self.header.as_ref()
    }

    /// Compressed bytes consumed from the source so far.
    pub fn total_in(&self) -> u64 {
        self.cursor.offset()
    }

    /// Decompressed bytes handed to the caller so far.
    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    /// The error that put the decoder into `Failed`, if any.
    pub fn error(&self) -> Option<&GzError> {
        match &self.state {
            State::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Drain the per-member records collected under
    /// [`DecodeOptions::record_members`].
    pub fn take_member_summaries(&mut self) -> Vec<MemberSummary> {
        std::mem::take(&mut self.summaries)
    }

    // ── Source access ───────────────────────────────────────────────────────

    pub fn get_ref(&self) -> &R {
        self.cursor.get_ref()
    }

    /// Mutable access to the source. Reading from it directly desynchronizes
    /// the decoder.
    pub fn get_mut(&mut self) -> &mut R {
        self.cursor.get_mut()
    }

    /// Give the source back. In single-member mode it is positioned right
    /// after the first member's footer.
    pub fn into_inner(self) -> R {
        self.cursor.into_inner()
    }

    /// Release the source.
    pub fn close(self) {}

    // ── State machine ───────────────────────────────────────────────────────

    /// Parse the next member header, or decide the stream is over.
    /// Returns `false` when the decoder moved to `Exhausted`.
    fn begin_member(&mut self) -> Result<bool, GzError> {
        if self.cursor.is_at_eof()? {
            displaylevel!(4, "end of stream after {} member(s)\n", self.members);
            return Ok(false);
        }

        self.member_start = self.cursor.offset();
        match read_header(&mut self.cursor, self.options.header_crc) {
            Ok(header) => {
                displaylevel!(
                    4,
                    "member #{} at offset {}: header {} bytes, name {:?}\n",
                    self.members,
                    self.member_start,
                    header.header_len,
                    header.filename_lossy().unwrap_or_default()
                );
                self.header = Some(header);
                self.inflater.reset();
                Ok(true)
            }
            Err(e) if self.is_ignorable_tail(&e) => {
                displaylevel!(
                    2,
                    "ignoring trailing garbage at offset {} after {} member(s): {}\n",
                    self.member_start,
                    self.members,
                    e.kind()
                );
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn is_ignorable_tail(&self, err: &GzError) -> bool {
        self.options.tail_policy == TailPolicy::Lenient
            && self.members > 0
            && !matches!(err.kind(), ErrorKind::Io { .. })
    }

    /// Validate the footer and record the member.
    fn finish_member(&mut self, progress: MemberProgress) -> Result<(), GzError> {
        let actual_crc = progress.crc.finalize();
        let footer = read_and_validate_footer(&mut self.cursor, actual_crc, progress.produced)?;
        displaylevel!(
            4,
            "member #{}: {} -> {} bytes, crc32 0x{:08x} ok\n",
            self.members,
            self.inflater.total_in(),
            progress.produced,
            actual_crc
        );

        if self.options.record_members {
            let header = self.header.clone().unwrap_or_default();
            let compressed_len = self.inflater.total_in();
            let member_len = self.cursor.offset() - self.member_start;
            debug_assert_eq!(member_len, header.header_len + compressed_len + FOOTER_SIZE as u64);
            self.summaries.push(MemberSummary {
                index: self.members,
                start_offset: self.member_start,
                header,
                compressed_len,
                member_len,
                uncompressed_len: progress.produced,
                footer,
            });
        }
        self.members += 1;
        Ok(())
    }

    /// Drive the machine until some output is produced or a terminal state
    /// is reached.
    fn step(&mut self, buf: &mut [u8]) -> Result<usize, GzError> {
        loop {
            match &mut self.state {
                State::Exhausted => return Ok(0),
                State::Failed(e) => return Err(e.clone()),
                State::ExpectHeader => {
                    self.state = if self.begin_member()? {
                        State::Streaming(MemberProgress::default())
                    } else {
                        State::Exhausted
                    };
                }
                State::Streaming(progress) => {
                    if buf.is_empty() {
                        return Ok(0);
                    }
                    let step = self.inflater.inflate(&mut self.cursor, buf)?;
                    progress.crc.update(&buf[..step.written]);
                    progress.produced += step.written as u64;
                    if step.finished {
                        let progress = std::mem::take(progress);
                        self.state = State::ExpectFooter(progress);
                    }
                    if step.written > 0 {
                        self.total_out += step.written as u64;
                        return Ok(step.written);
                    }
                }
                State::ExpectFooter(progress) => {
                    let progress = std::mem::take(progress);
                    self.finish_member(progress)?;
                    self.state = if self.options.single_member {
                        State::Exhausted
                    } else {
                        State::ExpectHeader
                    };
                }
            }
        }
    }
}

impl<R: BufRead> Read for MultiGzDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let State::Failed(e) = &self.state {
            return Err(e.clone().into());
        }
        match self.step(buf) {
            Ok(n) => Ok(n),
            Err(e) => {
                let e = e.in_member(self.members);
                displaylevel!(4, "decoder failed: {}\n", e);
                self.state = State::Failed(e.clone());
                Err(e.into())
            }
        }
    }
}
