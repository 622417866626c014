use crate::{
    body::Variant,
    error::{Error, Result},
    header::{Header, CONTIG, FILTER, FORMAT, INFO},
};
use std::io::{self, BufRead, BufReader, Read, Write};
use tracing::{debug, trace};

/// Supplies the raw header lines of a file: `##` lines, then `#CHROM`.
pub trait HeaderSource {
    fn header_lines(&mut self) -> Result<Vec<String>>;

    fn read_header(&mut self) -> Result<Header> {
        Header::parse(self.header_lines()?)
    }
}

/// Supplies data lines one at a time, without line terminators.
pub trait LineSource {
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Accepts written lines. `finish` commits whatever the sink stands for.
pub trait LineSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Plain VCF text: header lines followed by data lines, from one reader.
#[derive(Debug)]
pub struct TextSource<R: BufRead> {
    reader: R,
}

impl<R: Read> TextSource<BufReader<R>> {
    pub fn new(read: R) -> Self {
        TextSource {
            reader: BufReader::new(read),
        }
    }
}

impl<R: BufRead> TextSource<R> {
    pub fn from_buf_read(reader: R) -> Self {
        TextSource { reader }
    }

    fn read_raw(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        // remove newline
        let len = line.trim_end_matches(|c: char| c == '\n' || c == '\r').len();
        line.truncate(len);
        Ok(Some(line))
    }
}

impl<R: BufRead> HeaderSource for TextSource<R> {
    fn header_lines(&mut self) -> Result<Vec<String>> {
        let mut lines = vec![];
        loop {
            // stop before the first data line without consuming it
            if self.reader.fill_buf()?.first() != Some(&b'#') {
                break;
            }
            match self.read_raw()? {
                Some(line) => {
                    let done = line.starts_with("#CHROM");
                    lines.push(line);
                    if done {
                        break;
                    }
                }
                None => break,
            }
        }
        Ok(lines)
    }
}

impl<R: BufRead> LineSource for TextSource<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.read_raw()
    }
}

/// Writes lines as plain text, one per `\n`-terminated line.
#[derive(Debug)]
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        TextSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LineSink for TextSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", line)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Pulls decoded variants from a line source, one per `scan`.
///
/// The header is borrowed for the whole scan and supplies the sample names.
/// A decode or read error ends the scan and is kept for `err`.
pub struct Scanner<'h, S: LineSource> {
    header: &'h Header,
    source: S,
    current: Option<Variant>,
    err: Option<Error>,
    done: bool,
    records: usize,
}

impl<'h, S: LineSource> Scanner<'h, S> {
    pub fn new(header: &'h Header, source: S) -> Self {
        Scanner {
            header,
            source,
            current: None,
            err: None,
            done: false,
            records: 0,
        }
    }

    pub fn header(&self) -> &'h Header {
        self.header
    }

    /// Advances to the next variant. Returns false at the end of the input or
    /// on error; check `err` to tell them apart.
    pub fn scan(&mut self) -> bool {
        match self.next_variant() {
            Some(Ok(variant)) => {
                self.current = Some(variant);
                true
            }
            Some(Err(e)) => {
                self.current = None;
                self.err = Some(e);
                false
            }
            None => {
                self.current = None;
                false
            }
        }
    }

    /// The variant decoded by the last successful `scan`.
    pub fn variant(&self) -> Option<&Variant> {
        self.current.as_ref()
    }

    pub fn take_variant(&mut self) -> Option<Variant> {
        self.current.take()
    }

    pub fn err(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    pub fn records(self) -> Records<'h, S> {
        Records { scanner: self }
    }

    fn next_variant(&mut self) -> Option<Result<Variant>> {
        if self.done {
            return None;
        }
        loop {
            let line = match self.source.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.done = true;
                    debug!(records = self.records, "reached end of VCF records");
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };
            if line.is_empty() {
                continue;
            }

            self.records += 1;
            trace!(record = self.records, "decoding VCF record");
            let result = Variant::parse(&line, self.header.samples());
            if result.is_err() {
                self.done = true;
            }
            return Some(result);
        }
    }
}

/// Iterator over the remaining variants of a `Scanner`. Yields the first
/// error and then stops.
pub struct Records<'h, S: LineSource> {
    scanner: Scanner<'h, S>,
}

impl<'h, S: LineSource> Iterator for Records<'h, S> {
    type Item = Result<Variant>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scanner.next_variant()
    }
}

/// Checks that `variant` only refers to what `header` declares.
pub fn check_variant(header: &Header, variant: &Variant) -> Result<()> {
    // contig lines are optional; only check when there are some
    if header.contigs().next().is_some() && !header.has_id(CONTIG, &variant.chromosome) {
        return Err(Error::consistency(format!(
            "header missing contig {}",
            variant.chromosome
        )));
    }

    if let Some(filter) = variant.filter.iter().find(|f| !header.has_id(FILTER, f)) {
        return Err(Error::consistency(format!(
            "filter {} not found in header",
            filter
        )));
    }

    if let Some(key) = variant.info.keys().find(|k| !header.has_id(INFO, k)) {
        return Err(Error::consistency(format!(
            "info {} not found in header",
            key
        )));
    }

    if let Some(tag) = variant.format.iter().find(|t| !header.has_id(FORMAT, t)) {
        return Err(Error::consistency(format!(
            "format {} not found in header",
            tag
        )));
    }

    let names = variant.genotypes().iter().map(|g| g.name.as_str());
    if !names.eq(header.samples().iter().map(|s| s.as_str())) {
        return Err(Error::consistency(
            "the genotype samples do not match the samples in the header",
        ));
    }
    Ok(())
}

/// Writes a header and then variants that are consistent with it.
pub struct Writer<S: LineSink> {
    sink: S,
    header: Option<Header>,
}

impl<S: LineSink> Writer<S> {
    pub fn new(sink: S) -> Self {
        Writer { sink, header: None }
    }

    pub fn write_header(&mut self, header: &Header) -> Result<()> {
        if self.header.is_some() {
            return Err(Error::consistency("header has already been written"));
        }
        for line in header.to_lines() {
            self.sink.write_line(&line)?;
        }
        self.header = Some(header.clone());
        Ok(())
    }

    /// Validates `variant` against the written header, then writes it. A
    /// rejected variant leaves the writer usable.
    pub fn write_variant(&mut self, variant: &Variant) -> Result<()> {
        let header = self
            .header
            .as_ref()
            .ok_or_else(|| Error::consistency("writer has no header, unable to add variants"))?;
        if let Err(e) = check_variant(header, variant) {
            debug!(
                chromosome = %variant.chromosome,
                position = variant.position,
                error = %e,
                "rejected variant"
            );
            return Err(e);
        }
        self.sink
            .write_line(&variant.display_with(header).to_string())?;
        Ok(())
    }

    /// Commits the sink and returns it.
    pub fn finish(mut self) -> Result<S> {
        self.sink.finish()?;
        Ok(self.sink)
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}
