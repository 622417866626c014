//! `bcftools`-backed sources and sinks, for compressed VCF and BCF files.

use crate::{
    error::Error,
    header::Header,
    parser::{HeaderSource, LineSink, LineSource, Scanner, Writer},
};
use anyhow::{bail, Context};
use std::{
    env,
    ffi::OsStr,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    process::{Child, ChildStdin, ChildStdout, Command, ExitStatus, Stdio},
};
use tracing::{debug, warn};

/// Environment variable that overrides where `bcftools` is looked up.
pub const PROGRAM_ENV: &str = "BCFTOOLS";

const PROGRAM: &str = "bcftools";

/// Location of the `bcftools` program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bcftools {
    program: PathBuf,
}

impl Bcftools {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Bcftools {
            program: program.into(),
        }
    }

    /// Looks in `$BCFTOOLS`, then `PATH`, then next to the running executable.
    pub fn locate() -> anyhow::Result<Self> {
        if let Some(program) = env::var_os(PROGRAM_ENV) {
            return Ok(Bcftools::new(program));
        }
        if let Ok(program) = which::which(PROGRAM) {
            return Ok(Bcftools::new(program));
        }
        let exe = env::current_exe().context("unable to resolve the running executable")?;
        if let Some(candidate) = exe.parent().map(|dir| dir.join(PROGRAM)) {
            if candidate.is_file() {
                return Ok(Bcftools::new(candidate));
            }
        }
        bail!(
            "unable to find {} in ${}, PATH or next to {}",
            PROGRAM,
            PROGRAM_ENV,
            exe.display()
        )
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command.args(args);
        debug!(command = ?command, "running bcftools");
        command
    }
}

/// Output container written by `bcftools view -O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Vcf,
    CompressedVcf,
    Bcf,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Self {
        let name = path.to_string_lossy();
        if name.ends_with(".vcf.gz") {
            OutputFormat::CompressedVcf
        } else if name.ends_with(".bcf") {
            OutputFormat::Bcf
        } else {
            OutputFormat::Vcf
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            OutputFormat::Vcf => "v",
            OutputFormat::CompressedVcf => "z",
            OutputFormat::Bcf => "b",
        }
    }
}

fn exit_error(what: &str, status: ExitStatus) -> io::Error {
    io::Error::new(
        io::ErrorKind::Other,
        format!("bcftools {} exited with {}", what, status),
    )
}

/// Reads the header of `path` with `bcftools view -h`.
pub struct BcftoolsHeader<'a> {
    bcftools: &'a Bcftools,
    path: PathBuf,
}

impl<'a> BcftoolsHeader<'a> {
    pub fn new(bcftools: &'a Bcftools, path: impl Into<PathBuf>) -> Self {
        BcftoolsHeader {
            bcftools,
            path: path.into(),
        }
    }
}

impl HeaderSource for BcftoolsHeader<'_> {
    fn header_lines(&mut self) -> crate::Result<Vec<String>> {
        let output = self
            .bcftools
            .command(["view", "--no-version", "-h"])
            .arg(&self.path)
            .stdin(Stdio::null())
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("bcftools view -h failed: {}", stderr.trim()),
            )
            .into());
        }
        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(stdout.lines().map(|s| s.to_string()).collect())
    }
}

/// Data lines of a file, streamed from `bcftools view -H`.
///
/// Dropping the source before the end kills the child process.
pub struct BcftoolsSource {
    child: Child,
    stdout: BufReader<ChildStdout>,
    finished: bool,
}

impl BcftoolsSource {
    pub fn spawn(bcftools: &Bcftools, path: &Path) -> anyhow::Result<Self> {
        let mut child = bcftools
            .command(["view", "-H"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("unable to run {}", bcftools.program().display()))?;
        let stdout = child
            .stdout
            .take()
            .context("bcftools stdout was not captured")?;
        Ok(BcftoolsSource {
            child,
            stdout: BufReader::new(stdout),
            finished: false,
        })
    }
}

impl LineSource for BcftoolsSource {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        if self.finished {
            return Ok(None);
        }
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            self.finished = true;
            let status = self.child.wait()?;
            debug!(%status, "bcftools view finished");
            if !status.success() {
                return Err(exit_error("view", status));
            }
            return Ok(None);
        }
        let len = line.trim_end_matches(|c: char| c == '\n' || c == '\r').len();
        line.truncate(len);
        Ok(Some(line))
    }
}

impl Drop for BcftoolsSource {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Pipes written lines into `bcftools view`, which writes `path` in the
/// container its extension names. The file is complete after `finish`.
pub struct BcftoolsSink {
    child: Child,
    stdin: Option<BufWriter<ChildStdin>>,
    finished: bool,
}

impl BcftoolsSink {
    pub fn create(bcftools: &Bcftools, path: &Path) -> anyhow::Result<Self> {
        let format = OutputFormat::from_path(path);
        let mut child = bcftools
            .command(["view", "--no-version", "-O", format.flag(), "-o"])
            .arg(path)
            .arg("-")
            .stdin(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("unable to run {}", bcftools.program().display()))?;
        let stdin = child
            .stdin
            .take()
            .context("bcftools stdin was not captured")?;
        Ok(BcftoolsSink {
            child,
            stdin: Some(BufWriter::new(stdin)),
            finished: false,
        })
    }
}

impl LineSink for BcftoolsSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "sink is finished"))?;
        writeln!(stdin, "{}", line)
    }

    fn finish(&mut self) -> io::Result<()> {
        if let Some(mut stdin) = self.stdin.take() {
            // closing stdin lets bcftools finish the file
            stdin.flush()?;
        }
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        let status = self.child.wait()?;
        debug!(%status, "bcftools view finished");
        if !status.success() {
            return Err(exit_error("view", status));
        }
        Ok(())
    }
}

impl Drop for BcftoolsSink {
    fn drop(&mut self) {
        if !self.finished {
            warn!("bcftools sink dropped before finish, output may be incomplete");
            self.stdin.take();
            let _ = self.child.wait();
        }
    }
}

/// Indexes a compressed VCF (`.tbi`) or a BCF (`.csi`).
pub fn create_index(bcftools: &Bcftools, path: &Path) -> anyhow::Result<()> {
    let args: &[&str] = match OutputFormat::from_path(path) {
        OutputFormat::Vcf => {
            return Err(Error::UnsupportedOperation(format!(
                "cannot index uncompressed VCF {}",
                path.display()
            ))
            .into())
        }
        OutputFormat::CompressedVcf => &["index", "-t"],
        OutputFormat::Bcf => &["index"],
    };
    let status = bcftools
        .command(args)
        .arg(path)
        .status()
        .with_context(|| format!("unable to run {}", bcftools.program().display()))?;
    if !status.success() {
        return Err(exit_error("index", status))
            .with_context(|| format!("unable to index {}", path.display()));
    }
    Ok(())
}

/// Opens `path` for writing through a validating `Writer` and writes `header`.
pub fn create_writer(
    bcftools: &Bcftools,
    path: &Path,
    header: &Header,
) -> anyhow::Result<Writer<BcftoolsSink>> {
    let mut writer = Writer::new(BcftoolsSink::create(bcftools, path)?);
    writer
        .write_header(header)
        .with_context(|| format!("unable to write header to {}", path.display()))?;
    Ok(writer)
}

/// A VCF or BCF file opened through `bcftools`, with its header read.
#[derive(Debug)]
pub struct Vcf {
    path: PathBuf,
    header: Header,
    bcftools: Bcftools,
}

impl Vcf {
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        Vcf::open_with(Bcftools::locate()?, path)
    }

    pub fn open_with(bcftools: Bcftools, path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let header = BcftoolsHeader::new(&bcftools, &path)
            .read_header()
            .with_context(|| format!("unable to read header of {}", path.display()))?;
        Ok(Vcf {
            path,
            header,
            bcftools,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn bcftools(&self) -> &Bcftools {
        &self.bcftools
    }

    /// Starts a fresh pass over the records.
    pub fn scanner(&self) -> anyhow::Result<Scanner<'_, BcftoolsSource>> {
        let source = BcftoolsSource::spawn(&self.bcftools, &self.path)?;
        Ok(Scanner::new(&self.header, source))
    }
}
