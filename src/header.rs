use crate::{
    body::FIXED_COLUMNS,
    error::{Error, Result},
};
use linked_hash_map::LinkedHashMap;
use std::{
    collections::HashSet,
    fmt::{Display, Error as FmtError, Formatter},
    str::FromStr,
};
use tracing::debug;

/// Tags of a structured header line, in declaration order.
pub type Tags = LinkedHashMap<String, String>;

pub const FILTER: &str = "FILTER";
pub const INFO: &str = "INFO";
pub const FORMAT: &str = "FORMAT";
pub const CONTIG: &str = "contig";
pub const ALT: &str = "ALT";

/// Version used by `Header::new` when nothing else is known.
pub const DEFAULT_VERSION: f64 = 4.2;

/// Tags written first, in this order, whenever a structured line has them.
const CANONICAL_ORDER: &[&str] = &["ID", "Number", "Type", "Description"];

/// The header of the VCF file
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// The VCF version, e.g. `4.2` for `##fileformat=VCFv4.2`.
    version: f64,

    /// Captures all other lines of the header, in the order they were added.
    lines: Vec<HeaderLine>,

    /// The sample column names that follow `FORMAT` on the `#CHROM` line.
    samples: Vec<String>,
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl Header {
    /// Creates an empty header with the default file format version.
    pub fn new() -> Self {
        Self {
            version: DEFAULT_VERSION,
            lines: vec![],
            samples: vec![],
        }
    }

    /// Assembles a header from raw lines (`##` metadata lines followed by the
    /// `#CHROM` column line).
    pub fn parse<I, S>(raw_lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut version = None;
        let mut header = Header::new();

        for raw in raw_lines {
            let line = raw.as_ref().trim_end_matches(|c: char| c == '\n' || c == '\r');
            if line.is_empty() {
                continue;
            }

            if line.starts_with("##") {
                match line.parse::<HeaderLine>()? {
                    HeaderLine::Simple { key, value } if key == "fileformat" => {
                        version = Some(parse_version(&value)?);
                    }
                    header_line => header.lines.push(header_line),
                }
            } else if line.starts_with("#CHROM") {
                let samples = line
                    .split('\t')
                    .skip(FIXED_COLUMNS.len() + 1)
                    .map(|s| s.to_string())
                    .collect();
                header.set_samples(samples)?;
            } else {
                return Err(Error::schema("invalid line while parsing header", line));
            }
        }

        header.version = version
            .ok_or_else(|| Error::schema("VCF has no version number", "##fileformat"))?;
        debug!(
            version = header.version,
            lines = header.lines.len(),
            samples = header.samples.len(),
            "parsed VCF header"
        );
        Ok(header)
    }

    pub fn version(&self) -> f64 {
        self.version
    }

    pub fn set_version(&mut self, version: f64) -> Result<()> {
        if !(version > 0.0) {
            return Err(Error::schema("invalid version", version.to_string()));
        }
        self.version = version;
        Ok(())
    }

    /// All header lines except `fileformat`, in insertion order.
    pub fn lines(&self) -> &[HeaderLine] {
        &self.lines
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Replaces the sample list. Sample names must be unique.
    pub fn set_samples(&mut self, samples: Vec<String>) -> Result<()> {
        let mut seen = HashSet::new();
        if let Some(dup) = samples.iter().find(|s| !seen.insert(s.as_str())) {
            return Err(Error::schema("sample column names must be unique", dup.as_str()));
        }
        self.samples = samples;
        Ok(())
    }

    pub fn add_header_lines<I: IntoIterator<Item = HeaderLine>>(&mut self, lines: I) {
        self.lines.extend(lines);
    }

    fn lines_of<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a HeaderLine> + 'a {
        self.lines.iter().filter(move |l| l.key() == key)
    }

    pub fn filters(&self) -> impl Iterator<Item = &HeaderLine> {
        self.lines_of(FILTER)
    }

    pub fn infos(&self) -> impl Iterator<Item = &HeaderLine> {
        self.lines_of(INFO)
    }

    pub fn formats(&self) -> impl Iterator<Item = &HeaderLine> {
        self.lines_of(FORMAT)
    }

    pub fn contigs(&self) -> impl Iterator<Item = &HeaderLine> {
        self.lines_of(CONTIG)
    }

    /// Every line that is not a FILTER, INFO, FORMAT or contig line.
    pub fn others(&self) -> impl Iterator<Item = &HeaderLine> {
        self.lines
            .iter()
            .filter(|l| ![FILTER, INFO, FORMAT, CONTIG].contains(&l.key()))
    }

    /// Is there a `key` line declaring `id`?
    pub fn has_id(&self, key: &str, id: &str) -> bool {
        self.lines_of(key).any(|l| l.id() == id)
    }

    pub fn info(&self, id: &str) -> Option<&HeaderLine> {
        self.infos().find(|l| l.id() == id)
    }

    /// Field names of the pipe-delimited `CSQ` annotation, taken from the
    /// `Format: A|B|...` suffix of its INFO description.
    pub fn csq_keys(&self) -> Option<Vec<String>> {
        let description = self.info("CSQ")?.tag("Description")?;
        let (_, layout) = description.split_once("Format:")?;
        Some(layout.trim().split('|').map(|s| s.trim().to_string()).collect())
    }

    /// The header as written to a file: fileformat, FILTER, FORMAT, INFO,
    /// other lines, contigs and finally the column line.
    pub fn to_lines(&self) -> Vec<String> {
        let mut result = vec![format!("##fileformat=VCFv{:.1}", self.version)];
        result.extend(
            self.filters()
                .chain(self.formats())
                .chain(self.infos())
                .chain(self.others())
                .chain(self.contigs())
                .map(|l| l.to_string()),
        );

        let mut columns = FIXED_COLUMNS.join("\t");
        columns.insert(0, '#');
        if !self.samples.is_empty() {
            columns.push_str("\tFORMAT");
            for sample in &self.samples {
                columns.push('\t');
                columns.push_str(sample);
            }
        }
        result.push(columns);
        result
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), FmtError> {
        write!(f, "{}", self.to_lines().join("\n"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeaderLine {
    /// Example:
    /// ##fileDate=20100501
    Simple { key: String, value: String },

    /// Example:
    /// ##FORMAT=<ID=GT,Number=1,Type=String,Description="Genotype">
    Structured { key: String, tags: Tags },
}

impl HeaderLine {
    pub fn simple(key: impl Into<String>, value: impl Into<String>) -> Self {
        HeaderLine::Simple {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a structured line, checking the tags its kind requires.
    pub fn structured(key: impl Into<String>, tags: Tags) -> Result<Self> {
        let header_line = HeaderLine::Structured {
            key: key.into(),
            tags,
        };
        header_line.check_required_tags()?;
        Ok(header_line)
    }

    pub fn key(&self) -> &str {
        match self {
            HeaderLine::Simple { key, .. } | HeaderLine::Structured { key, .. } => key,
        }
    }

    /// The `ID` tag, or an empty string if there is none.
    pub fn id(&self) -> &str {
        self.tag("ID").unwrap_or("")
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            HeaderLine::Simple { value, .. } => Some(value),
            HeaderLine::Structured { .. } => None,
        }
    }

    pub fn tags(&self) -> Option<&Tags> {
        match self {
            HeaderLine::Simple { .. } => None,
            HeaderLine::Structured { tags, .. } => Some(tags),
        }
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags()?.get(name).map(|s| s.as_str())
    }

    fn check_required_tags(&self) -> Result<()> {
        if let HeaderLine::Structured { key, tags } = self {
            if let Some(missing) = required_tags(key).iter().find(|t| !tags.contains_key(**t)) {
                return Err(Error::RequiredTagMissing {
                    key: key.clone(),
                    tag: missing.to_string(),
                    line: self.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn required_tags(key: &str) -> &'static [&'static str] {
    match key {
        FILTER | ALT => &["ID", "Description"],
        FORMAT | INFO => &["ID", "Number", "Type", "Description"],
        CONTIG => &["ID"],
        _ => &[],
    }
}

impl FromStr for HeaderLine {
    type Err = Error;

    fn from_str(header_line_str: &str) -> Result<Self> {
        let rest = header_line_str.strip_prefix("##").ok_or_else(|| {
            Error::grammar(header_line_str, "header lines must start with `##`")
        })?;

        // example:
        // ##FORMAT=<ID=GT,Number=1,Type=String,Description="Genotype">
        //   ^^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^
        //   ^key   ^payload
        let (key, payload) = rest.split_once('=').ok_or_else(|| {
            Error::grammar(header_line_str, "header lines must contain an `=` sign")
        })?;
        if key.is_empty() {
            return Err(Error::grammar(header_line_str, "empty key"));
        }

        // only a leading `<` makes a tag list; a `<` inside a simple value,
        // as in `##bcftools_viewCommand=view -i 'QUAL<20'`, stays plain text
        if payload.starts_with('<') {
            return HeaderLine::structured(key, parse_tag_list(payload)?);
        }

        if key == "fileformat" {
            parse_version(payload)?;
        }
        Ok(HeaderLine::simple(key, payload))
    }
}

impl Display for HeaderLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), FmtError> {
        match self {
            HeaderLine::Simple { key, value } => write!(f, "##{}={}", key, value),
            HeaderLine::Structured { key, tags } => {
                write!(f, "##{}=<", key)?;
                let leading = CANONICAL_ORDER
                    .iter()
                    .filter_map(|name| tags.get(*name).map(|v| (*name, v.as_str())));
                let remaining = tags
                    .iter()
                    .filter(|(name, _)| !CANONICAL_ORDER.contains(&name.as_str()))
                    .map(|(name, v)| (name.as_str(), v.as_str()));
                for (i, (name, value)) in leading.chain(remaining).enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    let quoted = match name {
                        "ID" | "Number" | "Type" => false,
                        "Description" => true,
                        // contig attributes such as `length` stay bare
                        _ => key != CONTIG || needs_quotes(value),
                    };
                    if quoted {
                        write!(f, "{}=\"{}\"", name, escape(value))?;
                    } else {
                        write!(f, "{}={}", name, value)?;
                    }
                }
                write!(f, ">")
            }
        }
    }
}

fn needs_quotes(value: &str) -> bool {
    value.contains(|c: char| matches!(c, ',' | '"' | '<' | '>'))
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Parses the `<...>` payload of a structured header line.
/// Example payloads:
///     <ID=GT,Number=1,Type=String,Description="Genotype">
///     <ID=DEL,Description="Deletion, \"large\">">
///     <ID=20,length=62435964,assembly=B36>
///
/// Quoted values may contain `,`, `=`, `<` and `>`. Inside quotes `\"` and
/// `\\` are unescaped; any other backslash is kept as is.
pub fn parse_tag_list(payload: &str) -> Result<Tags> {
    if !payload.starts_with('<') {
        return Err(Error::grammar(payload, "missing opening `<`"));
    }
    if payload.len() < 2 || !payload.ends_with('>') {
        return Err(Error::grammar(payload, "missing closing `>`"));
    }
    let last = payload.len() - 1;

    let mut tags = Tags::new();
    let mut key: Option<String> = None;
    let mut token = String::new();
    let mut in_quote = false;
    let mut escape = false;

    for (idx, ch) in payload.char_indices() {
        if in_quote {
            if escape {
                if ch != '"' && ch != '\\' {
                    token.push('\\');
                }
                token.push(ch);
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_quote = false;
            } else {
                token.push(ch);
            }
            continue;
        }

        match ch {
            '"' => in_quote = true,
            '<' if idx == 0 => {}
            '>' if idx == last => close_tag(payload, &mut tags, key.take(), &mut token)?,
            '=' if key.is_none() => key = Some(std::mem::take(&mut token)),
            ',' => close_tag(payload, &mut tags, key.take(), &mut token)?,
            _ => token.push(ch),
        }
    }

    if in_quote {
        return Err(Error::grammar(payload, "unterminated quote"));
    }
    Ok(tags)
}

fn close_tag(
    payload: &str,
    tags: &mut Tags,
    key: Option<String>,
    token: &mut String,
) -> Result<()> {
    let value = std::mem::take(token);
    match key {
        Some(key) if key.is_empty() => Err(Error::grammar(payload, "empty key")),
        Some(key) => {
            if let Some(existing) = tags.get_mut(&key) {
                *existing = value;
            } else {
                tags.insert(key, value);
            }
            Ok(())
        }
        // trailing comma, or `<>`
        None if value.is_empty() => Ok(()),
        None => Err(Error::grammar(
            payload,
            format!("`{}` is not a key=value pair", value),
        )),
    }
}

/// Parses the value of the `fileformat` line.
/// Example:
///     VCFv4.3 --> 4.3
pub fn parse_version(value: &str) -> Result<f64> {
    let number = value.strip_prefix("VCFv").unwrap_or(value);
    match number.parse::<f64>() {
        Ok(v) if v > 0.0 => Ok(v),
        _ => Err(Error::schema("unable to parse version", value)),
    }
}

fn declared(key: &str, pairs: &[(&str, &str)]) -> HeaderLine {
    HeaderLine::Structured {
        key: key.to_string(),
        tags: pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// The PASS filter, the GT format and the AC/AF/AN info declarations.
pub fn standard_header_lines() -> Vec<HeaderLine> {
    vec![
        declared(FILTER, &[("ID", "PASS"), ("Description", "All filters passed")]),
        declared(
            FORMAT,
            &[("ID", "GT"), ("Number", "1"), ("Type", "String"), ("Description", "Genotype")],
        ),
        declared(
            INFO,
            &[
                ("ID", "AC"),
                ("Number", "A"),
                ("Type", "Integer"),
                (
                    "Description",
                    "Allele count in genotypes, for each ALT allele, in the same order as listed",
                ),
            ],
        ),
        declared(
            INFO,
            &[
                ("ID", "AF"),
                ("Number", "A"),
                ("Type", "Float"),
                (
                    "Description",
                    "Allele Frequency, for each ALT allele, in the same order as listed",
                ),
            ],
        ),
        declared(
            INFO,
            &[
                ("ID", "AN"),
                ("Number", "1"),
                ("Type", "Integer"),
                ("Description", "Total number of alleles in called genotypes"),
            ],
        ),
    ]
}

#[cfg(test)]
mod test {
    use crate::{error::Error, header::*};
    use std::collections::HashMap;

    macro_rules! linked_map (
    ( $( $key:expr => $value:expr ),* $(,)?) => {
        {
            let mut m = linked_hash_map::LinkedHashMap::new();
            $(
                m.insert($key.to_string(), $value.to_string());
            )*
            m
        }
     };);

    #[test]
    fn test_payload_valid() {
        let payload = "<ID=TumourSample,Original=GermlineID>";
        let expected = linked_map!(
            "ID" => "TumourSample",
            "Original" => "GermlineID",
        );
        assert_eq!(parse_tag_list(payload).unwrap(), expected);

        let payload = "<ID=SVTYPE,Description=\"Type of structural variant\">";
        let expected = linked_map!(
            "ID" => "SVTYPE",
            "Description" => "Type of structural variant",
        );
        assert_eq!(parse_tag_list(payload).unwrap(), expected);

        // quoted values may hold the delimiters
        let payload = "<ID=X,Description=\"a, b=c <d> e\">";
        let expected = linked_map!(
            "ID" => "X",
            "Description" => "a, b=c <d> e",
        );
        assert_eq!(parse_tag_list(payload).unwrap(), expected);

        // escapes are removed
        let payload = "<ID=SVTYPE,Description=\"Type of \\\"structural\\\" variant \\\\ \\d\">";
        let expected = linked_map!(
            "ID" => "SVTYPE",
            "Description" => "Type of \"structural\" variant \\ \\d",
        );
        assert_eq!(parse_tag_list(payload).unwrap(), expected);

        // trailing comma
        let payload = "<ID=GT,Number=1,>";
        let expected = linked_map!("ID" => "GT", "Number" => "1");
        assert_eq!(parse_tag_list(payload).unwrap(), expected);

        // unquoted `=` inside a value
        let payload = "<ID=1,URL=ftp://host/x?a=b>";
        let expected = linked_map!("ID" => "1", "URL" => "ftp://host/x?a=b");
        assert_eq!(parse_tag_list(payload).unwrap(), expected);
    }

    #[test]
    fn test_payload_invalid() {
        let payload = "<ID=SVTYPE,Description=\"Type of structural variant>";
        let actual = parse_tag_list(payload).err().unwrap().to_string();
        assert_eq!(
            actual,
            "invalid tag list `<ID=SVTYPE,Description=\"Type of structural variant>`, (unterminated quote)"
        );

        let payload = "<ID=SVTYPE";
        let actual = parse_tag_list(payload).err().unwrap().to_string();
        assert_eq!(actual, "invalid tag list `<ID=SVTYPE`, (missing closing `>`)");

        let payload = "<=TumourSample>";
        let actual = parse_tag_list(payload).err().unwrap().to_string();
        assert_eq!(actual, "invalid tag list `<=TumourSample>`, (empty key)");

        assert!(parse_tag_list("<DEL>").is_err());
    }

    #[test]
    fn test_version() {
        assert_eq!(parse_version("VCFv4.3").unwrap(), 4.3);
        assert_eq!(parse_version("VCFv4.2").unwrap(), 4.2);
        assert!(parse_version("VCFvfour").is_err());
        assert!("##fileformat=VCFvX".parse::<HeaderLine>().is_err());
    }

    #[test]
    fn test_header_line_simple() {
        let cases = vec![
            ("##bcftools_annotateVersion=1.9+htslib-1.9", "bcftools_annotateVersion", "1.9+htslib-1.9"),
            ("##filedate=20151210", "filedate", "20151210"),
            ("##source=\"simplfy-vcf (r1211)\"", "source", "\"simplfy-vcf (r1211)\""),
            (
                "##bcftools_viewCommand=view -i 'QUAL<20' in.vcf",
                "bcftools_viewCommand",
                "view -i 'QUAL<20' in.vcf",
            ),
        ];
        for (line, key, value) in cases {
            let actual = line.parse::<HeaderLine>().unwrap();
            assert_eq!(actual, HeaderLine::simple(key, value));
            assert_eq!(actual.to_string(), line);
        }

        assert!("##foobar".parse::<HeaderLine>().is_err());
        assert!("#foo=bar".parse::<HeaderLine>().is_err());
    }

    #[test]
    fn test_header_line_structured() {
        let line = "##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">";
        let actual = line.parse::<HeaderLine>().unwrap();
        let expected = HeaderLine::Structured {
            key: "FORMAT".to_string(),
            tags: linked_map!(
                "ID" => "GT",
                "Number" => "1",
                "Type" => "String",
                "Description" => "Genotype",
            ),
        };
        assert_eq!(actual, expected);
        assert_eq!(actual.id(), "GT");

        let line = "##contig=<ID=GL000207.1,length=4262,assembly=b37>";
        let actual = line.parse::<HeaderLine>().unwrap();
        assert_eq!(actual.key(), "contig");
        assert_eq!(actual.tag("length"), Some("4262"));

        let line = "##SAMPLE=<ID=TissueSample,Genomes=Germline;Tumor,Mixture=.3;.7,Description=\"Patient germline genome;Patient tumor genome\">";
        let actual = line.parse::<HeaderLine>().unwrap();
        assert_eq!(
            actual.tags().unwrap(),
            &linked_map!(
                "ID" => "TissueSample",
                "Genomes" => "Germline;Tumor",
                "Mixture" => ".3;.7",
                "Description" => "Patient germline genome;Patient tumor genome",
            )
        );
    }

    #[test]
    fn test_header_line_required_tags() {
        let cases = vec![
            ("##contig=<length=249250621>", "ID"),
            ("##FORMAT=<Number=1,Type=String,Description=\"Genotype\">", "ID"),
            ("##FORMAT=<ID=GT,Type=String,Description=\"Genotype\">", "Number"),
            ("##FORMAT=<ID=GT,Number=1,Description=\"Genotype\">", "Type"),
            ("##FORMAT=<ID=GT,Number=1,Type=String,>", "Description"),
            ("##INFO=<ID=AC,Number=A,Type=Integer>", "Description"),
            ("##FILTER=<Description=\"Low quality\">", "ID"),
            ("##FILTER=<ID=LowQual>", "Description"),
            ("##ALT=<ID=DEL>", "Description"),
        ];
        for (line, tag) in cases {
            match line.parse::<HeaderLine>() {
                Err(Error::RequiredTagMissing { tag: missing, .. }) => {
                    assert_eq!(missing, tag, "{}", line)
                }
                other => panic!("expected missing `{}` for {}, got {:?}", tag, line, other),
            }
        }

        assert!("##contig=<ID=1>".parse::<HeaderLine>().is_ok());
        assert!("##ALT=<ID=DEL,Description=\"d\",Source=\"s\",Version=\"128\">"
            .parse::<HeaderLine>()
            .is_ok());
    }

    #[test]
    fn test_header_line_display() {
        let cases = vec![
            "##contig=<ID=1,length=249250621,assembly=b37>",
            "##contig=<ID=1>",
            "##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">",
            "##INFO=<ID=AC,Number=A,Type=Integer,Description=\"Allele count in genotypes\",Source=\"description\",Version=\"128\">",
            "##FILTER=<ID=LowQual,Description=\"Low quality\">",
            "##ALT=<ID=DEL,Description=\"description\">",
        ];
        for line in cases {
            assert_eq!(line.parse::<HeaderLine>().unwrap().to_string(), line);
        }

        // canonical tags move to the front
        let line = "##INFO=<Description=\"d\",Source=\"s\",Type=Flag,ID=DB,Number=0>";
        assert_eq!(
            line.parse::<HeaderLine>().unwrap().to_string(),
            "##INFO=<ID=DB,Number=0,Type=Flag,Description=\"d\",Source=\"s\">"
        );

        let line = "##contig=<ID=1,species=\"Homo sapiens\",note=\"a,b\">";
        assert_eq!(
            line.parse::<HeaderLine>().unwrap().to_string(),
            "##contig=<ID=1,species=Homo sapiens,note=\"a,b\">"
        );
    }

    #[test]
    fn test_tag_round_trip() {
        let cases = vec![
            "##INFO=<ID=X,Number=.,Type=String,Description=\"with \\\"quotes\\\", commas > and \\\\ slashes\">",
            "##contig=<ID=20,length=62435964,assembly=B36,md5=f126cdf8a6e0c7f379d618ff66beb2da,species=\"Homo sapiens\",taxonomy=x>",
            "##SAMPLE=<ID=Blood,Genomes=Germline,Mixture=1.,Description=\"Patient germline genome\">",
            "##PEDIGREE=<ID=ChildID,Father=FatherID,Mother=MotherID>",
        ];
        for line in cases {
            let parsed = line.parse::<HeaderLine>().unwrap();
            let reparsed = parsed.to_string().parse::<HeaderLine>().unwrap();
            // values must survive; Display reorders the keys
            let unordered = |l: &HeaderLine| -> HashMap<String, String> {
                l.tags()
                    .unwrap()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            };
            assert_eq!(unordered(&parsed), unordered(&reparsed), "{}", line);
        }
    }

    fn lines() -> Vec<&'static str> {
        vec![
            "##fileformat=VCFv4.2",
            "##source=test",
            "##contig=<ID=1,length=249250621>",
            "##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Total Depth\">",
            "##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">",
            "##FILTER=<ID=LowQual,Description=\"Low quality\">",
            "##INFO=<ID=CSQ,Number=.,Type=String,Description=\"Consequence annotations from Ensembl VEP. Format: Allele|Consequence|SYMBOL\">",
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA00001\tNA00002",
        ]
    }

    #[test]
    fn test_header_parse() {
        let header = Header::parse(lines()).unwrap();
        assert_eq!(header.version(), 4.2);
        assert_eq!(header.samples(), &["NA00001".to_string(), "NA00002".to_string()]);
        assert_eq!(header.lines().len(), 6);

        let infos: Vec<&str> = header.infos().map(|l| l.id()).collect();
        assert_eq!(infos, vec!["DP", "CSQ"]);
        assert_eq!(header.filters().count(), 1);
        assert_eq!(header.formats().count(), 1);
        assert_eq!(header.contigs().count(), 1);
        let others: Vec<&str> = header.others().map(|l| l.key()).collect();
        assert_eq!(others, vec!["source"]);

        assert!(header.has_id(CONTIG, "1"));
        assert!(!header.has_id(CONTIG, "2"));
        assert_eq!(
            header.csq_keys().unwrap(),
            vec!["Allele".to_string(), "Consequence".to_string(), "SYMBOL".to_string()]
        );
    }

    #[test]
    fn test_header_parse_invalid() {
        // no fileformat line
        assert!(Header::parse(lines().into_iter().skip(1)).is_err());

        // repeated sample name
        let mut raw = lines();
        raw.pop();
        raw.push("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA00001\tNA00001");
        assert!(Header::parse(raw).is_err());

        let mut raw = lines();
        raw.push("1\t100\t.\tA\tC\t.\t.\t.");
        assert!(Header::parse(raw).is_err());
    }

    #[test]
    fn test_header_to_lines() {
        let header = Header::parse(lines()).unwrap();
        let expected = vec![
            "##fileformat=VCFv4.2",
            "##FILTER=<ID=LowQual,Description=\"Low quality\">",
            "##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">",
            "##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Total Depth\">",
            "##INFO=<ID=CSQ,Number=.,Type=String,Description=\"Consequence annotations from Ensembl VEP. Format: Allele|Consequence|SYMBOL\">",
            "##source=test",
            "##contig=<ID=1,length=249250621>",
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA00001\tNA00002",
        ];
        assert_eq!(header.to_lines(), expected);

        let mut header = Header::new();
        header.add_header_lines(standard_header_lines());
        let written = header.to_lines();
        assert_eq!(written[0], "##fileformat=VCFv4.2");
        assert_eq!(written[1], "##FILTER=<ID=PASS,Description=\"All filters passed\">");
        assert_eq!(written.last().unwrap(), "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO");
        assert_eq!(Header::parse(written).unwrap(), header);
    }

    #[test]
    fn test_set_samples() {
        let mut header = Header::new();
        assert!(header.set_samples(vec!["a".to_string(), "b".to_string()]).is_ok());
        assert!(header.set_samples(vec!["a".to_string(), "a".to_string()]).is_err());
        assert_eq!(header.samples().len(), 2);
        assert!(header.set_version(0.0).is_err());
    }
}
