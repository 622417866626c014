use crate::{
    error::{Error, Result},
    genotype::{Genotype, SampleValues},
    header::Header,
};
use linked_hash_map::LinkedHashMap;
use std::fmt::{Display, Error as FmtError, Formatter};

pub const FIXED_COLUMNS: &[&str] = &["CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO"];

const MISSING: &str = ".";
const PASS: &str = "PASS";

/// Value stored for INFO flags, which have no value of their own.
pub const FLAG_VALUE: &str = "1";

/// Classification of a variant by its REF/ALT alleles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantType {
    NoVariation,
    Snp,
    Mnp,
    Indel,
    Symbolic,
    /// The ALT alleles do not all classify the same way.
    Mixed,
}

/// A data line of the VCF file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variant {
    /// An identifier from the reference genome or an angle-bracketed ID String (“<ID>”)
    /// pointing to a contig in the assembly file (cf. the ##assembly line in the header).
    pub chromosome: String,

    /// The reference position.
    pub position: u64,

    /// Semi-colon separated list of unique identifiers where available, as written.
    pub id: String,

    /// Each base must be one of A,C,G,T,N (case insensitive). Multiple bases are permitted.
    pub reference: String,

    /// Alternate non-reference alleles. Empty when the column is `.`.
    pub alternative: Vec<String>,

    /// Phred-scaled quality, as written.
    pub quality: String,

    /// Failed filters. `PASS` and `.` are not stored, so empty means unfiltered.
    pub filter: Vec<String>,

    /// INFO entries in file order; flags map to `FLAG_VALUE`.
    pub info: LinkedHashMap<String, String>,

    /// FORMAT tags; gives the positional meaning of every sample column.
    pub format: Vec<String>,

    genotypes: Vec<Genotype>,
}

impl Variant {
    pub fn new(
        chromosome: impl Into<String>,
        position: u64,
        reference: impl Into<String>,
        alternative: Vec<String>,
    ) -> Self {
        Variant {
            chromosome: chromosome.into(),
            position,
            id: MISSING.to_string(),
            reference: reference.into(),
            alternative,
            quality: MISSING.to_string(),
            ..Variant::default()
        }
    }

    /// Decodes one data line. `samples` names the sample columns in order.
    pub fn parse(line_str: &str, samples: &[String]) -> Result<Variant> {
        let parts: Vec<&str> = line_str.split('\t').collect();
        if parts.len() < FIXED_COLUMNS.len() {
            return Err(Error::schema(
                format!(
                    "invalid number of columns found, expected at least {}, found {}",
                    FIXED_COLUMNS.len(),
                    parts.len()
                ),
                line_str,
            ));
        }

        let position = parts[1]
            .parse::<u64>()
            .map_err(|_| Error::schema("unable to parse position", parts[1]))?;
        let quality = parts[5];
        if quality != MISSING && quality.parse::<f64>().is_err() {
            return Err(Error::schema("unable to parse quality", quality));
        }

        let mut variant = Variant {
            chromosome: parts[0].to_string(),
            position,
            id: parts[2].to_string(),
            reference: parts[3].to_string(),
            alternative: parse_alternative(parts[4]),
            quality: quality.to_string(),
            filter: parse_filter(parts[6]),
            info: parse_info(parts[7]),
            format: parts
                .get(8)
                .map(|f| f.split(':').map(|s| s.to_string()).collect())
                .unwrap_or_default(),
            genotypes: vec![],
        };

        let sample_columns = parts.get(9..).unwrap_or(&[]);
        if sample_columns.len() > samples.len() {
            return Err(Error::schema(
                format!(
                    "found {} sample columns, but the header names {} samples",
                    sample_columns.len(),
                    samples.len()
                ),
                line_str,
            ));
        }
        for (name, column) in samples.iter().zip(sample_columns) {
            let values = variant.sample_values(column)?;
            variant.add_genotype(Genotype::new(name.as_str(), values)?)?;
        }

        Ok(variant)
    }

    // Trailing sub-fields may be dropped in a sample column; they read as `.`.
    fn sample_values(&self, column: &str) -> Result<SampleValues> {
        let fields: Vec<&str> = column.split(':').collect();
        if fields.len() > self.format.len() {
            return Err(Error::schema(
                format!(
                    "sample has {} fields, but FORMAT lists {}",
                    fields.len(),
                    self.format.len()
                ),
                column,
            ));
        }
        Ok(self
            .format
            .iter()
            .enumerate()
            .map(|(i, tag)| (tag.clone(), fields.get(i).unwrap_or(&MISSING).to_string()))
            .collect())
    }

    /// Adds a genotype whose values cover exactly the FORMAT tags.
    pub fn add_genotype(&mut self, genotype: Genotype) -> Result<()> {
        if genotype.values().len() > self.format.len() {
            return Err(Error::schema(
                "genotype contains tags not listed in the FORMAT field",
                genotype.name.as_str(),
            ));
        }
        if let Some(missing) = self
            .format
            .iter()
            .find(|tag| !genotype.values().contains_key(tag.as_str()))
        {
            return Err(Error::schema(
                format!("genotype is missing FORMAT tag `{}`", missing),
                genotype.name.as_str(),
            ));
        }
        self.genotypes.push(genotype);
        Ok(())
    }

    pub fn genotypes(&self) -> &[Genotype] {
        &self.genotypes
    }

    pub fn sample(&self, name: &str) -> Option<&Genotype> {
        self.genotypes.iter().find(|g| g.name == name)
    }

    /// `[REF] ++ ALT`; a GT index points into this list.
    pub fn alleles(&self) -> Vec<&str> {
        std::iter::once(self.reference.as_str())
            .chain(self.alternative.iter().map(|s| s.as_str()))
            .collect()
    }

    pub fn is_filtered(&self) -> bool {
        self.filter.iter().any(|f| f != PASS && f != MISSING)
    }

    pub fn variant_type(&self) -> VariantType {
        let mut types = self
            .alternative
            .iter()
            .map(|alt| biallelic_type(&self.reference, alt));
        let first = match types.next() {
            Some(t) => t,
            None => return VariantType::NoVariation,
        };
        if types.all(|t| t == first) {
            first
        } else {
            VariantType::Mixed
        }
    }

    pub fn is_snp(&self) -> bool {
        self.variant_type() == VariantType::Snp
    }

    pub fn is_indel(&self) -> bool {
        self.variant_type() == VariantType::Indel
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.info.contains_key(key)
    }

    /// Returns an INFO value as a string; flags read as `FLAG_VALUE`.
    pub fn attribute(&self, key: &str) -> Result<&str> {
        self.info
            .get(key)
            .map(|s| s.as_str())
            .ok_or_else(|| Error::reference(format!("no such info: {}", key)))
    }

    pub fn attribute_as_int(&self, key: &str) -> Result<i64> {
        let value = self.attribute(key)?;
        value
            .parse()
            .map_err(|_| Error::schema(format!("unable to convert {} to int", key), value))
    }

    pub fn attribute_as_f64(&self, key: &str) -> Result<f64> {
        let value = self.attribute(key)?;
        value
            .parse()
            .map_err(|_| Error::schema(format!("unable to convert {} to float", key), value))
    }

    /// Splits the `CSQ` annotation into one map per transcript entry, keyed by
    /// the field layout the header declares.
    pub fn csq(&self, header: &Header) -> Result<Vec<LinkedHashMap<String, String>>> {
        let raw = match self.info.get("CSQ") {
            Some(raw) => raw,
            None => return Ok(vec![]),
        };
        let keys = header
            .csq_keys()
            .ok_or_else(|| Error::consistency("header does not declare the CSQ field layout"))?;

        raw.split(',')
            .map(|entry| {
                let values: Vec<&str> = entry.split('|').collect();
                if values.len() != keys.len() {
                    return Err(Error::schema(
                        format!("expected {} CSQ fields, found {}", keys.len(), values.len()),
                        entry,
                    ));
                }
                Ok(keys
                    .iter()
                    .cloned()
                    .zip(values.into_iter().map(|s| s.to_string()))
                    .collect())
            })
            .collect()
    }

    /// Encodes the line against `header`: INFO flags it declares with
    /// `Type=Flag` are written without a value.
    pub fn display_with<'a>(&'a self, header: &'a Header) -> impl Display + 'a {
        WithHeader {
            variant: self,
            header: Some(header),
        }
    }

    fn fmt_columns(
        &self,
        f: &mut Formatter<'_>,
        header: Option<&Header>,
    ) -> std::result::Result<(), FmtError> {
        write!(f, "{}", self.chromosome)?;
        write!(f, "\t{}", self.position)?;
        write!(f, "\t{}", or_missing(&self.id))?;
        write!(f, "\t{}", self.reference)?;
        write!(f, "\t{}", joined_or_missing(&self.alternative, ","))?;
        write!(f, "\t{}", or_missing(&self.quality))?;
        write!(f, "\t{}", joined_or_missing(&self.filter, ";"))?;

        if self.info.is_empty() {
            write!(f, "\t{}", MISSING)?;
        } else {
            for (i, (key, value)) in self.info.iter().enumerate() {
                write!(f, "{}", if i == 0 { "\t" } else { ";" })?;
                let is_flag = value == FLAG_VALUE
                    && header
                        .and_then(|h| h.info(key))
                        .and_then(|l| l.tag("Type"))
                        == Some("Flag");
                if is_flag {
                    write!(f, "{}", key)?;
                } else {
                    write!(f, "{}={}", key, value)?;
                }
            }
        }

        if !self.genotypes.is_empty() {
            write!(f, "\t{}", self.format.join(":"))?;
            for genotype in &self.genotypes {
                write!(f, "\t{}", genotype.to_vcf_string(&self.format))?;
            }
        }
        Ok(())
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), FmtError> {
        self.fmt_columns(f, None)
    }
}

struct WithHeader<'a> {
    variant: &'a Variant,
    header: Option<&'a Header>,
}

impl Display for WithHeader<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), FmtError> {
        self.variant.fmt_columns(f, self.header)
    }
}

fn biallelic_type(reference: &str, alt: &str) -> VariantType {
    if alt.contains(|c: char| matches!(c, '*' | '<' | '[' | ']' | '.')) {
        VariantType::Symbolic
    } else if reference.len() == alt.len() {
        if alt.len() == 1 {
            VariantType::Snp
        } else {
            VariantType::Mnp
        }
    } else {
        VariantType::Indel
    }
}

fn parse_alternative(alt_str: &str) -> Vec<String> {
    if alt_str == MISSING {
        vec![]
    } else {
        alt_str.split(',').map(|s| s.to_string()).collect()
    }
}

// `.`, `PASS` and an empty column all mean "not filtered".
fn parse_filter(filter_str: &str) -> Vec<String> {
    filter_str
        .split(';')
        .filter(|f| !f.is_empty() && *f != PASS && *f != MISSING)
        .map(|f| f.to_string())
        .collect()
}

fn parse_info(info_str: &str) -> LinkedHashMap<String, String> {
    let mut info = LinkedHashMap::new();
    if info_str == MISSING {
        return info;
    }
    for entry in info_str.split(';').filter(|e| !e.is_empty()) {
        let (key, value) = entry.split_once('=').unwrap_or((entry, FLAG_VALUE));
        info.insert(key.to_string(), value.to_string());
    }
    info
}

fn or_missing(s: &str) -> &str {
    if s.is_empty() {
        MISSING
    } else {
        s
    }
}

fn joined_or_missing(entries: &[String], separator: &str) -> String {
    if entries.is_empty() {
        MISSING.to_string()
    } else {
        entries.join(separator)
    }
}
