use crate::{
    body::Variant,
    error::{Error, Result},
};
use linked_hash_map::LinkedHashMap;

/// The genotype FORMAT tag.
pub const GT: &str = "GT";

/// Raw values of one sample, keyed by FORMAT tag in FORMAT order.
pub type SampleValues = LinkedHashMap<String, String>;

/// One sample's call at a variant.
///
/// A genotype does not point back at its variant. Queries that need the
/// variant's alleles or FORMAT order take them as arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Genotype {
    /// The sample name, as listed on the `#CHROM` line.
    pub name: String,

    values: SampleValues,

    /// Parsed GT allele indexes; empty for a no-call.
    allele_indexes: Vec<usize>,

    phased: bool,
}

impl Genotype {
    pub fn new(name: impl Into<String>, values: SampleValues) -> Result<Self> {
        let mut allele_indexes = vec![];
        let mut phased = false;

        // GT is optional, but if present it must be parseable.
        if let Some(raw_gt) = values.get(GT) {
            // Some callers write `1/.` when every read supports the alternate
            // allele but the depth includes filtered reads.
            let gt = if raw_gt == "1/." { "1/1" } else { raw_gt.as_str() };
            // set for `.|.` too, so `is_called` splits it on the right separator
            phased = gt.contains('|');
            if !is_missing(gt) {
                let separator = if phased { '|' } else { '/' };
                for token in gt.split(separator) {
                    let index = token.parse::<usize>().map_err(|_| {
                        Error::schema(
                            format!("unable to convert `{}` to an allele index", token),
                            raw_gt.as_str(),
                        )
                    })?;
                    allele_indexes.push(index);
                }
            }
        }

        Ok(Genotype {
            name: name.into(),
            values,
            allele_indexes,
            phased,
        })
    }

    pub fn values(&self) -> &SampleValues {
        &self.values
    }

    pub fn allele_indexes(&self) -> &[usize] {
        &self.allele_indexes
    }

    /// Resolves the allele indexes against `[REF] ++ ALT` of `variant`.
    pub fn alleles<'v>(&self, variant: &'v Variant) -> Result<Vec<&'v str>> {
        if self.allele_indexes.is_empty() {
            return Err(Error::reference(format!(
                "genotype of `{}` has no alleles",
                self.name
            )));
        }
        let alleles = variant.alleles();
        self.allele_indexes
            .iter()
            .map(|&i| {
                alleles.get(i).copied().ok_or_else(|| {
                    Error::reference(format!(
                        "GT of `{}` has index {}, but the variant only has {} alleles",
                        self.name,
                        i,
                        alleles.len()
                    ))
                })
            })
            .collect()
    }

    pub fn is_phased(&self) -> bool {
        self.phased
    }

    /// Number of called alleles; 0 for a no-call.
    pub fn ploidy(&self) -> usize {
        self.allele_indexes.len()
    }

    /// True if GT is present and none of its alleles is `.`.
    pub fn is_called(&self) -> bool {
        let gt = match self.values.get(GT) {
            Some(gt) => gt,
            None => return false,
        };
        let separator = if self.phased { '|' } else { '/' };
        gt.split(separator).all(|allele| allele != ".")
    }

    pub fn is_no_call(&self) -> bool {
        !self.is_called()
    }

    // Zygosity is only reported for fully called genotypes.
    fn called_indexes(&self) -> Option<&[usize]> {
        if self.allele_indexes.is_empty() || !self.is_called() {
            None
        } else {
            Some(&self.allele_indexes)
        }
    }

    pub fn is_hom(&self) -> bool {
        self.called_indexes().map_or(false, all_equal)
    }

    pub fn is_hom_ref(&self) -> bool {
        self.called_indexes()
            .map_or(false, |xs| all_equal(xs) && xs[0] == 0)
    }

    pub fn is_hom_var(&self) -> bool {
        self.called_indexes()
            .map_or(false, |xs| all_equal(xs) && xs[0] != 0)
    }

    pub fn is_het(&self) -> bool {
        self.called_indexes().map_or(false, |xs| !all_equal(xs))
    }

    pub fn is_het_non_ref(&self) -> bool {
        self.called_indexes()
            .map_or(false, |xs| !all_equal(xs) && !xs.contains(&0))
    }

    /// Returns any genotype attribute as a string.
    pub fn attribute(&self, key: &str) -> Result<&str> {
        self.values
            .get(key)
            .map(|s| s.as_str())
            .ok_or_else(|| Error::reference(format!("no such attribute: {}", key)))
    }

    pub fn attribute_as_int(&self, key: &str) -> Result<i64> {
        let value = self.attribute(key)?;
        value
            .parse()
            .map_err(|_| Error::schema(format!("unable to parse {} as int", key), value))
    }

    pub fn attribute_as_f64(&self, key: &str) -> Result<f64> {
        let value = self.attribute(key)?;
        value
            .parse()
            .map_err(|_| Error::schema(format!("unable to parse {} as float", key), value))
    }

    /// The sample column: values in `format` order, joined by `:`.
    pub fn to_vcf_string(&self, format: &[String]) -> String {
        format
            .iter()
            .map(|tag| self.values.get(tag).map(|s| s.as_str()).unwrap_or("."))
            .collect::<Vec<_>>()
            .join(":")
    }
}

fn is_missing(gt: &str) -> bool {
    matches!(gt, "." | "./." | ".|.")
}

fn all_equal(xs: &[usize]) -> bool {
    xs.windows(2).all(|w| w[0] == w[1])
}

#[cfg(test)]
mod test {
    use crate::{body::Variant, genotype::*};

    fn values(pairs: &[(&str, &str)]) -> SampleValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn gt(raw: &str) -> Genotype {
        Genotype::new("NA00001", values(&[("GT", raw)])).unwrap()
    }

    #[test]
    fn test_alleles() {
        let variant = Variant::new("1", 100, "A", vec!["C".to_string()]);
        let cases = vec![
            ("0/0", vec!["A", "A"], false),
            ("0/1", vec!["A", "C"], false),
            ("1/1", vec!["C", "C"], false),
            ("0|0", vec!["A", "A"], true),
            ("0|1", vec!["A", "C"], true),
            ("1|1", vec!["C", "C"], true),
        ];
        for (raw, expected, phased) in cases {
            let genotype = gt(raw);
            assert_eq!(genotype.alleles(&variant).unwrap(), expected, "{}", raw);
            assert_eq!(genotype.is_phased(), phased, "{}", raw);
        }

        // index beyond the allele list
        assert!(gt("0/2").alleles(&variant).is_err());

        // no GT at all
        let genotype = Genotype::new("NA00001", SampleValues::new()).unwrap();
        assert!(genotype.alleles(&variant).is_err());
        assert_eq!(genotype.ploidy(), 0);

        // no-call
        assert!(gt("./.").alleles(&variant).is_err());
    }

    #[test]
    fn test_parse_gt() {
        assert_eq!(gt("0/1").allele_indexes(), &[0, 1]);
        assert_eq!(gt("1").allele_indexes(), &[1]);
        assert_eq!(gt("0|1|2").ploidy(), 3);
        for missing in &[".", "./.", ".|."] {
            let genotype = gt(missing);
            assert_eq!(genotype.ploidy(), 0);
            assert!(genotype.is_no_call());
        }

        let genotype = gt(".|.");
        assert!(genotype.is_phased());
        assert!(!genotype.is_called());
        assert!(!gt("./.").is_phased());

        // normalized for parsing, stored as written
        let genotype = gt("1/.");
        assert_eq!(genotype.allele_indexes(), &[1, 1]);
        assert_eq!(genotype.attribute("GT").unwrap(), "1/.");

        assert!(Genotype::new("x", values(&[("GT", "0/a")])).is_err());
        assert!(Genotype::new("x", values(&[("GT", "./1")])).is_err());
        assert!(Genotype::new("x", values(&[("GT", "-1/0")])).is_err());
    }

    #[test]
    fn test_is_called() {
        assert!(gt("0/1").is_called());
        assert!(gt("1|1").is_called());
        assert!(!gt("./.").is_called());
        assert!(!gt(".").is_called());
        assert!(!gt("1/.").is_called());
        assert!(!Genotype::new("x", values(&[("DP", "3")])).unwrap().is_called());
    }

    #[test]
    fn test_zygosity() {
        // (gt, hom, hom_ref, hom_var, het, het_non_ref)
        let cases = vec![
            ("0/0", true, true, false, false, false),
            ("1/1", true, false, true, false, false),
            ("0|1", false, false, false, true, false),
            ("1/2", false, false, false, true, true),
            ("0", true, true, false, false, false),
            ("./.", false, false, false, false, false),
            ("1/.", false, false, false, false, false),
        ];
        for (raw, hom, hom_ref, hom_var, het, het_non_ref) in cases {
            let genotype = gt(raw);
            assert_eq!(genotype.is_hom(), hom, "is_hom {}", raw);
            assert_eq!(genotype.is_hom_ref(), hom_ref, "is_hom_ref {}", raw);
            assert_eq!(genotype.is_hom_var(), hom_var, "is_hom_var {}", raw);
            assert_eq!(genotype.is_het(), het, "is_het {}", raw);
            assert_eq!(genotype.is_het_non_ref(), het_non_ref, "is_het_non_ref {}", raw);
        }
    }

    #[test]
    fn test_attributes() {
        let genotype = Genotype::new(
            "NA00001",
            values(&[("GT", "0/1"), ("GQ", "48"), ("GP", "0.19"), ("HQ", "51,51")]),
        )
        .unwrap();
        assert_eq!(genotype.attribute_as_int("GQ").unwrap(), 48);
        assert_eq!(genotype.attribute_as_f64("GP").unwrap(), 0.19);
        assert!(genotype.attribute_as_int("HQ").is_err());
        assert!(genotype.attribute("DP").is_err());
    }

    #[test]
    fn test_to_vcf_string() {
        let genotype = Genotype::new(
            "NA00001",
            values(&[("GT", "0|0"), ("GQ", "48"), ("DP", "1")]),
        )
        .unwrap();
        let format: Vec<String> = vec!["GT".into(), "DP".into(), "GQ".into()];
        assert_eq!(genotype.to_vcf_string(&format), "0|0:1:48");
    }
}
