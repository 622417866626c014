use anyhow::{bail, Context};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vcftext::{
    bcftools::{create_index, create_writer, Vcf},
    header::{Tags, FILTER},
    HeaderLine,
};

const TAG: &str = "DEMO_FILTER";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (input, output) = match (args.next(), args.next()) {
        (Some(input), Some(output)) => (PathBuf::from(input), PathBuf::from(output)),
        _ => bail!("usage: filter <input.vcf|.vcf.gz|.bcf> <output.vcf.gz|.bcf>"),
    };

    let vcf = Vcf::open(&input)?;

    let mut tags = Tags::new();
    tags.insert("ID".to_string(), TAG.to_string());
    tags.insert("Description".to_string(), "Tagged by the filter demo".to_string());
    let mut header = vcf.header().clone();
    header.add_header_lines(vec![HeaderLine::structured(FILTER, tags)?]);

    let mut writer = create_writer(vcf.bcftools(), &output, &header)?;
    let mut scanner = vcf.scanner()?;
    let mut count = 0;
    while scanner.scan() {
        if let Some(mut variant) = scanner.take_variant() {
            variant.filter.push(TAG.to_string());
            writer.write_variant(&variant)?;
            count += 1;
        }
    }
    if let Some(e) = scanner.err() {
        bail!("unable to read {}: {}", input.display(), e);
    }
    writer
        .finish()
        .with_context(|| format!("unable to finish {}", output.display()))?;
    create_index(vcf.bcftools(), &output)?;

    info!(count, output = %output.display(), "tagged variants");
    Ok(())
}
