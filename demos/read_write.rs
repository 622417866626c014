use anyhow::Context;
use std::fs::File;
use vcftext::{HeaderSource, Scanner, TextSink, TextSource, Writer};

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/small-4.2.vcf".to_string());
    let file = File::open(&path).with_context(|| format!("unable to open {}", path))?;

    // reader
    let mut source = TextSource::new(file);
    let header = source.read_header()?;
    let records = Scanner::new(&header, source).records();

    // writer
    let mut writer = Writer::new(TextSink::new(vec![]));
    writer.write_header(&header)?;
    for variant in records {
        writer.write_variant(&variant?)?;
    }
    let buf = writer.finish()?.into_inner();
    println!("{}", std::str::from_utf8(&buf)?);
    Ok(())
}
