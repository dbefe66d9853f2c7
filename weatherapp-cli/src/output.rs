use clap::ValueEnum;
use std::io::{self, Write};
use weatherapp_core::{Output, WeatherInfo, WeatherReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Title, location and one `key: value` row per known field.
    Plain,
    /// Header row plus one comma separated row per provider.
    Csv,
}

impl Format {
    pub fn output<W: Write + Send + 'static>(self, writer: W) -> Box<dyn Output> {
        match self {
            Format::Plain => Box::new(PlainOutput { writer }),
            Format::Csv => Box::new(CsvOutput { writer, header_written: false }),
        }
    }
}

pub struct PlainOutput<W> {
    writer: W,
}

impl<W: Write + Send> Output for PlainOutput<W> {
    fn weather(&mut self, report: &WeatherReport) -> io::Result<()> {
        let w = &mut self.writer;
        writeln!(w, "{}:", report.title)?;
        writeln!(w, "{}", "*".repeat(12))?;
        writeln!(w, "{}", report.location.name)?;
        writeln!(w, "{}", "_".repeat(20))?;

        if report.info.is_empty() {
            writeln!(w, "No weather data found on the page")?;
        }
        for (label, value) in report.info.fields() {
            if let Some(value) = value {
                writeln!(w, "{label}: {value}")?;
            }
        }

        writeln!(w, "{}\n", "=".repeat(40))?;
        w.flush()
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{text}")
    }
}

pub struct CsvOutput<W> {
    writer: W,
    header_written: bool,
}

impl<W: Write + Send> Output for CsvOutput<W> {
    fn weather(&mut self, report: &WeatherReport) -> io::Result<()> {
        if !self.header_written {
            let mut header = vec!["Provider", "Location"];
            header.extend(WeatherInfo::FIELDS);
            header.push("Fetched at");
            write_row(&mut self.writer, header)?;
            self.header_written = true;
        }

        let fetched_at = report.fetched_at.to_rfc3339();
        let mut row = vec![report.title.as_str(), report.location.name.as_str()];
        row.extend(report.info.fields().map(|(_, value)| value.unwrap_or("")));
        row.push(&fetched_at);
        write_row(&mut self.writer, row)?;
        self.writer.flush()
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{text}")
    }
}

fn write_row<'a>(w: &mut impl Write, fields: impl IntoIterator<Item = &'a str>) -> io::Result<()> {
    let line = fields.into_iter().map(escape).collect::<Vec<_>>().join(",");
    writeln!(w, "{line}")
}

/// RFC 4180 quoting: fields containing a comma, quote or line break are
/// wrapped in quotes with inner quotes doubled.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
