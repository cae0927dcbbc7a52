use bcbp::{decode, decode_at, BcbpDocument, FieldId};
use chrono::{DateTime, Utc};
use clap::Parser;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;

#[derive(Parser, Debug)]
#[command(about = "Decode Bar-Coded Boarding Pass strings, one per line of a file.")]
struct Cli {
    #[arg(help = "Path", required_unless_present = "text")]
    path: Option<String>,
    #[arg(long, help = "Decode a single BCBP string instead of a file")]
    text: Option<String>,
    #[arg(long, help = "Time the pass was scanned or issued (RFC 3339)")]
    reference: Option<String>,
    #[arg(long, help = "Current time to resolve flight dates against (RFC 3339)")]
    now: Option<String>,
    #[arg(long, help = "Only print this field of each block, e.g. seat_number")]
    field: Option<FieldId>,
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

fn print_field(document: &BcbpDocument, field: FieldId) {
    let blocks = document
        .mandatory_unique
        .iter()
        .chain(document.conditional_unique.iter())
        .chain(document.security.iter());
    for value in blocks.filter_map(|fields| fields.get(field)) {
        println!("  {}: {:?}", field, value);
    }
    for (index, leg) in document.legs.iter().enumerate() {
        if let Some(value) = leg.field(field) {
            println!("  leg {} {}: {:?}", index + 1, field, value);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    let reference = args.reference.as_deref().map(parse_time).transpose()?;
    let now = args.now.as_deref().map(parse_time).transpose()?;

    let lines: Vec<String> = match (&args.text, &args.path) {
        (Some(text), _) => vec![text.clone()],
        (None, Some(path)) => BufReader::new(File::open(path)?)
            .lines()
            .collect::<Result<_, _>>()?,
        (None, None) => Vec::new(),
    };

    for line in lines {
        let document = match now {
            Some(now) => decode_at(&line, reference, now),
            None => decode(&line, reference),
        };
        println!("{}", document);
        match (&document.invalid_reason, args.field) {
            (Some(reason), _) => println!("  invalid: {}", reason),
            (None, Some(field)) => print_field(&document, field),
            (None, None) => {
                for leg in &document.legs {
                    println!("  {}", leg);
                }
            }
        }
    }

    Ok(())
}
