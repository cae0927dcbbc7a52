use super::date::resolve_flight_date;
use super::fields::*;
use super::types::*;
use chrono::{DateTime, Utc};
use log::{debug, trace};
use nom::bytes::complete::{take, take_while_m_n};
use nom::character::complete::satisfy;
use nom::combinator::{all_consuming, map_res};
use nom::IResult;

/// Shortest text that can hold the mandatory unique block and one leg.
pub const MIN_LENGTH: usize = MANDATORY_UNIQUE_LEN + MANDATORY_REPEATED_LEN;

pub const MAX_LEGS: u8 = 4;

// Version begin, version number and the following unique length.
const UNIQUE_HEADER_LEN: usize = 4;
const REPEATED_HEADER_LEN: usize = 2;

const SECURITY_MARKER: char = '^';

fn char_len(input: &str) -> usize {
    input.chars().count()
}

/// Splits after at most `count` characters.
fn split_chars(input: &str, count: usize) -> (&str, &str) {
    match input.char_indices().nth(count) {
        Some((index, _)) => input.split_at(index),
        None => (input, ""),
    }
}

fn hex_length(input: &str) -> IResult<&str, usize> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        |d| usize::from_str_radix(d, 16),
    )(input)
}

fn leg_count_digit(input: &str) -> IResult<&str, char> {
    satisfy(|c| c.is_ascii_digit())(input)
}

fn leg_data(input: &str, size: usize) -> IResult<&str, &str> {
    take(size)(input)
}

fn parse_hex(value: &str, field: FieldId) -> Result<usize, InvalidReason> {
    all_consuming(hex_length)(value)
        .map(|(_, size)| size)
        .map_err(|_| InvalidReason::BadHexLength { field })
}

fn parse_leg_count(value: &str) -> Result<u8, InvalidReason> {
    let (_, digit) =
        all_consuming(leg_count_digit)(value).map_err(|_| InvalidReason::BadLegCount)?;
    let count = digit as u8 - b'0';
    if count < 1 || count > MAX_LEGS {
        return Err(InvalidReason::LegCountOutOfRange(count));
    }
    Ok(count)
}

/// Reads a block whose fields all have a known width.
fn fixed_block<'a>(mut input: &'a str, fields: &[FieldSpec]) -> IResult<&'a str, Fields> {
    let mut block = Fields::default();
    for (id, width) in fields {
        let width = width.unwrap_or_else(|| char_len(input));
        let (rest, value) = take(width)(input)?;
        block.push(*id, value);
        input = rest;
    }
    Ok((input, block))
}

/// Fills fields left to right until `input` runs out. The last field read may
/// be truncated; fields after it are absent.
fn bounded_block(mut input: &str, fields: &[FieldSpec]) -> Fields {
    let mut block = Fields::default();
    for (id, width) in fields {
        if input.is_empty() {
            break;
        }
        let (value, rest) = split_chars(input, width.unwrap_or_else(|| char_len(input)));
        block.push(*id, value);
        input = rest;
    }
    block
}

#[derive(Debug)]
struct DescribedBlock {
    /// Characters the block declares for itself, from its first field to the
    /// end of the data counted by its length field.
    span: usize,
    fields: Fields,
}

/// Reads a block whose size is given by one of its own fields.
///
/// Fields after `length_field` are filled until the declared size is used
/// up. A field that does not fit is truncated and reading stops there.
/// Reads never go past the end of `input`, so the returned span may be larger
/// than what was actually available.
fn described_block(
    input: &str,
    fields: &[FieldSpec],
    length_field: FieldId,
) -> Result<DescribedBlock, InvalidReason> {
    let mut block = Fields::default();
    let mut rest = input;
    let mut offset = 0;
    let mut end = None;
    for (id, width) in fields {
        let remaining = match end {
            Some(end) if end <= offset => break,
            Some(end) => Some(end - offset),
            None => None,
        };
        let width = match (*width, remaining) {
            (Some(width), Some(remaining)) => width.min(remaining),
            (Some(width), None) => width,
            (None, Some(remaining)) => remaining,
            (None, None) => char_len(rest),
        };
        let (value, tail) = split_chars(rest, width);
        block.push(*id, value);
        offset += char_len(value);
        rest = tail;
        if *id == length_field {
            end = Some(offset + parse_hex(value, *id)?);
        }
    }
    let span = end.ok_or(InvalidReason::BadHexLength {
        field: length_field,
    })?;
    Ok(DescribedBlock {
        span,
        fields: block,
    })
}

#[derive(Debug, Default)]
struct VariableBlocks {
    unique: Option<Fields>,
    repeated: Option<Fields>,
    airline: Option<Fields>,
}

/// Splits the variable size data of one leg into its conditional and airline
/// blocks. `data` holds exactly the characters the leg declares.
fn parse_variable_blocks(data: &str, leg: usize) -> Result<VariableBlocks, InvalidReason> {
    let mut blocks = VariableBlocks::default();
    let mut rest = data;

    if leg == 0 && !data.is_empty() {
        if char_len(data) < UNIQUE_HEADER_LEN {
            trace!("Conditional unique block of {:?} has no room for its size", data);
            blocks.unique = Some(bounded_block(data, CONDITIONAL_UNIQUE));
            return Ok(blocks);
        }
        let unique = described_block(data, CONDITIONAL_UNIQUE, FieldId::FollowingUniqueLength)?;
        if unique.span > char_len(data) {
            return Err(InvalidReason::ConditionalOverrun { leg });
        }
        trace!("Conditional unique block spans {} characters", unique.span);
        rest = split_chars(data, unique.span).1;
        blocks.unique = Some(unique.fields);
    }

    if rest.is_empty() {
        return Ok(blocks);
    }
    if char_len(rest) < REPEATED_HEADER_LEN {
        trace!("Conditional repeated block of {:?} has no room for its size", rest);
        blocks.repeated = Some(bounded_block(rest, CONDITIONAL_REPEATED));
        return Ok(blocks);
    }
    let repeated = described_block(
        rest,
        CONDITIONAL_REPEATED,
        FieldId::FollowingRepeatedLength,
    )?;
    if repeated.span > char_len(rest) {
        return Err(InvalidReason::ConditionalOverrun { leg });
    }
    trace!("Conditional repeated block spans {} characters", repeated.span);
    let airline = split_chars(rest, repeated.span).1;
    blocks.repeated = Some(repeated.fields);

    if !airline.is_empty() {
        trace!("Airline block spans {} characters", char_len(airline));
        let mut fields = Fields::default();
        fields.push(FieldId::IndividualAirlineUse, airline);
        blocks.airline = Some(fields);
    }
    Ok(blocks)
}

/// Returns the security fields and whatever text follows them.
fn parse_security(input: &str) -> Result<(Fields, &str), InvalidReason> {
    if !input.starts_with(SECURITY_MARKER) {
        trace!("Security data has no marker, keeping it unstructured");
        let mut fields = Fields::default();
        fields.push(FieldId::SecurityData, input);
        return Ok((fields, ""));
    }
    let security = described_block(input, SECURITY, FieldId::SecurityDataLength)?;
    let span = security.span.min(char_len(input));
    trace!("Security block spans {} characters", span);
    Ok((security.fields, split_chars(input, span).1))
}

fn build_leg(
    mandatory: &Fields,
    conditional: Option<Fields>,
    airline: Option<Fields>,
    reference: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Leg {
    let text = |id| mandatory.get(id).unwrap_or_default().to_string();
    let flight_date_ordinal = text(FieldId::FlightDate);
    let resolved_flight_date = flight_date_ordinal
        .trim()
        .parse::<u16>()
        .ok()
        .and_then(|ordinal| resolve_flight_date(ordinal, reference, now));
    Leg {
        pnr: text(FieldId::Pnr),
        from_airport: text(FieldId::FromAirport),
        to_airport: text(FieldId::ToAirport),
        operating_carrier: text(FieldId::OperatingCarrier),
        flight_number: text(FieldId::FlightNumber),
        flight_date_ordinal,
        compartment_code: text(FieldId::CompartmentCode),
        seat_number: text(FieldId::SeatNumber),
        check_in_sequence: text(FieldId::CheckInSequence),
        passenger_status: text(FieldId::PassengerStatus),
        resolved_flight_date,
        conditional_fields: conditional,
        airline_fields: airline,
    }
}

fn merge(first: Option<Fields>, second: Option<Fields>) -> Option<Fields> {
    match (first, second) {
        (Some(mut first), Some(second)) => {
            first.extend(second);
            Some(first)
        }
        (first, second) => first.or(second),
    }
}

fn parse_document(
    document: &mut BcbpDocument,
    text: &str,
    reference: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), InvalidReason> {
    let length = char_len(text);
    if length < MIN_LENGTH {
        return Err(InvalidReason::TooShort(MIN_LENGTH));
    }
    let cursor = |rest: &str| length - char_len(rest);

    let (mut rest, mandatory_unique) =
        fixed_block(text, MANDATORY_UNIQUE).map_err(|_| InvalidReason::TooShort(MIN_LENGTH))?;
    let leg_count = parse_leg_count(mandatory_unique.get(FieldId::LegCount).unwrap_or_default());
    document.mandatory_unique = Some(mandatory_unique);
    let leg_count = leg_count?;
    document.leg_count = Some(leg_count);

    for leg in 0..leg_count as usize {
        trace!("Leg {} starts at {}", leg, cursor(rest));
        let (after_mandatory, mandatory) = fixed_block(rest, MANDATORY_REPEATED)
            .map_err(|_| InvalidReason::MandatoryBlockOverrun { leg })?;
        let size = parse_hex(
            mandatory
                .get(FieldId::ConditionalAirlineLength)
                .unwrap_or_default(),
            FieldId::ConditionalAirlineLength,
        )?;
        let (after_leg, data) =
            leg_data(after_mandatory, size).map_err(|_| InvalidReason::LegOverrun { leg })?;

        let blocks = parse_variable_blocks(data, leg)?;
        if let Some(unique) = &blocks.unique {
            document.version_number = unique
                .get(FieldId::VersionNumber)
                .and_then(|version| version.trim().parse().ok());
            document.conditional_unique = Some(unique.clone());
        }
        let conditional = merge(blocks.unique, blocks.repeated);
        document.legs.push(build_leg(
            &mandatory,
            conditional,
            blocks.airline,
            reference,
            now,
        ));
        rest = after_leg;
    }

    if !rest.is_empty() {
        match document.version_number {
            Some(version) if version >= 3 => {
                trace!("Security block starts at {}", cursor(rest));
                let (security, tail) = parse_security(rest)?;
                document.security = Some(security);
                rest = tail;
            }
            _ => {}
        }
    }
    if !rest.is_empty() {
        trace!("Unknown data starts at {}", cursor(rest));
        document.unknown = Some(rest.to_string());
    }
    Ok(())
}

/// Decode a BCBP string as of `now`. `now` is only used to guess the year of
/// flight dates when no `reference` timestamp is given.
pub fn decode_at(
    text: &str,
    reference: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> BcbpDocument {
    let mut document = BcbpDocument::new(text);
    if let Err(reason) = parse_document(&mut document, text, reference, now) {
        debug!("Invalid boarding pass after {} legs: {}", document.legs.len(), reason);
        document.invalidate(reason);
    }
    document
}

/// Decode a BCBP string. Malformed input never fails; it produces a document
/// with `valid` set to false. `reference` is the time the pass was scanned or
/// issued, if known, and is used to pick the year of each flight date.
pub fn decode(text: &str, reference: Option<DateTime<Utc>>) -> BcbpDocument {
    decode_at(text, reference, Utc::now())
}

/// Parse a BCBP string, returning an error if it is not valid.
pub fn parse(text: &str) -> Result<BcbpDocument, ParserError> {
    decode(text, None).into_result()
}

/// Parse a BCBP string scanned or issued at `reference`, returning an error if
/// it is not valid.
pub fn parse_with_reference(
    text: &str,
    reference: DateTime<Utc>,
) -> Result<BcbpDocument, ParserError> {
    decode(text, Some(reference)).into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    const IATA_SAMPLE: &str = "M1DESMARAIS/LUC       EABC123 YULFRAAC 0834 226F001A0025 100";

    // Version 6 conditional unique block, 11 characters following its size.
    const UNIQUE: &str = ">60B1WW6225BAC ";
    const UNIQUE_V2: &str = ">20B1WW6225BAC ";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn header(legs: char) -> String {
        format!("M{}{:<20}E", legs, "DESMARAIS/LUC")
    }

    fn leg(from: &str, to: &str, ordinal: &str, variable: &str) -> String {
        format!(
            "ABC123 {}{}AC 0834 {}F001A0025 1{:02X}{}",
            from,
            to,
            ordinal,
            variable.chars().count(),
            variable
        )
    }

    // Conditional repeated block with all eleven fields, 42 characters
    // following its size.
    fn repeated() -> String {
        format!("2A014123456789010AC AC {:<16}020KY", "1234567890123")
    }

    fn decode_now(text: &str) -> BcbpDocument {
        decode_at(text, None, now())
    }

    #[test]
    fn decode_iata_sample() {
        assert_eq!(header('1') + &leg("YUL", "FRA", "226", ""), IATA_SAMPLE);
        let document = decode_now(IATA_SAMPLE);
        assert!(document.valid);
        assert_eq!(document.invalid_reason, None);
        assert_eq!(document.leg_count, Some(1));
        assert_eq!(document.passenger_name(), Some("DESMARAIS/LUC"));
        assert_eq!(document.raw_text, IATA_SAMPLE);
        assert_eq!(document.legs.len(), 1);
        let leg = &document.legs[0];
        assert_eq!(leg.pnr, "ABC123 ");
        assert_eq!(leg.from_airport, "YUL");
        assert_eq!(leg.to_airport, "FRA");
        assert_eq!(leg.operating_carrier, "AC ");
        assert_eq!(leg.flight_number, "0834 ");
        assert_eq!(leg.flight_date_ordinal, "226");
        assert_eq!(leg.compartment_code, "F");
        assert_eq!(leg.seat_number, "001A");
        assert_eq!(leg.check_in_sequence, "0025 ");
        assert_eq!(leg.passenger_status, "1");
        assert_eq!(leg.resolved_flight_date, NaiveDate::from_ymd_opt(2024, 8, 13));
        assert_eq!(leg.conditional_fields, None);
        assert_eq!(leg.airline_fields, None);
        assert_eq!(document.conditional_unique, None);
        assert_eq!(document.version_number, None);
        assert_eq!(document.security, None);
        assert_eq!(document.unknown, None);
        assert_eq!(leg.to_string(), "2024-08-13 AC 834 YUL-FRA");
    }

    #[test]
    fn decode_too_short() {
        for text in &["", "M1", "M1DESMARAIS/LUC       E", &IATA_SAMPLE[..59]] {
            let document = decode_now(text);
            assert!(!document.valid);
            assert_eq!(document.invalid_reason, Some(InvalidReason::TooShort(MIN_LENGTH)));
            assert!(document.legs.is_empty());
        }
    }

    #[test]
    fn decode_bad_leg_count() {
        let text = header('X') + &leg("YUL", "FRA", "226", "");
        let document = decode_now(&text);
        assert!(!document.valid);
        assert_eq!(document.invalid_reason, Some(InvalidReason::BadLegCount));
        assert!(document.legs.is_empty());
        assert_eq!(document.leg_count, None);
    }

    #[test]
    fn decode_leg_count_out_of_range() {
        for (digit, count) in &[('0', 0), ('5', 5), ('9', 9)] {
            let text = header(*digit) + &leg("YUL", "FRA", "226", "");
            let document = decode_now(&text);
            assert!(!document.valid);
            assert_eq!(
                document.invalid_reason,
                Some(InvalidReason::LegCountOutOfRange(*count))
            );
            assert!(document.legs.is_empty());
        }
    }

    #[test]
    fn decode_bad_hex_length() {
        let text = IATA_SAMPLE.replace("100", "10G");
        let document = decode_now(&text);
        assert!(!document.valid);
        assert_eq!(
            document.invalid_reason,
            Some(InvalidReason::BadHexLength {
                field: FieldId::ConditionalAirlineLength
            })
        );
    }

    #[test]
    fn decode_missing_second_leg() {
        let text = header('2') + &leg("YUL", "FRA", "226", "");
        let document = decode_now(&text);
        assert!(!document.valid);
        assert_eq!(
            document.invalid_reason,
            Some(InvalidReason::MandatoryBlockOverrun { leg: 1 })
        );
        assert_eq!(document.legs.len(), 1);
    }

    #[test]
    fn decode_leg_size_past_end() {
        let text = IATA_SAMPLE.replace("100", "110") + "ABC";
        let document = decode_now(&text);
        assert!(!document.valid);
        assert_eq!(
            document.invalid_reason,
            Some(InvalidReason::LegOverrun { leg: 0 })
        );
        assert!(document.legs.is_empty());
    }

    #[test]
    fn decode_all_leg_blocks() {
        let variable = format!("{}{}LX58Z", UNIQUE, repeated());
        let text = header('1') + &leg("YUL", "FRA", "226", &variable);
        let document = decode_now(&text);
        assert!(document.valid);
        assert_eq!(document.version_number, Some(6));

        let unique = document.conditional_unique.as_ref().unwrap();
        assert_eq!(unique.len(), 9);
        assert_eq!(unique.get(FieldId::FollowingUniqueLength), Some("0B"));
        assert_eq!(unique.get(FieldId::BoardingPassDate), Some("6225"));
        assert_eq!(unique.get(FieldId::BoardingPassIssuerAirline), Some("AC "));
        assert_eq!(unique.get(FieldId::BaggageTagNumber), None);

        let leg = &document.legs[0];
        let conditional = leg.conditional_fields.as_ref().unwrap();
        assert_eq!(conditional.get(FieldId::PassengerDescription), Some("1"));
        assert_eq!(conditional.get(FieldId::FollowingRepeatedLength), Some("2A"));
        assert_eq!(conditional.get(FieldId::AirlineNumericCode), Some("014"));
        assert_eq!(
            conditional.get(FieldId::DocumentFormSerialNumber),
            Some("1234567890")
        );
        assert_eq!(
            conditional.get(FieldId::FrequentFlierNumber),
            Some("1234567890123   ")
        );
        assert_eq!(conditional.get(FieldId::FastTrack), Some("Y"));
        assert_eq!(
            leg.airline_fields
                .as_ref()
                .and_then(|fields| fields.get(FieldId::IndividualAirlineUse)),
            Some("LX58Z")
        );
        assert_eq!(document.unknown, None);
    }

    #[test]
    fn decode_unique_block_fills_first_leg() {
        let text = header('2')
            + &leg("YUL", "FRA", "226", UNIQUE)
            + &leg("FRA", "GVA", "227", "");
        let document = decode_now(&text);
        assert!(document.valid);
        assert_eq!(document.legs.len(), 2);
        let first = &document.legs[0];
        assert_eq!(
            first
                .conditional_fields
                .as_ref()
                .and_then(|fields| fields.get(FieldId::VersionNumber)),
            Some("6")
        );
        assert_eq!(first.airline_fields, None);
        let second = &document.legs[1];
        assert_eq!(second.from_airport, "FRA");
        assert_eq!(second.to_airport, "GVA");
        assert_eq!(second.conditional_fields, None);
        assert_eq!(second.airline_fields, None);
    }

    #[test]
    fn decode_unique_block_past_leg_end() {
        let text = header('1') + &leg("YUL", "FRA", "226", ">60B1WW625");
        let document = decode_now(&text);
        assert!(!document.valid);
        assert_eq!(
            document.invalid_reason,
            Some(InvalidReason::ConditionalOverrun { leg: 0 })
        );
        assert!(document.legs.is_empty());
    }

    #[test]
    fn decode_undersized_unique_block() {
        let text = header('1') + &leg("YUL", "FRA", "226", ">60");
        let document = decode_now(&text);
        assert!(document.valid);
        let unique = document.conditional_unique.as_ref().unwrap();
        assert_eq!(unique.get(FieldId::VersionNumberBegin), Some(">"));
        assert_eq!(unique.get(FieldId::FollowingUniqueLength), Some("0"));
        assert_eq!(unique.get(FieldId::PassengerDescription), None);
        assert_eq!(document.version_number, Some(6));
        assert_eq!(document.legs[0].airline_fields, None);
    }

    #[test]
    fn decode_truncates_repeated_field() {
        let text = header('2')
            + &leg("YUL", "FRA", "226", "")
            + &leg("FRA", "GVA", "227", "0501412");
        let document = decode_now(&text);
        assert!(document.valid);
        let conditional = document.legs[1].conditional_fields.as_ref().unwrap();
        assert_eq!(conditional.get(FieldId::AirlineNumericCode), Some("014"));
        assert_eq!(conditional.get(FieldId::DocumentFormSerialNumber), Some("12"));
        assert_eq!(conditional.get(FieldId::SelecteeIndicator), None);
        assert_eq!(conditional.len(), 3);
        assert_eq!(document.legs[1].airline_fields, None);
    }

    #[test]
    fn decode_empty_repeated_block_then_airline() {
        let text = header('2')
            + &leg("YUL", "FRA", "226", "")
            + &leg("FRA", "GVA", "227", "00LX");
        let document = decode_now(&text);
        assert!(document.valid);
        let second = &document.legs[1];
        let conditional = second.conditional_fields.as_ref().unwrap();
        assert_eq!(conditional.len(), 1);
        assert_eq!(conditional.get(FieldId::AirlineNumericCode), None);
        assert_eq!(
            second
                .airline_fields
                .as_ref()
                .and_then(|fields| fields.get(FieldId::IndividualAirlineUse)),
            Some("LX")
        );
    }

    #[test]
    fn decode_repeated_block_past_leg_end() {
        let text = header('2')
            + &leg("YUL", "FRA", "226", "")
            + &leg("FRA", "GVA", "227", "0A01");
        let document = decode_now(&text);
        assert!(!document.valid);
        assert_eq!(
            document.invalid_reason,
            Some(InvalidReason::ConditionalOverrun { leg: 1 })
        );
        assert_eq!(document.legs.len(), 1);
        assert_eq!(document.legs[0].from_airport, "YUL");
    }

    #[test]
    fn decode_security_block() {
        let text = header('1') + &leg("YUL", "FRA", "226", UNIQUE) + "^10AABCDEFGHIJXYZ";
        let document = decode_now(&text);
        assert!(document.valid);
        let security = document.security.as_ref().unwrap();
        assert_eq!(security.get(FieldId::SecurityDataBegin), Some("^"));
        assert_eq!(security.get(FieldId::SecurityDataType), Some("1"));
        assert_eq!(security.get(FieldId::SecurityDataLength), Some("0A"));
        assert_eq!(document.security_data(), Some("ABCDEFGHIJ"));
        assert_eq!(document.unknown_data(), Some("XYZ"));
    }

    #[test]
    fn decode_security_block_clipped_to_text() {
        let text = header('1') + &leg("YUL", "FRA", "226", UNIQUE) + "^10AABC";
        let document = decode_now(&text);
        assert!(document.valid);
        assert_eq!(document.security_data(), Some("ABC"));
        assert_eq!(document.unknown, None);
    }

    #[test]
    fn decode_security_without_marker() {
        let text = header('1') + &leg("YUL", "FRA", "226", UNIQUE) + "GARBAGE";
        let document = decode_now(&text);
        assert!(document.valid);
        let security = document.security.as_ref().unwrap();
        assert_eq!(security.len(), 1);
        assert_eq!(document.security_data(), Some("GARBAGE"));
        assert_eq!(document.unknown, None);
    }

    #[test]
    fn decode_security_bad_hex_length() {
        let text = header('1') + &leg("YUL", "FRA", "226", UNIQUE) + "^1ZZABC";
        let document = decode_now(&text);
        assert!(!document.valid);
        assert_eq!(
            document.invalid_reason,
            Some(InvalidReason::BadHexLength {
                field: FieldId::SecurityDataLength
            })
        );
        assert_eq!(document.legs.len(), 1);
    }

    #[test]
    fn decode_security_ignored_before_version_3() {
        let text = header('1') + &leg("YUL", "FRA", "226", UNIQUE_V2) + "^10AABCDEFGHIJ";
        let document = decode_now(&text);
        assert!(document.valid);
        assert_eq!(document.version_number, Some(2));
        assert_eq!(document.security, None);
        assert_eq!(document.unknown_data(), Some("^10AABCDEFGHIJ"));
    }

    #[test]
    fn decode_trailing_data_without_conditional_block() {
        let text = IATA_SAMPLE.to_string() + "^100";
        let document = decode_now(&text);
        assert!(document.valid);
        assert_eq!(document.security, None);
        assert_eq!(document.unknown_data(), Some("^100"));
    }

    #[test]
    fn decode_with_reference() {
        let text = header('1') + &leg("YUL", "FRA", "366", "");
        let reference = Utc.with_ymd_and_hms(2025, 1, 1, 8, 30, 0).unwrap();
        let document = decode_at(&text, Some(reference), now());
        assert!(document.valid);
        assert_eq!(
            document.flight_dates(),
            vec![NaiveDate::from_ymd_opt(2024, 12, 31)]
        );
    }

    #[test]
    fn decode_unresolvable_date() {
        let text = header('1') + &leg("YUL", "FRA", "ABC", "");
        let document = decode_now(&text);
        assert!(document.valid);
        assert_eq!(document.legs[0].flight_date_ordinal, "ABC");
        assert_eq!(document.legs[0].resolved_flight_date, None);
    }

    #[test]
    fn decode_counts_characters() {
        let text = format!("M1{:<20}E", "DÉSMARAIS/LUC") + &leg("YUL", "FRA", "226", "");
        let document = decode_now(&text);
        assert!(document.valid);
        assert_eq!(document.passenger_name(), Some("DÉSMARAIS/LUC"));
        assert_eq!(document.legs[0].pnr, "ABC123 ");
    }

    #[test]
    fn parse_strict() {
        assert!(parse(IATA_SAMPLE).is_ok());
        let reference = Utc.with_ymd_and_hms(2024, 8, 10, 0, 0, 0).unwrap();
        let document = parse_with_reference(IATA_SAMPLE, reference).unwrap();
        assert_eq!(
            document.legs[0].resolved_flight_date,
            NaiveDate::from_ymd_opt(2024, 8, 13)
        );
        assert_eq!(
            parse("M1").unwrap_err(),
            ParserError(InvalidReason::TooShort(MIN_LENGTH))
        );
    }

    #[test]
    fn decode_invalid_passes() {
        decode_now("M4");
        decode_now(&"M1".repeat(40));
        decode_now(&(header('4') + &leg("YUL", "FRA", "226", "0")));
        decode_now(&(header('1') + &leg("YUL", "FRA", "226", "^^^^")));
        decode_now(&(header('1') + &leg("YUL", "FRA", "226", ">3FF")));
    }
}
