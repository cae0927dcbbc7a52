use crate::fields::FieldId;
use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Why a boarding pass was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    #[error("text is shorter than {0} characters")]
    TooShort(usize),
    #[error("number of legs is not a digit")]
    BadLegCount,
    #[error("number of legs {0} is outside 1-4")]
    LegCountOutOfRange(u8),
    #[error("field {field} is not a hexadecimal length")]
    BadHexLength { field: FieldId },
    #[error("mandatory block of leg {leg} runs past the end of the text")]
    MandatoryBlockOverrun { leg: usize },
    #[error("variable size data of leg {leg} runs past the end of the text")]
    LegOverrun { leg: usize },
    #[error("conditional block of leg {leg} runs past the end of the leg")]
    ConditionalOverrun { leg: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error parsing boarding pass: {0}")]
pub struct ParserError(pub InvalidReason);

impl From<InvalidReason> for ParserError {
    fn from(reason: InvalidReason) -> Self {
        ParserError(reason)
    }
}

/// Ordered field values of one block.
///
/// A field missing from the collection was never reached by the parser, which
/// is different from a field that was read but is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(FieldId, String)>);

impl Fields {
    pub(crate) fn push(&mut self, id: FieldId, value: &str) {
        self.0.push((id, value.to_string()));
    }

    pub(crate) fn extend(&mut self, other: Fields) {
        self.0.extend(other.0);
    }

    pub fn get(&self, id: FieldId) -> Option<&str> {
        self.0
            .iter()
            .find(|(field, _)| *field == id)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> {
        self.0.iter().map(|(id, value)| (*id, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One flight segment of a boarding pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub pnr: String,
    pub from_airport: String,
    pub to_airport: String,
    pub operating_carrier: String,
    pub flight_number: String,
    pub flight_date_ordinal: String,
    pub compartment_code: String,
    pub seat_number: String,
    pub check_in_sequence: String,
    pub passenger_status: String,
    /// Calendar date for `flight_date_ordinal`, if one could be determined.
    pub resolved_flight_date: Option<NaiveDate>,
    /// Conditional items for this leg. For the first leg this also holds the
    /// conditional unique items.
    pub conditional_fields: Option<Fields>,
    pub airline_fields: Option<Fields>,
}

impl Leg {
    pub fn airline_designator(&self) -> &str {
        self.operating_carrier.trim()
    }

    pub fn origin(&self) -> &str {
        self.from_airport.trim()
    }

    pub fn destination(&self) -> &str {
        self.to_airport.trim()
    }

    /// Flight number without padding or leading zeros.
    pub fn flight_number_trimmed(&self) -> &str {
        let number = self.flight_number.trim().trim_start_matches('0');
        if number.is_empty() {
            "0"
        } else {
            number
        }
    }

    pub fn ordinal(&self) -> Option<u16> {
        self.flight_date_ordinal.trim().parse().ok()
    }

    /// Looks a field up in the mandatory, conditional and airline blocks of
    /// this leg.
    pub fn field(&self, id: FieldId) -> Option<&str> {
        let mandatory = match id {
            FieldId::Pnr => Some(&self.pnr),
            FieldId::FromAirport => Some(&self.from_airport),
            FieldId::ToAirport => Some(&self.to_airport),
            FieldId::OperatingCarrier => Some(&self.operating_carrier),
            FieldId::FlightNumber => Some(&self.flight_number),
            FieldId::FlightDate => Some(&self.flight_date_ordinal),
            FieldId::CompartmentCode => Some(&self.compartment_code),
            FieldId::SeatNumber => Some(&self.seat_number),
            FieldId::CheckInSequence => Some(&self.check_in_sequence),
            FieldId::PassengerStatus => Some(&self.passenger_status),
            _ => None,
        };
        mandatory
            .map(String::as_str)
            .or_else(|| self.conditional_fields.as_ref()?.get(id))
            .or_else(|| self.airline_fields.as_ref()?.get(id))
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.resolved_flight_date {
            Some(date) => write!(f, "{}", date)?,
            None => write!(f, "None")?,
        }
        write!(
            f,
            " {} {} {}-{}",
            self.airline_designator(),
            self.flight_number_trimmed(),
            self.origin(),
            self.destination()
        )
    }
}

/// Result of decoding a BCBP string.
///
/// When `valid` is false the document holds whatever was extracted before the
/// parser stopped. Nothing in it should be trusted beyond error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct BcbpDocument {
    pub raw_text: String,
    pub valid: bool,
    pub invalid_reason: Option<InvalidReason>,
    pub leg_count: Option<u8>,
    pub mandatory_unique: Option<Fields>,
    pub conditional_unique: Option<Fields>,
    pub legs: Vec<Leg>,
    pub version_number: Option<u8>,
    pub security: Option<Fields>,
    /// Unstructured text left after the last block that was understood.
    pub unknown: Option<String>,
}

impl BcbpDocument {
    pub(crate) fn new(raw_text: &str) -> Self {
        BcbpDocument {
            raw_text: raw_text.to_string(),
            valid: true,
            invalid_reason: None,
            leg_count: None,
            mandatory_unique: None,
            conditional_unique: None,
            legs: Vec::new(),
            version_number: None,
            security: None,
            unknown: None,
        }
    }

    pub(crate) fn invalidate(&mut self, reason: InvalidReason) {
        if self.valid {
            self.valid = false;
            self.invalid_reason = Some(reason);
        }
    }

    pub fn leg(&self, index: usize) -> Option<&Leg> {
        self.legs.get(index)
    }

    pub fn passenger_name(&self) -> Option<&str> {
        self.mandatory_unique
            .as_ref()
            .and_then(|fields| fields.get(FieldId::PassengerName))
            .map(str::trim_end)
    }

    pub fn flight_dates(&self) -> Vec<Option<NaiveDate>> {
        self.legs.iter().map(|leg| leg.resolved_flight_date).collect()
    }

    pub fn security_data(&self) -> Option<&str> {
        self.security
            .as_ref()
            .and_then(|fields| fields.get(FieldId::SecurityData))
    }

    pub fn unknown_data(&self) -> Option<&str> {
        self.unknown.as_deref()
    }

    pub fn into_result(self) -> Result<BcbpDocument, ParserError> {
        match self.invalid_reason.clone() {
            Some(reason) => Err(ParserError(reason)),
            None => Ok(self),
        }
    }
}

impl fmt::Display for BcbpDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.raw_text.replace(' ', "·"))
    }
}
