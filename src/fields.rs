use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// Field tables for IATA Resolution 792. The numbers in the comments are the
// item numbers used by the standard.

macro_rules! field_ids {
    ($($variant:ident => $key:literal,)*) => {
        /// Identifies a single BCBP data element.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum FieldId {
            $($variant,)*
        }

        impl FieldId {
            pub const ALL: &'static [FieldId] = &[$(FieldId::$variant,)*];

            /// Stable snake_case name of the field.
            pub fn key(self) -> &'static str {
                match self {
                    $(FieldId::$variant => $key,)*
                }
            }
        }
    };
}

field_ids! {
    FormatCode => "format_code",
    LegCount => "leg_count",
    PassengerName => "passenger_name",
    ElectronicTicket => "electronic_ticket",
    Pnr => "pnr",
    FromAirport => "from_airport",
    ToAirport => "to_airport",
    OperatingCarrier => "operating_carrier",
    FlightNumber => "flight_number",
    FlightDate => "flight_date",
    CompartmentCode => "compartment_code",
    SeatNumber => "seat_number",
    CheckInSequence => "check_in_sequence",
    PassengerStatus => "passenger_status",
    ConditionalAirlineLength => "conditional_airline_length",
    VersionNumberBegin => "version_number_begin",
    VersionNumber => "version_number",
    FollowingUniqueLength => "following_unique_length",
    PassengerDescription => "passenger_description",
    CheckInSource => "check_in_source",
    BoardingPassSource => "boarding_pass_source",
    BoardingPassDate => "boarding_pass_date",
    DocumentType => "document_type",
    BoardingPassIssuerAirline => "boarding_pass_issuer_airline",
    BaggageTagNumber => "baggage_tag_number",
    BaggageTagNumberNonConsecutive1 => "baggage_tag_number_nonconsecutive_1",
    BaggageTagNumberNonConsecutive2 => "baggage_tag_number_nonconsecutive_2",
    FollowingRepeatedLength => "following_repeated_length",
    AirlineNumericCode => "airline_numeric_code",
    DocumentFormSerialNumber => "document_form_serial_number",
    SelecteeIndicator => "selectee_indicator",
    InternationalDocVerification => "international_doc_verification",
    MarketingCarrier => "marketing_carrier",
    FrequentFlierAirline => "frequent_flier_airline",
    FrequentFlierNumber => "frequent_flier_number",
    IdAd => "id_ad",
    FreeBaggageAllowance => "free_baggage_allowance",
    FastTrack => "fast_track",
    IndividualAirlineUse => "individual_airline_use",
    SecurityDataBegin => "security_data_begin",
    SecurityDataType => "security_data_type",
    SecurityDataLength => "security_data_length",
    SecurityData => "security_data",
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

lazy_static! {
    static ref KEY_INDEX: HashMap<&'static str, FieldId> =
        FieldId::ALL.iter().map(|id| (id.key(), *id)).collect();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldError(pub String);

impl fmt::Display for UnknownFieldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown BCBP field `{}`", self.0)
    }
}

impl std::error::Error for UnknownFieldError {}

impl FromStr for FieldId {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KEY_INDEX
            .get(s)
            .copied()
            .ok_or_else(|| UnknownFieldError(s.to_string()))
    }
}

/// Width of a field in characters. `None` means the field takes whatever is
/// left of its block.
pub(crate) type FieldSpec = (FieldId, Option<usize>);

pub(crate) const MANDATORY_UNIQUE: &[FieldSpec] = &[
    (FieldId::FormatCode, Some(1)),        // 1
    (FieldId::LegCount, Some(1)),          // 5
    (FieldId::PassengerName, Some(20)),    // 11
    (FieldId::ElectronicTicket, Some(1)),  // 253
];

pub(crate) const MANDATORY_REPEATED: &[FieldSpec] = &[
    (FieldId::Pnr, Some(7)),                      // 7
    (FieldId::FromAirport, Some(3)),              // 26
    (FieldId::ToAirport, Some(3)),                // 38
    (FieldId::OperatingCarrier, Some(3)),         // 42
    (FieldId::FlightNumber, Some(5)),             // 43
    (FieldId::FlightDate, Some(3)),               // 46
    (FieldId::CompartmentCode, Some(1)),          // 71
    (FieldId::SeatNumber, Some(4)),               // 104
    (FieldId::CheckInSequence, Some(5)),          // 107
    (FieldId::PassengerStatus, Some(1)),          // 113
    (FieldId::ConditionalAirlineLength, Some(2)), // 6
];

pub(crate) const CONDITIONAL_UNIQUE: &[FieldSpec] = &[
    (FieldId::VersionNumberBegin, Some(1)),               // 8
    (FieldId::VersionNumber, Some(1)),                    // 9
    (FieldId::FollowingUniqueLength, Some(2)),            // 10
    (FieldId::PassengerDescription, Some(1)),             // 15
    (FieldId::CheckInSource, Some(1)),                    // 12
    (FieldId::BoardingPassSource, Some(1)),               // 14
    (FieldId::BoardingPassDate, Some(4)),                 // 22
    (FieldId::DocumentType, Some(1)),                     // 16
    (FieldId::BoardingPassIssuerAirline, Some(3)),        // 21
    (FieldId::BaggageTagNumber, Some(13)),                // 23
    (FieldId::BaggageTagNumberNonConsecutive1, Some(13)), // 31
    (FieldId::BaggageTagNumberNonConsecutive2, Some(13)), // 31
];

pub(crate) const CONDITIONAL_REPEATED: &[FieldSpec] = &[
    (FieldId::FollowingRepeatedLength, Some(2)),       // 17
    (FieldId::AirlineNumericCode, Some(3)),            // 142
    (FieldId::DocumentFormSerialNumber, Some(10)),     // 143
    (FieldId::SelecteeIndicator, Some(1)),             // 18
    (FieldId::InternationalDocVerification, Some(1)), // 108
    (FieldId::MarketingCarrier, Some(3)),              // 19
    (FieldId::FrequentFlierAirline, Some(3)),          // 20
    (FieldId::FrequentFlierNumber, Some(16)),          // 236
    (FieldId::IdAd, Some(1)),                          // 89
    (FieldId::FreeBaggageAllowance, Some(3)),          // 118
    (FieldId::FastTrack, Some(1)),                     // 254
];

pub(crate) const SECURITY: &[FieldSpec] = &[
    (FieldId::SecurityDataBegin, Some(1)),  // 25
    (FieldId::SecurityDataType, Some(1)),   // 28
    (FieldId::SecurityDataLength, Some(2)), // 29
    (FieldId::SecurityData, None),          // 30
];

/// Total width of a block made only of fixed-width fields.
pub(crate) const fn fixed_width(fields: &[FieldSpec]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < fields.len() {
        if let Some(width) = fields[i].1 {
            total += width;
        }
        i += 1;
    }
    total
}

pub(crate) const MANDATORY_UNIQUE_LEN: usize = fixed_width(MANDATORY_UNIQUE);
pub(crate) const MANDATORY_REPEATED_LEN: usize = fixed_width(MANDATORY_REPEATED);
