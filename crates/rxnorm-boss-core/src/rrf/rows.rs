//! Column layout of the two RRF tables and typed row views over them.
//!
//! The offsets are a contract with the RxNorm release format and must not drift.

use csv::StringRecord;

use crate::models::BossAttribute;

/// Source abbreviation of RxNorm-native rows.
pub const SAB_RXNORM: &str = "RXNORM";
/// Language of the rows we label with.
pub const LAT_ENGLISH: &str = "ENG";
const FLAG_YES: &str = "Y";

/// RXNCONSO.RRF column offsets.
pub mod rxnconso {
    pub const FIELD_COUNT: usize = 18;
    pub const LAT: usize = 1;
    pub const ISPREF: usize = 6;
    pub const SAB: usize = 11;
    pub const TTY: usize = 12;
    pub const CODE: usize = 13;
    pub const STR: usize = 14;
    pub const SUPPRESS: usize = 16;
}

/// RXNSAT.RRF column offsets.
pub mod rxnsat {
    pub const FIELD_COUNT: usize = 13;
    pub const CODE: usize = 5;
    pub const ATN: usize = 8;
    pub const SAB: usize = 9;
    pub const ATV: usize = 10;
    pub const SUPPRESS: usize = 11;
}

/// One RXNCONSO row, borrowed from its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConceptRow<'a> {
    pub rxcui: &'a str,
    pub lat: &'a str,
    pub sab: &'a str,
    pub tty: &'a str,
    pub name: &'a str,
    pub preferred: bool,
    pub suppressed: bool,
}

impl<'a> ConceptRow<'a> {
    /// Returns `None` for rows with too few fields.
    pub fn from_record(record: &'a StringRecord) -> Option<Self> {
        if record.len() < rxnconso::FIELD_COUNT {
            return None;
        }
        Some(Self {
            rxcui: &record[rxnconso::CODE],
            lat: &record[rxnconso::LAT],
            sab: &record[rxnconso::SAB],
            tty: &record[rxnconso::TTY],
            name: &record[rxnconso::STR],
            preferred: &record[rxnconso::ISPREF] == FLAG_YES,
            suppressed: &record[rxnconso::SUPPRESS] == FLAG_YES,
        })
    }

    /// English, RxNorm-sourced, not suppressed, with an identifier.
    pub fn is_eligible(&self) -> bool {
        self.sab == SAB_RXNORM && self.lat == LAT_ENGLISH && !self.suppressed && !self.rxcui.is_empty()
    }
}

/// One RXNSAT row, borrowed from its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRow<'a> {
    /// RXCUI of the concept the attribute hangs off
    pub parent: &'a str,
    pub atn: &'a str,
    pub sab: &'a str,
    pub atv: &'a str,
    pub suppressed: bool,
}

impl<'a> AttributeRow<'a> {
    /// Returns `None` for rows with too few fields.
    pub fn from_record(record: &'a StringRecord) -> Option<Self> {
        if record.len() < rxnsat::FIELD_COUNT {
            return None;
        }
        Some(Self {
            parent: &record[rxnsat::CODE],
            atn: &record[rxnsat::ATN],
            sab: &record[rxnsat::SAB],
            atv: &record[rxnsat::ATV],
            suppressed: &record[rxnsat::SUPPRESS] == FLAG_YES,
        })
    }

    /// RxNorm-sourced and not suppressed.
    pub fn is_eligible(&self) -> bool {
        self.sab == SAB_RXNORM && !self.suppressed
    }

    /// The BoSS attribute this row carries, if any.
    pub fn attribute(&self) -> Option<BossAttribute> {
        BossAttribute::from_atn(self.atn)
    }
}
