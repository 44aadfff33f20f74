use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// `(provided name, display value)` pairs accepted by the vendor.
const TIMEZONES: &[(&str, &str)] = &[
    ("HST", "(GMT-10:00) Hawaii"),
    ("AKST", "(GMT-09:00) Alaska"),
    ("PST", "(GMT-08:00) Pacific Time (US & Canada)"),
    ("AZ", "(GMT-07:00) Arizona"),
    ("MST", "(GMT-07:00) Mountain Time (US & Canada)"),
    ("CST", "(GMT-06:00) Central Time (US & Canada)"),
    ("EST", "(GMT-05:00) Eastern Time (US & Canada)"),
    ("AST", "(GMT-04:00) Atlantic Time (Canada)"),
    ("NST", "(GMT-03:30) Newfoundland"),
    ("BRT", "(GMT-03:00) Brasilia"),
    ("ART", "(GMT-03:00) Buenos Aires, Georgetown"),
    ("UTC", "(GMT) Coordinated Universal Time"),
    ("GMT", "(GMT) Greenwich Mean Time : Dublin, Edinburgh, Lisbon, London"),
    ("CET", "(GMT+01:00) Amsterdam, Berlin, Bern, Rome, Stockholm, Vienna"),
    ("WAT", "(GMT+01:00) West Central Africa"),
    ("EET", "(GMT+02:00) Athens, Bucharest, Istanbul"),
    ("SAST", "(GMT+02:00) Harare, Pretoria"),
    ("MSK", "(GMT+03:00) Moscow, St. Petersburg, Volgograd"),
    ("GST", "(GMT+04:00) Abu Dhabi, Muscat"),
    ("PKT", "(GMT+05:00) Islamabad, Karachi, Tashkent"),
    ("IST", "(GMT+05:30) Chennai, Kolkata, Mumbai, New Delhi"),
    ("NPT", "(GMT+05:45) Kathmandu"),
    ("ICT", "(GMT+07:00) Bangkok, Hanoi, Jakarta"),
    ("HKT", "(GMT+08:00) Beijing, Chongqing, Hong Kong, Urumqi"),
    ("SGT", "(GMT+08:00) Kuala Lumpur, Singapore"),
    ("AWST", "(GMT+08:00) Perth"),
    ("JST", "(GMT+09:00) Osaka, Sapporo, Tokyo"),
    ("KST", "(GMT+09:00) Seoul"),
    ("ACST", "(GMT+09:30) Adelaide"),
    ("AEST", "(GMT+10:00) Canberra, Melbourne, Sydney"),
    ("NZST", "(GMT+12:00) Auckland, Wellington"),
];

/// A vendor timezone, resolvable from either its short name or its display
/// value. Requests and responses carry the display value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Timezone {
    provided_name: &'static str,
    display_value: &'static str,
}

impl Timezone {
    /// Look up a timezone by its short name, e.g. `EST`.
    pub fn from_provided_name(name: &str) -> Result<Self, Error> {
        TIMEZONES
            .iter()
            .find(|(provided, _)| *provided == name)
            .map(|&(provided_name, display_value)| Self {
                provided_name,
                display_value,
            })
            .ok_or_else(|| Error::invalid(format!("\"{name}\" is not a valid timezone.")))
    }

    /// Look up a timezone by the display value the vendor returns.
    pub fn from_display_value(value: &str) -> Result<Self, Error> {
        TIMEZONES
            .iter()
            .find(|(_, display)| *display == value)
            .map(|&(provided_name, display_value)| Self {
                provided_name,
                display_value,
            })
            .ok_or_else(|| Error::invalid(format!("\"{value}\" is not a valid timezone.")))
    }

    pub fn provided_name(&self) -> &'static str {
        self.provided_name
    }

    pub fn display_value(&self) -> &'static str {
        self.display_value
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_value)
    }
}

impl TryFrom<String> for Timezone {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_provided_name(&value).or_else(|_| Self::from_display_value(&value))
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Timezone::try_from(value).map_err(serde::de::Error::custom)
    }
}

impl From<Timezone> for String {
    fn from(tz: Timezone) -> Self {
        tz.provided_name.to_string()
    }
}
