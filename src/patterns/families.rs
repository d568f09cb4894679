//! The mandatory pattern families (§4.3): money, percentage, five
//! measurement subtypes, date, time, phone, url, regulation, plus the
//! standalone range-indicator family.
//!
//! Every numeric family requires a non-word character (or start-of-text)
//! immediately before its leading digit, so a phone fragment like
//! `"321-6742"` can never surface as a MEASUREMENT or MONEY candidate —
//! the fragment has no unit word anywhere near it, so none of these
//! patterns ever reach it. The boundary character itself is never part of
//! capture group 1 (or of the lower/indicator/upper groups in the tight
//! range variants), so it never leaks into `surface_text`.

use crate::error::ConfigError;
use crate::types::EntityType;

use super::{named_set, simple, tight_range, PatternSet};

/// Boundary assertion reused at the front of every numeric pattern: either
/// start-of-text, or a character that isn't a word character. `regex`
/// has no lookbehind, so this is consumed as part of the match and the
/// entity's reported span starts at the *next* group instead.
const BOUNDARY: &str = r"(?:^|[^\w])";

fn measurement_family(
    subtype: &'static str,
    unit_alt: &str,
) -> Result<Vec<super::CompiledPattern>, ConfigError> {
    let standalone_name: &'static str = match subtype {
        "length" => "measurement-length",
        "weight" => "measurement-weight",
        "time" => "measurement-time",
        "temperature" => "measurement-temperature",
        "sound" => "measurement-sound",
        _ => unreachable!(),
    };
    let range_name: &'static str = match subtype {
        "length" => "measurement-length-tight-range",
        "weight" => "measurement-weight-tight-range",
        "time" => "measurement-time-tight-range",
        "temperature" => "measurement-temperature-tight-range",
        "sound" => "measurement-sound-tight-range",
        _ => unreachable!(),
    };

    let standalone_re = format!(
        r"(?i){boundary}(-?\d+(?:\.\d+)?\s*(?:{unit}))\b",
        boundary = BOUNDARY,
        unit = unit_alt
    );
    let range_re = format!(
        r"(?i){boundary}(-?\d+(?:\.\d+)?)([-\x{{2013}}])(-?\d+(?:\.\d+)?\s*(?:{unit}))\b",
        boundary = BOUNDARY,
        unit = unit_alt
    );

    Ok(vec![
        simple(standalone_name, &standalone_re, 1, EntityType::Measurement, Some(subtype))?,
        tight_range(range_name, &range_re, 1, 2, 3, EntityType::Measurement, Some(subtype))?,
    ])
}

pub(super) fn build_complete_set(name: &str) -> Result<PatternSet, ConfigError> {
    let mut patterns = Vec::new();

    // --- Money -----------------------------------------------------------
    let money_unit_suffix = r"(?:million|billion|thousand|[kKmMbB]\b)?";
    patterns.push(simple(
        "money",
        &format!(
            r"{boundary}(\$\s?\d[\d,]*(?:\.\d+)?\s*{suffix})",
            boundary = BOUNDARY,
            suffix = money_unit_suffix
        ),
        1,
        EntityType::Money,
        None,
    )?);
    patterns.push(tight_range(
        "money-tight-range",
        &format!(
            r"{boundary}\$?\s?(\d[\d,]*(?:\.\d+)?)([-\x{{2013}}])(\$\s?\d[\d,]*(?:\.\d+)?\s*{suffix})",
            boundary = BOUNDARY,
            suffix = money_unit_suffix
        ),
        1,
        2,
        3,
        EntityType::Money,
        None,
    )?);

    // --- Percentage --------------------------------------------------------
    patterns.push(simple(
        "percentage",
        &format!(r"{boundary}(-?\d+(?:\.\d+)?\s*(?:%|percent\b))", boundary = BOUNDARY),
        1,
        EntityType::Percent,
        None,
    )?);
    patterns.push(tight_range(
        "percentage-tight-range",
        &format!(
            r"{boundary}(-?\d+(?:\.\d+)?)([-\x{{2013}}])(-?\d+(?:\.\d+)?\s*(?:%|percent\b))",
            boundary = BOUNDARY
        ),
        1,
        2,
        3,
        EntityType::Percent,
        None,
    )?);

    // --- Measurements ------------------------------------------------------
    patterns.extend(measurement_family(
        "length",
        r"inches?|in\.|feet|foot|ft\b|centimeters?|cm\b|millimeters?|mm\b|kilometers?|km\b|meters?|m\b|miles?|mi\b|yards?|yd\b",
    )?);
    patterns.extend(measurement_family(
        "weight",
        r"pounds?|lbs?\b|ounces?|oz\b|kilograms?|kg\b|grams?|g\b|tons?|tonnes?",
    )?);
    patterns.extend(measurement_family(
        "time",
        r"seconds?|secs?\b|minutes?|mins?\b|hours?|hrs?\b|days?|weeks?|months?|years?|yrs?\b",
    )?);
    patterns.extend(measurement_family(
        "temperature",
        r"\xb0\s?[FfCc]\b|degrees?\s+(?:[Ff]ahrenheit|[Cc]elsius)",
    )?);
    patterns.extend(measurement_family("sound", r"decibels?|dB\b")?);

    // --- Date ----------------------------------------------------------
    let month_name = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";
    patterns.push(simple(
        "date-iso",
        &format!(r"{boundary}(\d{{4}}-\d{{2}}-\d{{2}})\b", boundary = BOUNDARY),
        1,
        EntityType::Date,
        Some("iso"),
    )?);
    patterns.push(simple(
        "date-numeric",
        &format!(r"{boundary}(\d{{1,2}}/\d{{1,2}}/\d{{2,4}})\b", boundary = BOUNDARY),
        1,
        EntityType::Date,
        Some("numeric"),
    )?);
    patterns.push(simple(
        "date-month-name",
        &format!(
            r"{boundary}({month}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}})",
            boundary = BOUNDARY,
            month = month_name
        ),
        1,
        EntityType::Date,
        Some("month_name"),
    )?);
    patterns.push(tight_range(
        "date-month-name-tight-range",
        &format!(
            r"{boundary}({month}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?)\s*(-|\x{{2013}}|to|through)\s*(\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}})",
            boundary = BOUNDARY,
            month = month_name
        ),
        1,
        2,
        3,
        EntityType::Date,
        Some("month_name"),
    )?);

    // --- Time -------------------------------------------------------------
    patterns.push(simple(
        "time-12h",
        &format!(
            r"{boundary}(\d{{1,2}}:\d{{2}}(?::\d{{2}})?\s*(?:[AaPp]\.?[Mm]\.?))",
            boundary = BOUNDARY
        ),
        1,
        EntityType::Time,
        Some("12h"),
    )?);
    patterns.push(simple(
        "time-24h",
        &format!(
            r"{boundary}((?:[01]\d|2[0-3]):[0-5]\d(?::[0-5]\d)?)\b",
            boundary = BOUNDARY
        ),
        1,
        EntityType::Time,
        Some("24h"),
    )?);

    // --- Phone --------------------------------------------------------------
    patterns.push(simple(
        "phone-us",
        &format!(
            r"{boundary}(\(?\d{{3}}\)?[-.\s]\d{{3}}[-.\s]\d{{4}})\b",
            boundary = BOUNDARY
        ),
        1,
        EntityType::Phone,
        None,
    )?);

    // --- URL ----------------------------------------------------------------
    patterns.push(simple(
        "url",
        r"(https?://[^\s<>()\[\]]+|www\.[^\s<>()\[\]]+)",
        1,
        EntityType::Url,
        None,
    )?);

    // --- Regulation ----------------------------------------------------
    patterns.push(simple(
        "regulation-cfr",
        &format!(
            r"(?i){boundary}(\d+\s*C\.?F\.?R\.?\s*(?:§|Part|part)?\s*\d+(?:\.\d+)?)",
            boundary = BOUNDARY
        ),
        1,
        EntityType::Regulation,
        Some("cfr"),
    )?);
    patterns.push(simple(
        "regulation-usc",
        &format!(
            r"(?i){boundary}(\d+\s*U\.?S\.?C\.?\s*(?:§)?\s*\d+(?:\.\d+)?)",
            boundary = BOUNDARY
        ),
        1,
        EntityType::Regulation,
        Some("usc"),
    )?);

    // --- Range indicator (standalone tokens) --------------------------------
    // Only the plain connective tokens; the "tight" numeric idioms above
    // already emit their own RANGE_INDICATOR candidate inline, so this
    // family exists purely for the fully-explicit case where both operands
    // were independently matched as standalone entities (§4.7).
    patterns.push(simple(
        "range-indicator-word",
        r"(?:\s)(to|through|thru)(?=\s)",
        1,
        EntityType::RangeIndicator,
        None,
    )?);
    patterns.push(simple(
        "range-indicator-dash",
        r"\s([-\x{2013}\x{2014}])\s",
        1,
        EntityType::RangeIndicator,
        None,
    )?);

    Ok(named_set(name, patterns))
}
