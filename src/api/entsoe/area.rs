use crate::prelude::*;

/// Bidding zone and control area EIC codes by country code.
const AREAS: &[(&str, &str)] = &[
    ("AL", "10YAL-KESH-----5"),
    ("AT", "10YAT-APG------L"),
    ("BA", "10YBA-JPCC-----D"),
    ("BE", "10YBE----------2"),
    ("BG", "10YCA-BULGARIA-R"),
    ("CH", "10YCH-SWISSGRIDZ"),
    ("CZ", "10YCZ-CEPS-----N"),
    ("DE_LU", "10Y1001A1001A82H"),
    ("DK_1", "10YDK-1--------W"),
    ("DK_2", "10YDK-2--------M"),
    ("EE", "10Y1001A1001A39I"),
    ("ES", "10YES-REE------0"),
    ("FI", "10YFI-1--------U"),
    ("FR", "10YFR-RTE------C"),
    ("GB", "10YGB----------A"),
    ("GR", "10YGR-HTSO-----Y"),
    ("HR", "10YHR-HEP------M"),
    ("HU", "10YHU-MAVIR----U"),
    ("IE_SEM", "10Y1001A1001A59C"),
    ("IT_CNOR", "10Y1001A1001A70O"),
    ("IT_CSUD", "10Y1001A1001A71M"),
    ("IT_NORD", "10Y1001A1001A73I"),
    ("IT_SARD", "10Y1001A1001A74G"),
    ("IT_SICI", "10Y1001A1001A75E"),
    ("IT_SUD", "10Y1001A1001A788"),
    ("LT", "10YLT-1001A0008Q"),
    ("LV", "10YLV-1001A00074"),
    ("ME", "10YCS-CG-TSO---S"),
    ("MK", "10YMK-MEPSO----8"),
    ("NL", "10YNL----------L"),
    ("NO_1", "10YNO-1--------2"),
    ("NO_2", "10YNO-2--------T"),
    ("NO_3", "10YNO-3--------J"),
    ("NO_4", "10YNO-4--------9"),
    ("NO_5", "10Y1001A1001A48H"),
    ("PL", "10YPL-AREA-----S"),
    ("PT", "10YPT-REN------W"),
    ("RO", "10YRO-TEL------P"),
    ("RS", "10YCS-SERBIATSOV"),
    ("SE_1", "10Y1001A1001A44P"),
    ("SE_2", "10Y1001A1001A45N"),
    ("SE_3", "10Y1001A1001A46L"),
    ("SE_4", "10Y1001A1001A47J"),
    ("SI", "10YSI-ELES-----O"),
    ("SK", "10YSK-SEPS-----K"),
];

/// Resolve a country code, or pass a raw EIC code through.
pub fn lookup(country_code: &str) -> Result<&str> {
    if country_code.starts_with("10Y") {
        return Ok(country_code);
    }
    AREAS
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(country_code))
        .map(|(_, eic)| *eic)
        .with_context(|| format!("unknown country code `{country_code}`"))
}
