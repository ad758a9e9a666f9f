//! Static ISO 3166-1 alpha-2 catalog used for display names, code validation
//! and the list of countries the user has not watched anything from yet.

use reelmap_models::CountryMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Continent {
    Africa,
    Asia,
    Europe,
    #[serde(rename = "North America")]
    NorthAmerica,
    Oceania,
    #[serde(rename = "South America")]
    SouthAmerica,
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Continent::Africa => "Africa",
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::NorthAmerica => "North America",
            Continent::Oceania => "Oceania",
            Continent::SouthAmerica => "South America",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountryInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub continent: Continent,
}

const fn country(code: &'static str, name: &'static str, continent: Continent) -> CountryInfo {
    CountryInfo { code, name, continent }
}

use Continent::*;

pub const COUNTRIES: &[CountryInfo] = &[
    // Europe
    country("AD", "Andorra", Europe),
    country("AL", "Albania", Europe),
    country("AT", "Austria", Europe),
    country("BA", "Bosnia and Herzegovina", Europe),
    country("BE", "Belgium", Europe),
    country("BG", "Bulgaria", Europe),
    country("BY", "Belarus", Europe),
    country("CH", "Switzerland", Europe),
    country("CY", "Cyprus", Europe),
    country("CZ", "Czech Republic", Europe),
    country("DE", "Germany", Europe),
    country("DK", "Denmark", Europe),
    country("EE", "Estonia", Europe),
    country("ES", "Spain", Europe),
    country("FI", "Finland", Europe),
    country("FR", "France", Europe),
    country("GB", "United Kingdom", Europe),
    country("GR", "Greece", Europe),
    country("HR", "Croatia", Europe),
    country("HU", "Hungary", Europe),
    country("IE", "Ireland", Europe),
    country("IS", "Iceland", Europe),
    country("IT", "Italy", Europe),
    country("LI", "Liechtenstein", Europe),
    country("LT", "Lithuania", Europe),
    country("LU", "Luxembourg", Europe),
    country("LV", "Latvia", Europe),
    country("MC", "Monaco", Europe),
    country("MD", "Moldova", Europe),
    country("ME", "Montenegro", Europe),
    country("MK", "North Macedonia", Europe),
    country("MT", "Malta", Europe),
    country("NL", "Netherlands", Europe),
    country("NO", "Norway", Europe),
    country("PL", "Poland", Europe),
    country("PT", "Portugal", Europe),
    country("RO", "Romania", Europe),
    country("RS", "Serbia", Europe),
    country("RU", "Russia", Europe),
    country("SE", "Sweden", Europe),
    country("SI", "Slovenia", Europe),
    country("SK", "Slovakia", Europe),
    country("SM", "San Marino", Europe),
    country("UA", "Ukraine", Europe),
    country("VA", "Vatican City", Europe),
    country("XK", "Kosovo", Europe),
    // Asia
    country("AE", "United Arab Emirates", Asia),
    country("AF", "Afghanistan", Asia),
    country("AM", "Armenia", Asia),
    country("AZ", "Azerbaijan", Asia),
    country("BD", "Bangladesh", Asia),
    country("BH", "Bahrain", Asia),
    country("BN", "Brunei", Asia),
    country("BT", "Bhutan", Asia),
    country("CN", "China", Asia),
    country("GE", "Georgia", Asia),
    country("HK", "Hong Kong", Asia),
    country("ID", "Indonesia", Asia),
    country("IL", "Israel", Asia),
    country("IN", "India", Asia),
    country("IQ", "Iraq", Asia),
    country("IR", "Iran", Asia),
    country("JO", "Jordan", Asia),
    country("JP", "Japan", Asia),
    country("KG", "Kyrgyzstan", Asia),
    country("KH", "Cambodia", Asia),
    country("KP", "North Korea", Asia),
    country("KR", "South Korea", Asia),
    country("KW", "Kuwait", Asia),
    country("KZ", "Kazakhstan", Asia),
    country("LA", "Laos", Asia),
    country("LB", "Lebanon", Asia),
    country("LK", "Sri Lanka", Asia),
    country("MM", "Myanmar", Asia),
    country("MN", "Mongolia", Asia),
    country("MO", "Macao", Asia),
    country("MV", "Maldives", Asia),
    country("MY", "Malaysia", Asia),
    country("NP", "Nepal", Asia),
    country("OM", "Oman", Asia),
    country("PH", "Philippines", Asia),
    country("PK", "Pakistan", Asia),
    country("PS", "Palestine", Asia),
    country("QA", "Qatar", Asia),
    country("SA", "Saudi Arabia", Asia),
    country("SG", "Singapore", Asia),
    country("SY", "Syria", Asia),
    country("TH", "Thailand", Asia),
    country("TJ", "Tajikistan", Asia),
    country("TL", "Timor-Leste", Asia),
    country("TM", "Turkmenistan", Asia),
    country("TR", "Turkey", Asia),
    country("TW", "Taiwan", Asia),
    country("UZ", "Uzbekistan", Asia),
    country("VN", "Vietnam", Asia),
    country("YE", "Yemen", Asia),
    // Africa
    country("AO", "Angola", Africa),
    country("BF", "Burkina Faso", Africa),
    country("BI", "Burundi", Africa),
    country("BJ", "Benin", Africa),
    country("BW", "Botswana", Africa),
    country("CD", "DR Congo", Africa),
    country("CF", "Central African Republic", Africa),
    country("CG", "Congo", Africa),
    country("CI", "Côte d'Ivoire", Africa),
    country("CM", "Cameroon", Africa),
    country("CV", "Cape Verde", Africa),
    country("DJ", "Djibouti", Africa),
    country("DZ", "Algeria", Africa),
    country("EG", "Egypt", Africa),
    country("EH", "Western Sahara", Africa),
    country("ER", "Eritrea", Africa),
    country("ET", "Ethiopia", Africa),
    country("GA", "Gabon", Africa),
    country("GH", "Ghana", Africa),
    country("GM", "Gambia", Africa),
    country("GN", "Guinea", Africa),
    country("GQ", "Equatorial Guinea", Africa),
    country("GW", "Guinea-Bissau", Africa),
    country("KE", "Kenya", Africa),
    country("KM", "Comoros", Africa),
    country("LR", "Liberia", Africa),
    country("LS", "Lesotho", Africa),
    country("LY", "Libya", Africa),
    country("MA", "Morocco", Africa),
    country("MG", "Madagascar", Africa),
    country("ML", "Mali", Africa),
    country("MR", "Mauritania", Africa),
    country("MU", "Mauritius", Africa),
    country("MW", "Malawi", Africa),
    country("MZ", "Mozambique", Africa),
    country("NA", "Namibia", Africa),
    country("NE", "Niger", Africa),
    country("NG", "Nigeria", Africa),
    country("RW", "Rwanda", Africa),
    country("SC", "Seychelles", Africa),
    country("SD", "Sudan", Africa),
    country("SL", "Sierra Leone", Africa),
    country("SN", "Senegal", Africa),
    country("SO", "Somalia", Africa),
    country("SS", "South Sudan", Africa),
    country("ST", "São Tomé and Príncipe", Africa),
    country("SZ", "Eswatini", Africa),
    country("TD", "Chad", Africa),
    country("TG", "Togo", Africa),
    country("TN", "Tunisia", Africa),
    country("TZ", "Tanzania", Africa),
    country("UG", "Uganda", Africa),
    country("ZA", "South Africa", Africa),
    country("ZM", "Zambia", Africa),
    country("ZW", "Zimbabwe", Africa),
    // North America
    country("AG", "Antigua and Barbuda", NorthAmerica),
    country("BB", "Barbados", NorthAmerica),
    country("BS", "Bahamas", NorthAmerica),
    country("BZ", "Belize", NorthAmerica),
    country("CA", "Canada", NorthAmerica),
    country("CR", "Costa Rica", NorthAmerica),
    country("CU", "Cuba", NorthAmerica),
    country("DM", "Dominica", NorthAmerica),
    country("DO", "Dominican Republic", NorthAmerica),
    country("GD", "Grenada", NorthAmerica),
    country("GL", "Greenland", NorthAmerica),
    country("GT", "Guatemala", NorthAmerica),
    country("HN", "Honduras", NorthAmerica),
    country("HT", "Haiti", NorthAmerica),
    country("JM", "Jamaica", NorthAmerica),
    country("KN", "Saint Kitts and Nevis", NorthAmerica),
    country("LC", "Saint Lucia", NorthAmerica),
    country("MX", "Mexico", NorthAmerica),
    country("NI", "Nicaragua", NorthAmerica),
    country("PA", "Panama", NorthAmerica),
    country("PR", "Puerto Rico", NorthAmerica),
    country("SV", "El Salvador", NorthAmerica),
    country("TT", "Trinidad and Tobago", NorthAmerica),
    country("US", "United States", NorthAmerica),
    country("VC", "Saint Vincent and the Grenadines", NorthAmerica),
    // South America
    country("AR", "Argentina", SouthAmerica),
    country("BO", "Bolivia", SouthAmerica),
    country("BR", "Brazil", SouthAmerica),
    country("CL", "Chile", SouthAmerica),
    country("CO", "Colombia", SouthAmerica),
    country("EC", "Ecuador", SouthAmerica),
    country("FK", "Falkland Islands", SouthAmerica),
    country("GF", "French Guiana", SouthAmerica),
    country("GY", "Guyana", SouthAmerica),
    country("PE", "Peru", SouthAmerica),
    country("PY", "Paraguay", SouthAmerica),
    country("SR", "Suriname", SouthAmerica),
    country("UY", "Uruguay", SouthAmerica),
    country("VE", "Venezuela", SouthAmerica),
    // Oceania
    country("AS", "American Samoa", Oceania),
    country("AU", "Australia", Oceania),
    country("CK", "Cook Islands", Oceania),
    country("FJ", "Fiji", Oceania),
    country("FM", "Micronesia", Oceania),
    country("GU", "Guam", Oceania),
    country("KI", "Kiribati", Oceania),
    country("MH", "Marshall Islands", Oceania),
    country("MP", "Northern Mariana Islands", Oceania),
    country("NC", "New Caledonia", Oceania),
    country("NF", "Norfolk Island", Oceania),
    country("NR", "Nauru", Oceania),
    country("NU", "Niue", Oceania),
    country("NZ", "New Zealand", Oceania),
    country("PF", "French Polynesia", Oceania),
    country("PG", "Papua New Guinea", Oceania),
    country("PN", "Pitcairn Islands", Oceania),
    country("PW", "Palau", Oceania),
    country("SB", "Solomon Islands", Oceania),
    country("TK", "Tokelau", Oceania),
    country("TO", "Tonga", Oceania),
    country("TV", "Tuvalu", Oceania),
    country("VU", "Vanuatu", Oceania),
    country("WF", "Wallis and Futuna", Oceania),
    country("WS", "Samoa", Oceania),
];

pub fn lookup(code: &str) -> Option<&'static CountryInfo> {
    COUNTRIES.iter().find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

/// English name, or the code itself for codes outside the catalog.
pub fn country_name(code: &str) -> &str {
    lookup(code).map(|c| c.name).unwrap_or(code)
}

pub fn is_known_country(code: &str) -> bool {
    lookup(code).is_some()
}

/// Catalog countries with no movies, sorted by name, optionally filtered by a
/// case-insensitive substring of the name.
pub fn unexplored(countries: &CountryMap, search: Option<&str>) -> Vec<&'static CountryInfo> {
    let needle = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
    let mut result: Vec<&'static CountryInfo> = COUNTRIES
        .iter()
        .filter(|c| !countries.contains_key(c.code))
        .filter(|c| match &needle {
            Some(needle) => c.name.to_lowercase().contains(needle),
            None => true,
        })
        .collect();
    result.sort_by(|a, b| a.name.cmp(b.name));
    result
}

pub fn group_by_continent(countries: &[&'static CountryInfo]) -> BTreeMap<Continent, Vec<&'static CountryInfo>> {
    let mut grouped: BTreeMap<Continent, Vec<&'static CountryInfo>> = BTreeMap::new();
    for info in countries {
        grouped.entry(info.continent).or_default().push(info);
    }
    grouped
}
