//! ISO 3166-1 country registry
//!
//! Static table of every officially assigned ISO 3166-1 entry with its
//! alpha-2, alpha-3 and numeric codes plus short, official and common names.
//! Lookups are case-insensitive exact matches against any of those keys.

use std::collections::HashMap;
use std::sync::OnceLock;

/// One ISO 3166-1 entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryEntry {
    pub alpha_2: &'static str,
    pub alpha_3: &'static str,
    pub numeric: u16,
    /// ISO short name (e.g. "Bolivia, Plurinational State of")
    pub name: &'static str,
    pub official_name: Option<&'static str>,
    /// Colloquial name where the short name is awkward (e.g. "Bolivia")
    pub common_name: Option<&'static str>,
}

impl CountryEntry {
    /// Name for display: common name when one exists
    pub fn display_name(&self) -> &'static str {
        self.common_name.unwrap_or(self.name)
    }

    /// Zero-padded numeric code ("004")
    pub fn numeric_code(&self) -> String {
        format!("{:03}", self.numeric)
    }

    fn lookup_keys(&self) -> impl Iterator<Item = String> + '_ {
        [
            Some(self.alpha_2.to_string()),
            Some(self.alpha_3.to_string()),
            Some(self.numeric_code()),
            Some(self.name.to_string()),
            self.official_name.map(str::to_string),
            self.common_name.map(str::to_string),
        ]
        .into_iter()
        .flatten()
    }
}

const fn entry(
    alpha_2: &'static str,
    alpha_3: &'static str,
    numeric: u16,
    name: &'static str,
    official_name: Option<&'static str>,
    common_name: Option<&'static str>,
) -> CountryEntry {
    CountryEntry {
        alpha_2,
        alpha_3,
        numeric,
        name,
        official_name,
        common_name,
    }
}

/// All ISO 3166-1 entries, ordered by alpha-3 code
pub static COUNTRIES: &[CountryEntry] = &[
    entry("AW", "ABW", 533, "Aruba", None, None),
    entry("AF", "AFG", 4, "Afghanistan", Some("Islamic Republic of Afghanistan"), None),
    entry("AO", "AGO", 24, "Angola", Some("Republic of Angola"), None),
    entry("AI", "AIA", 660, "Anguilla", None, None),
    entry("AX", "ALA", 248, "Åland Islands", None, None),
    entry("AL", "ALB", 8, "Albania", Some("Republic of Albania"), None),
    entry("AD", "AND", 20, "Andorra", Some("Principality of Andorra"), None),
    entry("AE", "ARE", 784, "United Arab Emirates", None, None),
    entry("AR", "ARG", 32, "Argentina", Some("Argentine Republic"), None),
    entry("AM", "ARM", 51, "Armenia", Some("Republic of Armenia"), None),
    entry("AS", "ASM", 16, "American Samoa", None, None),
    entry("AQ", "ATA", 10, "Antarctica", None, None),
    entry("TF", "ATF", 260, "French Southern Territories", None, None),
    entry("AG", "ATG", 28, "Antigua and Barbuda", None, None),
    entry("AU", "AUS", 36, "Australia", None, None),
    entry("AT", "AUT", 40, "Austria", Some("Republic of Austria"), None),
    entry("AZ", "AZE", 31, "Azerbaijan", Some("Republic of Azerbaijan"), None),
    entry("BI", "BDI", 108, "Burundi", Some("Republic of Burundi"), None),
    entry("BE", "BEL", 56, "Belgium", Some("Kingdom of Belgium"), None),
    entry("BJ", "BEN", 204, "Benin", Some("Republic of Benin"), None),
    entry("BQ", "BES", 535, "Bonaire, Sint Eustatius and Saba", Some("Bonaire, Sint Eustatius and Saba"), None),
    entry("BF", "BFA", 854, "Burkina Faso", None, None),
    entry("BD", "BGD", 50, "Bangladesh", Some("People's Republic of Bangladesh"), None),
    entry("BG", "BGR", 100, "Bulgaria", Some("Republic of Bulgaria"), None),
    entry("BH", "BHR", 48, "Bahrain", Some("Kingdom of Bahrain"), None),
    entry("BS", "BHS", 44, "Bahamas", Some("Commonwealth of the Bahamas"), None),
    entry("BA", "BIH", 70, "Bosnia and Herzegovina", Some("Republic of Bosnia and Herzegovina"), None),
    entry("BL", "BLM", 652, "Saint Barthélemy", None, None),
    entry("BY", "BLR", 112, "Belarus", Some("Republic of Belarus"), None),
    entry("BZ", "BLZ", 84, "Belize", None, None),
    entry("BM", "BMU", 60, "Bermuda", None, None),
    entry("BO", "BOL", 68, "Bolivia, Plurinational State of", Some("Plurinational State of Bolivia"), Some("Bolivia")),
    entry("BR", "BRA", 76, "Brazil", Some("Federative Republic of Brazil"), None),
    entry("BB", "BRB", 52, "Barbados", None, None),
    entry("BN", "BRN", 96, "Brunei Darussalam", None, None),
    entry("BT", "BTN", 64, "Bhutan", Some("Kingdom of Bhutan"), None),
    entry("BV", "BVT", 74, "Bouvet Island", None, None),
    entry("BW", "BWA", 72, "Botswana", Some("Republic of Botswana"), None),
    entry("CF", "CAF", 140, "Central African Republic", None, None),
    entry("CA", "CAN", 124, "Canada", None, None),
    entry("CC", "CCK", 166, "Cocos (Keeling) Islands", None, None),
    entry("CH", "CHE", 756, "Switzerland", Some("Swiss Confederation"), None),
    entry("CL", "CHL", 152, "Chile", Some("Republic of Chile"), None),
    entry("CN", "CHN", 156, "China", Some("People's Republic of China"), None),
    entry("CI", "CIV", 384, "Côte d'Ivoire", Some("Republic of Côte d'Ivoire"), None),
    entry("CM", "CMR", 120, "Cameroon", Some("Republic of Cameroon"), None),
    entry("CD", "COD", 180, "Congo, The Democratic Republic of the", None, None),
    entry("CG", "COG", 178, "Congo", Some("Republic of the Congo"), None),
    entry("CK", "COK", 184, "Cook Islands", None, None),
    entry("CO", "COL", 170, "Colombia", Some("Republic of Colombia"), None),
    entry("KM", "COM", 174, "Comoros", Some("Union of the Comoros"), None),
    entry("CV", "CPV", 132, "Cabo Verde", Some("Republic of Cabo Verde"), None),
    entry("CR", "CRI", 188, "Costa Rica", Some("Republic of Costa Rica"), None),
    entry("CU", "CUB", 192, "Cuba", Some("Republic of Cuba"), None),
    entry("CW", "CUW", 531, "Curaçao", Some("Curaçao"), None),
    entry("CX", "CXR", 162, "Christmas Island", None, None),
    entry("KY", "CYM", 136, "Cayman Islands", None, None),
    entry("CY", "CYP", 196, "Cyprus", Some("Republic of Cyprus"), None),
    entry("CZ", "CZE", 203, "Czechia", Some("Czech Republic"), None),
    entry("DE", "DEU", 276, "Germany", Some("Federal Republic of Germany"), None),
    entry("DJ", "DJI", 262, "Djibouti", Some("Republic of Djibouti"), None),
    entry("DM", "DMA", 212, "Dominica", Some("Commonwealth of Dominica"), None),
    entry("DK", "DNK", 208, "Denmark", Some("Kingdom of Denmark"), None),
    entry("DO", "DOM", 214, "Dominican Republic", None, None),
    entry("DZ", "DZA", 12, "Algeria", Some("People's Democratic Republic of Algeria"), None),
    entry("EC", "ECU", 218, "Ecuador", Some("Republic of Ecuador"), None),
    entry("EG", "EGY", 818, "Egypt", Some("Arab Republic of Egypt"), None),
    entry("ER", "ERI", 232, "Eritrea", Some("the State of Eritrea"), None),
    entry("EH", "ESH", 732, "Western Sahara", None, None),
    entry("ES", "ESP", 724, "Spain", Some("Kingdom of Spain"), None),
    entry("EE", "EST", 233, "Estonia", Some("Republic of Estonia"), None),
    entry("ET", "ETH", 231, "Ethiopia", Some("Federal Democratic Republic of Ethiopia"), None),
    entry("FI", "FIN", 246, "Finland", Some("Republic of Finland"), None),
    entry("FJ", "FJI", 242, "Fiji", Some("Republic of Fiji"), None),
    entry("FK", "FLK", 238, "Falkland Islands (Malvinas)", None, None),
    entry("FR", "FRA", 250, "France", Some("French Republic"), None),
    entry("FO", "FRO", 234, "Faroe Islands", None, None),
    entry("FM", "FSM", 583, "Micronesia, Federated States of", Some("Federated States of Micronesia"), None),
    entry("GA", "GAB", 266, "Gabon", Some("Gabonese Republic"), None),
    entry("GB", "GBR", 826, "United Kingdom", Some("United Kingdom of Great Britain and Northern Ireland"), None),
    entry("GE", "GEO", 268, "Georgia", None, None),
    entry("GG", "GGY", 831, "Guernsey", None, None),
    entry("GH", "GHA", 288, "Ghana", Some("Republic of Ghana"), None),
    entry("GI", "GIB", 292, "Gibraltar", None, None),
    entry("GN", "GIN", 324, "Guinea", Some("Republic of Guinea"), None),
    entry("GP", "GLP", 312, "Guadeloupe", None, None),
    entry("GM", "GMB", 270, "Gambia", Some("Republic of the Gambia"), None),
    entry("GW", "GNB", 624, "Guinea-Bissau", Some("Republic of Guinea-Bissau"), None),
    entry("GQ", "GNQ", 226, "Equatorial Guinea", Some("Republic of Equatorial Guinea"), None),
    entry("GR", "GRC", 300, "Greece", Some("Hellenic Republic"), None),
    entry("GD", "GRD", 308, "Grenada", None, None),
    entry("GL", "GRL", 304, "Greenland", None, None),
    entry("GT", "GTM", 320, "Guatemala", Some("Republic of Guatemala"), None),
    entry("GF", "GUF", 254, "French Guiana", None, None),
    entry("GU", "GUM", 316, "Guam", None, None),
    entry("GY", "GUY", 328, "Guyana", Some("Republic of Guyana"), None),
    entry("HK", "HKG", 344, "Hong Kong", Some("Hong Kong Special Administrative Region of China"), None),
    entry("HM", "HMD", 334, "Heard Island and McDonald Islands", None, None),
    entry("HN", "HND", 340, "Honduras", Some("Republic of Honduras"), None),
    entry("HR", "HRV", 191, "Croatia", Some("Republic of Croatia"), None),
    entry("HT", "HTI", 332, "Haiti", Some("Republic of Haiti"), None),
    entry("HU", "HUN", 348, "Hungary", Some("Hungary"), None),
    entry("ID", "IDN", 360, "Indonesia", Some("Republic of Indonesia"), None),
    entry("IM", "IMN", 833, "Isle of Man", None, None),
    entry("IN", "IND", 356, "India", Some("Republic of India"), None),
    entry("IO", "IOT", 86, "British Indian Ocean Territory", None, None),
    entry("IE", "IRL", 372, "Ireland", None, None),
    entry("IR", "IRN", 364, "Iran, Islamic Republic of", Some("Islamic Republic of Iran"), Some("Iran")),
    entry("IQ", "IRQ", 368, "Iraq", Some("Republic of Iraq"), None),
    entry("IS", "ISL", 352, "Iceland", Some("Republic of Iceland"), None),
    entry("IL", "ISR", 376, "Israel", Some("State of Israel"), None),
    entry("IT", "ITA", 380, "Italy", Some("Italian Republic"), None),
    entry("JM", "JAM", 388, "Jamaica", None, None),
    entry("JE", "JEY", 832, "Jersey", None, None),
    entry("JO", "JOR", 400, "Jordan", Some("Hashemite Kingdom of Jordan"), None),
    entry("JP", "JPN", 392, "Japan", None, None),
    entry("KZ", "KAZ", 398, "Kazakhstan", Some("Republic of Kazakhstan"), None),
    entry("KE", "KEN", 404, "Kenya", Some("Republic of Kenya"), None),
    entry("KG", "KGZ", 417, "Kyrgyzstan", Some("Kyrgyz Republic"), None),
    entry("KH", "KHM", 116, "Cambodia", Some("Kingdom of Cambodia"), None),
    entry("KI", "KIR", 296, "Kiribati", Some("Republic of Kiribati"), None),
    entry("KN", "KNA", 659, "Saint Kitts and Nevis", None, None),
    entry("KR", "KOR", 410, "Korea, Republic of", None, Some("South Korea")),
    entry("KW", "KWT", 414, "Kuwait", Some("State of Kuwait"), None),
    entry("LA", "LAO", 418, "Lao People's Democratic Republic", None, Some("Laos")),
    entry("LB", "LBN", 422, "Lebanon", Some("Lebanese Republic"), None),
    entry("LR", "LBR", 430, "Liberia", Some("Republic of Liberia"), None),
    entry("LY", "LBY", 434, "Libya", Some("Libya"), None),
    entry("LC", "LCA", 662, "Saint Lucia", None, None),
    entry("LI", "LIE", 438, "Liechtenstein", Some("Principality of Liechtenstein"), None),
    entry("LK", "LKA", 144, "Sri Lanka", Some("Democratic Socialist Republic of Sri Lanka"), None),
    entry("LS", "LSO", 426, "Lesotho", Some("Kingdom of Lesotho"), None),
    entry("LT", "LTU", 440, "Lithuania", Some("Republic of Lithuania"), None),
    entry("LU", "LUX", 442, "Luxembourg", Some("Grand Duchy of Luxembourg"), None),
    entry("LV", "LVA", 428, "Latvia", Some("Republic of Latvia"), None),
    entry("MO", "MAC", 446, "Macao", Some("Macao Special Administrative Region of China"), None),
    entry("MF", "MAF", 663, "Saint Martin (French part)", None, None),
    entry("MA", "MAR", 504, "Morocco", Some("Kingdom of Morocco"), None),
    entry("MC", "MCO", 492, "Monaco", Some("Principality of Monaco"), None),
    entry("MD", "MDA", 498, "Moldova, Republic of", Some("Republic of Moldova"), Some("Moldova")),
    entry("MG", "MDG", 450, "Madagascar", Some("Republic of Madagascar"), None),
    entry("MV", "MDV", 462, "Maldives", Some("Republic of Maldives"), None),
    entry("MX", "MEX", 484, "Mexico", Some("United Mexican States"), None),
    entry("MH", "MHL", 584, "Marshall Islands", Some("Republic of the Marshall Islands"), None),
    entry("MK", "MKD", 807, "North Macedonia", Some("Republic of North Macedonia"), None),
    entry("ML", "MLI", 466, "Mali", Some("Republic of Mali"), None),
    entry("MT", "MLT", 470, "Malta", Some("Republic of Malta"), None),
    entry("MM", "MMR", 104, "Myanmar", Some("Republic of Myanmar"), None),
    entry("ME", "MNE", 499, "Montenegro", Some("Montenegro"), None),
    entry("MN", "MNG", 496, "Mongolia", None, None),
    entry("MP", "MNP", 580, "Northern Mariana Islands", Some("Commonwealth of the Northern Mariana Islands"), None),
    entry("MZ", "MOZ", 508, "Mozambique", Some("Republic of Mozambique"), None),
    entry("MR", "MRT", 478, "Mauritania", Some("Islamic Republic of Mauritania"), None),
    entry("MS", "MSR", 500, "Montserrat", None, None),
    entry("MQ", "MTQ", 474, "Martinique", None, None),
    entry("MU", "MUS", 480, "Mauritius", Some("Republic of Mauritius"), None),
    entry("MW", "MWI", 454, "Malawi", Some("Republic of Malawi"), None),
    entry("MY", "MYS", 458, "Malaysia", None, None),
    entry("YT", "MYT", 175, "Mayotte", None, None),
    entry("NA", "NAM", 516, "Namibia", Some("Republic of Namibia"), None),
    entry("NC", "NCL", 540, "New Caledonia", None, None),
    entry("NE", "NER", 562, "Niger", Some("Republic of the Niger"), None),
    entry("NF", "NFK", 574, "Norfolk Island", None, None),
    entry("NG", "NGA", 566, "Nigeria", Some("Federal Republic of Nigeria"), None),
    entry("NI", "NIC", 558, "Nicaragua", Some("Republic of Nicaragua"), None),
    entry("NU", "NIU", 570, "Niue", Some("Niue"), None),
    entry("NL", "NLD", 528, "Netherlands", Some("Kingdom of the Netherlands"), None),
    entry("NO", "NOR", 578, "Norway", Some("Kingdom of Norway"), None),
    entry("NP", "NPL", 524, "Nepal", Some("Federal Democratic Republic of Nepal"), None),
    entry("NR", "NRU", 520, "Nauru", Some("Republic of Nauru"), None),
    entry("NZ", "NZL", 554, "New Zealand", None, None),
    entry("OM", "OMN", 512, "Oman", Some("Sultanate of Oman"), None),
    entry("PK", "PAK", 586, "Pakistan", Some("Islamic Republic of Pakistan"), None),
    entry("PA", "PAN", 591, "Panama", Some("Republic of Panama"), None),
    entry("PN", "PCN", 612, "Pitcairn", None, None),
    entry("PE", "PER", 604, "Peru", Some("Republic of Peru"), None),
    entry("PH", "PHL", 608, "Philippines", Some("Republic of the Philippines"), None),
    entry("PW", "PLW", 585, "Palau", Some("Republic of Palau"), None),
    entry("PG", "PNG", 598, "Papua New Guinea", Some("Independent State of Papua New Guinea"), None),
    entry("PL", "POL", 616, "Poland", Some("Republic of Poland"), None),
    entry("PR", "PRI", 630, "Puerto Rico", None, None),
    entry("KP", "PRK", 408, "Korea, Democratic People's Republic of", Some("Democratic People's Republic of Korea"), Some("North Korea")),
    entry("PT", "PRT", 620, "Portugal", Some("Portuguese Republic"), None),
    entry("PY", "PRY", 600, "Paraguay", Some("Republic of Paraguay"), None),
    entry("PS", "PSE", 275, "Palestine, State of", Some("the State of Palestine"), None),
    entry("PF", "PYF", 258, "French Polynesia", None, None),
    entry("QA", "QAT", 634, "Qatar", Some("State of Qatar"), None),
    entry("RE", "REU", 638, "Réunion", None, None),
    entry("RO", "ROU", 642, "Romania", None, None),
    entry("RU", "RUS", 643, "Russian Federation", None, None),
    entry("RW", "RWA", 646, "Rwanda", Some("Rwandese Republic"), None),
    entry("SA", "SAU", 682, "Saudi Arabia", Some("Kingdom of Saudi Arabia"), None),
    entry("SD", "SDN", 729, "Sudan", Some("Republic of the Sudan"), None),
    entry("SN", "SEN", 686, "Senegal", Some("Republic of Senegal"), None),
    entry("SG", "SGP", 702, "Singapore", Some("Republic of Singapore"), None),
    entry("GS", "SGS", 239, "South Georgia and the South Sandwich Islands", None, None),
    entry("SH", "SHN", 654, "Saint Helena, Ascension and Tristan da Cunha", None, None),
    entry("SJ", "SJM", 744, "Svalbard and Jan Mayen", None, None),
    entry("SB", "SLB", 90, "Solomon Islands", None, None),
    entry("SL", "SLE", 694, "Sierra Leone", Some("Republic of Sierra Leone"), None),
    entry("SV", "SLV", 222, "El Salvador", Some("Republic of El Salvador"), None),
    entry("SM", "SMR", 674, "San Marino", Some("Republic of San Marino"), None),
    entry("SO", "SOM", 706, "Somalia", Some("Federal Republic of Somalia"), None),
    entry("PM", "SPM", 666, "Saint Pierre and Miquelon", None, None),
    entry("RS", "SRB", 688, "Serbia", Some("Republic of Serbia"), None),
    entry("SS", "SSD", 728, "South Sudan", Some("Republic of South Sudan"), None),
    entry("ST", "STP", 678, "Sao Tome and Principe", Some("Democratic Republic of Sao Tome and Principe"), None),
    entry("SR", "SUR", 740, "Suriname", Some("Republic of Suriname"), None),
    entry("SK", "SVK", 703, "Slovakia", Some("Slovak Republic"), None),
    entry("SI", "SVN", 705, "Slovenia", Some("Republic of Slovenia"), None),
    entry("SE", "SWE", 752, "Sweden", Some("Kingdom of Sweden"), None),
    entry("SZ", "SWZ", 748, "Eswatini", Some("Kingdom of Eswatini"), None),
    entry("SX", "SXM", 534, "Sint Maarten (Dutch part)", Some("Sint Maarten (Dutch part)"), None),
    entry("SC", "SYC", 690, "Seychelles", Some("Republic of Seychelles"), None),
    entry("SY", "SYR", 760, "Syrian Arab Republic", None, Some("Syria")),
    entry("TC", "TCA", 796, "Turks and Caicos Islands", None, None),
    entry("TD", "TCD", 148, "Chad", Some("Republic of Chad"), None),
    entry("TG", "TGO", 768, "Togo", Some("Togolese Republic"), None),
    entry("TH", "THA", 764, "Thailand", Some("Kingdom of Thailand"), None),
    entry("TJ", "TJK", 762, "Tajikistan", Some("Republic of Tajikistan"), None),
    entry("TK", "TKL", 772, "Tokelau", None, None),
    entry("TM", "TKM", 795, "Turkmenistan", None, None),
    entry("TL", "TLS", 626, "Timor-Leste", Some("Democratic Republic of Timor-Leste"), None),
    entry("TO", "TON", 776, "Tonga", Some("Kingdom of Tonga"), None),
    entry("TT", "TTO", 780, "Trinidad and Tobago", Some("Republic of Trinidad and Tobago"), None),
    entry("TN", "TUN", 788, "Tunisia", Some("Republic of Tunisia"), None),
    entry("TR", "TUR", 792, "Türkiye", Some("Republic of Türkiye"), None),
    entry("TV", "TUV", 798, "Tuvalu", None, None),
    entry("TW", "TWN", 158, "Taiwan, Province of China", None, Some("Taiwan")),
    entry("TZ", "TZA", 834, "Tanzania, United Republic of", Some("United Republic of Tanzania"), Some("Tanzania")),
    entry("UG", "UGA", 800, "Uganda", Some("Republic of Uganda"), None),
    entry("UA", "UKR", 804, "Ukraine", None, None),
    entry("UM", "UMI", 581, "United States Minor Outlying Islands", None, None),
    entry("UY", "URY", 858, "Uruguay", Some("Eastern Republic of Uruguay"), None),
    entry("US", "USA", 840, "United States", Some("United States of America"), None),
    entry("UZ", "UZB", 860, "Uzbekistan", Some("Republic of Uzbekistan"), None),
    entry("VA", "VAT", 336, "Holy See (Vatican City State)", None, None),
    entry("VC", "VCT", 670, "Saint Vincent and the Grenadines", None, None),
    entry("VE", "VEN", 862, "Venezuela, Bolivarian Republic of", Some("Bolivarian Republic of Venezuela"), Some("Venezuela")),
    entry("VG", "VGB", 92, "Virgin Islands, British", Some("British Virgin Islands"), None),
    entry("VI", "VIR", 850, "Virgin Islands, U.S.", Some("Virgin Islands of the United States"), None),
    entry("VN", "VNM", 704, "Viet Nam", Some("Socialist Republic of Viet Nam"), Some("Vietnam")),
    entry("VU", "VUT", 548, "Vanuatu", Some("Republic of Vanuatu"), None),
    entry("WF", "WLF", 876, "Wallis and Futuna", None, None),
    entry("WS", "WSM", 882, "Samoa", Some("Independent State of Samoa"), None),
    entry("YE", "YEM", 887, "Yemen", Some("Republic of Yemen"), None),
    entry("ZA", "ZAF", 710, "South Africa", Some("Republic of South Africa"), None),
    entry("ZM", "ZMB", 894, "Zambia", Some("Republic of Zambia"), None),
    entry("ZW", "ZWE", 716, "Zimbabwe", Some("Republic of Zimbabwe"), None),
];

/// Indexed view over [`COUNTRIES`]
#[derive(Debug)]
pub struct Registry {
    entries: &'static [CountryEntry],
    /// Lowercased key -> index of the first entry carrying it
    index: HashMap<String, usize>,
}

impl Registry {
    /// Build an index over the given entries
    pub fn new(entries: &'static [CountryEntry]) -> Self {
        let mut index = HashMap::with_capacity(entries.len() * 4);
        for (i, country) in entries.iter().enumerate() {
            for key in country.lookup_keys() {
                // First registry entry wins on shared keys
                index.entry(normalize_key(&key)).or_insert(i);
            }
        }
        Self { entries, index }
    }

    /// Shared registry over the built-in ISO 3166-1 table
    pub fn standard() -> &'static Registry {
        static STANDARD: OnceLock<Registry> = OnceLock::new();
        STANDARD.get_or_init(|| Registry::new(COUNTRIES))
    }

    /// Look up by any code or name (case-insensitive, exact)
    pub fn lookup(&self, query: &str) -> Option<&'static CountryEntry> {
        let key = normalize_key(query);
        if key.is_empty() {
            return None;
        }
        let entries = self.entries;
        self.index.get(&key).map(|&i| &entries[i])
    }

    pub fn by_alpha2(&self, code: &str) -> Option<&'static CountryEntry> {
        let code = code.trim();
        self.entries
            .iter()
            .find(|c| c.alpha_2.eq_ignore_ascii_case(code))
    }

    pub fn by_alpha3(&self, code: &str) -> Option<&'static CountryEntry> {
        let code = code.trim();
        self.entries
            .iter()
            .find(|c| c.alpha_3.eq_ignore_ascii_case(code))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static CountryEntry> {
        self.entries.iter()
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_codes_are_unique_and_well_formed() {
        let mut alpha2 = HashSet::new();
        let mut alpha3 = HashSet::new();
        for c in COUNTRIES {
            assert_eq!(c.alpha_2.len(), 2, "{}", c.name);
            assert_eq!(c.alpha_3.len(), 3, "{}", c.name);
            assert!(c.alpha_3.bytes().all(|b| b.is_ascii_uppercase()), "{}", c.name);
            assert!(alpha2.insert(c.alpha_2), "duplicate alpha-2 {}", c.alpha_2);
            assert!(alpha3.insert(c.alpha_3), "duplicate alpha-3 {}", c.alpha_3);
        }
        assert_eq!(COUNTRIES.len(), 249);
    }

    #[test]
    fn test_lookup_by_every_key() {
        let registry = Registry::standard();
        for query in ["BO", "bol", "068", "Bolivia, Plurinational State of", "bolivia"] {
            assert_eq!(registry.lookup(query).map(|c| c.alpha_3), Some("BOL"), "{query}");
        }
        assert_eq!(
            registry.lookup("united kingdom of great britain and northern ireland").map(|c| c.alpha_3),
            Some("GBR")
        );
        assert_eq!(registry.lookup("  Germany ").map(|c| c.alpha_3), Some("DEU"));
    }

    #[test]
    fn test_lookup_misses() {
        let registry = Registry::standard();
        assert!(registry.lookup("").is_none());
        assert!(registry.lookup("Atlantis").is_none());
        assert!(registry.lookup("Congo, Dem. Rep.").is_none());
        // Case folding handles non-ASCII names
        assert_eq!(registry.lookup("RÉUNION").map(|c| c.alpha_3), Some("REU"));
    }

    #[test]
    fn test_shared_key_resolves_to_first_entry() {
        static SHARED: &[CountryEntry] = &[
            entry("AA", "AAA", 901, "Georgia", None, None),
            entry("BB", "BBB", 902, "Georgia", None, None),
        ];
        let registry = Registry::new(SHARED);
        assert_eq!(registry.lookup("georgia").map(|c| c.alpha_3), Some("AAA"));
    }

    #[test]
    fn test_code_lookups() {
        let registry = Registry::standard();
        assert_eq!(registry.by_alpha2("gb").map(|c| c.alpha_3), Some("GBR"));
        assert_eq!(registry.by_alpha3("fra").map(|c| c.alpha_2), Some("FR"));
        assert!(registry.by_alpha2("XK").is_none());
        assert_eq!(registry.by_alpha3("BOL").map(|c| c.display_name()), Some("Bolivia"));
    }
}
