use serde::{Deserialize, Serialize};

/// One satellite's element set in two-line form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TleSet {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

/// A remote element-set feed and the names to keep from it
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSource {
    pub name: String,
    pub url: String,
    /// Upper-cased substring match; empty keeps everything
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CatalogSource {
    pub fn matches(&self, satellite_name: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let name = satellite_name.to_uppercase();
        self.keywords
            .iter()
            .any(|k| name.contains(&k.to_uppercase()))
    }

    /// Parse a feed body and keep the records this source selects
    pub fn select(&self, content: &str) -> Vec<TleSet> {
        parse_multi_tle(content)
            .into_iter()
            .filter(|tle| self.matches(&tle.name))
            .collect()
    }
}

pub fn default_sources() -> Vec<CatalogSource> {
    vec![
        CatalogSource {
            name: "visual".into(),
            url: "https://celestrak.org/NORAD/elements/visual.txt".into(),
            keywords: ["ISS", "HST", "AJISAI", "GENESIS", "LAGEOS", "CZ-4B", "CZ-2C", "SL-"]
                .map(String::from)
                .to_vec(),
        },
        CatalogSource {
            name: "stations".into(),
            url: "https://celestrak.org/NORAD/elements/stations.txt".into(),
            keywords: ["ISS", "CSS", "TIANHE", "TIANGONG"]
                .map(String::from)
                .to_vec(),
        },
    ]
}

/// Parse multi-satellite TLE content, accepting both named three-line
/// records and bare two-line records
pub fn parse_multi_tle(content: &str) -> Vec<TleSet> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            // 2-line TLE (no name)
            result.push(TleSet {
                name: unnamed(lines[i]),
                line1: lines[i].to_string(),
                line2: lines[i + 1].to_string(),
            });
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            // 3-line TLE (with name)
            result.push(TleSet {
                name: lines[i].to_string(),
                line1: lines[i + 1].to_string(),
                line2: lines[i + 2].to_string(),
            });
            i += 3;
        } else {
            i += 1; // Skip unknown line
        }
    }

    result
}

fn unnamed(line1: &str) -> String {
    let catalog_number = line1.get(2..7).map(str::trim).unwrap_or_default();
    format!("NORAD {}", catalog_number)
}
